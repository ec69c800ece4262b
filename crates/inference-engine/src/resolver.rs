//! Artifact Resolution
//!
//! Picks the scorer that backs the service for the life of the process.
//! A trained model is only used together with its scaler; any failure on
//! either side selects the rule-based fallback instead.

use crate::artifact::{LogisticModel, StandardScaler};
use fallback::FallbackScorer;
use feature_engine::{FeatureScaler, ProbabilityModel};
use std::fmt;
use std::path::PathBuf;
use tracing::{info, warn};

/// Locations of the two trained artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            model: PathBuf::from("model.json"),
            scaler: PathBuf::from("scaler.json"),
        }
    }
}

impl ArtifactPaths {
    pub fn new(model: impl Into<PathBuf>, scaler: impl Into<PathBuf>) -> Self {
        Self {
            model: model.into(),
            scaler: scaler.into(),
        }
    }
}

/// The scorer resolved at startup
pub enum ActiveScorer {
    /// Trained model with the scaler it was fitted alongside
    Trained {
        model: Box<dyn ProbabilityModel>,
        scaler: Box<dyn FeatureScaler>,
    },
    /// Rule-based scorer over raw features
    Fallback(FallbackScorer),
}

impl ActiveScorer {
    /// Pair a trained model with its scaler
    pub fn trained(
        model: impl ProbabilityModel + 'static,
        scaler: impl FeatureScaler + 'static,
    ) -> Self {
        ActiveScorer::Trained {
            model: Box::new(model),
            scaler: Box::new(scaler),
        }
    }

    /// Rule-based scorer with no scaler
    pub fn fallback() -> Self {
        ActiveScorer::Fallback(FallbackScorer::new())
    }

    pub fn model(&self) -> &dyn ProbabilityModel {
        match self {
            ActiveScorer::Trained { model, .. } => model.as_ref(),
            ActiveScorer::Fallback(scorer) => scorer,
        }
    }

    pub fn scaler(&self) -> Option<&dyn FeatureScaler> {
        match self {
            ActiveScorer::Trained { scaler, .. } => Some(scaler.as_ref()),
            ActiveScorer::Fallback(_) => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ActiveScorer::Fallback(_))
    }
}

impl fmt::Debug for ActiveScorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveScorer::Trained { .. } => f.write_str("ActiveScorer::Trained"),
            ActiveScorer::Fallback(_) => f.write_str("ActiveScorer::Fallback"),
        }
    }
}

/// Resolve the active scorer from disk. Never fails.
pub fn resolve(paths: &ArtifactPaths) -> ActiveScorer {
    let model = LogisticModel::load(&paths.model);
    let scaler = StandardScaler::load(&paths.scaler);

    match (model, scaler) {
        (Ok(model), Ok(scaler)) => {
            info!(
                model = %paths.model.display(),
                scaler = %paths.scaler.display(),
                "Loaded trained model and scaler"
            );
            ActiveScorer::trained(model, scaler)
        }
        (model, scaler) => {
            if let Err(e) = &model {
                warn!(error = %e, "Model artifact unavailable");
            }
            if let Err(e) = &scaler {
                warn!(error = %e, "Scaler artifact unavailable");
            }
            warn!("Model or scaler not usable, using rule-based fallback");
            ActiveScorer::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_engine::FEATURE_DIMENSION;
    use std::path::Path;

    fn write_pair(dir: &Path) -> ArtifactPaths {
        let paths = ArtifactPaths::new(dir.join("model.json"), dir.join("scaler.json"));
        LogisticModel::new([0.0; FEATURE_DIMENSION], 0.0)
            .save(&paths.model)
            .unwrap();
        StandardScaler::new([0.0; FEATURE_DIMENSION], [1.0; FEATURE_DIMENSION])
            .save(&paths.scaler)
            .unwrap();
        paths
    }

    #[test]
    fn test_default_paths() {
        let paths = ArtifactPaths::default();
        assert_eq!(paths.model, PathBuf::from("model.json"));
        assert_eq!(paths.scaler, PathBuf::from("scaler.json"));
    }

    #[test]
    fn test_no_artifacts_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::new(dir.path().join("model.json"), dir.path().join("scaler.json"));

        let scorer = resolve(&paths);
        assert!(scorer.is_fallback());
        assert!(scorer.scaler().is_none());
    }

    #[test]
    fn test_full_pair_uses_trained() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_pair(dir.path());

        let scorer = resolve(&paths);
        assert!(!scorer.is_fallback());
        assert!(scorer.scaler().is_some());
    }

    #[test]
    fn test_model_without_scaler_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_pair(dir.path());
        std::fs::remove_file(&paths.scaler).unwrap();

        assert!(resolve(&paths).is_fallback());
    }

    #[test]
    fn test_scaler_without_model_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_pair(dir.path());
        std::fs::remove_file(&paths.model).unwrap();

        assert!(resolve(&paths).is_fallback());
    }

    #[test]
    fn test_corrupt_scaler_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_pair(dir.path());
        std::fs::write(&paths.scaler, b"{\"mean\": [1, 2").unwrap();

        assert!(resolve(&paths).is_fallback());
    }

    #[test]
    fn test_directory_in_place_of_model_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_pair(dir.path());
        std::fs::remove_file(&paths.model).unwrap();
        std::fs::create_dir(&paths.model).unwrap();

        assert!(resolve(&paths).is_fallback());
    }

    #[test]
    fn test_debug_names_variant() {
        assert_eq!(format!("{:?}", ActiveScorer::fallback()), "ActiveScorer::Fallback");
    }
}
