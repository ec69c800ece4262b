//! Trained Model Artifacts
//!
//! The offline trainer fits a standard scaler and a logistic regression on
//! the canonical feature order and exports both. JSON and postcard
//! encodings are accepted, selected by file extension.

use crate::InferenceError;
use feature_engine::{
    FeatureScaler, FeatureVector, ProbabilityModel, ScaleError, FEATURE_DIMENSION, FEATURE_NAMES,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// On-disk encoding of an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Json,
    Postcard,
}

impl ArtifactFormat {
    /// `.json` files are JSON, everything else is postcard
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ArtifactFormat::Json,
            _ => ArtifactFormat::Postcard,
        }
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, InferenceError> {
    if !path.exists() {
        return Err(InferenceError::ArtifactNotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(|source| InferenceError::ArtifactRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());

    let decoded = match ArtifactFormat::from_path(path) {
        ArtifactFormat::Json => serde_json::from_slice(&bytes).map_err(|e| e.to_string()),
        ArtifactFormat::Postcard => postcard::from_bytes(&bytes).map_err(|e| e.to_string()),
    };

    decoded.map_err(|reason| InferenceError::ArtifactDecode {
        path: path.to_path_buf(),
        reason,
    })
}

fn write_artifact<T: Serialize>(value: &T, path: &Path) -> Result<(), InferenceError> {
    let encoded = match ArtifactFormat::from_path(path) {
        ArtifactFormat::Json => serde_json::to_vec_pretty(value).map_err(|e| e.to_string()),
        ArtifactFormat::Postcard => postcard::to_allocvec(value).map_err(|e| e.to_string()),
    };

    let bytes = encoded.map_err(|reason| InferenceError::ArtifactWrite {
        path: path.to_path_buf(),
        reason,
    })?;

    std::fs::write(path, bytes).map_err(|e| InferenceError::ArtifactWrite {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Check that an artifact was fitted on the canonical feature layout
fn check_layout(feature_names: &[String], columns: &[(&str, &[f64])]) -> Result<(), String> {
    if feature_names.len() != FEATURE_DIMENSION
        || feature_names.iter().zip(FEATURE_NAMES).any(|(a, b)| a != b)
    {
        return Err(format!(
            "expected features {:?}, got {:?}",
            FEATURE_NAMES, feature_names
        ));
    }

    for (name, values) in columns {
        if values.len() != FEATURE_DIMENSION {
            return Err(format!(
                "{} has {} entries, expected {}",
                name,
                values.len(),
                FEATURE_DIMENSION
            ));
        }
        if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
            return Err(format!("{}[{}] is not finite", name, idx));
        }
    }

    Ok(())
}

fn canonical_names() -> Vec<String> {
    FEATURE_NAMES.iter().map(|name| name.to_string()).collect()
}

/// Binary logistic regression over scaled features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    /// Feature order the model was fitted on
    pub feature_names: Vec<String>,
    /// One weight per feature
    pub coefficients: Vec<f64>,
    /// Bias term
    pub intercept: f64,
}

impl LogisticModel {
    /// Build a model over the canonical feature order
    pub fn new(coefficients: [f64; FEATURE_DIMENSION], intercept: f64) -> Self {
        Self {
            feature_names: canonical_names(),
            coefficients: coefficients.to_vec(),
            intercept,
        }
    }

    /// Load and validate a model artifact
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        let model: Self = read_artifact(path)?;
        model.validate().map_err(|reason| InferenceError::ArtifactMismatch {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(model)
    }

    /// Write the model artifact in the encoding implied by `path`
    pub fn save(&self, path: &Path) -> Result<(), InferenceError> {
        write_artifact(self, path)
    }

    fn validate(&self) -> Result<(), String> {
        if !self.intercept.is_finite() {
            return Err("intercept is not finite".to_string());
        }
        check_layout(&self.feature_names, &[("coefficients", self.coefficients.as_slice())])
    }

    /// Probability of the positive ("leave") class
    pub fn probability(&self, features: &FeatureVector) -> f64 {
        let logit: f64 = self
            .coefficients
            .iter()
            .zip(features.values())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;
        sigmoid(logit)
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl ProbabilityModel for LogisticModel {
    fn predict_proba(&self, batch: &[FeatureVector]) -> Vec<[f64; 2]> {
        batch
            .iter()
            .map(|features| {
                let p = self.probability(features);
                if p.is_nan() {
                    // Only reachable with non-finite inputs
                    [0.5, 0.5]
                } else {
                    [1.0 - p, p]
                }
            })
            .collect()
    }
}

/// Per-feature standardization: `(x - mean) / scale`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Feature order the scaler was fitted on
    pub feature_names: Vec<String>,
    /// Per-feature mean
    pub mean: Vec<f64>,
    /// Per-feature standard deviation; zero means a constant column
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Build a scaler over the canonical feature order
    pub fn new(mean: [f64; FEATURE_DIMENSION], scale: [f64; FEATURE_DIMENSION]) -> Self {
        Self {
            feature_names: canonical_names(),
            mean: mean.to_vec(),
            scale: scale.to_vec(),
        }
    }

    /// Load and validate a scaler artifact
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        let scaler: Self = read_artifact(path)?;
        scaler.validate().map_err(|reason| InferenceError::ArtifactMismatch {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(scaler)
    }

    /// Write the scaler artifact in the encoding implied by `path`
    pub fn save(&self, path: &Path) -> Result<(), InferenceError> {
        write_artifact(self, path)
    }

    fn validate(&self) -> Result<(), String> {
        check_layout(
            &self.feature_names,
            &[("mean", self.mean.as_slice()), ("scale", self.scale.as_slice())],
        )
    }
}

impl FeatureScaler for StandardScaler {
    fn transform(&self, batch: &[FeatureVector]) -> Result<Vec<FeatureVector>, ScaleError> {
        batch
            .iter()
            .enumerate()
            .map(|(row, features)| {
                let mut scaled = [0.0; FEATURE_DIMENSION];
                for (column, value) in features.values().iter().enumerate() {
                    let scale = if self.scale[column] == 0.0 {
                        1.0
                    } else {
                        self.scale[column]
                    };
                    let v = (value - self.mean[column]) / scale;
                    if !v.is_finite() {
                        return Err(ScaleError::NonFinite { row, column });
                    }
                    scaled[column] = v;
                }
                Ok(FeatureVector::new(scaled))
            })
            .collect()
    }
}
