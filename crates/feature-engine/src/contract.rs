//! Scoring Interfaces
//!
//! Capabilities shared by trained artifacts and the rule-based fallback.

use crate::FeatureVector;
use thiserror::Error;

/// Errors raised while scaling a batch
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScaleError {
    #[error("Scaled value at row {row}, column {column} is not finite")]
    NonFinite { row: usize, column: usize },
}

/// A two-class probability model over feature vectors.
///
/// Returns one `[p_stay, p_leave]` pair per input vector, in input order.
pub trait ProbabilityModel: Send + Sync {
    fn predict_proba(&self, batch: &[FeatureVector]) -> Vec<[f64; 2]>;
}

/// A feature scaler fitted alongside a trained model
pub trait FeatureScaler: Send + Sync {
    fn transform(&self, batch: &[FeatureVector]) -> Result<Vec<FeatureVector>, ScaleError>;
}
