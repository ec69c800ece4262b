//! Attrition Inference Engine
//!
//! Resolves the active scorer once at startup (trained artifact pair or
//! rule-based fallback) and scores batches of employee records with it.

mod artifact;
mod engine;
mod resolver;

pub use artifact::{ArtifactFormat, LogisticModel, StandardScaler};
pub use engine::{ScoreOutcome, ScoringService};
pub use resolver::{resolve, ActiveScorer, ArtifactPaths};

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading or writing model artifacts
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Artifact not found: {}", .0.display())]
    ArtifactNotFound(PathBuf),
    #[error("Failed to read artifact {}: {source}", path.display())]
    ArtifactRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode artifact {}: {reason}", path.display())]
    ArtifactDecode { path: PathBuf, reason: String },
    #[error("Artifact {} does not match the feature contract: {reason}", path.display())]
    ArtifactMismatch { path: PathBuf, reason: String },
    #[error("Failed to write artifact {}: {reason}", path.display())]
    ArtifactWrite { path: PathBuf, reason: String },
}
