//! Feature Engineering Engine
//!
//! Defines the canonical employee feature order shared by trained and
//! rule-based scorers, plus the capability traits both implement.

mod contract;
mod features;

pub use contract::{FeatureScaler, ProbabilityModel, ScaleError};
pub use features::{EmployeeFeatures, FeatureVector, FEATURE_DIMENSION, FEATURE_NAMES};
