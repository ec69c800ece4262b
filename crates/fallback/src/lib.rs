//! Rule-Based Fallback System
//!
//! Provides a deterministic linear risk heuristic when no trained model
//! artifact pair is available.

mod rules;

pub use rules::{FallbackScorer, MAX_PROBABILITY, MIN_PROBABILITY};
