//! Attrition Risk Rules

use feature_engine::{FeatureVector, ProbabilityModel};
use tracing::debug;

/// Lowest probability the heuristic will report
pub const MIN_PROBABILITY: f64 = 0.05;
/// Highest probability the heuristic will report
pub const MAX_PROBABILITY: f64 = 0.95;

/// Months since promotion beyond which the risk term stops growing
const PROMOTION_GAP_CAP_MONTHS: f64 = 60.0;

/// Rule-based attrition scorer.
///
/// Starts from a neutral 0.5 and shifts the estimate with one linear term
/// per feature:
/// - longer tenure, more promotions and a higher pay percentile lower risk
/// - performance and engagement below 3.0 raise risk, above 3.0 lower it
/// - leave above 10 days, overtime above 8 hours and a long gap since the
///   last promotion raise risk
///
/// The result is clamped to `[0.05, 0.95]`; the heuristic never claims
/// near-certainty. A NaN in any feature yields `0.95`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackScorer;

impl FallbackScorer {
    /// Create a new fallback scorer
    pub fn new() -> Self {
        Self
    }

    /// Probability of attrition for a single raw (unscaled) vector
    pub fn score(&self, features: &FeatureVector) -> f64 {
        let mut p = 0.5;
        p -= features.tenure_months() / 200.0;
        p += (3.0 - features.performance_score()) * 0.08;
        p += (3.0 - features.engagement_score()) * 0.06;
        p -= features.promotions() * 0.06;
        p -= (features.salary_percentile() - 50.0) / 500.0;
        p += (features.leave_days_last_12_months() - 10.0) / 80.0;
        p += (features.overtime_hours_per_month() - 8.0) / 100.0;
        p += cap_promotion_gap(features.months_since_last_promotion()) / 600.0;

        // NaN reports the ceiling
        if p.is_nan() {
            return MAX_PROBABILITY;
        }
        p.clamp(MIN_PROBABILITY, MAX_PROBABILITY)
    }
}

/// Caps the gap at 60 months. NaN passes through so the score stays NaN.
fn cap_promotion_gap(months: f64) -> f64 {
    if months > PROMOTION_GAP_CAP_MONTHS {
        PROMOTION_GAP_CAP_MONTHS
    } else {
        months
    }
}

impl ProbabilityModel for FallbackScorer {
    fn predict_proba(&self, batch: &[FeatureVector]) -> Vec<[f64; 2]> {
        debug!("Fallback scoring batch of {} vectors", batch.len());
        batch
            .iter()
            .map(|features| {
                let p = self.score(features);
                [1.0 - p, p]
            })
            .collect()
    }
}
