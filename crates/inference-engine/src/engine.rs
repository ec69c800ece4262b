//! Scoring Service Implementation

use crate::resolver::ActiveScorer;
use feature_engine::{EmployeeFeatures, FeatureScaler, FeatureVector, ProbabilityModel};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Result of scoring one batch
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreOutcome {
    /// Attrition probability per input record, in input order
    pub probabilities: Vec<f64>,
    /// Whether the scaler failed and raw features were scored instead
    pub scaling_skipped: bool,
    /// Whether the rule-based fallback produced the scores
    pub used_fallback: bool,
}

/// Scores batches of employee records against the resolved scorer
#[derive(Debug, Clone)]
pub struct ScoringService {
    scorer: Arc<ActiveScorer>,
}

impl ScoringService {
    /// Create a service around an already-resolved scorer
    pub fn new(scorer: Arc<ActiveScorer>) -> Self {
        Self { scorer }
    }

    /// Attrition probabilities for each record, in input order
    pub fn score(&self, records: &[EmployeeFeatures]) -> Vec<f64> {
        self.score_detailed(records).probabilities
    }

    /// Score records and report how the batch was handled
    pub fn score_detailed(&self, records: &[EmployeeFeatures]) -> ScoreOutcome {
        let batch: Vec<FeatureVector> = records.iter().map(FeatureVector::from).collect();
        self.score_vectors(batch)
    }

    /// Score already-encoded feature vectors
    pub fn score_vectors(&self, batch: Vec<FeatureVector>) -> ScoreOutcome {
        let start = Instant::now();
        let mut scaling_skipped = false;

        let batch = match self.scorer.scaler() {
            Some(scaler) => match scaler.transform(&batch) {
                Ok(scaled) => scaled,
                Err(e) => {
                    warn!(error = %e, "Error scaling features, scoring unscaled batch");
                    metrics::counter!("attrition_scaling_failures_total").increment(1);
                    scaling_skipped = true;
                    batch
                }
            },
            None => batch,
        };

        let probabilities: Vec<f64> = self
            .scorer
            .model()
            .predict_proba(&batch)
            .into_iter()
            .map(|[_, p_leave]| p_leave)
            .collect();

        let elapsed = start.elapsed();
        metrics::counter!("attrition_predictions_total").increment(probabilities.len() as u64);
        metrics::histogram!("attrition_scoring_latency_seconds").record(elapsed.as_secs_f64());
        debug!(
            "Scored {} records in {}us",
            probabilities.len(),
            elapsed.as_micros()
        );

        ScoreOutcome {
            probabilities,
            scaling_skipped,
            used_fallback: self.scorer.is_fallback(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{LogisticModel, StandardScaler};
    use feature_engine::{ScaleError, FEATURE_DIMENSION};

    struct FailingScaler;

    impl FeatureScaler for FailingScaler {
        fn transform(&self, _batch: &[FeatureVector]) -> Result<Vec<FeatureVector>, ScaleError> {
            Err(ScaleError::NonFinite { row: 0, column: 0 })
        }
    }

    /// Reports the first feature as the leave probability
    struct EchoTenure;

    impl ProbabilityModel for EchoTenure {
        fn predict_proba(&self, batch: &[FeatureVector]) -> Vec<[f64; 2]> {
            batch
                .iter()
                .map(|f| [1.0 - f.tenure_months(), f.tenure_months()])
                .collect()
        }
    }

    fn fallback_service() -> ScoringService {
        ScoringService::new(Arc::new(ActiveScorer::fallback()))
    }

    #[test]
    fn test_default_record_scores_0_335() {
        let probs = fallback_service().score(&[EmployeeFeatures::default()]);
        assert_eq!(probs.len(), 1);
        assert!((probs[0] - 0.335).abs() < 1e-12);
    }

    #[test]
    fn test_empty_batch() {
        let outcome = fallback_service().score_detailed(&[]);
        assert!(outcome.probabilities.is_empty());
        assert!(outcome.used_fallback);
        assert!(!outcome.scaling_skipped);
    }

    #[test]
    fn test_order_preserved() {
        let records: Vec<EmployeeFeatures> = [3.0, 60.0, 120.0]
            .iter()
            .map(|&tenure_months| EmployeeFeatures {
                tenure_months,
                ..Default::default()
            })
            .collect();

        let probs = fallback_service().score(&records);
        assert_eq!(probs.len(), 3);
        assert!(probs[0] > probs[1]);
        assert!(probs[1] > probs[2]);
    }

    #[test]
    fn test_trained_path_applies_scaler() {
        let mut mean = [0.0; FEATURE_DIMENSION];
        mean[0] = 10.0;
        let mut scale = [1.0; FEATURE_DIMENSION];
        scale[0] = 4.0;
        let scorer = ActiveScorer::trained(EchoTenure, StandardScaler::new(mean, scale));
        let service = ScoringService::new(Arc::new(scorer));

        let record = EmployeeFeatures {
            tenure_months: 12.0,
            ..Default::default()
        };
        let outcome = service.score_detailed(&[record]);

        assert_eq!(outcome.probabilities, vec![0.5]);
        assert!(!outcome.used_fallback);
        assert!(!outcome.scaling_skipped);
    }

    #[test]
    fn test_scaling_failure_scores_unscaled() {
        let scorer = ActiveScorer::trained(EchoTenure, FailingScaler);
        let service = ScoringService::new(Arc::new(scorer));

        let record = EmployeeFeatures {
            tenure_months: 0.25,
            ..Default::default()
        };
        let outcome = service.score_detailed(&[record.clone(), record]);

        assert_eq!(outcome.probabilities, vec![0.25, 0.25]);
        assert!(outcome.scaling_skipped);
    }

    #[test]
    fn test_trained_probabilities_bounded() {
        let model = LogisticModel::new([2.0, -1.0, -1.0, -0.5, 0.1, 0.3, 0.2, 0.01], -0.5);
        let scaler = StandardScaler::new([0.0; FEATURE_DIMENSION], [1.0; FEATURE_DIMENSION]);
        let service = ScoringService::new(Arc::new(ActiveScorer::trained(model, scaler)));

        let records = vec![
            EmployeeFeatures::default(),
            EmployeeFeatures {
                tenure_months: 1.0e6,
                ..Default::default()
            },
            EmployeeFeatures {
                tenure_months: -1.0e6,
                ..Default::default()
            },
        ];

        for p in service.score(&records) {
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn test_shared_across_threads() {
        let service = fallback_service();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let service = service.clone();
                std::thread::spawn(move || service.score(&[EmployeeFeatures::default()]))
            })
            .collect();

        for handle in handles {
            let probs = handle.join().unwrap();
            assert!((probs[0] - 0.335).abs() < 1e-12);
        }
    }
}
