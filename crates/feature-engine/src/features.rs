//! Feature Vector Assembly

use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize};

/// Number of features in the vector
pub const FEATURE_DIMENSION: usize = 8;

/// Canonical feature order. Trained artifacts and the fallback scorer both
/// index positionally into this layout.
pub const FEATURE_NAMES: [&str; FEATURE_DIMENSION] = [
    "tenure_months",
    "performance_score",
    "engagement_score",
    "promotions",
    "salary_percentile",
    "leave_days_last_12_months",
    "overtime_hours_per_month",
    "months_since_last_promotion",
];

/// One employee record as sent by callers.
///
/// Every field is optional on the wire; omitted fields take the documented
/// default. Values outside nominal ranges are accepted as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeeFeatures {
    /// Months with the organization
    pub tenure_months: f64,
    /// Latest performance rating (nominally 1.0 to 5.0)
    pub performance_score: f64,
    /// Latest engagement survey score (nominally 1.0 to 5.0)
    pub engagement_score: f64,
    /// Number of promotions received (always a whole number)
    #[serde(deserialize_with = "deserialize_whole_number")]
    pub promotions: f64,
    /// Pay percentile within peer band (nominally 0 to 100)
    pub salary_percentile: f64,
    /// Leave days taken in the trailing 12 months
    pub leave_days_last_12_months: f64,
    /// Average monthly overtime hours
    pub overtime_hours_per_month: f64,
    /// Months since the last promotion (999 when never promoted)
    pub months_since_last_promotion: f64,
}

impl Default for EmployeeFeatures {
    fn default() -> Self {
        Self {
            tenure_months: 12.0,
            performance_score: 3.0,
            engagement_score: 3.0,
            promotions: 0.0,
            salary_percentile: 50.0,
            leave_days_last_12_months: 0.0,
            overtime_hours_per_month: 0.0,
            months_since_last_promotion: 999.0,
        }
    }
}

impl EmployeeFeatures {
    /// Encode the record positionally in [`FEATURE_NAMES`] order
    pub fn to_vector(&self) -> FeatureVector {
        FeatureVector::new([
            self.tenure_months,
            self.performance_score,
            self.engagement_score,
            self.promotions,
            self.salary_percentile,
            self.leave_days_last_12_months,
            self.overtime_hours_per_month,
            self.months_since_last_promotion,
        ])
    }
}

impl From<&EmployeeFeatures> for FeatureVector {
    fn from(record: &EmployeeFeatures) -> Self {
        record.to_vector()
    }
}

/// Accepts any whole JSON number, including integral floats (`2.0`) and
/// integers beyond the `i64` range; rejects fractions such as `1.5`.
fn deserialize_whole_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.is_finite() && value.fract() == 0.0 {
        Ok(value)
    } else {
        Err(D::Error::custom(format!("expected a whole number, got {value}")))
    }
}

/// Positional feature vector for model input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_DIMENSION],
}

impl Default for FeatureVector {
    fn default() -> Self {
        EmployeeFeatures::default().to_vector()
    }
}

impl FeatureVector {
    /// Wrap raw values already in canonical order
    pub fn new(values: [f64; FEATURE_DIMENSION]) -> Self {
        Self { values }
    }

    /// Raw values in canonical order
    pub fn values(&self) -> &[f64; FEATURE_DIMENSION] {
        &self.values
    }

    pub fn tenure_months(&self) -> f64 {
        self.values[0]
    }

    pub fn performance_score(&self) -> f64 {
        self.values[1]
    }

    pub fn engagement_score(&self) -> f64 {
        self.values[2]
    }

    pub fn promotions(&self) -> f64 {
        self.values[3]
    }

    pub fn salary_percentile(&self) -> f64 {
        self.values[4]
    }

    pub fn leave_days_last_12_months(&self) -> f64 {
        self.values[5]
    }

    pub fn overtime_hours_per_month(&self) -> f64 {
        self.values[6]
    }

    pub fn months_since_last_promotion(&self) -> f64 {
        self.values[7]
    }
}
