//! Prediction Routes

use axum::{extract::State, Json};
use feature_engine::EmployeeFeatures;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::AppState;

/// Request body for the attrition endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictRequest {
    /// One record per employee; fields omitted take their defaults
    pub employees: Vec<EmployeeFeatures>,
}

/// Response for the attrition endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Attrition probability per employee, in request order
    pub probabilities: Vec<f64>,
}

/// Score a batch of employees
pub async fn predict_attrition(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictRequest>,
) -> Json<PredictResponse> {
    metrics::counter!("attrition_requests_total").increment(1);
    debug!("Attrition request for {} employees", request.employees.len());

    let probabilities = state.scoring.score(&request.employees);

    Json(PredictResponse { probabilities })
}
