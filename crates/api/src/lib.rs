//! Attrition Scoring API Server
//!
//! REST API exposing the attrition scorer resolved at startup.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use inference_engine::{resolve, ScoringService};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, subscriber::SetGlobalDefaultError};
use tracing_subscriber::FmtSubscriber;

pub mod routes;
pub mod settings;

pub use settings::Settings;

/// Service name reported by the health endpoint
pub const SERVICE_NAME: &str = "ml-attrition";

/// Application state shared across handlers.
///
/// Immutable after startup, so handlers share it without a lock.
pub struct AppState {
    /// Scoring service over the resolved scorer
    pub scoring: ScoringService,
    /// Prometheus exporter handle, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new application state
    pub fn new(scoring: ScoringService) -> Self {
        Self {
            scoring,
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for the `/metrics` endpoint
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route(
            "/predict/attrition",
            post(routes::predictions::predict_attrition),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Prometheus scrape handler
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed".to_string()),
    }
}

/// Initialize logging
pub fn init_logging(settings: &Settings) -> Result<(), SetGlobalDefaultError> {
    let level = settings.log_level;

    if settings.log_json {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    }
}

/// Resolve artifacts, install the metrics recorder and run the server
pub async fn run_server(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let paths = settings.artifact_paths();
    info!(
        "Resolving scorer: model={}, scaler={}",
        paths.model.display(),
        paths.scaler.display()
    );
    let scorer = Arc::new(resolve(&paths));

    let handle = PrometheusBuilder::new().install_recorder()?;
    let state = Arc::new(AppState::new(ScoringService::new(scorer)).with_metrics(handle));
    let app = create_router(state);

    info!("Starting API server on {}", settings.bind_addr);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
