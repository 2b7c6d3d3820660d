//! NavAI-Guard API Server
//!
//! HTTP surface for scoring AIS position reports against the trained
//! autoencoder.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use inference_engine::AnomalyDetector;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod error;
pub mod routes;
pub mod settings;
pub mod telemetry;

pub use error::ApiError;
pub use settings::Settings;

/// Name reported by the health endpoint
pub const SYSTEM_NAME: &str = "NavAI-Guard";

/// Application state shared across handlers
pub struct AppState {
    /// Set exactly once, after the startup assets load
    detector: OnceLock<AnomalyDetector>,
    /// Prometheus exporter, when metrics are enabled
    metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create state with no detector installed
    pub fn new() -> Self {
        Self {
            detector: OnceLock::new(),
            metrics: None,
        }
    }

    /// Create state with a ready detector
    pub fn with_detector(detector: AnomalyDetector) -> Self {
        let state = Self::new();
        // Freshly created, cannot already be set
        let _ = state.detector.set(detector);
        state
    }

    /// Attach the Prometheus handle served on `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Install the detector. Fails with the detector if one is already set.
    pub fn install(&self, detector: AnomalyDetector) -> Result<(), AnomalyDetector> {
        self.detector.set(detector)
    }

    /// The detector, once assets are loaded
    pub fn detector(&self) -> Option<&AnomalyDetector> {
        self.detector.get()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub system: &'static str,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // The dashboard is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health_handler))
        .route("/predict", post(routes::predict::predict))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Health check handler
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "active",
        system: SYSTEM_NAME,
    })
}

/// Prometheus exposition
async fn metrics_handler(State(state): State<Arc<AppState>>) -> Result<String, StatusCode> {
    state
        .metrics
        .as_ref()
        .map(PrometheusHandle::render)
        .ok_or(StatusCode::NOT_FOUND)
}

/// Run the server until Ctrl-C
pub async fn run_server(state: Arc<AppState>, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_router(state);

    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
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
