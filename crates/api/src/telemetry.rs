//! Logging and Metrics Setup

use crate::settings::LoggingSettings;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

pub const PREDICTIONS_TOTAL: &str = "navai_predictions_total";
pub const PREDICTION_ERRORS_TOTAL: &str = "navai_prediction_errors_total";
pub const INFERENCE_LATENCY_SECONDS: &str = "navai_inference_latency_seconds";

/// Initialize logging. `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(
    settings: &LoggingSettings,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if settings.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
}

/// Install the global Prometheus recorder
pub fn install_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    metrics::describe_counter!(PREDICTIONS_TOTAL, "Records scored, by status");
    metrics::describe_counter!(PREDICTION_ERRORS_TOTAL, "Failed predictions, by kind");
    metrics::describe_histogram!(
        INFERENCE_LATENCY_SECONDS,
        metrics::Unit::Seconds,
        "Time spent in the scoring pipeline"
    );

    Ok(handle)
}

/// Count a scored record
pub fn record_prediction(status: &'static str, elapsed: Duration) {
    metrics::counter!(PREDICTIONS_TOTAL, "status" => status).increment(1);
    metrics::histogram!(INFERENCE_LATENCY_SECONDS).record(elapsed.as_secs_f64());
}

/// Count a failed prediction
pub fn record_error(kind: &'static str) {
    metrics::counter!(PREDICTION_ERRORS_TOTAL, "kind" => kind).increment(1);
}
