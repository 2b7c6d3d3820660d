//! NavAI-Guard - Main Entry Point

use anyhow::{anyhow, Context};
use api::{run_server, telemetry, AppState, Settings};
use inference_engine::AssetLoader;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("Failed to load configuration")?;
    telemetry::init_logging(&settings.logging).map_err(|e| anyhow!(e))?;

    info!("=== NavAI-Guard v{} ===", env!("CARGO_PKG_VERSION"));

    let mut state = AppState::new();
    if settings.metrics.enabled {
        let handle = telemetry::install_metrics_recorder()
            .context("Failed to install metrics recorder")?;
        state = state.with_metrics(handle);
    }

    // Load before binding so no request ever sees partial state
    let loader = AssetLoader::new(settings.asset_paths(), settings.detection.threshold)
        .with_validation(settings.validation.clone());
    let detector = loader.load().map_err(|e| {
        error!("Could not load model or scaler: {}", e);
        e
    })?;
    state
        .install(detector)
        .map_err(|_| anyhow!("detector installed twice"))?;

    let addr = settings.socket_addr()?;
    run_server(Arc::new(state), addr).await
}
