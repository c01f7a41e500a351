//! Diabetes triage prediction service
//!
//! Loads the model artifact selected by `MODEL_VERSION` once at startup
//! and serves `/health`, `/predict` and `/metrics`.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use triage_lib::{load_model, ServingMetrics, StructuredLogger};
use triage_server::{api, config};

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting triage-server");

    let config = config::ServerConfig::load()?;
    let model_path = config.model_path();
    info!(
        model_version = %config.model_version,
        path = %model_path.display(),
        "Server configured"
    );

    // A missing or unreadable artifact aborts startup
    let model = load_model(&model_path)
        .with_context(|| format!("Failed to load model version {}", config.model_version))?;

    let metrics = ServingMetrics::new();
    let logger = StructuredLogger::new("triage-server");
    let state = Arc::new(api::AppState::from_loaded(model, metrics, logger.clone()));
    logger.log_startup(
        SERVICE_VERSION,
        state.metadata.version_or_unknown(),
        state.metadata.type_or_unknown(),
    );

    let shutdown_logger = logger.clone();
    api::serve(config.api_port, state, async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown_logger.log_shutdown("SIGINT received");
        }
    })
    .await?;

    info!("Shutting down");
    Ok(())
}
