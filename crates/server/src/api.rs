//! HTTP API for health, prediction and Prometheus metrics

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{error, info};
use triage_lib::{
    FeatureVector, HealthResponse, LoadedModel, ModelMetadata, Predictor, ServingMetrics,
    StructuredLogger,
};

/// Service context created once at startup and shared read-only by handlers
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<dyn Predictor>,
    pub metadata: ModelMetadata,
    pub metrics: ServingMetrics,
    pub logger: StructuredLogger,
}

impl AppState {
    pub fn new(
        predictor: Arc<dyn Predictor>,
        metadata: ModelMetadata,
        metrics: ServingMetrics,
        logger: StructuredLogger,
    ) -> Self {
        metrics.set_model_version(metadata.version_or_unknown(), metadata.type_or_unknown());
        Self {
            predictor,
            metadata,
            metrics,
            logger,
        }
    }

    /// Build the context around a freshly loaded artifact
    pub fn from_loaded(model: LoadedModel, metrics: ServingMetrics, logger: StructuredLogger) -> Self {
        let metadata = model.metadata.record();
        Self::new(Arc::new(model.pipeline), metadata, metrics, logger)
    }
}

/// Body of a successful `POST /predict`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: f64,
}

/// Body of a failed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn internal_error(message: impl Into<String>) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Health check - 200 whenever the process finished startup
async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse::from_metadata(&state.metadata)))
}

/// Single-record prediction
async fn predict(
    State(state): State<Arc<AppState>>,
    Json(features): Json<FeatureVector>,
) -> Response {
    let start = Instant::now();
    let result = state.predictor.predict(&features);
    let elapsed = start.elapsed().as_secs_f64();
    state.metrics.observe_prediction_latency(elapsed);

    match result {
        Ok(prediction) => {
            state.metrics.inc_predictions();
            state.logger.log_prediction(prediction, elapsed);
            (StatusCode::OK, Json(PredictResponse { prediction })).into_response()
        }
        Err(e) => {
            state.metrics.inc_prediction_errors();
            state.logger.log_inference_failure(&e.to_string());
            internal_error(e.to_string())
        }
    }
}

/// Prometheus metrics endpoint
async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return internal_error(format!("failed to encode metrics: {}", e));
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

/// Turn a panic inside a handler into the same 500 body as other failures
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    error!(error = %detail, "Request handler panicked");
    ServingMetrics::new().inc_prediction_errors();
    internal_error(detail)
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/predict", post(predict))
        .route("/metrics", get(metrics))
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

/// Start the API server and run until `shutdown` resolves
pub async fn serve<F>(port: u16, state: Arc<AppState>, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
