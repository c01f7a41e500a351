//! Observability infrastructure for the prediction service
//!
//! Provides:
//! - Prometheus metrics (prediction latency, prediction/error counts, model version)
//! - Structured JSON logging with tracing

use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, GaugeVec, Histogram, IntCounter,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.5,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<ServingMetricsInner> = OnceLock::new();

struct ServingMetricsInner {
    prediction_latency_seconds: Histogram,
    predictions_served: IntCounter,
    prediction_errors: IntCounter,
    model_version_info: GaugeVec,
}

impl ServingMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "triage_prediction_latency_seconds",
                "Time spent running model inference for one request",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions_served: register_int_counter!(
                "triage_predictions_total",
                "Total number of successful predictions"
            )
            .expect("Failed to register predictions_total"),

            prediction_errors: register_int_counter!(
                "triage_prediction_errors_total",
                "Total number of failed model invocations"
            )
            .expect("Failed to register prediction_errors_total"),

            model_version_info: register_gauge_vec!(
                "triage_model_version_info",
                "Information about the currently loaded model",
                &["version", "model_type"]
            )
            .expect("Failed to register model_version_info"),
        }
    }
}

/// Serving metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct ServingMetrics {
    _private: (),
}

impl Default for ServingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServingMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(ServingMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &ServingMetricsInner {
        GLOBAL_METRICS.get_or_init(ServingMetricsInner::new)
    }

    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    pub fn inc_predictions(&self) {
        self.inner().predictions_served.inc();
    }

    pub fn inc_prediction_errors(&self) {
        self.inner().prediction_errors.inc();
    }

    pub fn prediction_errors(&self) -> u64 {
        self.inner().prediction_errors.get()
    }

    /// Publish the loaded model identity; the previous label set is cleared
    pub fn set_model_version(&self, version: &str, model_type: &str) {
        self.inner().model_version_info.reset();
        self.inner()
            .model_version_info
            .with_label_values(&[version, model_type])
            .set(1.0);
    }
}

/// Structured logger for service events
#[derive(Clone)]
pub struct StructuredLogger {
    service: String,
}

impl StructuredLogger {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn log_startup(&self, service_version: &str, model_version: &str, model_type: &str) {
        info!(
            event = "service_started",
            service = %self.service,
            service_version = %service_version,
            model_version = %model_version,
            model_type = %model_type,
            "Prediction service started"
        );
    }

    pub fn log_prediction(&self, prediction: f64, latency_secs: f64) {
        info!(
            event = "prediction_served",
            service = %self.service,
            prediction = prediction,
            latency_us = (latency_secs * 1_000_000.0) as u64,
            "Served prediction"
        );
    }

    pub fn log_inference_failure(&self, error: &str) {
        warn!(
            event = "inference_failed",
            service = %self.service,
            error = %error,
            "Model invocation failed"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_stopped",
            service = %self.service,
            reason = %reason,
            "Prediction service stopping"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_handles_share_state() {
        let first = ServingMetrics::new();
        let second = first.clone();
        let before = first.prediction_errors();
        second.inc_prediction_errors();
        assert!(first.prediction_errors() > before);
    }

    #[test]
    fn test_model_version_gauge_exported() {
        let metrics = ServingMetrics::new();
        metrics.set_model_version("v-test", "Ridge");

        let families = prometheus::gather();
        let family = families
            .iter()
            .find(|f| f.get_name() == "triage_model_version_info")
            .expect("model version gauge registered");
        assert_eq!(family.get_metric().len(), 1);
    }
}
