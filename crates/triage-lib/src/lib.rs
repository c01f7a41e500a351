//! Core library for the diabetes triage train/serve pipeline
//!
//! This crate provides the contract shared by the trainer and the
//! prediction service:
//! - The canonical feature vector and its positional order
//! - Model fitting (standardizer + regressor pipeline) and evaluation
//! - Artifact persistence and loading with metadata resolution
//! - Health reporting and observability for the serving side

pub mod artifact;
pub mod error;
pub mod features;
pub mod health;
pub mod observability;
pub mod predictor;
pub mod training;

pub use artifact::{
    load_model, ArtifactPaths, LoadedModel, MetadataSource, MetricsRecord, ModelMetadata,
};
pub use error::{ArtifactError, ConfigError, DatasetError, InferenceError, TrainError};
pub use features::{FeatureVector, FEATURE_COUNT, FEATURE_ORDER};
pub use health::{HealthResponse, ServiceStatus};
pub use observability::{ServingMetrics, StructuredLogger};
pub use predictor::{ModelKind, ModelPipeline, Predictor};
pub use training::{train, TrainConfig, TrainingReport};
