//! Error types for training, artifact handling and inference

use crate::predictor::ModelKind;
use std::path::PathBuf;
use thiserror::Error;

/// Invalid training configuration, detected before any data is touched
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown model kind '{0}' (expected one of: linear, ridge, rf)")]
    UnknownModelKind(String),

    #[error("validation fraction must be in (0, 1), got {0}")]
    InvalidTestSize(f64),

    #[error("model version must not be empty")]
    EmptyVersion,
}

/// Problems with the tabular training data
#[derive(Debug, Error, PartialEq)]
pub enum DatasetError {
    #[error("dataset has {found} feature columns, expected {expected}")]
    FeatureCount { expected: usize, found: usize },

    #[error("dataset has {rows} rows but {targets} targets")]
    LengthMismatch { rows: usize, targets: usize },

    #[error("splitting {rows} rows with validation fraction {test_size} leaves an empty partition")]
    EmptyPartition { rows: usize, test_size: f64 },
}

/// Failure while running the model on feature vectors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InferenceError {
    #[error("model invocation failed: {0}")]
    Model(String),

    #[error("model returned {got} predictions for {expected} inputs")]
    OutputShape { expected: usize, got: usize },

    #[error("model produced a non-finite prediction ({0})")]
    NonFinite(f64),
}

/// Failure while reading or writing model artifacts
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("model file not found at {}; train a model first", path.display())]
    ModelNotFound { path: PathBuf },

    #[error("failed to decode model artifact {}: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode model artifact: {0}")]
    Encode(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Any failure of a training run
#[derive(Debug, Error)]
pub enum TrainError {
    #[error("invalid training configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("failed to fit {kind} model: {reason}")]
    Fit { kind: ModelKind, reason: String },

    #[error("failed to evaluate model: {0}")]
    Evaluation(#[from] InferenceError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}
