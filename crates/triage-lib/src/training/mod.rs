//! Training run: split, fit, evaluate, persist
//!
//! A run is a one-shot batch job. Configuration is validated before the
//! dataset is loaded, and the three artifacts are written at the end.

mod dataset;
mod metrics;

pub use dataset::Dataset;
pub use metrics::{
    evaluate, percentile, rmse, ConfusionCounts, Evaluation, HIGH_RISK_PERCENTILE,
};

use crate::artifact::{self, ArtifactPaths, MetricsRecord, ModelMetadata};
use crate::error::{ConfigError, TrainError};
use crate::predictor::{ModelKind, ModelPipeline};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_VERSION: &str = "v0.1";
pub const DEFAULT_TEST_SIZE: f64 = 0.2;
pub const DEFAULT_OUT_DIR: &str = "models";

/// Parameters of one training run
#[derive(Debug, Clone, PartialEq)]
pub struct TrainConfig {
    pub kind: ModelKind,
    pub seed: u64,
    pub version: String,
    /// Fraction of rows held out for validation, in (0, 1)
    pub test_size: f64,
    /// Root under which `<version>/` is created
    pub out_dir: PathBuf,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            kind: ModelKind::Linear,
            seed: DEFAULT_SEED,
            version: DEFAULT_VERSION.to_string(),
            test_size: DEFAULT_TEST_SIZE,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(ConfigError::InvalidTestSize(self.test_size));
        }
        if self.version.trim().is_empty() {
            return Err(ConfigError::EmptyVersion);
        }
        Ok(())
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::for_version(&self.out_dir, &self.version)
    }
}

/// Outcome of a successful training run
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub paths: ArtifactPaths,
    pub metadata: ModelMetadata,
    pub metrics: MetricsRecord,
    pub train_rows: usize,
    pub validation_rows: usize,
    pub finished_at: DateTime<Utc>,
}

/// Train on the canonical diabetes dataset and write the artifact set
pub fn train(config: &TrainConfig) -> Result<TrainingReport, TrainError> {
    config.validate()?;
    let dataset = Dataset::diabetes()?;
    train_on(config, &dataset)
}

/// Train on an arbitrary dataset and write the artifact set
pub fn train_on(config: &TrainConfig, dataset: &Dataset) -> Result<TrainingReport, TrainError> {
    config.validate()?;
    let start = Instant::now();

    let (train_set, validation_set) = dataset.split(config.test_size, config.seed)?;
    info!(
        kind = %config.kind,
        seed = config.seed,
        train_rows = train_set.len(),
        validation_rows = validation_set.len(),
        "Starting training run"
    );

    let pipeline = ModelPipeline::fit(config.kind, &train_set, config.seed)?;
    let predictions = pipeline.predict_rows(validation_set.rows())?;
    let evaluation = evaluate(train_set.targets(), validation_set.targets(), &predictions);

    let metadata = ModelMetadata::for_run(config, evaluation.rmse);
    let metrics = MetricsRecord::from(evaluation);
    let pipeline = pipeline.with_metadata(metadata.clone());

    let paths = config.artifact_paths();
    artifact::write_artifacts(&paths, &pipeline, &metadata, &metrics)?;

    info!(
        version = %config.version,
        path = %paths.model.display(),
        rmse = metrics.rmse,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Training run completed"
    );

    Ok(TrainingReport {
        paths,
        metadata,
        metrics,
        train_rows: train_set.len(),
        validation_rows: validation_set.len(),
        finished_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TrainConfig::default();
        assert_eq!(config.kind, ModelKind::Linear);
        assert_eq!(config.seed, 42);
        assert_eq!(config.version, "v0.1");
        assert_eq!(config.test_size, 0.2);
        assert_eq!(config.out_dir, PathBuf::from("models"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_test_size_rejected() {
        for test_size in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            let config = TrainConfig {
                test_size,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidTestSize(_))
            ));
        }
    }

    #[test]
    fn test_empty_version_rejected() {
        let config = TrainConfig {
            version: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyVersion));
    }

    #[test]
    fn test_invalid_config_fails_before_writing() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = TrainConfig {
            test_size: 2.0,
            out_dir: temp_dir.path().to_path_buf(),
            ..Default::default()
        };
        let result = train(&config);
        assert!(matches!(result, Err(TrainError::Config(_))));
        assert!(!config.artifact_paths().dir.exists());
    }
}
