//! Two-stage model pipeline: standardize, then regress

use super::{ModelKind, Predictor, Regressor, StandardScaler};
use crate::artifact::ModelMetadata;
use crate::error::{InferenceError, TrainError};
use crate::features::{FeatureVector, FEATURE_COUNT};
use crate::training::Dataset;
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::time::Instant;
use tracing::{debug, info};

/// Fitted standardizer + regressor, the unit persisted as a model artifact.
///
/// The pipeline may carry a copy of its own metadata so an artifact stays
/// self-describing when the sidecar file is lost.
#[derive(Serialize, Deserialize)]
pub struct ModelPipeline {
    scaler: StandardScaler,
    regressor: Regressor,
    metadata: Option<ModelMetadata>,
}

impl ModelPipeline {
    /// Fit both stages on the training partition
    pub fn fit(kind: ModelKind, train: &Dataset, seed: u64) -> Result<Self, TrainError> {
        let start = Instant::now();
        let scaler = StandardScaler::fit(train.rows());
        let x = DenseMatrix::from_2d_vec(&scaler.transform(train.rows())).map_err(|e| {
            TrainError::Fit {
                kind,
                reason: e.to_string(),
            }
        })?;
        let y = train.targets().to_vec();

        let regressor = Regressor::fit(kind, &x, &y, seed).map_err(|e| TrainError::Fit {
            kind,
            reason: e.to_string(),
        })?;

        info!(
            kind = %kind,
            rows = train.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Model fitted"
        );

        Ok(Self {
            scaler,
            regressor,
            metadata: None,
        })
    }

    /// Attach metadata that travels inside the artifact
    pub fn with_metadata(mut self, metadata: ModelMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn embedded_metadata(&self) -> Option<&ModelMetadata> {
        self.metadata.as_ref()
    }

    pub fn kind(&self) -> ModelKind {
        self.regressor.kind()
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    /// Predict for rows already in `FEATURE_ORDER`
    pub fn predict_rows(&self, rows: &[[f64; FEATURE_COUNT]]) -> Result<Vec<f64>, InferenceError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let x = DenseMatrix::from_2d_vec(&self.scaler.transform(rows))
            .map_err(|e| InferenceError::Model(e.to_string()))?;
        let predictions = self
            .regressor
            .predict(&x)
            .map_err(|e| InferenceError::Model(e.to_string()))?;

        if predictions.len() != rows.len() {
            return Err(InferenceError::OutputShape {
                expected: rows.len(),
                got: predictions.len(),
            });
        }
        if let Some(bad) = predictions.iter().find(|p| !p.is_finite()) {
            return Err(InferenceError::NonFinite(*bad));
        }

        debug!(rows = rows.len(), "Inference completed");
        Ok(predictions)
    }
}

impl Predictor for ModelPipeline {
    fn predict_batch(&self, batch: &[FeatureVector]) -> Result<Vec<f64>, InferenceError> {
        let rows: Vec<[f64; FEATURE_COUNT]> = batch.iter().map(FeatureVector::to_ordered).collect();
        self.predict_rows(&rows)
    }
}
