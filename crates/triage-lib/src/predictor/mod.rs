//! Model pipeline and the prediction seam used by the server

mod pipeline;
mod regressor;
mod scaler;

pub use pipeline::ModelPipeline;
pub use regressor::{ModelKind, Regressor};
pub use scaler::StandardScaler;

use crate::error::InferenceError;
use crate::features::FeatureVector;

/// Trait for prediction implementations
pub trait Predictor: Send + Sync {
    /// Predict one value per input vector, in input order
    fn predict_batch(&self, batch: &[FeatureVector]) -> Result<Vec<f64>, InferenceError>;

    /// Predict a single value
    fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        let predictions = self.predict_batch(std::slice::from_ref(features))?;
        match predictions.as_slice() {
            [value] => Ok(*value),
            other => Err(InferenceError::OutputShape {
                expected: 1,
                got: other.len(),
            }),
        }
    }
}
