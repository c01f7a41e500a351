//! Regression estimators backing the second pipeline stage

use crate::error::ConfigError;
use crate::features::FEATURE_COUNT;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::error::Failed;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::linear_regression::{LinearRegression, LinearRegressionParameters};
use smartcore::linear::ridge_regression::{RidgeRegression, RidgeRegressionParameters};
use std::fmt;
use std::str::FromStr;

/// Number of trees grown by the random forest
pub const FOREST_TREES: usize = 100;

/// L2 penalty used by the ridge variant
pub const RIDGE_ALPHA: f64 = 1.0;

type Matrix = DenseMatrix<f64>;

/// Closed set of model variants the trainer can fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    #[serde(rename = "linear")]
    Linear,
    #[serde(rename = "ridge")]
    Ridge,
    #[serde(rename = "rf")]
    RandomForest,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [ModelKind::Linear, ModelKind::Ridge, ModelKind::RandomForest];

    /// Short identifier used on the command line and in `model_kind`
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Linear => "linear",
            ModelKind::Ridge => "ridge",
            ModelKind::RandomForest => "rf",
        }
    }

    /// Estimator name recorded as `model_type` in metadata
    pub fn model_type(&self) -> &'static str {
        match self {
            ModelKind::Linear => "LinearRegression",
            ModelKind::Ridge => "Ridge",
            ModelKind::RandomForest => "RandomForest",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownModelKind(s.to_string()))
    }
}

/// A fitted estimator of one of the supported kinds
#[derive(Serialize, Deserialize)]
pub enum Regressor {
    Linear(LinearRegression<f64, f64, Matrix, Vec<f64>>),
    /// smartcore's ridge has no intercept term without its own rescaling,
    /// so the model is fitted on centered targets and the mean is kept here.
    Ridge {
        model: RidgeRegression<f64, f64, Matrix, Vec<f64>>,
        intercept: f64,
    },
    RandomForest(RandomForestRegressor<f64, f64, Matrix, Vec<f64>>),
}

impl Regressor {
    /// Fit the estimator for `kind` on already standardized inputs
    /// (zero column means). `seed` only affects stochastic estimators.
    pub fn fit(kind: ModelKind, x: &Matrix, y: &Vec<f64>, seed: u64) -> Result<Self, Failed> {
        match kind {
            ModelKind::Linear => {
                LinearRegression::fit(x, y, LinearRegressionParameters::default()).map(Self::Linear)
            }
            ModelKind::Ridge => {
                let params = RidgeRegressionParameters::default()
                    .with_alpha(RIDGE_ALPHA)
                    .with_normalize(false);
                let intercept = mean(y);
                let centered: Vec<f64> = y.iter().map(|v| v - intercept).collect();
                let model = RidgeRegression::fit(x, &centered, params)?;
                Ok(Self::Ridge { model, intercept })
            }
            ModelKind::RandomForest => {
                let params = RandomForestRegressorParameters::default()
                    .with_n_trees(FOREST_TREES)
                    .with_m(FEATURE_COUNT)
                    .with_seed(seed);
                RandomForestRegressor::fit(x, y, params).map(Self::RandomForest)
            }
        }
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            Regressor::Linear(_) => ModelKind::Linear,
            Regressor::Ridge { .. } => ModelKind::Ridge,
            Regressor::RandomForest(_) => ModelKind::RandomForest,
        }
    }

    pub fn predict(&self, x: &Matrix) -> Result<Vec<f64>, Failed> {
        match self {
            Regressor::Linear(model) => model.predict(x),
            Regressor::Ridge { model, intercept } => model
                .predict(x)
                .map(|preds| preds.into_iter().map(|p| p + intercept).collect()),
            Regressor::RandomForest(model) => model.predict(x),
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
