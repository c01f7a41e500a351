//! Canonical feature vector shared by trainer and server
//!
//! The model is positional: column `i` of the training matrix and element
//! `i` of an inference row must be the same measurement. `FEATURE_ORDER`
//! is the single source of that order.

use serde::{Deserialize, Serialize};

/// Number of input features expected by the model
pub const FEATURE_COUNT: usize = 10;

/// Positional order of features in every model input row
pub const FEATURE_ORDER: [&str; FEATURE_COUNT] =
    ["age", "sex", "bmi", "bp", "s1", "s2", "s3", "s4", "s5", "s6"];

/// One patient record as accepted by the prediction endpoint.
///
/// Values are the dataset's standardized measurements; no range checks
/// are applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub age: f64,
    pub sex: f64,
    pub bmi: f64,
    pub bp: f64,
    pub s1: f64,
    pub s2: f64,
    pub s3: f64,
    pub s4: f64,
    pub s5: f64,
    pub s6: f64,
}

impl FeatureVector {
    /// Build a vector from values already in `FEATURE_ORDER`
    pub fn from_ordered(values: [f64; FEATURE_COUNT]) -> Self {
        let [age, sex, bmi, bp, s1, s2, s3, s4, s5, s6] = values;
        Self {
            age,
            sex,
            bmi,
            bp,
            s1,
            s2,
            s3,
            s4,
            s5,
            s6,
        }
    }

    /// Values in `FEATURE_ORDER`
    pub fn to_ordered(&self) -> [f64; FEATURE_COUNT] {
        [
            self.age, self.sex, self.bmi, self.bp, self.s1, self.s2, self.s3, self.s4, self.s5,
            self.s6,
        ]
    }

    /// Look up a feature by its canonical name
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_ORDER
            .iter()
            .position(|feature| *feature == name)
            .map(|idx| self.to_ordered()[idx])
    }
}
