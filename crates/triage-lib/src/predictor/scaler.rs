//! Per-column standardization, the first stage of the model pipeline

use crate::features::FEATURE_COUNT;
use serde::{Deserialize, Serialize};

/// Centers each column on its training mean and divides by its population
/// standard deviation. Columns with zero variance are only centered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    means: [f64; FEATURE_COUNT],
    scales: [f64; FEATURE_COUNT],
}

impl StandardScaler {
    pub fn fit(rows: &[[f64; FEATURE_COUNT]]) -> Self {
        let mut means = [0.0; FEATURE_COUNT];
        let mut scales = [1.0; FEATURE_COUNT];
        if rows.is_empty() {
            return Self { means, scales };
        }

        let n = rows.len() as f64;
        for col in 0..FEATURE_COUNT {
            let mean = rows.iter().map(|row| row[col]).sum::<f64>() / n;
            let var = rows.iter().map(|row| (row[col] - mean).powi(2)).sum::<f64>() / n;
            let std = var.sqrt();
            means[col] = mean;
            if std > f64::EPSILON {
                scales[col] = std;
            }
        }

        Self { means, scales }
    }

    pub fn transform_row(&self, row: &[f64; FEATURE_COUNT]) -> Vec<f64> {
        row.iter()
            .zip(self.means.iter().zip(self.scales.iter()))
            .map(|(value, (mean, scale))| (value - mean) / scale)
            .collect()
    }

    pub fn transform(&self, rows: &[[f64; FEATURE_COUNT]]) -> Vec<Vec<f64>> {
        rows.iter().map(|row| self.transform_row(row)).collect()
    }

    pub fn means(&self) -> &[f64; FEATURE_COUNT] {
        &self.means
    }

    pub fn scales(&self) -> &[f64; FEATURE_COUNT] {
        &self.scales
    }
}
