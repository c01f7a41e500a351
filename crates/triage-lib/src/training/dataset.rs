//! Canonical diabetes dataset and the seeded train/validation split

use crate::error::DatasetError;
use crate::features::FEATURE_COUNT;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

/// Rows of features in `FEATURE_ORDER` with one target per row
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    rows: Vec<[f64; FEATURE_COUNT]>,
    targets: Vec<f64>,
}

impl Dataset {
    pub fn new(rows: Vec<[f64; FEATURE_COUNT]>, targets: Vec<f64>) -> Result<Self, DatasetError> {
        if rows.len() != targets.len() {
            return Err(DatasetError::LengthMismatch {
                rows: rows.len(),
                targets: targets.len(),
            });
        }
        Ok(Self { rows, targets })
    }

    /// The 442-patient diabetes progression dataset bundled with smartcore.
    ///
    /// Columns arrive as age, sex, bmi, bp, s1..s6, which is already
    /// `FEATURE_ORDER`.
    pub fn diabetes() -> Result<Self, DatasetError> {
        let raw = smartcore::dataset::diabetes::load_dataset();
        if raw.num_features != FEATURE_COUNT {
            return Err(DatasetError::FeatureCount {
                expected: FEATURE_COUNT,
                found: raw.num_features,
            });
        }

        let rows: Vec<[f64; FEATURE_COUNT]> = raw
            .data
            .chunks_exact(FEATURE_COUNT)
            .map(|chunk| {
                let mut row = [0.0; FEATURE_COUNT];
                for (dst, src) in row.iter_mut().zip(chunk) {
                    *dst = f64::from(*src);
                }
                row
            })
            .collect();
        let targets: Vec<f64> = raw.target.iter().map(|y| f64::from(*y)).collect();

        debug!(rows = rows.len(), "Loaded diabetes dataset");
        Self::new(rows, targets)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[[f64; FEATURE_COUNT]] {
        &self.rows
    }

    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    /// Split into `(train, validation)`.
    ///
    /// Row indices are shuffled with a PRNG seeded from `seed`; the first
    /// `ceil(test_size * len)` shuffled rows form the validation partition.
    /// Identical `(test_size, seed)` always yields identical partitions.
    pub fn split(&self, test_size: f64, seed: u64) -> Result<(Dataset, Dataset), DatasetError> {
        let n = self.len();
        let n_test = if test_size > 0.0 && test_size < 1.0 {
            (test_size * n as f64).ceil() as usize
        } else {
            0
        };
        if n_test == 0 || n_test >= n {
            return Err(DatasetError::EmptyPartition { rows: n, test_size });
        }

        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let (validation_idx, train_idx) = indices.split_at(n_test);
        Ok((self.select(train_idx), self.select(validation_idx)))
    }

    fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            rows: indices.iter().map(|&i| self.rows[i]).collect(),
            targets: indices.iter().map(|&i| self.targets[i]).collect(),
        }
    }
}
