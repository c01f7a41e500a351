//! Evaluation metrics for a fitted regressor
//!
//! Besides RMSE, the trainer reports how well the model flags "high-risk"
//! patients: both truth and predictions are thresholded at the training
//! partition's 90th percentile and scored as a binary classifier.

/// Percentile of the training targets that marks a patient as high-risk
pub const HIGH_RISK_PERCENTILE: f64 = 90.0;

/// Root-mean-squared error over paired values. Empty input yields 0.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return 0.0;
    }
    let sum_sq: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    (sum_sq / n as f64).sqrt()
}

/// Percentile with linear interpolation between closest ranks.
/// Empty input yields NaN.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Confusion counts of the derived binary classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionCounts {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub true_negatives: usize,
}

impl ConfusionCounts {
    /// Label every value `>= threshold` as positive and count outcomes
    pub fn at_threshold(actual: &[f64], predicted: &[f64], threshold: f64) -> Self {
        let mut counts = Self::default();
        for (a, p) in actual.iter().zip(predicted) {
            match (*a >= threshold, *p >= threshold) {
                (true, true) => counts.true_positives += 1,
                (false, true) => counts.false_positives += 1,
                (true, false) => counts.false_negatives += 1,
                (false, false) => counts.true_negatives += 1,
            }
        }
        counts
    }

    /// TP / (TP + FP), 0 when nothing was predicted positive
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    /// TP / (TP + FN), 0 when there are no actual positives
    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Validation-set scores for one training run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub rmse: f64,
    pub threshold: f64,
    pub precision: Option<f64>,
    pub recall: Option<f64>,
}

/// Score validation predictions.
///
/// Precision and recall are absent only when no threshold can be derived
/// (an empty training partition).
pub fn evaluate(train_targets: &[f64], actual: &[f64], predicted: &[f64]) -> Evaluation {
    let threshold = percentile(train_targets, HIGH_RISK_PERCENTILE);
    let (precision, recall) = if threshold.is_finite() {
        let counts = ConfusionCounts::at_threshold(actual, predicted, threshold);
        (Some(counts.precision()), Some(counts.recall()))
    } else {
        (None, None)
    };

    Evaluation {
        rmse: rmse(actual, predicted),
        threshold,
        precision,
        recall,
    }
}
