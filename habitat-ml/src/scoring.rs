//! Anomaly score calculation and contamination thresholds

use crate::average_path_length;

/// Anomaly score result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnomalyScore {
    /// Raw anomaly score in `(0, 1]`; values near 1 are anomalous
    pub score: f64,
    /// Average path length across trees
    pub avg_path_length: f64,
    /// Number of trees used
    pub num_trees: usize,
}

impl AnomalyScore {
    /// Create a new anomaly score
    pub fn new(score: f64, avg_path_length: f64, num_trees: usize) -> Self {
        Self {
            score,
            avg_path_length,
            num_trees,
        }
    }
}

/// Calculate anomaly score from path lengths
///
/// Uses the formula: `score = 2^(-E(h(x)) / c(ψ))` where `E(h(x))` is the
/// mean path length and `ψ` the per-tree subsample size.
pub fn calculate_anomaly_score(avg_path_length: f64, sample_size: usize) -> f64 {
    let expected_path = average_path_length(sample_size);
    if expected_path == 0.0 {
        return 0.5;
    }
    2.0_f64.powf(-avg_path_length / expected_path)
}

/// Raw-score threshold flagging roughly `contamination` of `scores` as outliers
///
/// The `(1 - contamination)` quantile of the scores, linearly interpolated
/// between order statistics. Returns `None` for an empty slice.
pub fn contamination_threshold(scores: &[f64], contamination: f64) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let mut sorted = scores.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q = (1.0 - contamination).clamp(0.0, 1.0);
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}
