//! Seam between the node orchestrator and an anomaly detector
//!
//! The core never depends on a particular model. A node either holds a boxed
//! `AnomalyDetector` or nothing at all, and the telemetry-enrichment step
//! handles both cases explicitly.

use crate::features::FeatureVector;

/// Outcome of scoring one feature vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Detector score; higher means more normal
    pub score: f64,
    /// Whether the vector was classified as an outlier
    pub is_anomaly: bool,
}

/// Scores feature vectors as normal or anomalous
///
/// Implementations must be deterministic: the same vector always yields the
/// same prediction.
pub trait AnomalyDetector: Send {
    /// Score one full-window feature vector
    fn predict(&self, features: &FeatureVector) -> Prediction;
}
