//! Telemetry record emitted by a virtual node every step

use serde::{Deserialize, Serialize};

/// One step of node telemetry
///
/// Produced fresh by every `VirtualNode::step` and never mutated afterwards.
/// `anomaly_score` is `None` (serialised as `null`) when detection is
/// disabled or the feature window is still filling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    /// Identifier of the emitting node
    pub node_id: String,
    /// ISO-8601 UTC timestamp
    pub timestamp: String,
    /// Enclosure temperature (°C), including any injected spike
    pub temperature: f64,
    /// Relative humidity (%RH)
    pub humidity: f64,
    /// Current airflow
    pub airflow: f64,
    /// CPU load in `[0, 1]`
    pub cpu_load: f64,
    /// Whether a thermal spike was injected into this record
    pub injected_anomaly: bool,
    /// Detector score, higher means more normal
    pub anomaly_score: Option<f64>,
    /// Whether the detector classified the current window as an outlier
    pub is_anomaly: bool,
}
