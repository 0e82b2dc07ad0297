//! Simulation core for E-Habitat
//!
//! Simulates the physical environment of a compute node and prepares its
//! telemetry for anomaly detection.
//!
//! Key properties:
//! - Deterministic: a seed reproduces every stochastic stream of a node
//! - Bounded memory: the feature window is allocated once
//! - Detector-agnostic: any `AnomalyDetector` can be attached, or none
//!
//! ```
//! use habitat_core::{NodeConfig, VirtualNode};
//!
//! let mut node: VirtualNode = NodeConfig::default().node_builder().build().unwrap();
//!
//! node.inject_thermal_spike(3, 5.0);
//! let record = node.step();
//! assert!(record.injected_anomaly);
//! assert_eq!(record.anomaly_score, None); // no detector attached
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod buffer;
pub mod config;
pub mod constants;
pub mod detector;
pub mod errors;
pub mod features;
pub mod node;
pub mod simulation;
pub mod telemetry;
pub mod time;

// Public API
pub use config::NodeConfig;
pub use detector::{AnomalyDetector, Prediction};
pub use errors::{SimulationError, SimulationResult};
pub use features::{
    FeatureVector, SlidingWindowFeatureExtractor, TrackedVariable, FEATURE_COUNT, FEATURE_NAMES,
};
pub use node::{InjectionState, NodeBuilder, VirtualNode};
pub use simulation::{
    AirflowConfig, AirflowModel, EnvironmentReading, EnvironmentalModel, HumidityConfig,
    HumidityModel, NoiseStream, ThermalConfig, ThermalModel,
};
pub use telemetry::TelemetryRecord;
pub use time::{SimulatedTime, SystemTime, TimeSource};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
