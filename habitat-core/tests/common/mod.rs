//! Shared fixtures for node integration tests
//!
//! - Seeded nodes with reproducible timestamps
//! - Stub detectors with scripted behaviour

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use habitat_core::{
    AnomalyDetector, FeatureVector, NodeConfig, Prediction, SimulatedTime, VirtualNode,
};

/// Node built from the default configuration with a fixed seed
pub fn seeded_node(seed: u64) -> VirtualNode {
    NodeConfig {
        seed: Some(seed),
        ..NodeConfig::default()
    }
    .node_builder()
    .time_source(Box::new(SimulatedTime::from_epoch()))
    .build()
    .unwrap()
}

/// Node from `config` with a detector attached
pub fn node_with_detector(config: &NodeConfig, detector: Box<dyn AnomalyDetector>) -> VirtualNode {
    config
        .node_builder()
        .detector(detector)
        .time_source(Box::new(SimulatedTime::from_epoch()))
        .build()
        .unwrap()
}

/// Flags any window whose mean temperature exceeds a limit
pub struct TemperatureLimit {
    pub limit: f64,
    pub calls: Arc<AtomicUsize>,
}

impl TemperatureLimit {
    pub fn new(limit: f64) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                limit,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

impl AnomalyDetector for TemperatureLimit {
    fn predict(&self, features: &FeatureVector) -> Prediction {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let temp_mean = features[0];
        Prediction {
            score: self.limit - temp_mean,
            is_anomaly: temp_mean > self.limit,
        }
    }
}
