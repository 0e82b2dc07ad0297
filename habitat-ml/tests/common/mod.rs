//! Shared fixtures for model integration tests

#![allow(dead_code)]

use std::path::PathBuf;

use habitat_core::{NodeConfig, SimulatedTime, TelemetryRecord, VirtualNode};
use habitat_ml::{generate_baseline, train, AnomalyModel, BaselineSet, ModelArtifactExt, TrainingConfig};
use tempfile::TempDir;

/// Baseline long enough to get past the initial thermal transient
pub fn baseline() -> BaselineSet {
    generate_baseline(&NodeConfig::default(), 1_500).unwrap()
}

/// Small but representative model
pub fn trained_model() -> AnomalyModel {
    train(
        &baseline(),
        &TrainingConfig {
            num_trees: 50,
            ..TrainingConfig::default()
        },
    )
    .unwrap()
}

/// Model saved into a fresh temporary directory
pub fn saved_model() -> (TempDir, PathBuf, AnomalyModel) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("model.json");
    let model = trained_model();
    model.save(&path).unwrap();
    (dir, path, model)
}

/// Node built from defaults with the artifact at `path`
pub fn node_with_artifact(path: &std::path::Path) -> VirtualNode {
    NodeConfig::default()
        .node_builder()
        .model_artifact(path)
        .time_source(Box::new(SimulatedTime::from_epoch()))
        .build()
        .unwrap()
}

pub fn run(node: &mut VirtualNode, steps: usize) -> Vec<TelemetryRecord> {
    (0..steps).map(|_| node.step()).collect()
}
