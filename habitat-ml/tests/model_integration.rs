//! Artifact persistence and node integration

mod common;

use std::io::Write;

use common::{baseline, node_with_artifact, run, saved_model};
use habitat_core::NodeConfig;
use habitat_ml::{node_from_config, AnomalyModel, BaselineSet, MLError};
use tempfile::{NamedTempFile, TempDir};

#[test]
fn saved_artifact_loads_identically() {
    let (_dir, path, model) = saved_model();
    let loaded = AnomalyModel::load(&path).unwrap();
    assert_eq!(loaded, model);

    let rows = baseline().rows;
    for row in rows.iter().step_by(97) {
        assert_eq!(loaded.predict(row), model.predict(row));
    }
}

#[test]
fn missing_artifact_is_not_found() {
    let dir = TempDir::new().unwrap();
    let err = AnomalyModel::load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, MLError::ArtifactNotFound { .. }));
}

#[test]
fn corrupt_artifact_is_reported() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{{\"format_version\": 1, \"trees\": ").unwrap();
    file.flush().unwrap();
    assert!(matches!(
        AnomalyModel::load(file.path()),
        Err(MLError::ArtifactCorrupt(_))
    ));
}

#[test]
fn unloadable_artifact_leaves_detection_disabled() {
    let dir = TempDir::new().unwrap();
    let mut node = node_with_artifact(&dir.path().join("absent.json"));
    assert!(!node.detection_enabled());

    for record in run(&mut node, 30) {
        assert_eq!(record.anomaly_score, None);
        assert!(!record.is_anomaly);
    }
}

#[test]
fn loaded_model_scores_once_window_is_full() {
    let (_dir, path, _model) = saved_model();
    let config = NodeConfig {
        model_path: Some(path),
        ..NodeConfig::default()
    };
    let mut node = node_from_config(&config).unwrap();
    assert!(node.detection_enabled());

    let records = run(&mut node, 20);
    assert!(records[..9].iter().all(|r| r.anomaly_score.is_none()));
    assert!(records[9..].iter().all(|r| r.anomaly_score.is_some()));
}

#[test]
fn thermal_spike_scores_more_anomalous_than_normal_operation() {
    let (_dir, path, _model) = saved_model();
    let mut node = node_with_artifact(&path);

    let mut normal: Vec<f64> = run(&mut node, 400)[100..]
        .iter()
        .filter_map(|r| r.anomaly_score)
        .collect();
    normal.sort_by(f64::total_cmp);
    let median_normal = normal[normal.len() / 2];

    node.inject_thermal_spike(5, 15.0);
    let spiked: Vec<f64> = run(&mut node, 5).iter().filter_map(|r| r.anomaly_score).collect();
    let most_anomalous = spiked.iter().copied().fold(f64::INFINITY, f64::min);

    assert!(
        most_anomalous < median_normal,
        "spike {most_anomalous} vs median normal {median_normal}"
    );
}

#[test]
fn baseline_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("baseline.json");
    let set = baseline();
    set.save(&path).unwrap();
    assert_eq!(BaselineSet::load(&path).unwrap(), set);
}

#[test]
fn baseline_with_foreign_columns_is_corrupt() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("baseline.json");
    let mut set = BaselineSet::new(10);
    set.feature_names.reverse();
    set.save(&path).unwrap();
    assert!(matches!(
        BaselineSet::load(&path),
        Err(MLError::ArtifactCorrupt(_))
    ));
}
