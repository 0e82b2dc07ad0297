//! End-to-end behaviour of virtual nodes

mod common;

use std::sync::atomic::Ordering;

use common::{node_with_detector, seeded_node, TemperatureLimit};
use habitat_core::{InjectionState, NodeConfig, TelemetryRecord, VirtualNode};

fn run(node: &mut VirtualNode, steps: usize) -> Vec<TelemetryRecord> {
    (0..steps).map(|_| node.step()).collect()
}

#[test]
fn same_seed_reproduces_the_node() {
    let a = run(&mut seeded_node(42), 100);
    let b = run(&mut seeded_node(42), 100);
    assert_eq!(a, b);
}

#[test]
fn different_seeds_diverge_within_ten_steps() {
    let a = run(&mut seeded_node(42), 10);
    let b = run(&mut seeded_node(123), 10);

    let cpu_a: Vec<f64> = a.iter().map(|r| r.cpu_load).collect();
    let cpu_b: Vec<f64> = b.iter().map(|r| r.cpu_load).collect();
    assert_ne!(cpu_a, cpu_b);

    let temp_a: Vec<f64> = a.iter().map(|r| r.temperature).collect();
    let temp_b: Vec<f64> = b.iter().map(|r| r.temperature).collect();
    assert_ne!(temp_a, temp_b);
}

#[test]
fn nodes_do_not_share_random_state() {
    let mut lone = seeded_node(7);
    let expected = run(&mut lone, 30);

    let mut paired = seeded_node(7);
    let mut noisy_neighbour = seeded_node(8);
    let mut observed = Vec::new();
    for _ in 0..30 {
        noisy_neighbour.step();
        observed.push(paired.step());
        noisy_neighbour.step();
    }
    assert_eq!(expected, observed);
}

#[test]
fn spike_lifecycle_against_unspiked_twin() {
    let magnitude = 8.0;
    let mut spiked = seeded_node(11);
    let mut twin = seeded_node(11);

    run(&mut spiked, 5);
    run(&mut twin, 5);
    spiked.inject_thermal_spike(3, magnitude);

    for remaining in [2, 1, 0] {
        let s = spiked.step();
        let t = twin.step();
        assert!(s.injected_anomaly);
        assert!(!t.injected_anomaly);
        assert!((s.temperature - (t.temperature + magnitude)).abs() < 1e-12);
        assert_eq!(s.cpu_load, t.cpu_load);
        assert_eq!(spiked.spike_remaining_steps(), remaining);
    }

    let s = spiked.step();
    let t = twin.step();
    assert!(!s.injected_anomaly);
    assert_eq!(s.temperature, t.temperature);
    assert_eq!(spiked.injection_state(), InjectionState::Idle);
}

#[test]
fn detector_sees_every_full_window() {
    let config = NodeConfig::default();
    let (detector, calls) = TemperatureLimit::new(1000.0);
    let mut node = node_with_detector(&config, Box::new(detector));

    let records = run(&mut node, 25);
    for (i, record) in records.iter().enumerate() {
        if i < config.window_size - 1 {
            assert_eq!(record.anomaly_score, None, "step {i}");
        } else {
            assert!(record.anomaly_score.is_some(), "step {i}");
            assert!(!record.is_anomaly);
        }
    }
    assert_eq!(calls.load(Ordering::SeqCst), 25 - (config.window_size - 1));
}

#[test]
fn large_spike_is_flagged_by_a_limit_detector() {
    let config = NodeConfig {
        window_size: 3,
        ..NodeConfig::default()
    };
    let (detector, _calls) = TemperatureLimit::new(30.0);
    let mut node = node_with_detector(&config, Box::new(detector));

    run(&mut node, 5);
    node.inject_thermal_spike(3, 40.0);
    let records = run(&mut node, 3);
    let last = records.last().unwrap();
    assert!(last.injected_anomaly);
    assert!(last.is_anomaly);
    assert!(last.anomaly_score.unwrap() < 0.0);
}

#[test]
fn records_serialise_with_null_score() {
    let record = seeded_node(1).step();
    let json = serde_json::to_value(&record).unwrap();
    assert!(json["anomaly_score"].is_null());
    assert_eq!(json["node_id"], "node-1");
    assert_eq!(json["injected_anomaly"], false);

    let back: TelemetryRecord = serde_json::from_value(json).unwrap();
    assert_eq!(back, record);
}

#[test]
fn config_file_drives_the_node() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "node_id = \"rack-3\"\nseed = 5\n\n[humidity]\nnoise_amplitude = 0.0\ndrift = 0.0").unwrap();
    file.flush().unwrap();

    let config = NodeConfig::from_file(file.path()).unwrap();
    let mut node = config.node_builder().build().unwrap();
    for record in run(&mut node, 20) {
        assert_eq!(record.node_id, "rack-3");
        assert_eq!(record.humidity, 45.0);
    }
}

#[test]
fn nodes_can_move_between_threads() {
    let mut node = seeded_node(42);
    let expected = run(&mut seeded_node(42), 10);
    let handle = std::thread::spawn(move || run(&mut node, 10));
    assert_eq!(handle.join().unwrap(), expected);
}
