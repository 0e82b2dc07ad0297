//! Virtual Compute Node
//!
//! ## Overview
//!
//! A `VirtualNode` ties the physical models to the detection pipeline. Each
//! call to `step` is one simulated second:
//!
//! ```text
//! ┌──────────────┐   cpu_load   ┌──────────────────────┐
//! │ CPU-load gen │────────────▶│ EnvironmentalModel    │
//! └──────────────┘              │ thermal/air/humidity │
//!                               └──────────┬───────────┘
//!                                          │ reading
//!                               ┌──────────▼───────────┐
//!                               │ thermal spike (opt.) │
//!                               └──────────┬───────────┘
//!                                          │ record
//!                ┌─────────────────────────▼─────────────────────────┐
//!                │ detector attached? push → window full? → predict  │
//!                └─────────────────────────┬─────────────────────────┘
//!                                          ▼
//!                                   TelemetryRecord
//! ```
//!
//! ## Anomaly Injection
//!
//! `inject_thermal_spike(duration, magnitude)` moves the node from `Idle` to
//! `Active`. Every following step adds `magnitude` to the reported
//! temperature (the thermal state itself is untouched) and decrements the
//! counter; when it reaches zero the node is `Idle` again. A new injection
//! replaces any active one.
//!
//! ## Determinism
//!
//! The CPU-load generator owns its own `NoiseStream`. Two nodes built with
//! the same seed and configuration produce identical temperature and CPU-load
//! sequences, regardless of what other nodes in the process are doing.

use log::{debug, info, warn};

use crate::constants::{
    BASELINE_CPU_LOAD, CPU_LOAD_NOISE_AMPLITUDE, DEFAULT_WINDOW_SIZE, HUMIDITY_STREAM_OFFSET,
};
use crate::detector::{AnomalyDetector, Prediction};
use crate::errors::{SimulationError, SimulationResult};
use crate::features::{SlidingWindowFeatureExtractor, WindowPoint};
use crate::simulation::{
    derive_seed, AirflowModel, EnvironmentReading, EnvironmentalModel, HumidityConfig, HumidityModel,
    NoiseStream, ThermalModel,
};
use crate::telemetry::TelemetryRecord;
use crate::time::{to_iso8601, SystemTime, TimeSource};

/// Thermal-spike injection state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InjectionState {
    /// No spike pending
    Idle,
    /// Spike applied to the next `remaining_steps` records
    Active {
        /// Records still to be spiked
        remaining_steps: u32,
        /// Degrees added to each spiked record (°C)
        magnitude: f64,
    },
}

impl InjectionState {
    /// True while a spike is pending
    pub fn is_active(&self) -> bool {
        matches!(self, InjectionState::Active { .. })
    }
}

/// Simulated compute node emitting enriched telemetry
pub struct VirtualNode {
    node_id: String,
    environment: EnvironmentalModel,
    cpu_noise: NoiseStream,
    features: SlidingWindowFeatureExtractor,
    detector: Option<Box<dyn AnomalyDetector>>,
    clock: Box<dyn TimeSource>,
    injection: InjectionState,
    window_announced: bool,
    steps: u64,
}

impl VirtualNode {
    /// Node with the default window size, wall-clock timestamps and no detector
    pub fn new(
        node_id: impl Into<String>,
        environment: EnvironmentalModel,
        seed: Option<u64>,
    ) -> SimulationResult<Self> {
        Self::builder(node_id)
            .environment(environment)
            .seed(seed)
            .build()
    }

    /// Start configuring a node
    pub fn builder(node_id: impl Into<String>) -> NodeBuilder {
        NodeBuilder::new(node_id)
    }

    /// Advance the node by one simulated second
    pub fn step(&mut self) -> TelemetryRecord {
        let cpu_load = self.generate_cpu_load();
        let reading = self.environment.step(cpu_load);
        let (temperature, injected_anomaly) = self.apply_spike(&reading);

        let point = WindowPoint {
            temperature,
            humidity: reading.humidity,
            airflow: reading.airflow,
            cpu_load,
        };
        let prediction = self.score(point);
        self.steps += 1;

        TelemetryRecord {
            node_id: self.node_id.clone(),
            timestamp: to_iso8601(&self.clock.now()),
            temperature,
            humidity: reading.humidity,
            airflow: reading.airflow,
            cpu_load,
            injected_anomaly,
            anomaly_score: prediction.map(|p| p.score),
            is_anomaly: prediction.map_or(false, |p| p.is_anomaly),
        }
    }

    /// Spike the reported temperature by `magnitude` for the next `duration_steps` steps
    ///
    /// Replaces any spike already in progress. A zero duration cancels it.
    pub fn inject_thermal_spike(&mut self, duration_steps: u32, magnitude: f64) {
        self.injection = if duration_steps == 0 {
            InjectionState::Idle
        } else {
            InjectionState::Active {
                remaining_steps: duration_steps,
                magnitude,
            }
        };
        debug!(
            "{}: thermal spike of {:+.2}°C injected for {} steps",
            self.node_id, magnitude, duration_steps
        );
    }

    /// Fully obstruct the node's airflow
    pub fn simulate_fan_failure(&mut self) {
        debug!("{}: fan failure injected", self.node_id);
        self.environment.airflow_mut().simulate_fan_failure();
    }

    /// Clear any airflow obstruction
    pub fn restore_airflow(&mut self) {
        debug!("{}: airflow restored", self.node_id);
        self.environment.airflow_mut().reset();
    }

    /// Set the airflow obstruction ratio, clamped to `[0, 1]`
    pub fn set_obstruction(&mut self, ratio: f64) {
        self.environment.airflow_mut().set_obstruction(ratio);
    }

    /// Current injection state
    pub fn injection_state(&self) -> InjectionState {
        self.injection
    }

    /// Spiked records still to come
    pub fn spike_remaining_steps(&self) -> u32 {
        match self.injection {
            InjectionState::Active { remaining_steps, .. } => remaining_steps,
            InjectionState::Idle => 0,
        }
    }

    /// Node identifier
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Owned physical models
    pub fn environment(&self) -> &EnvironmentalModel {
        &self.environment
    }

    /// Feature window fed by this node
    pub fn feature_extractor(&self) -> &SlidingWindowFeatureExtractor {
        &self.features
    }

    /// True when a detector is attached
    pub fn detection_enabled(&self) -> bool {
        self.detector.is_some()
    }

    /// Number of steps taken so far
    pub fn steps_taken(&self) -> u64 {
        self.steps
    }

    fn generate_cpu_load(&mut self) -> f64 {
        let noise = self.cpu_noise.uniform(CPU_LOAD_NOISE_AMPLITUDE);
        (BASELINE_CPU_LOAD + noise).clamp(0.0, 1.0)
    }

    fn apply_spike(&mut self, reading: &EnvironmentReading) -> (f64, bool) {
        match self.injection {
            InjectionState::Idle => (reading.temperature, false),
            InjectionState::Active {
                remaining_steps,
                magnitude,
            } => {
                let remaining_steps = remaining_steps.saturating_sub(1);
                self.injection = if remaining_steps == 0 {
                    debug!("{}: thermal spike finished", self.node_id);
                    InjectionState::Idle
                } else {
                    InjectionState::Active {
                        remaining_steps,
                        magnitude,
                    }
                };
                (reading.temperature + magnitude, true)
            }
        }
    }

    fn score(&mut self, point: WindowPoint) -> Option<Prediction> {
        let detector = self.detector.as_ref()?;

        self.features.add_window_point(point);
        let features = match self.features.extract_features() {
            Ok(features) => features,
            Err(SimulationError::WindowNotReady { .. }) => return None,
            Err(e) => {
                warn!("{}: feature extraction failed: {}", self.node_id, e);
                return None;
            }
        };
        if !self.window_announced {
            self.window_announced = true;
            info!(
                "{}: feature window full ({} points), anomaly scoring active",
                self.node_id,
                self.features.window_size()
            );
        }

        Some(detector.predict(&features))
    }
}

/// Builder for `VirtualNode`
pub struct NodeBuilder {
    node_id: String,
    environment: Option<EnvironmentalModel>,
    seed: Option<u64>,
    window_size: usize,
    detector: Option<Box<dyn AnomalyDetector>>,
    clock: Option<Box<dyn TimeSource>>,
}

impl NodeBuilder {
    /// Builder with defaults: default environment, entropy seed, wall clock
    pub fn new(node_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            environment: None,
            seed: None,
            window_size: DEFAULT_WINDOW_SIZE,
            detector: None,
            clock: None,
        }
    }

    /// Use a fully configured environment
    pub fn environment(mut self, environment: EnvironmentalModel) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Use a thermal model alone
    ///
    /// Airflow stays at its default nominal flow and humidity stays constant
    /// at its default initial value.
    pub fn thermal_only(mut self, thermal: ThermalModel) -> Self {
        let humidity = HumidityModel::with_stream(
            HumidityConfig {
                drift: 0.0,
                noise_amplitude: 0.0,
                ..HumidityConfig::default()
            },
            NoiseStream::seeded(0),
        );
        self.environment = Some(EnvironmentalModel::new(
            thermal,
            AirflowModel::default(),
            humidity,
        ));
        self
    }

    /// Seed for the CPU-load stream; `None` seeds from entropy
    pub fn seed(mut self, seed: impl Into<Option<u64>>) -> Self {
        self.seed = seed.into();
        self
    }

    /// Number of points per feature window
    pub fn window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Attach an anomaly detector
    pub fn detector(mut self, detector: Box<dyn AnomalyDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Source of record timestamps
    pub fn time_source(mut self, clock: Box<dyn TimeSource>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the node
    ///
    /// Without an explicit environment the default models are used and the
    /// humidity stream is derived from the node seed. Fails with
    /// `InvalidConfig` when the window size is zero.
    pub fn build(self) -> SimulationResult<VirtualNode> {
        let features = SlidingWindowFeatureExtractor::new(self.window_size)?;
        let environment = match self.environment {
            Some(environment) => environment,
            None => EnvironmentalModel::new(
                ThermalModel::default(),
                AirflowModel::default(),
                HumidityModel::new(HumidityConfig {
                    seed: self.seed.map(|seed| derive_seed(seed, HUMIDITY_STREAM_OFFSET)),
                    ..HumidityConfig::default()
                }),
            ),
        };

        Ok(VirtualNode {
            node_id: self.node_id,
            environment,
            cpu_noise: NoiseStream::from_option(self.seed),
            features,
            detector: self.detector,
            clock: self.clock.unwrap_or_else(|| Box::new(SystemTime)),
            injection: InjectionState::Idle,
            window_announced: false,
            steps: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureVector;
    use crate::simulation::ThermalConfig;
    use crate::time::SimulatedTime;

    struct FixedDetector {
        prediction: Prediction,
    }

    impl AnomalyDetector for FixedDetector {
        fn predict(&self, _features: &FeatureVector) -> Prediction {
            self.prediction
        }
    }

    fn node(seed: u64) -> VirtualNode {
        VirtualNode::builder("test-node")
            .thermal_only(ThermalModel::new(ThermalConfig::default()))
            .seed(seed)
            .time_source(Box::new(SimulatedTime::from_epoch()))
            .build()
            .unwrap()
    }

    #[test]
    fn cpu_load_stays_near_baseline() {
        let mut node = node(42);
        for _ in 0..500 {
            let record = node.step();
            assert!((0.45..=0.55).contains(&record.cpu_load));
        }
        assert_eq!(node.steps_taken(), 500);
    }

    #[test]
    fn spike_counts_down_and_expires() {
        let mut node = node(1);
        node.inject_thermal_spike(2, 5.0);
        assert_eq!(
            node.injection_state(),
            InjectionState::Active {
                remaining_steps: 2,
                magnitude: 5.0,
            }
        );

        assert!(node.step().injected_anomaly);
        assert_eq!(node.spike_remaining_steps(), 1);
        assert!(node.step().injected_anomaly);
        assert_eq!(node.injection_state(), InjectionState::Idle);
        assert!(!node.step().injected_anomaly);
    }

    #[test]
    fn later_injection_replaces_earlier() {
        let mut node = node(1);
        node.inject_thermal_spike(10, 5.0);
        node.inject_thermal_spike(1, 2.0);
        assert_eq!(
            node.injection_state(),
            InjectionState::Active {
                remaining_steps: 1,
                magnitude: 2.0,
            }
        );

        node.inject_thermal_spike(0, 9.0);
        assert!(!node.injection_state().is_active());
    }

    #[test]
    fn spike_does_not_touch_thermal_state() {
        let mut spiked = node(9);
        let mut plain = node(9);
        spiked.inject_thermal_spike(3, 50.0);

        for _ in 0..3 {
            spiked.step();
            plain.step();
        }
        assert_eq!(
            spiked.environment().thermal().temperature(),
            plain.environment().thermal().temperature()
        );
    }

    #[test]
    fn no_detector_means_no_score() {
        let mut node = node(3);
        for _ in 0..20 {
            let record = node.step();
            assert_eq!(record.anomaly_score, None);
            assert!(!record.is_anomaly);
        }
        assert!(!node.detection_enabled());
        assert!(node.feature_extractor().is_empty());
    }

    #[test]
    fn detector_scores_once_window_is_full() {
        let mut node = VirtualNode::builder("scored")
            .seed(5)
            .window_size(3)
            .detector(Box::new(FixedDetector {
                prediction: Prediction {
                    score: -0.25,
                    is_anomaly: true,
                },
            }))
            .time_source(Box::new(SimulatedTime::from_epoch()))
            .build()
            .unwrap();

        assert!(node.detection_enabled());
        for _ in 0..2 {
            let record = node.step();
            assert_eq!(record.anomaly_score, None);
            assert!(!record.is_anomaly);
        }
        for _ in 0..5 {
            let record = node.step();
            assert_eq!(record.anomaly_score, Some(-0.25));
            assert!(record.is_anomaly);
        }
        assert!(node.feature_extractor().is_window_ready());
    }

    #[test]
    fn zero_window_is_rejected() {
        assert!(VirtualNode::builder("bad").window_size(0).build().is_err());
    }

    #[test]
    fn fan_failure_zeroes_airflow() {
        let mut node = node(2);
        node.simulate_fan_failure();
        assert_eq!(node.step().airflow, 0.0);
        node.set_obstruction(0.5);
        assert_eq!(node.step().airflow, 1.25);
        node.restore_airflow();
        assert_eq!(node.step().airflow, 2.5);
    }

    #[test]
    fn timestamps_follow_the_clock() {
        let mut node = node(4);
        assert_eq!(node.step().timestamp, "1970-01-01T00:00:00.000000+00:00");
        assert_eq!(node.step().timestamp, "1970-01-01T00:00:01.000000+00:00");
    }
}
