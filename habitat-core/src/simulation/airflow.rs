//! Airflow model: nominal flow reduced by an obstruction ratio
//!
//! `current_flow = nominal_flow * (1 - obstruction_ratio)`, with the ratio
//! clamped to `[0, 1]` on every assignment. Fully deterministic.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_NOMINAL_FLOW;

/// Airflow model parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirflowConfig {
    /// Flow with no obstruction
    pub nominal_flow: f64,
    /// Starting obstruction ratio (clamped to `[0, 1]`)
    pub obstruction_ratio: f64,
}

impl Default for AirflowConfig {
    fn default() -> Self {
        Self {
            nominal_flow: DEFAULT_NOMINAL_FLOW,
            obstruction_ratio: 0.0,
        }
    }
}

/// Obstructable airflow through the node enclosure
#[derive(Debug, Clone)]
pub struct AirflowModel {
    nominal_flow: f64,
    obstruction_ratio: f64,
    current_flow: f64,
}

impl AirflowModel {
    /// Create a model from its parameters
    pub fn new(config: AirflowConfig) -> Self {
        let obstruction_ratio = clamp_ratio(config.obstruction_ratio);
        Self {
            nominal_flow: config.nominal_flow,
            obstruction_ratio,
            current_flow: config.nominal_flow * (1.0 - obstruction_ratio),
        }
    }

    /// Model with the given nominal flow and no obstruction
    pub fn with_nominal_flow(nominal_flow: f64) -> Self {
        Self::new(AirflowConfig {
            nominal_flow,
            obstruction_ratio: 0.0,
        })
    }

    /// Recompute and return the current flow
    pub fn step(&mut self) -> f64 {
        self.current_flow = self.nominal_flow * (1.0 - self.obstruction_ratio);
        self.current_flow
    }

    /// Set the obstruction ratio, clamped to `[0, 1]`
    ///
    /// Takes effect on the next `step`.
    pub fn set_obstruction(&mut self, ratio: f64) {
        self.obstruction_ratio = clamp_ratio(ratio);
    }

    /// Fully obstruct the airflow
    pub fn simulate_fan_failure(&mut self) {
        self.set_obstruction(1.0);
    }

    /// Remove any obstruction
    pub fn reset(&mut self) {
        self.set_obstruction(0.0);
    }

    /// Flow computed by the last `step`
    pub fn current_flow(&self) -> f64 {
        self.current_flow
    }

    /// Current obstruction ratio
    pub fn obstruction_ratio(&self) -> f64 {
        self.obstruction_ratio
    }

    /// Flow with no obstruction
    pub fn nominal_flow(&self) -> f64 {
        self.nominal_flow
    }
}

impl Default for AirflowModel {
    fn default() -> Self {
        Self::new(AirflowConfig::default())
    }
}

fn clamp_ratio(ratio: f64) -> f64 {
    // NaN counts as unobstructed
    if ratio.is_nan() {
        return 0.0;
    }
    ratio.clamp(0.0, 1.0)
}
