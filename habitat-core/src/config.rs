//! Node configuration
//!
//! A `NodeConfig` describes one virtual node completely: its identity, seed,
//! window size and the parameters of each physical model. Every field has a
//! default, so a TOML file only needs the values it overrides:
//!
//! ```toml
//! node_id = "rack-7"
//! seed = 123
//! window_size = 20
//!
//! [thermal]
//! cooling_coefficient = 250.0
//!
//! [humidity]
//! noise_amplitude = 0.0
//! ```
//!
//! With a node seed and no humidity seed, the humidity stream is derived from
//! the node seed. One seed then reproduces the whole node.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_NODE_ID, DEFAULT_SEED, DEFAULT_WINDOW_SIZE, HUMIDITY_STREAM_OFFSET};
use crate::errors::{SimulationError, SimulationResult};
use crate::node::NodeBuilder;
use crate::simulation::{
    derive_seed, AirflowConfig, AirflowModel, EnvironmentalModel, HumidityConfig, HumidityModel,
    NoiseStream, ThermalConfig, ThermalModel,
};

/// Complete configuration of one virtual node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Identifier written into every telemetry record
    pub node_id: String,
    /// Seed for the node's random streams; `None` seeds from entropy
    pub seed: Option<u64>,
    /// Points per feature window
    pub window_size: usize,
    /// Thermal model parameters
    pub thermal: ThermalConfig,
    /// Airflow model parameters
    pub airflow: AirflowConfig,
    /// Humidity model parameters
    pub humidity: HumidityConfig,
    /// Anomaly-model artifact to load, if any
    pub model_path: Option<PathBuf>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            node_id: DEFAULT_NODE_ID.to_string(),
            seed: Some(DEFAULT_SEED),
            window_size: DEFAULT_WINDOW_SIZE,
            thermal: ThermalConfig::default(),
            airflow: AirflowConfig::default(),
            humidity: HumidityConfig::default(),
            model_path: None,
        }
    }
}

impl NodeConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> SimulationResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| SimulationError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> SimulationResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SimulationError::ConfigIo(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Reject configurations no node can run with
    pub fn validate(&self) -> SimulationResult<()> {
        if self.window_size == 0 {
            return Err(SimulationError::InvalidConfig {
                reason: "window_size must be at least 1",
            });
        }
        if self.humidity.noise_amplitude < 0.0 {
            return Err(SimulationError::InvalidConfig {
                reason: "humidity noise_amplitude must not be negative",
            });
        }

        let thermal = &self.thermal;
        let values = [
            thermal.air_mass,
            thermal.heat_capacity,
            thermal.heat_coefficient,
            thermal.cooling_coefficient,
            thermal.initial_temperature,
            thermal.ambient_temperature,
            self.airflow.nominal_flow,
            self.airflow.obstruction_ratio,
            self.humidity.initial_humidity,
            self.humidity.drift,
            self.humidity.noise_amplitude,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SimulationError::InvalidConfig {
                reason: "model parameters must be finite",
            });
        }
        if !(2.0 * self.humidity.noise_amplitude).is_finite() {
            return Err(SimulationError::InvalidConfig {
                reason: "humidity noise_amplitude is too large",
            });
        }
        Ok(())
    }

    /// Seed of the humidity stream after derivation
    pub fn humidity_seed(&self) -> Option<u64> {
        self.humidity
            .seed
            .or_else(|| self.seed.map(|seed| derive_seed(seed, HUMIDITY_STREAM_OFFSET)))
    }

    /// Build the environment this configuration describes
    pub fn build_environment(&self) -> EnvironmentalModel {
        EnvironmentalModel::new(
            ThermalModel::new(self.thermal),
            AirflowModel::new(self.airflow),
            HumidityModel::with_stream(self.humidity, NoiseStream::from_option(self.humidity_seed())),
        )
    }

    /// Builder preloaded with this configuration
    ///
    /// `model_path` is not applied here; detection is attached by the crate
    /// that owns the model format.
    pub fn node_builder(&self) -> NodeBuilder {
        NodeBuilder::new(self.node_id.clone())
            .environment(self.build_environment())
            .seed(self.seed)
            .window_size(self.window_size)
    }
}
