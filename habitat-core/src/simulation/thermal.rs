//! Thermal model for a single compute node
//!
//! Models the enclosure air as one lumped thermal mass:
//! - Heat input proportional to CPU load (`P_heat = k * load`)
//! - Newton's law of cooling toward ambient
//!   (`P_cool = h * (T - T_ambient)`)
//! - Explicit Euler integration:
//!   `T(t+dt) = T(t) + (P_heat - P_cool) / (m * c) * dt`

use serde::{Deserialize, Serialize};

use crate::constants::{
    AIR_SPECIFIC_HEAT_J_PER_KG_C, DEFAULT_AIR_MASS_KG, DEFAULT_AMBIENT_TEMP_C,
    DEFAULT_COOLING_COEFFICIENT_W_PER_C, DEFAULT_HEAT_COEFFICIENT_W, DEFAULT_INITIAL_TEMP_C,
    DEFAULT_STEP_SECONDS,
};

/// Thermal model parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermalConfig {
    /// Mass of the heated air (kg)
    pub air_mass: f64,
    /// Specific heat capacity of the air (J/(kg·°C))
    pub heat_capacity: f64,
    /// Heat power at full CPU load (W)
    pub heat_coefficient: f64,
    /// Cooling power per degree above ambient (W/°C)
    pub cooling_coefficient: f64,
    /// Starting temperature (°C)
    pub initial_temperature: f64,
    /// Temperature of the surroundings (°C)
    pub ambient_temperature: f64,
}

impl Default for ThermalConfig {
    fn default() -> Self {
        Self {
            air_mass: DEFAULT_AIR_MASS_KG,
            heat_capacity: AIR_SPECIFIC_HEAT_J_PER_KG_C,
            heat_coefficient: DEFAULT_HEAT_COEFFICIENT_W,
            cooling_coefficient: DEFAULT_COOLING_COEFFICIENT_W_PER_C,
            initial_temperature: DEFAULT_INITIAL_TEMP_C,
            ambient_temperature: DEFAULT_AMBIENT_TEMP_C,
        }
    }
}

/// Lumped-mass heat-transfer simulator
#[derive(Debug, Clone)]
pub struct ThermalModel {
    air_mass: f64,
    heat_capacity: f64,
    heat_coefficient: f64,
    cooling_coefficient: f64,
    ambient_temperature: f64,
    temperature: f64,
}

impl ThermalModel {
    /// Create a model from its parameters
    pub fn new(config: ThermalConfig) -> Self {
        Self {
            air_mass: config.air_mass,
            heat_capacity: config.heat_capacity,
            heat_coefficient: config.heat_coefficient,
            cooling_coefficient: config.cooling_coefficient,
            ambient_temperature: config.ambient_temperature,
            temperature: config.initial_temperature,
        }
    }

    /// Advance one nominal step (1 s) under the given CPU load
    pub fn step(&mut self, cpu_load: f64) -> f64 {
        self.step_with_dt(cpu_load, DEFAULT_STEP_SECONDS)
    }

    /// Advance `dt` seconds under the given CPU load
    ///
    /// The load is clamped to `[0, 1]`. With zero thermal mass the step is a
    /// no-op and the current temperature is returned unchanged.
    pub fn step_with_dt(&mut self, cpu_load: f64, dt: f64) -> f64 {
        let clamped_load = cpu_load.clamp(0.0, 1.0);

        let p_heat = self.heat_coefficient * clamped_load;
        let cooling_power = self.cooling_coefficient * (self.temperature - self.ambient_temperature);

        let thermal_mass = self.thermal_mass();
        if thermal_mass == 0.0 {
            return self.temperature;
        }

        self.temperature += (p_heat - cooling_power) / thermal_mass * dt;
        self.temperature
    }

    /// Heat capacity of the whole air mass (J/°C)
    pub fn thermal_mass(&self) -> f64 {
        self.air_mass * self.heat_capacity
    }

    /// Current temperature (°C)
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Overwrite the current temperature
    pub fn set_temperature(&mut self, temperature: f64) {
        self.temperature = temperature;
    }

    /// Ambient temperature (°C)
    pub fn ambient_temperature(&self) -> f64 {
        self.ambient_temperature
    }

    /// Temperature at which heating balances cooling for a constant load
    ///
    /// Returns `None` when the model has no cooling.
    pub fn equilibrium_temperature(&self, cpu_load: f64) -> Option<f64> {
        if self.cooling_coefficient == 0.0 {
            return None;
        }
        let p_heat = self.heat_coefficient * cpu_load.clamp(0.0, 1.0);
        Some(self.ambient_temperature + p_heat / self.cooling_coefficient)
    }
}

impl Default for ThermalModel {
    fn default() -> Self {
        Self::new(ThermalConfig::default())
    }
}
