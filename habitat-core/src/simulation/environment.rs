//! Composite environment: thermal, airflow and humidity advanced together

use serde::{Deserialize, Serialize};

use crate::simulation::{AirflowModel, HumidityModel, ThermalModel};

/// Combined reading produced by one environment step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentReading {
    /// Enclosure temperature (°C)
    pub temperature: f64,
    /// Current airflow
    pub airflow: f64,
    /// Relative humidity (%RH)
    pub humidity: f64,
}

/// Exclusively owns one model of each kind and steps them in lockstep
#[derive(Debug, Clone)]
pub struct EnvironmentalModel {
    thermal: ThermalModel,
    airflow: AirflowModel,
    humidity: HumidityModel,
}

impl EnvironmentalModel {
    /// Compose the three physical models
    pub fn new(thermal: ThermalModel, airflow: AirflowModel, humidity: HumidityModel) -> Self {
        Self {
            thermal,
            airflow,
            humidity,
        }
    }

    /// Advance every sub-model exactly once
    ///
    /// Only the thermal model depends on `cpu_load`.
    pub fn step(&mut self, cpu_load: f64) -> EnvironmentReading {
        let temperature = self.thermal.step(cpu_load);
        let airflow = self.airflow.step();
        let humidity = self.humidity.step();

        EnvironmentReading {
            temperature,
            airflow,
            humidity,
        }
    }

    /// Thermal sub-model
    pub fn thermal(&self) -> &ThermalModel {
        &self.thermal
    }

    /// Airflow sub-model
    pub fn airflow(&self) -> &AirflowModel {
        &self.airflow
    }

    /// Mutable airflow sub-model, for obstruction and fan-failure injection
    pub fn airflow_mut(&mut self) -> &mut AirflowModel {
        &mut self.airflow
    }

    /// Humidity sub-model
    pub fn humidity(&self) -> &HumidityModel {
        &self.humidity
    }
}
