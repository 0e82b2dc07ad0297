//! Physical models of a virtual compute node
//!
//! Each model is a small, self-contained state machine advanced once per
//! simulated second:
//!
//! | Model        | State                 | Randomness           |
//! |--------------|-----------------------|----------------------|
//! | Thermal      | temperature           | none                 |
//! | Airflow      | obstruction, flow     | none                 |
//! | Humidity     | relative humidity     | owned `NoiseStream`  |
//!
//! `EnvironmentalModel` owns one of each and steps them together.

pub mod airflow;
pub mod environment;
pub mod humidity;
pub mod noise;
pub mod thermal;

pub use airflow::{AirflowConfig, AirflowModel};
pub use environment::{EnvironmentReading, EnvironmentalModel};
pub use humidity::{HumidityConfig, HumidityModel};
pub use noise::{derive_seed, NoiseStream};
pub use thermal::{ThermalConfig, ThermalModel};
