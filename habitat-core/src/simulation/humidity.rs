//! Humidity model: bounded random walk with drift
//!
//! ```text
//! H(t+1) = clamp(H(t) + drift + noise, 0, 100)
//! noise ~ Uniform[-noise_amplitude, noise_amplitude]
//! ```
//!
//! Noise comes from the model's own `NoiseStream`, so two models built with
//! the same seed and parameters return bit-identical sequences.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_HUMIDITY_DRIFT, DEFAULT_HUMIDITY_NOISE, DEFAULT_INITIAL_HUMIDITY_PCT,
    HUMIDITY_MAX_PCT, HUMIDITY_MIN_PCT,
};
use crate::simulation::NoiseStream;

/// Humidity model parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HumidityConfig {
    /// Starting relative humidity (%RH)
    pub initial_humidity: f64,
    /// Additive change per step (%RH)
    pub drift: f64,
    /// Maximum noise magnitude per step (%RH)
    pub noise_amplitude: f64,
    /// Seed for the model's noise stream; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for HumidityConfig {
    fn default() -> Self {
        Self {
            initial_humidity: DEFAULT_INITIAL_HUMIDITY_PCT,
            drift: DEFAULT_HUMIDITY_DRIFT,
            noise_amplitude: DEFAULT_HUMIDITY_NOISE,
            seed: None,
        }
    }
}

/// Stochastic relative-humidity simulator
#[derive(Debug, Clone)]
pub struct HumidityModel {
    current_humidity: f64,
    drift: f64,
    noise_amplitude: f64,
    noise: NoiseStream,
}

impl HumidityModel {
    /// Create a model, seeding its noise stream from `config.seed`
    pub fn new(config: HumidityConfig) -> Self {
        Self::with_stream(config, NoiseStream::from_option(config.seed))
    }

    /// Create a model drawing noise from the given stream
    ///
    /// `config.seed` is ignored.
    pub fn with_stream(config: HumidityConfig, noise: NoiseStream) -> Self {
        Self {
            current_humidity: config.initial_humidity.clamp(HUMIDITY_MIN_PCT, HUMIDITY_MAX_PCT),
            drift: config.drift,
            noise_amplitude: config.noise_amplitude.abs(),
            noise,
        }
    }

    /// Advance one step and return the new humidity
    pub fn step(&mut self) -> f64 {
        let noise = self.noise.uniform(self.noise_amplitude);
        self.current_humidity = (self.current_humidity + self.drift + noise)
            .clamp(HUMIDITY_MIN_PCT, HUMIDITY_MAX_PCT);
        self.current_humidity
    }

    /// Current relative humidity (%RH)
    pub fn current_humidity(&self) -> f64 {
        self.current_humidity
    }

    /// Per-step drift (%RH)
    pub fn drift(&self) -> f64 {
        self.drift
    }

    /// Maximum noise magnitude (%RH)
    pub fn noise_amplitude(&self) -> f64 {
        self.noise_amplitude
    }
}
