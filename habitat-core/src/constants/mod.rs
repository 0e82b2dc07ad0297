//! Constants for the Habitat simulation core
//!
//! Every default value used by the physical models and the node orchestrator
//! is defined here, so configuration defaults, tests, and the CLI agree.
//!
//! ## Organization
//!
//! - **Physics**: thermal, airflow and humidity model defaults
//! - **Simulation**: CPU-load generation, windowing, seeding and time steps

/// Thermal, airflow and humidity defaults for a single compute node.
pub mod physics;

/// Step timing, CPU-load generation, window and seed defaults.
pub mod simulation;

pub use physics::{
    AIR_SPECIFIC_HEAT_J_PER_KG_C, DEFAULT_AIR_MASS_KG, DEFAULT_AMBIENT_TEMP_C,
    DEFAULT_COOLING_COEFFICIENT_W_PER_C, DEFAULT_HEAT_COEFFICIENT_W, DEFAULT_HUMIDITY_DRIFT,
    DEFAULT_HUMIDITY_NOISE, DEFAULT_INITIAL_HUMIDITY_PCT, DEFAULT_INITIAL_TEMP_C,
    DEFAULT_NOMINAL_FLOW, HUMIDITY_MAX_PCT, HUMIDITY_MIN_PCT,
};

pub use simulation::{
    BASELINE_CPU_LOAD, CPU_LOAD_NOISE_AMPLITUDE, DEFAULT_NODE_ID, DEFAULT_SEED,
    DEFAULT_STEP_SECONDS, DEFAULT_WINDOW_SIZE, HUMIDITY_STREAM_OFFSET,
};
