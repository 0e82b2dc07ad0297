//! Simulation timing and stochastic-process defaults

/// Duration of one simulated step (seconds).
pub const DEFAULT_STEP_SECONDS: f64 = 1.0;

/// Mean CPU load generated by a virtual node (fraction of capacity).
pub const BASELINE_CPU_LOAD: f64 = 0.5;

/// Half-width of the uniform noise added to the baseline CPU load.
///
/// Load is drawn from `[0.45, 0.55]` before clamping to `[0, 1]`.
pub const CPU_LOAD_NOISE_AMPLITUDE: f64 = 0.05;

/// Number of telemetry points reduced into one feature vector.
pub const DEFAULT_WINDOW_SIZE: usize = 10;

/// Seed used by the CLI and baseline generation when none is given.
pub const DEFAULT_SEED: u64 = 42;

/// Identifier of the default simulated node.
pub const DEFAULT_NODE_ID: &str = "node-1";

/// Offset mixed into a node seed to derive its humidity stream seed.
///
/// Keeps the CPU-load and humidity streams distinct when a single node seed
/// drives both.
pub const HUMIDITY_STREAM_OFFSET: u64 = 0x9E37_79B9_7F4A_7C15;
