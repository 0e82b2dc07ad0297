//! Physical defaults for the node environment
//!
//! The thermal defaults describe a small rack enclosure: 50 kg of air heated
//! by a node that dissipates up to 500 W, cooled at 300 W per degree above
//! ambient. At 60% load the node sits exactly 1°C above ambient.

// ===== THERMAL =====

/// Specific heat capacity of dry air at constant pressure (J/(kg·°C)).
///
/// Source: Engineering ToolBox, air at 20°C and 1 atm
pub const AIR_SPECIFIC_HEAT_J_PER_KG_C: f64 = 1005.0;

/// Mass of air being heated inside the enclosure (kg).
pub const DEFAULT_AIR_MASS_KG: f64 = 50.0;

/// Heat power produced at 100% CPU load (W).
pub const DEFAULT_HEAT_COEFFICIENT_W: f64 = 500.0;

/// Cooling power per degree above ambient (W/°C), Newton's law of cooling.
pub const DEFAULT_COOLING_COEFFICIENT_W_PER_C: f64 = 300.0;

/// Starting temperature of the enclosure (°C).
pub const DEFAULT_INITIAL_TEMP_C: f64 = 21.0;

/// Temperature of the surrounding room (°C).
pub const DEFAULT_AMBIENT_TEMP_C: f64 = 20.0;

// ===== AIRFLOW =====

/// Airflow through the enclosure with no obstruction (m³/s).
pub const DEFAULT_NOMINAL_FLOW: f64 = 2.5;

// ===== HUMIDITY =====

/// Lower bound for relative humidity (%RH).
pub const HUMIDITY_MIN_PCT: f64 = 0.0;

/// Upper bound for relative humidity (%RH).
pub const HUMIDITY_MAX_PCT: f64 = 100.0;

/// Starting relative humidity (%RH).
///
/// Middle of the 30-60% band recommended for data halls.
///
/// Source: ASHRAE TC 9.9 thermal guidelines
pub const DEFAULT_INITIAL_HUMIDITY_PCT: f64 = 45.0;

/// Additive humidity drift per step (%RH).
pub const DEFAULT_HUMIDITY_DRIFT: f64 = 0.01;

/// Maximum magnitude of per-step humidity noise (%RH).
pub const DEFAULT_HUMIDITY_NOISE: f64 = 0.2;
