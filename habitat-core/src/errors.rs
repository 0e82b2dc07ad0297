//! Error Types for the Simulation Core
//!
//! ## Design Philosophy
//!
//! The simulation core is permissive about numeric inputs: out-of-range CPU
//! loads and obstruction ratios are clamped, and a zero thermal mass turns a
//! step into a no-op. Errors are therefore reserved for two situations:
//!
//! 1. **Precondition violations**: asking for features before the sliding
//!    window is full. This must never silently return partial features.
//! 2. **Configuration problems**: a configuration file that cannot be read,
//!    parsed, or that describes an impossible setup.
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use habitat_core::{SimulationError, SlidingWindowFeatureExtractor};
//!
//! let extractor = SlidingWindowFeatureExtractor::new(10).unwrap();
//! match extractor.extract_features() {
//!     Ok(_features) => {
//!         // Full window - hand the vector to the detector
//!     }
//!     Err(SimulationError::WindowNotReady { required, available }) => {
//!         // Keep collecting: `available` of `required` points so far
//!         assert_eq!((required, available), (10, 0));
//!     }
//!     Err(_) => unreachable!(),
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for simulation operations
pub type SimulationResult<T> = Result<T, SimulationError>;

/// Errors raised by the simulation core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Feature extraction requested before the window holds `window_size` points
    #[error("Window not ready: need {required} points, have {available}")]
    WindowNotReady {
        /// Number of points a full window holds
        required: usize,
        /// Number of points currently buffered
        available: usize,
    },

    /// Configuration describes an impossible setup
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// What was wrong with the configuration
        reason: &'static str,
    },

    /// Configuration text could not be parsed
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    /// Configuration file could not be read
    #[error("Failed to read configuration: {0}")]
    ConfigIo(String),
}
