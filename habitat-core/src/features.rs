//! Sliding-Window Feature Extraction
//!
//! ## Overview
//!
//! The anomaly detector does not look at individual readings. It looks at a
//! statistical summary of the most recent `window_size` telemetry points,
//! reduced to a fixed 12-slot feature vector.
//!
//! ## Feature Layout
//!
//! For each tracked variable, in the fixed order
//! `[temperature, humidity, airflow, cpu_load]`, three statistics are computed
//! over the window:
//!
//! | Statistic      | Definition                               |
//! |----------------|------------------------------------------|
//! | mean           | population mean                          |
//! | variance       | population variance (divide by N)        |
//! | rate of change | `last - first`, in arrival order         |
//!
//! ```text
//! index:  0          1         2         3         4        5
//!         temp_mean  temp_var  temp_roc  hum_mean  hum_var  hum_roc
//! index:  6          7         8         9         10       11
//!         air_mean   air_var   air_roc   cpu_mean  cpu_var  cpu_roc
//! ```
//!
//! The layout is shared with trained model artifacts and baseline files; any
//! change invalidates every artifact trained before it.
//!
//! ## Example
//!
//! ```rust
//! use habitat_core::features::{SlidingWindowFeatureExtractor, WindowPoint};
//!
//! let mut extractor = SlidingWindowFeatureExtractor::new(5).unwrap();
//! for i in 0..5 {
//!     let t = 20.0 + i as f64;
//!     extractor.add_window_point(WindowPoint {
//!         temperature: t,
//!         humidity: 50.0,
//!         airflow: 2.5,
//!         cpu_load: 0.5,
//!     });
//! }
//!
//! let features = extractor.extract_features().unwrap();
//! assert_eq!(features[0], 22.0); // temp_mean
//! assert_eq!(features[1], 2.0);  // temp_var
//! assert_eq!(features[2], 4.0);  // temp_roc
//! ```

use crate::buffer::CircularBuffer;
use crate::errors::{SimulationError, SimulationResult};
use crate::telemetry::TelemetryRecord;

/// Number of slots in a feature vector
pub const FEATURE_COUNT: usize = 12;

/// Fixed-size feature vector, laid out as described in the module docs
pub type FeatureVector = [f64; FEATURE_COUNT];

/// Names of the feature slots, index-aligned with `FeatureVector`
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "temp_mean",
    "temp_var",
    "temp_roc",
    "hum_mean",
    "hum_var",
    "hum_roc",
    "air_mean",
    "air_var",
    "air_roc",
    "cpu_mean",
    "cpu_var",
    "cpu_roc",
];

/// Telemetry variable summarised by the extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackedVariable {
    /// Enclosure temperature
    Temperature,
    /// Relative humidity
    Humidity,
    /// Airflow
    Airflow,
    /// CPU load
    CpuLoad,
}

impl TrackedVariable {
    /// Every tracked variable, in feature-vector order
    pub const ALL: [TrackedVariable; 4] = [
        TrackedVariable::Temperature,
        TrackedVariable::Humidity,
        TrackedVariable::Airflow,
        TrackedVariable::CpuLoad,
    ];

    /// Field name in the telemetry record
    pub fn name(&self) -> &'static str {
        match self {
            TrackedVariable::Temperature => "temperature",
            TrackedVariable::Humidity => "humidity",
            TrackedVariable::Airflow => "airflow",
            TrackedVariable::CpuLoad => "cpu_load",
        }
    }

    /// Index of this variable's first slot in the feature vector
    pub fn feature_offset(&self) -> usize {
        let position = match self {
            TrackedVariable::Temperature => 0,
            TrackedVariable::Humidity => 1,
            TrackedVariable::Airflow => 2,
            TrackedVariable::CpuLoad => 3,
        };
        position * 3
    }

    fn value(&self, point: &WindowPoint) -> f64 {
        match self {
            TrackedVariable::Temperature => point.temperature,
            TrackedVariable::Humidity => point.humidity,
            TrackedVariable::Airflow => point.airflow,
            TrackedVariable::CpuLoad => point.cpu_load,
        }
    }
}

/// The tracked values of one telemetry record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowPoint {
    /// Temperature (°C)
    pub temperature: f64,
    /// Relative humidity (%RH)
    pub humidity: f64,
    /// Airflow
    pub airflow: f64,
    /// CPU load
    pub cpu_load: f64,
}

impl From<&TelemetryRecord> for WindowPoint {
    fn from(record: &TelemetryRecord) -> Self {
        Self {
            temperature: record.temperature,
            humidity: record.humidity,
            airflow: record.airflow,
            cpu_load: record.cpu_load,
        }
    }
}

/// Window statistics for a single variable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariableStats {
    /// Population mean
    pub mean: f64,
    /// Population variance
    pub variance: f64,
    /// Newest value minus oldest value
    pub rate_of_change: f64,
}

impl VariableStats {
    fn from_window(window: &CircularBuffer<WindowPoint>, variable: TrackedVariable) -> Option<Self> {
        let first = variable.value(window.first()?);
        let last = variable.value(window.last()?);
        let count = window.len() as f64;

        let mean = window.iter().map(|p| variable.value(p)).sum::<f64>() / count;
        let variance = window
            .iter()
            .map(|p| (variable.value(p) - mean).powi(2))
            .sum::<f64>()
            / count;

        Some(Self {
            mean,
            variance,
            rate_of_change: last - first,
        })
    }
}

/// Rolling window of telemetry reduced on demand to a `FeatureVector`
#[derive(Debug, Clone)]
pub struct SlidingWindowFeatureExtractor {
    window: CircularBuffer<WindowPoint>,
}

impl SlidingWindowFeatureExtractor {
    /// Create an extractor holding the last `window_size` points
    ///
    /// Fails with `InvalidConfig` when `window_size` is zero.
    pub fn new(window_size: usize) -> SimulationResult<Self> {
        if window_size == 0 {
            return Err(SimulationError::InvalidConfig {
                reason: "window_size must be at least 1",
            });
        }
        Ok(Self {
            window: CircularBuffer::new(window_size),
        })
    }

    /// Append a record, evicting the oldest point when the window is full
    pub fn add_point(&mut self, record: &TelemetryRecord) {
        self.add_window_point(WindowPoint::from(record));
    }

    /// Append already-extracted tracked values
    pub fn add_window_point(&mut self, point: WindowPoint) {
        self.window.push(point);
    }

    /// True once the window holds exactly `window_size` points
    pub fn is_window_ready(&self) -> bool {
        self.window.is_full()
    }

    /// Reduce the full window to its feature vector
    ///
    /// Fails with `WindowNotReady` until `window_size` points have arrived.
    pub fn extract_features(&self) -> SimulationResult<FeatureVector> {
        if !self.is_window_ready() {
            return Err(SimulationError::WindowNotReady {
                required: self.window_size(),
                available: self.len(),
            });
        }

        let mut features = [0.0; FEATURE_COUNT];
        for variable in TrackedVariable::ALL {
            let stats = self.variable_stats(variable).ok_or(SimulationError::WindowNotReady {
                required: self.window_size(),
                available: self.len(),
            })?;
            let offset = variable.feature_offset();
            features[offset] = stats.mean;
            features[offset + 1] = stats.variance;
            features[offset + 2] = stats.rate_of_change;
        }

        Ok(features)
    }

    /// Statistics for one variable over whatever the window currently holds
    pub fn variable_stats(&self, variable: TrackedVariable) -> Option<VariableStats> {
        VariableStats::from_window(&self.window, variable)
    }

    /// Buffered points, oldest first
    pub fn points(&self) -> impl Iterator<Item = &WindowPoint> + '_ {
        self.window.iter()
    }

    /// Number of buffered points
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// True when no points are buffered
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Capacity of the window
    pub fn window_size(&self) -> usize {
        self.window.capacity()
    }

    /// Drop every buffered point
    pub fn clear(&mut self) {
        self.window.clear();
    }
}
