//! Time sources for telemetry timestamps
//!
//! Provides clock abstraction so a node can stamp records with:
//! - The system wall clock (live runs)
//! - A simulated clock advancing a fixed step per reading (offline runs, tests)

use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// Timestamp attached to telemetry records
pub type Timestamp = DateTime<Utc>;

/// Source of time for telemetry records
pub trait TimeSource: Send {
    /// Get the timestamp for the next record
    fn now(&mut self) -> Timestamp;
}

/// System time source
#[derive(Debug, Clone, Default)]
pub struct SystemTime;

impl TimeSource for SystemTime {
    fn now(&mut self) -> Timestamp {
        Utc::now()
    }
}

/// Simulated clock that advances by a fixed step on every reading
///
/// The first call returns `start`, the next `start + step`, and so on.
#[derive(Debug, Clone)]
pub struct SimulatedTime {
    next: Timestamp,
    step: Duration,
}

impl SimulatedTime {
    /// Clock starting at `start`, advancing `step` per reading
    pub fn new(start: Timestamp, step: Duration) -> Self {
        Self { next: start, step }
    }

    /// Clock starting at the Unix epoch with one-second steps
    pub fn from_epoch() -> Self {
        Self::new(DateTime::<Utc>::default(), Duration::seconds(1))
    }

    /// Timestamp the next reading will return
    pub fn peek(&self) -> Timestamp {
        self.next
    }
}

impl TimeSource for SimulatedTime {
    fn now(&mut self) -> Timestamp {
        let current = self.next;
        self.next = current + self.step;
        current
    }
}

/// Render a timestamp as an ISO-8601 UTC string (`2024-01-01T00:00:00.000000+00:00`)
pub fn to_iso8601(timestamp: &Timestamp) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, false)
}
