use chrono::{DateTime, Utc};
use std::sync::RwLock;

/// # Summary
/// Clock port. The webhook pipeline reads "now" exclusively through this
/// trait, both for dedup bookkeeping and for the message timestamp line.
pub trait TimeProvider: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;
}

/// # Summary
/// Production clock backed by the operating system.
pub struct RealTimeProvider;

impl TimeProvider for RealTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// # Summary
/// Manually driven clock used to walk across dedup windows in tests.
///
/// # Invariants
/// - Reads and writes go through a `RwLock`; a poisoned lock is recovered
///   rather than propagated, since the guarded value is a plain `Copy` time.
pub struct FakeClockProvider {
    current_time: RwLock<DateTime<Utc>>,
}

impl FakeClockProvider {
    /// Creates a clock frozen at `initial_time`.
    pub fn new(initial_time: DateTime<Utc>) -> Self {
        Self {
            current_time: RwLock::new(initial_time),
        }
    }

    /// Moves the clock to `new_time`.
    pub fn set_time(&self, new_time: DateTime<Utc>) {
        let mut time = self
            .current_time
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *time = new_time;
    }

    /// Moves the clock forward by `delta`.
    pub fn advance(&self, delta: chrono::Duration) {
        let mut time = self
            .current_time
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *time += delta;
    }
}

impl TimeProvider for FakeClockProvider {
    fn now(&self) -> DateTime<Utc> {
        *self
            .current_time
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// # Summary
/// Converts a UTC instant to fractional seconds since the Unix epoch, the
/// unit dedup timestamps are stored in.
#[allow(clippy::cast_precision_loss)]
pub fn epoch_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp_micros() as f64 / 1_000_000.0
}
