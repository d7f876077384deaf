//! Time source abstraction.
//!
//! Stores stamp `created_at` from a [`Clock`] so that tests can pin and
//! advance time instead of racing the wall clock.

use std::fmt::Debug;
use std::sync::atomic::{AtomicI64, Ordering};

/// A provider of "now" as Unix milliseconds.
pub trait Clock: Send + Sync + Debug {
    /// Returns the current time as milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// Wall-clock time via `chrono`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Manually driven clock.
///
/// Each call to [`Clock::now_millis`] returns the current value and then
/// advances it by `step_millis`, which keeps successive inserts strictly ordered.
#[derive(Debug)]
pub struct FixedClock {
    now: AtomicI64,
    step_millis: i64,
}

impl FixedClock {
    /// Starts at `start_millis` and never advances on its own.
    #[must_use]
    pub const fn new(start_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(start_millis),
            step_millis: 0,
        }
    }

    /// Starts at `start_millis` and advances by `step_millis` after every read.
    #[must_use]
    pub const fn ticking(start_millis: i64, step_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(start_millis),
            step_millis,
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.now.fetch_add(self.step_millis, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_holds_still_until_advanced() {
        let clock = FixedClock::new(1_000);
        assert_eq!(clock.now_millis(), 1_000);
        assert_eq!(clock.now_millis(), 1_000);
        clock.advance(500);
        assert_eq!(clock.now_millis(), 1_500);
    }

    #[test]
    fn ticking_clock_advances_per_read() {
        let clock = FixedClock::ticking(0, 10);
        assert_eq!(clock.now_millis(), 0);
        assert_eq!(clock.now_millis(), 10);
        assert_eq!(clock.now_millis(), 20);
    }

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now_millis() > 1_577_836_800_000);
    }
}
