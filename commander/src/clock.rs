//! Time source abstraction for the link state machine
//!
//! All link timing (byte pacing, listen windows, polling cadence) goes
//! through this trait so the state machine can be tested against a manual
//! clock without real wall-clock delays.

use std::time::{Duration, Instant};

/// A monotonic time source with a blocking sleep.
pub trait Clock {
    /// Monotonic time elapsed since the clock's origin.
    fn now(&self) -> Duration;

    /// Block the calling thread for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Production clock backed by `Instant` and `thread::sleep`.
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_clock_advances() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        clock.sleep(Duration::from_millis(1));
        let b = clock.now();
        assert!(b >= a + Duration::from_millis(1));
    }
}
