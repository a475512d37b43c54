use std::time::Instant;

/// A monotonic time source consumed by the scheduler.
///
/// Abstracting the clock behind a trait lets the rate-limited task loops be exercised in
/// tests with a scripted clock instead of wall time.
pub trait TimeSource: Send + Sync {
    /// Returns monotonic time in seconds since an arbitrary epoch.
    fn now(&self) -> f64;
}

/// The production [TimeSource], backed by [std::time::Instant].
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Constructor that returns a [MonotonicClock] with its epoch at the moment of the call.
    pub fn new() -> Self {
        MonotonicClock {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_clock_never_decreases() {
        let clock = MonotonicClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first && first >= 0.0);
    }
}
