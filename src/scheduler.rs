use crate::clock::TimeSource;
use crate::error::VmError;
use std::thread;
use std::time::Duration;

/// Runs a task loop at a fixed rate until the work closure asks to stop or fails.
///
/// Each iteration measures its own duration against the injected clock and sleeps away
/// whatever is left of the period, so a cheap work item does not busy-wait and an expensive
/// one simply starts the next iteration immediately.  The closure returns `Ok(true)` to
/// keep looping and `Ok(false)` to stop; an error stops the loop and propagates.
///
/// # Arguments
///
/// * `clock` - the time source used to measure each iteration
/// * `period_seconds` - the target duration of one iteration
/// * `work` - the loop body
pub(crate) fn run_rate_limited<F>(
    clock: &dyn TimeSource,
    period_seconds: f64,
    mut work: F,
) -> Result<(), VmError>
where
    F: FnMut() -> Result<bool, VmError>,
{
    loop {
        let start = clock.now();
        if !work()? {
            return Ok(());
        }
        let elapsed = clock.now() - start;
        let remaining = period_seconds - elapsed;
        if remaining > 0.0 {
            thread::sleep(Duration::from_secs_f64(remaining));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// A scripted clock that advances a fixed amount on every reading.
    struct SteppingClock {
        readings: AtomicU64,
        step_seconds: f64,
    }

    impl SteppingClock {
        fn new(step_seconds: f64) -> Self {
            SteppingClock {
                readings: AtomicU64::new(0),
                step_seconds,
            }
        }
    }

    impl TimeSource for SteppingClock {
        fn now(&self) -> f64 {
            let reading = self.readings.fetch_add(1, Ordering::SeqCst);
            reading as f64 * self.step_seconds
        }
    }

    #[test]
    fn test_loop_runs_until_work_asks_to_stop() {
        let clock = SteppingClock::new(1.0);
        let mut iterations = 0;
        // Each iteration "takes" a full second against a one second period, so the loop
        // never sleeps and the test runs instantly
        run_rate_limited(&clock, 1.0, || {
            iterations += 1;
            Ok(iterations < 5)
        })
        .unwrap();
        assert_eq!(iterations, 5);
    }

    #[test]
    fn test_loop_propagates_work_error() {
        let clock = SteppingClock::new(1.0);
        let result = run_rate_limited(&clock, 1.0, || {
            Err(VmError::MemoryAddressOutOfBounds { address: 0x1000 })
        });
        assert_eq!(
            result.unwrap_err(),
            VmError::MemoryAddressOutOfBounds { address: 0x1000 }
        );
    }

    #[test]
    fn test_loop_with_zero_period_does_not_sleep() {
        let clock = SteppingClock::new(0.0);
        let mut iterations = 0;
        run_rate_limited(&clock, 0.0, || {
            iterations += 1;
            Ok(iterations < 100)
        })
        .unwrap();
        assert_eq!(iterations, 100);
    }
}
