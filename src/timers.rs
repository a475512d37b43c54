use std::sync::atomic::{AtomicU8, Ordering};

/// The rate at which both timers are decremented, per the CHIP-8 specification.
pub const TIMER_HZ: u64 = 60;

/// The CHIP-8 delay and sound timers: two 8-bit down-counters decremented at 60 Hz until
/// they reach zero.
///
/// The counters are atomics because each is written by the CPU task (FX15 / FX18) and
/// decremented by its own timer task; a tick is a single atomic read-modify-write so a
/// concurrent store can never be half-applied.
#[derive(Debug, Default)]
pub struct Timers {
    delay: AtomicU8,
    sound: AtomicU8,
}

impl Timers {
    /// Constructor that returns a [Timers] instance with both counters at zero.
    pub fn new() -> Self {
        Timers {
            delay: AtomicU8::new(0),
            sound: AtomicU8::new(0),
        }
    }

    /// Returns the current delay timer value.
    pub fn delay(&self) -> u8 {
        self.delay.load(Ordering::SeqCst)
    }

    /// Sets the delay timer.
    pub fn set_delay(&self, value: u8) {
        self.delay.store(value, Ordering::SeqCst);
    }

    /// Returns the current sound timer value.
    pub fn sound(&self) -> u8 {
        self.sound.load(Ordering::SeqCst)
    }

    /// Sets the sound timer.
    pub fn set_sound(&self, value: u8) {
        self.sound.store(value, Ordering::SeqCst);
    }

    /// Decrements the delay timer if it is above zero, returning the post-tick value.
    pub fn tick_delay(&self) -> u8 {
        Self::tick(&self.delay)
    }

    /// Decrements the sound timer if it is above zero, returning the post-tick value.
    /// The sound task uses the returned value to drive the beeper edges.
    pub fn tick_sound(&self) -> u8 {
        Self::tick(&self.sound)
    }

    fn tick(counter: &AtomicU8) -> u8 {
        match counter.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |value| {
            value.checked_sub(1)
        }) {
            Ok(previous) => previous - 1,
            Err(_) => 0,
        }
    }
}
