//! Frame clock.
use std::{
    thread,
    time::{Duration, Instant},
};

use crate::{constants::*, vm::Hz};

/// Timer to synchronize the driving thread with the 60Hz timer cadence.
///
/// The VM itself never sleeps. The caller runs a frame of cycles,
/// ticks the timers, and waits on the clock before the next frame.
pub struct Clock {
    start: Instant,
    interval: Duration,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(Hz(DELAY_FREQUENCY))
    }
}

impl Clock {
    /// Creates a new clock with the current time as internal state.
    pub fn new(frequency: Hz) -> Self {
        Self {
            start: Instant::now(),
            interval: frequency.into(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Set the clock state back to zero.
    pub fn reset(&mut self) {
        self.start = Instant::now()
    }

    /// Check whether a full interval has elapsed, resetting the clock when it has.
    pub fn tick(&mut self) -> bool {
        if self.start.elapsed() >= self.interval {
            self.reset();
            true
        } else {
            false
        }
    }

    /// Block the current thread until the next clock cycle.
    pub fn wait(&mut self) {
        loop {
            if self.start.elapsed() < self.interval {
                // Sleep does not have enough resolution, and causes
                // the clock to run at 30 FPS.
                //
                // Yielding in a loop is the best alternative.
                thread::yield_now();
            } else {
                // Reset back to zero, rather than trying to catch up.
                //
                // If the driver was paused, and a large amount of time
                // has elapsed until it is resumed, it should simply
                // continue at the next cycle running at its usual speed.
                self.reset();
                return;
            }
        }
    }
}
