//! Frame-counted timers.
//!
//! Nothing in here reads the wall clock. The host feeds a fixed frame
//! delta, so tests can step any number of frames and get the same result.

/// Counts down a number of frames. Used for powerup durations, input
/// cooldowns and score flashes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    pub fn start(&mut self, frames: u32) {
        self.remaining = frames;
    }

    pub fn cancel(&mut self) {
        self.remaining = 0;
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Advance one frame. Returns true only on the frame the countdown
    /// reaches zero; an idle countdown never fires.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }
}

/// Fires every `interval_ms` of accumulated frame time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repeating {
    interval_ms: u64,
    elapsed_ms: u64,
}

impl Repeating {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            elapsed_ms: 0,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Change the period without losing the time already accumulated.
    pub fn set_interval(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms.max(1);
    }

    pub fn reset(&mut self) {
        self.elapsed_ms = 0;
    }

    /// Feed `delta_ms` of frame time and return how many periods elapsed.
    pub fn advance(&mut self, delta_ms: u64) -> u32 {
        self.elapsed_ms += delta_ms;
        let mut fired = 0;
        while self.elapsed_ms >= self.interval_ms {
            self.elapsed_ms -= self.interval_ms;
            fired += 1;
        }
        fired
    }
}
