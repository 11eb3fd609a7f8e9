//! Countdown timers
//!
//! A [`Timer`] is a duration plus the time remaining. It is advanced by its
//! owner's tick loop and never goes negative.

use serde::{Deserialize, Serialize};

/// A single-slot countdown timer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Timer {
    /// Duration the timer was last armed with
    pub duration: f32,
    /// Seconds left before the timer expires
    pub remaining: f32,
}

impl Timer {
    /// Create an idle timer
    pub const fn new() -> Self {
        Self {
            duration: 0.0,
            remaining: 0.0,
        }
    }

    /// (Re)start the timer. Overwrites whatever time was left.
    pub fn arm(&mut self, duration: f32) {
        let duration = duration.max(0.0);
        self.duration = duration;
        self.remaining = duration;
    }

    /// Stop the timer immediately
    pub fn clear(&mut self) {
        self.remaining = 0.0;
    }

    /// Advance the timer by `dt` seconds.
    ///
    /// Returns `true` only on the call that takes the timer from active to
    /// expired.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.remaining <= 0.0 {
            return false;
        }
        self.remaining = (self.remaining - dt).max(0.0);
        self.remaining == 0.0
    }

    /// Whether time is still left
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Seconds elapsed since the timer was armed
    pub fn elapsed(&self) -> f32 {
        self.duration - self.remaining
    }

    /// Fraction of the duration that has elapsed (1.0 when idle)
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed() / self.duration).clamp(0.0, 1.0)
        }
    }
}
