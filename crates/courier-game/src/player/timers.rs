//! The controller's named countdown timers

use courier_core::Timer;

/// Every timer the controller owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerTimer {
    /// Grace period after leaving the ground
    Coyote,
    /// Remembered jump input
    JumpBuffer,
    /// Trick in progress
    Trick,
    /// Crash or external knockback stun
    Crash,
    /// Time left to enter the next combo key
    ComboWindow,
    /// Time left to finish the Down, Up jump sequence
    InputSequence,
}

impl PlayerTimer {
    pub const ALL: [PlayerTimer; 6] = [
        PlayerTimer::Coyote,
        PlayerTimer::JumpBuffer,
        PlayerTimer::Trick,
        PlayerTimer::Crash,
        PlayerTimer::ComboWindow,
        PlayerTimer::InputSequence,
    ];

    const fn index(self) -> usize {
        self as usize
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of timers that expired during one [`TimerBank::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExpiredTimers(u8);

impl ExpiredTimers {
    pub fn contains(self, timer: PlayerTimer) -> bool {
        self.0 & timer.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Fixed set of single-slot timers, one per [`PlayerTimer`]
#[derive(Debug, Clone, Default)]
pub struct TimerBank {
    timers: [Timer; 6],
}

impl TimerBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a timer. Re-arming overwrites the time left; it never adds.
    pub fn arm(&mut self, timer: PlayerTimer, duration: f32) {
        self.timers[timer.index()].arm(duration);
    }

    /// Zero a timer
    pub fn clear(&mut self, timer: PlayerTimer) {
        self.timers[timer.index()].clear();
    }

    pub fn is_active(&self, timer: PlayerTimer) -> bool {
        self.timers[timer.index()].is_active()
    }

    pub fn remaining(&self, timer: PlayerTimer) -> f32 {
        self.timers[timer.index()].remaining
    }

    /// Advance every timer by `dt`, reporting which ones ran out
    pub fn tick(&mut self, dt: f32) -> ExpiredTimers {
        let mut expired = 0u8;
        for timer in PlayerTimer::ALL {
            if self.timers[timer.index()].tick(dt) {
                expired |= timer.bit();
            }
        }
        ExpiredTimers(expired)
    }

    /// Stop every timer
    pub fn clear_all(&mut self) {
        for timer in &mut self.timers {
            timer.clear();
        }
    }
}
