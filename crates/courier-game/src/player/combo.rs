//! Three-key air combo
//!
//! The combo is air-only: while grounded no key is accepted, and landing
//! drops any partial progress. Completing the sequence arms the trick timer.

use super::timers::{PlayerTimer, TimerBank};

/// Keys that take part in the combo, in sequence order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboKey {
    First,
    Second,
    Finish,
}

impl ComboKey {
    /// The key that advances the combo from `step`
    fn expected_at(step: u8) -> Option<Self> {
        match step {
            0 => Some(Self::First),
            1 => Some(Self::Second),
            2 => Some(Self::Finish),
            _ => None,
        }
    }
}

/// Result of feeding one key into the combo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboOutcome {
    /// Key was not accepted; progress is unchanged
    Ignored,
    /// Key was accepted; carries the new step
    Advanced(u8),
    /// Final key accepted; the trick timer is armed and the combo is idle again
    Completed,
}

/// What the combo needs to know about the character when a key arrives
#[derive(Debug, Clone, Copy)]
pub struct ComboContext {
    /// Character is on the ground
    pub grounded: bool,
    /// A trick, crash or knockback is running
    pub locked: bool,
    /// Controller clock, in seconds
    pub now: f64,
    /// Time allowed between keys
    pub window: f32,
    /// Trick timer duration armed on completion
    pub trick_duration: f32,
}

/// Combo progress: step 0 is idle, 1 and 2 are partial sequences
#[derive(Debug, Clone, Default)]
pub struct ComboStateMachine {
    step: u8,
    last_input_at: f64,
}

impl ComboStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    /// When the last key was accepted, on the controller clock
    pub fn last_input_at(&self) -> f64 {
        self.last_input_at
    }

    /// Feed one key press
    pub fn feed(&mut self, key: ComboKey, ctx: ComboContext, timers: &mut TimerBank) -> ComboOutcome {
        if ctx.grounded {
            self.reset(timers);
            return ComboOutcome::Ignored;
        }

        self.expire(timers);

        if ctx.locked || ComboKey::expected_at(self.step) != Some(key) {
            return ComboOutcome::Ignored;
        }

        self.last_input_at = ctx.now;

        if key == ComboKey::Finish {
            self.step = 0;
            timers.clear(PlayerTimer::ComboWindow);
            timers.arm(PlayerTimer::Trick, ctx.trick_duration);
            return ComboOutcome::Completed;
        }

        self.step += 1;
        timers.arm(PlayerTimer::ComboWindow, ctx.window);
        ComboOutcome::Advanced(self.step)
    }

    /// Drop partial progress once the window has run out. Returns whether
    /// anything was dropped.
    pub fn expire(&mut self, timers: &TimerBank) -> bool {
        if self.step > 0 && !timers.is_active(PlayerTimer::ComboWindow) {
            self.step = 0;
            return true;
        }
        false
    }

    /// Back to idle, e.g. on landing or knockback
    pub fn reset(&mut self, timers: &mut TimerBank) {
        self.step = 0;
        timers.clear(PlayerTimer::ComboWindow);
    }
}
