//! Fade in, hold, fade out

use courier_core::Timer;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FadePhase {
    #[default]
    Hidden,
    FadingIn,
    Holding,
    FadingOut,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FadeConfig {
    /// Seconds for each fade
    pub fade_time: f32,
    /// Seconds fully visible between the fades
    pub hold_time: f32,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            fade_time: 0.5,
            hold_time: 2.0,
        }
    }
}

/// One visibility cycle, advanced by its owner's tick.
///
/// Restarting mid-cycle fades in from the current alpha.
#[derive(Debug, Clone, Default)]
pub struct FadeCycle {
    pub config: FadeConfig,
    phase: FadePhase,
    timer: Timer,
    alpha: f32,
    start_alpha: f32,
}

impl FadeCycle {
    pub fn new(config: FadeConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Start (or restart) the cycle
    pub fn show(&mut self) {
        self.enter(FadePhase::FadingIn);
    }

    /// Jump straight to hidden
    pub fn hide(&mut self) {
        self.phase = FadePhase::Hidden;
        self.timer.clear();
        self.alpha = 0.0;
    }

    pub fn tick(&mut self, dt: f32) {
        if self.phase == FadePhase::Hidden {
            return;
        }

        let expired = self.timer.tick(dt);
        let t = self.timer.progress();
        match self.phase {
            FadePhase::FadingIn => self.alpha = lerp(self.start_alpha, 1.0, t),
            FadePhase::FadingOut => self.alpha = lerp(self.start_alpha, 0.0, t),
            FadePhase::Holding | FadePhase::Hidden => {}
        }

        if expired || !self.timer.is_active() {
            self.advance();
        }
    }

    fn advance(&mut self) {
        match self.phase {
            FadePhase::FadingIn => {
                self.alpha = 1.0;
                self.enter(FadePhase::Holding);
            }
            FadePhase::Holding => self.enter(FadePhase::FadingOut),
            FadePhase::FadingOut => self.hide(),
            FadePhase::Hidden => {}
        }
    }

    fn enter(&mut self, phase: FadePhase) {
        self.phase = phase;
        self.start_alpha = self.alpha;
        let duration = match phase {
            FadePhase::FadingIn | FadePhase::FadingOut => self.config.fade_time,
            FadePhase::Holding => self.config.hold_time,
            FadePhase::Hidden => 0.0,
        };
        self.timer.arm(duration);
    }

    pub fn phase(&self) -> FadePhase {
        self.phase
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn is_visible(&self) -> bool {
        self.alpha > 0.0
    }
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}
