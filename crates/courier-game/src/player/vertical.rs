//! Jump, jump cut and asymmetric gravity

use glam::Vec2;

use super::timers::{PlayerTimer, TimerBank};
use super::ControllerConfig;

pub struct VerticalSolver;

impl VerticalSolver {
    /// Refill coyote time while standing on ground
    pub fn refresh_coyote(config: &ControllerConfig, timers: &mut TimerBank, grounded: bool) {
        if grounded {
            timers.arm(PlayerTimer::Coyote, config.coyote_time);
        }
    }

    /// Fire a jump when both the buffer and coyote timers are running.
    ///
    /// The jump sets vertical speed outright and consumes both timers.
    pub fn try_jump(config: &ControllerConfig, timers: &mut TimerBank, velocity: &mut Vec2) -> bool {
        if !(timers.is_active(PlayerTimer::JumpBuffer) && timers.is_active(PlayerTimer::Coyote)) {
            return false;
        }
        velocity.y = config.jump_force;
        timers.clear(PlayerTimer::JumpBuffer);
        timers.clear(PlayerTimer::Coyote);
        true
    }

    /// Shorten a rising jump after the jump input was released.
    ///
    /// Returns whether the cut applied; coyote time is dropped with it.
    pub fn apply_jump_cut(config: &ControllerConfig, timers: &mut TimerBank, velocity: &mut Vec2) -> bool {
        if velocity.y <= 0.0 {
            return false;
        }
        velocity.y *= config.jump_cut_multiplier;
        timers.clear(PlayerTimer::Coyote);
        true
    }

    /// Gravity multiplier for the current vertical speed
    pub fn gravity_scale(config: &ControllerConfig, velocity: Vec2) -> f32 {
        if velocity.y < 0.0 {
            config.gravity_scale * config.fall_gravity_multiplier
        } else {
            config.gravity_scale
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump_requires_both_timers() {
        let config = ControllerConfig::default();
        let mut timers = TimerBank::new();
        let mut velocity = Vec2::new(3.0, -2.0);

        timers.arm(PlayerTimer::JumpBuffer, 0.1);
        assert!(!VerticalSolver::try_jump(&config, &mut timers, &mut velocity));
        assert_eq!(velocity.y, -2.0);

        timers.arm(PlayerTimer::Coyote, 0.1);
        assert!(VerticalSolver::try_jump(&config, &mut timers, &mut velocity));
        assert_eq!(velocity.y, config.jump_force);
        assert_eq!(velocity.x, 3.0);
        assert_eq!(timers.remaining(PlayerTimer::JumpBuffer), 0.0);
        assert_eq!(timers.remaining(PlayerTimer::Coyote), 0.0);
    }

    #[test]
    fn test_jump_overrides_vertical_speed() {
        let config = ControllerConfig::default();
        let mut timers = TimerBank::new();
        let mut velocity = Vec2::new(0.0, 15.0);
        timers.arm(PlayerTimer::JumpBuffer, 0.1);
        timers.arm(PlayerTimer::Coyote, 0.1);

        VerticalSolver::try_jump(&config, &mut timers, &mut velocity);
        assert_eq!(velocity.y, config.jump_force);
    }

    #[test]
    fn test_jump_cut_only_while_rising() {
        let config = ControllerConfig::default();
        let mut timers = TimerBank::new();
        timers.arm(PlayerTimer::Coyote, 0.1);

        let mut falling = Vec2::new(0.0, -4.0);
        assert!(!VerticalSolver::apply_jump_cut(&config, &mut timers, &mut falling));
        assert_eq!(falling.y, -4.0);
        assert!(timers.is_active(PlayerTimer::Coyote));

        let mut rising = Vec2::new(0.0, 10.0);
        assert!(VerticalSolver::apply_jump_cut(&config, &mut timers, &mut rising));
        assert_eq!(rising.y, 5.0);
        assert!(!timers.is_active(PlayerTimer::Coyote));
    }

    #[test]
    fn test_gravity_scale_is_asymmetric() {
        let config = ControllerConfig::default();
        assert_eq!(VerticalSolver::gravity_scale(&config, Vec2::new(0.0, 1.0)), 5.0);
        assert_eq!(VerticalSolver::gravity_scale(&config, Vec2::ZERO), 5.0);
        assert_eq!(VerticalSolver::gravity_scale(&config, Vec2::new(0.0, -1.0)), 7.5);
    }
}
