//! Body rotation: upright in the air, surface-aligned on the ground

use courier_core::math::{lerp_angle, move_towards_angle, surface_alignment_angle, wrap_angle_180};
use glam::Vec2;

use super::ControllerConfig;

#[derive(Debug, Clone, Copy)]
pub struct OrientationInput {
    pub grounded: bool,
    /// Current rotation in degrees
    pub rotation: f32,
    /// Held tilt input in [-1, 1], positive counter-clockwise
    pub tilt: f32,
    /// Ground lies within the safe rotation height below the body
    pub near_ground: bool,
    /// Last known contact normal
    pub normal: Option<Vec2>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationOutput {
    /// New rotation in degrees
    pub rotation: f32,
    /// Velocity change from slope stick
    pub velocity_delta: Vec2,
}

pub struct OrientationStabilizer;

impl OrientationStabilizer {
    pub fn solve(config: &ControllerConfig, input: OrientationInput, dt: f32) -> OrientationOutput {
        if input.grounded {
            Self::solve_ground(config, input, dt)
        } else {
            OrientationOutput {
                rotation: Self::solve_air(config, input, dt),
                velocity_delta: Vec2::ZERO,
            }
        }
    }

    /// Turn toward a world-space aim point so the board's +X axis points
    /// at it, at most `aim_rotation_speed * dt` degrees per tick
    pub fn aim(config: &ControllerConfig, rotation: f32, position: Vec2, target: Vec2, dt: f32) -> f32 {
        let direction = target - position;
        if direction == Vec2::ZERO {
            return rotation;
        }
        let heading = direction.y.atan2(direction.x).to_degrees();
        move_towards_angle(rotation, heading, config.aim_rotation_speed * dt)
    }

    fn solve_air(config: &ControllerConfig, input: OrientationInput, dt: f32) -> f32 {
        let tilting = config.features.air_rotation && input.tilt != 0.0 && !input.near_ground;
        if tilting {
            let max = config.max_rotation_angle;
            let current = wrap_angle_180(input.rotation);
            let step = input.tilt.clamp(-1.0, 1.0) * config.air_rotation_speed * dt;
            return (current + step).clamp(-max, max);
        }
        lerp_angle(input.rotation, 0.0, config.air_correction_speed * dt)
    }

    fn solve_ground(config: &ControllerConfig, input: OrientationInput, dt: f32) -> OrientationOutput {
        let Some(normal) = input.normal else {
            return OrientationOutput {
                rotation: input.rotation,
                velocity_delta: Vec2::ZERO,
            };
        };

        let rotation = if config.features.slope_alignment {
            lerp_angle(
                input.rotation,
                surface_alignment_angle(normal),
                config.ground_alignment_speed * dt,
            )
        } else {
            input.rotation
        };

        let velocity_delta = if config.features.slope_stick {
            -normal * config.slope_stick_force / config.mass * dt
        } else {
            Vec2::ZERO
        };

        OrientationOutput {
            rotation,
            velocity_delta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn air(rotation: f32) -> OrientationInput {
        OrientationInput {
            grounded: false,
            rotation,
            tilt: 0.0,
            near_ground: false,
            normal: None,
        }
    }

    #[test]
    fn test_air_eases_upright() {
        let config = ControllerConfig::default();
        let out = OrientationStabilizer::solve(&config, air(40.0), 0.1);
        assert!((out.rotation - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_air_correction_takes_short_arc() {
        let config = ControllerConfig::default();
        let out = OrientationStabilizer::solve(&config, air(350.0), 0.1);
        // 350 is -10 from upright; moves up toward 360, not down toward 0
        assert!((out.rotation - 355.0).abs() < 1e-3);
    }

    #[test]
    fn test_tilt_needs_capability() {
        let mut config = ControllerConfig::default();
        let input = OrientationInput {
            tilt: 1.0,
            ..air(0.0)
        };
        assert_eq!(OrientationStabilizer::solve(&config, input, 0.1).rotation, 0.0);

        config.features.air_rotation = true;
        let out = OrientationStabilizer::solve(&config, input, 0.1);
        assert!((out.rotation - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_tilt_is_clamped() {
        let mut config = ControllerConfig::default();
        config.features.air_rotation = true;
        let input = OrientationInput {
            tilt: -1.0,
            ..air(-55.0)
        };
        let out = OrientationStabilizer::solve(&config, input, 0.1);
        assert_eq!(out.rotation, -config.max_rotation_angle);
    }

    #[test]
    fn test_tilt_refused_near_ground() {
        let mut config = ControllerConfig::default();
        config.features.air_rotation = true;
        let input = OrientationInput {
            tilt: 1.0,
            near_ground: true,
            ..air(30.0)
        };
        let out = OrientationStabilizer::solve(&config, input, 0.1);
        assert!(out.rotation < 30.0);
    }

    #[test]
    fn test_ground_aligns_to_surface() {
        let config = ControllerConfig::default();
        let normal = Vec2::new(-1.0, 1.0).normalize();
        let input = OrientationInput {
            grounded: true,
            rotation: 0.0,
            tilt: 0.0,
            near_ground: true,
            normal: Some(normal),
        };

        let out = OrientationStabilizer::solve(&config, input, 0.05);
        // Target is 45 degrees; half way there at speed 10 * 0.05
        assert!((out.rotation - 22.5).abs() < 1e-3);
        let expected = -normal * config.slope_stick_force * 0.05;
        assert!((out.velocity_delta - expected).length() < 1e-5);
    }

    #[test]
    fn test_slope_stick_is_optional() {
        let mut config = ControllerConfig::default();
        config.features.slope_stick = false;
        let input = OrientationInput {
            grounded: true,
            rotation: 0.0,
            tilt: 0.0,
            near_ground: true,
            normal: Some(Vec2::Y),
        };
        assert_eq!(
            OrientationStabilizer::solve(&config, input, 0.1).velocity_delta,
            Vec2::ZERO
        );
    }

    #[test]
    fn test_aim_turns_toward_target_at_limited_rate() {
        let config = ControllerConfig::default();
        let dt = 1.0 / 60.0;

        // Straight up is 90 degrees, 12 degrees per tick at 720/s
        let rotation = OrientationStabilizer::aim(&config, 0.0, Vec2::ZERO, Vec2::new(0.0, 5.0), dt);
        assert!((rotation - 12.0).abs() < 1e-3);

        let close = OrientationStabilizer::aim(&config, 85.0, Vec2::ZERO, Vec2::new(0.0, 5.0), dt);
        assert!((close - 90.0).abs() < 1e-3);

        let same = OrientationStabilizer::aim(&config, 30.0, Vec2::ONE, Vec2::ONE, dt);
        assert_eq!(same, 30.0);
    }
}
