//! Horizontal locomotion: ground drive, friction, braking and the air dive

use courier_core::math::direction_from_degrees;
use glam::Vec2;

use super::ControllerConfig;

/// Intent magnitudes at or below this count as no input
const INTENT_DEADZONE: f32 = 0.01;
/// Projection below this (against the drive direction) means the player is
/// pushing against their own motion
const REVERSE_THRESHOLD: f32 = -0.1;
/// Friction stops acting below this speed
const FRICTION_MIN_SPEED: f32 = 0.1;
/// Landings on surfaces flatter than this keep their velocity
const FLAT_SURFACE_NORMAL_Y: f32 = 0.95;

/// Which rule produced this tick's velocity change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveRate {
    /// Pushing toward a target speed from below
    Accelerate,
    /// At or above the target speed; momentum is kept as is
    Coast,
    /// No input; slowing toward rest
    Friction,
    /// Input opposes the current motion
    Brake,
    /// Airborne dive impulse
    Dive,
    /// Airborne steering (only with `air_control`)
    AirControl,
    /// Nothing applied
    None,
}

/// Everything the movement solver reads
#[derive(Debug, Clone, Copy)]
pub struct MovementInput {
    /// Horizontal intent in [-1, 1]
    pub intent: f32,
    pub grounded: bool,
    /// Body rotation in degrees
    pub rotation: f32,
    pub velocity: Vec2,
}

/// Velocity after one movement tick
#[derive(Debug, Clone, Copy)]
pub struct MovementOutput {
    pub velocity: Vec2,
    pub rate: DriveRate,
}

impl MovementOutput {
    pub fn diving(&self) -> bool {
        self.rate == DriveRate::Dive
    }
}

/// Stateless horizontal movement law
pub struct MovementSolver;

impl MovementSolver {
    /// Drive direction: the body's local +X axis, signed by intent
    pub fn drive_direction(rotation: f32, intent: f32) -> Vec2 {
        if intent.abs() <= INTENT_DEADZONE {
            return Vec2::ZERO;
        }
        direction_from_degrees(rotation) * intent.signum()
    }

    /// Advance horizontal velocity by one tick
    pub fn solve(config: &ControllerConfig, input: MovementInput, dt: f32) -> MovementOutput {
        if input.grounded {
            Self::solve_ground(config, input, dt)
        } else {
            Self::solve_air(config, input, dt)
        }
    }

    fn solve_ground(config: &ControllerConfig, input: MovementInput, dt: f32) -> MovementOutput {
        let velocity = input.velocity;

        if input.intent.abs() <= INTENT_DEADZONE {
            let speed = velocity.length();
            if speed <= FRICTION_MIN_SPEED {
                return MovementOutput {
                    velocity,
                    rate: DriveRate::None,
                };
            }
            let change = speed.min(config.friction * dt);
            return MovementOutput {
                velocity: velocity - velocity / speed * change,
                rate: DriveRate::Friction,
            };
        }

        let drive = Self::drive_direction(input.rotation, input.intent);
        let projection = velocity.dot(drive);
        let target = input.intent.abs() * config.max_speed;

        let rate = if projection < REVERSE_THRESHOLD {
            DriveRate::Brake
        } else if projection < target {
            DriveRate::Accelerate
        } else {
            DriveRate::Coast
        };

        let accel = match rate {
            DriveRate::Brake => config.braking,
            DriveRate::Accelerate => config.acceleration,
            _ => 0.0,
        };

        let change = (target - projection).max(0.0).min(accel * dt);
        MovementOutput {
            velocity: velocity + drive * change,
            rate,
        }
    }

    fn solve_air(config: &ControllerConfig, input: MovementInput, dt: f32) -> MovementOutput {
        let velocity = input.velocity;
        if input.intent.abs() <= INTENT_DEADZONE {
            return MovementOutput {
                velocity,
                rate: DriveRate::None,
            };
        }

        if config.features.dive {
            let intended = direction_from_degrees(input.rotation) * input.intent;
            if -intended.y > config.dive_threshold_sine() {
                return MovementOutput {
                    velocity: velocity + intended * config.dive_acceleration * dt,
                    rate: DriveRate::Dive,
                };
            }
        }

        if config.features.air_control {
            let target = input.intent * config.max_speed;
            let max_delta = config.air_acceleration * dt;
            let delta = (target - velocity.x).clamp(-max_delta, max_delta);
            return MovementOutput {
                velocity: Vec2::new(velocity.x + delta, velocity.y),
                rate: DriveRate::AirControl,
            };
        }

        MovementOutput {
            velocity,
            rate: DriveRate::None,
        }
    }

    /// Turn a hard landing on a slope into speed along it.
    ///
    /// Returns the new velocity when the slide along the surface is faster
    /// than `current` with its into-surface part removed, otherwise `None`.
    pub fn convert_fall_to_speed(
        config: &ControllerConfig,
        impact_velocity: Vec2,
        normal: Vec2,
        current: Vec2,
    ) -> Option<Vec2> {
        if normal.y > FLAT_SURFACE_NORMAL_Y || impact_velocity.y >= -config.min_fall_speed {
            return None;
        }

        let tangent = Vec2::new(normal.y, -normal.x);
        let along = impact_velocity.dot(tangent) * config.momentum_preservation;
        let converted = tangent * along;
        let current = current - normal * current.dot(normal).min(0.0);

        (converted.length_squared() > current.length_squared()).then_some(converted)
    }
}
