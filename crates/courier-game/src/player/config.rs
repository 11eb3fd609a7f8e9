//! Controller configuration and capability flags

use courier_core::ConfigError;
use courier_physics::{CharacterBodyConfig, GroundSensorConfig};
use serde::{Deserialize, Serialize};

/// Which inputs arm the jump buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JumpInputProfile {
    /// Down then Up within the input sequence window
    #[default]
    Sequence,
    /// The direct jump button only
    Button,
    /// Either path; the most recent one wins
    Both,
}

impl JumpInputProfile {
    pub fn allows_sequence(self) -> bool {
        matches!(self, Self::Sequence | Self::Both)
    }

    pub fn allows_button(self) -> bool {
        matches!(self, Self::Button | Self::Both)
    }
}

/// Optional controller behaviors
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerFeatures {
    /// Air combo and trick/crash landing rules
    pub trick_system: bool,
    /// Airborne dive impulse
    pub dive: bool,
    /// Rotate to match the ground surface
    pub slope_alignment: bool,
    /// Push into the surface while grounded
    pub slope_stick: bool,
    /// Player-controlled tilt while airborne
    pub air_rotation: bool,
    /// Horizontal steering while airborne
    pub air_control: bool,
    /// Turn a hard landing on a slope into speed along it
    pub fall_to_speed: bool,
    /// Turn the board toward the pointer while aim is held
    pub aim_rotation: bool,
}

impl Default for ControllerFeatures {
    fn default() -> Self {
        Self {
            trick_system: true,
            dive: true,
            slope_alignment: true,
            slope_stick: true,
            air_rotation: false,
            air_control: false,
            fall_to_speed: true,
            aim_rotation: false,
        }
    }
}

/// Player controller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // Ground movement
    /// Top speed reachable by pushing, in units per second
    pub max_speed: f32,
    /// Rate of speed gain toward `max_speed`
    pub acceleration: f32,
    /// Rate of speed change when pushing against the current motion
    pub braking: f32,
    /// Rate of slowdown with no input
    pub friction: f32,

    // Air movement
    /// Acceleration applied while diving
    pub dive_acceleration: f32,
    /// Input must point further below the horizon than this (degrees) to dive
    pub dive_angle_threshold: f32,
    /// Steering acceleration in the air (only with `air_control`)
    pub air_acceleration: f32,

    // Jump and gravity
    /// Vertical velocity set by a jump
    pub jump_force: f32,
    /// Vertical velocity multiplier when the jump input is released early
    pub jump_cut_multiplier: f32,
    /// Base gravity multiplier
    pub gravity_scale: f32,
    /// Extra gravity multiplier while falling
    pub fall_gravity_multiplier: f32,
    /// Grace period after leaving the ground where a jump still counts
    pub coyote_time: f32,
    /// How long a jump input is remembered
    pub jump_buffer_time: f32,
    /// Max time between Down and Up for the sequence jump
    pub input_sequence_window: f32,
    /// Which inputs arm the jump buffer
    pub jump_profile: JumpInputProfile,

    // Tricks and stun
    /// Max time between combo keys
    pub combo_timeout_window: f32,
    /// How long a trick lasts; landing during it crashes
    pub trick_duration: f32,
    /// How long a failed landing stuns the player
    pub crash_duration: f32,
    /// Linear damping applied while stunned (per second)
    pub stun_damping: f32,

    // Orientation
    /// How fast the body rights itself in the air
    pub air_correction_speed: f32,
    /// Tilt rate in degrees per second (only with `air_rotation`)
    pub air_rotation_speed: f32,
    /// Tilt limit either side of upright, in degrees
    pub max_rotation_angle: f32,
    /// How fast the body aligns to the ground surface
    pub ground_alignment_speed: f32,
    /// Force pushing the body into the surface while grounded
    pub slope_stick_force: f32,
    /// Turn rate toward the pointer in degrees per second (only with `aim_rotation`)
    pub aim_rotation_speed: f32,

    // Fall-to-speed
    /// Fraction of the converted landing speed that is kept
    pub momentum_preservation: f32,
    /// Falls slower than this are not converted
    pub min_fall_speed: f32,

    /// Body mass
    pub mass: f32,

    pub features: ControllerFeatures,
    pub body: CharacterBodyConfig,
    pub sensor: GroundSensorConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_speed: 12.0,
            acceleration: 60.0,
            braking: 40.0,
            friction: 5.0,
            dive_acceleration: 100.0,
            dive_angle_threshold: 30.0,
            air_acceleration: 20.0,
            jump_force: 20.0,
            jump_cut_multiplier: 0.5,
            gravity_scale: 5.0,
            fall_gravity_multiplier: 1.5,
            coyote_time: 0.1,
            jump_buffer_time: 0.1,
            input_sequence_window: 0.25,
            jump_profile: JumpInputProfile::default(),
            combo_timeout_window: 0.5,
            trick_duration: 1.0,
            crash_duration: 1.5,
            stun_damping: 1.0,
            air_correction_speed: 5.0,
            air_rotation_speed: 200.0,
            max_rotation_angle: 60.0,
            ground_alignment_speed: 10.0,
            slope_stick_force: 50.0,
            aim_rotation_speed: 720.0,
            momentum_preservation: 1.0,
            min_fall_speed: 5.0,
            mass: 1.0,
            features: ControllerFeatures::default(),
            body: CharacterBodyConfig::default(),
            sensor: GroundSensorConfig::default(),
        }
    }
}

impl ControllerConfig {
    /// Reject configurations that would produce NaNs or dead timers
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::require_positive("max_speed", self.max_speed)?;
        ConfigError::require_positive("acceleration", self.acceleration)?;
        ConfigError::require_non_negative("braking", self.braking)?;
        ConfigError::require_non_negative("friction", self.friction)?;
        ConfigError::require_non_negative("dive_acceleration", self.dive_acceleration)?;
        ConfigError::require_range("dive_angle_threshold", self.dive_angle_threshold, 0.0, 90.0)?;
        ConfigError::require_non_negative("air_acceleration", self.air_acceleration)?;

        ConfigError::require_positive("jump_force", self.jump_force)?;
        ConfigError::require_range("jump_cut_multiplier", self.jump_cut_multiplier, 0.0, 1.0)?;
        ConfigError::require_non_negative("gravity_scale", self.gravity_scale)?;
        ConfigError::require_positive("fall_gravity_multiplier", self.fall_gravity_multiplier)?;

        ConfigError::require_positive("coyote_time", self.coyote_time)?;
        ConfigError::require_positive("jump_buffer_time", self.jump_buffer_time)?;
        ConfigError::require_positive("input_sequence_window", self.input_sequence_window)?;
        ConfigError::require_positive("combo_timeout_window", self.combo_timeout_window)?;
        ConfigError::require_positive("trick_duration", self.trick_duration)?;
        ConfigError::require_positive("crash_duration", self.crash_duration)?;
        ConfigError::require_non_negative("stun_damping", self.stun_damping)?;

        ConfigError::require_non_negative("air_correction_speed", self.air_correction_speed)?;
        ConfigError::require_non_negative("air_rotation_speed", self.air_rotation_speed)?;
        ConfigError::require_non_negative("aim_rotation_speed", self.aim_rotation_speed)?;
        ConfigError::require_range("max_rotation_angle", self.max_rotation_angle, 0.0, 180.0)?;
        ConfigError::require_non_negative("ground_alignment_speed", self.ground_alignment_speed)?;
        ConfigError::require_non_negative("slope_stick_force", self.slope_stick_force)?;

        ConfigError::require_non_negative("momentum_preservation", self.momentum_preservation)?;
        ConfigError::require_non_negative("min_fall_speed", self.min_fall_speed)?;

        ConfigError::require_positive("mass", self.mass)?;
        ConfigError::require_positive("body.radius", self.body.radius)?;
        ConfigError::require_non_negative("body.half_height", self.body.half_height)?;
        Ok(())
    }

    /// Sine of the dive threshold; the downward input component must exceed it
    pub fn dive_threshold_sine(&self) -> f32 {
        self.dive_angle_threshold.to_radians().sin()
    }
}
