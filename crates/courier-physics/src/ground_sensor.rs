//! Ground sensor: one overlap box plus short rays, probed once per tick

use courier_core::math::direction_from_degrees;
use courier_core::ConfigError;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{layers, SurfaceQuery};

/// Ground sensor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundSensorConfig {
    /// Box anchor relative to the body origin, in body-local space
    pub offset: Vec2,
    /// Full size of the overlap box (default: 0.5 x 0.1)
    pub size: Vec2,
    /// Layers that count as ground
    pub mask: u32,
    /// Length of the ray cast along the body's local down axis to read the
    /// contact normal
    pub normal_ray_length: f32,
    /// Airborne tilt is refused while ground lies within this distance
    /// straight below the body
    pub safe_rotation_height: f32,
}

impl Default for GroundSensorConfig {
    fn default() -> Self {
        Self {
            offset: Vec2::new(0.0, -0.5),
            size: Vec2::new(0.5, 0.1),
            mask: layers::GROUND,
            normal_ray_length: 2.5,
            safe_rotation_height: 1.2,
        }
    }
}

/// Result of one ground probe
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GroundProbe {
    /// Whether the sensor box overlaps ground
    pub grounded: bool,
    /// Surface normal under the body, when grounded and the ray hit
    pub normal: Option<Vec2>,
    /// Whether ground lies within the safe rotation height (airborne only)
    pub near_ground: bool,
}

impl GroundProbe {
    /// A probe over nothing
    pub fn airborne() -> Self {
        Self::default()
    }

    /// A probe standing on a surface with the given normal
    pub fn on_surface(normal: Vec2) -> Self {
        Self {
            grounded: true,
            normal: Some(normal),
            near_ground: true,
        }
    }
}

/// Stateless ground sensor
#[derive(Debug, Clone)]
pub struct GroundSensor {
    config: GroundSensorConfig,
}

impl GroundSensor {
    /// Build a sensor, rejecting degenerate boxes and empty masks
    pub fn new(config: GroundSensorConfig) -> Result<Self, ConfigError> {
        if config.mask == 0 {
            return Err(ConfigError::Missing("ground sensor mask"));
        }
        ConfigError::require_positive("sensor.size.x", config.size.x)?;
        ConfigError::require_positive("sensor.size.y", config.size.y)?;
        ConfigError::require_positive("sensor.normal_ray_length", config.normal_ray_length)?;
        ConfigError::require_non_negative(
            "sensor.safe_rotation_height",
            config.safe_rotation_height,
        )?;
        if !config.offset.is_finite() {
            return Err(ConfigError::NotFinite("sensor.offset"));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &GroundSensorConfig {
        &self.config
    }

    /// World position of the overlap box for a body pose
    pub fn anchor(&self, position: Vec2, rotation_deg: f32) -> Vec2 {
        position + Vec2::from_angle(rotation_deg.to_radians()).rotate(self.config.offset)
    }

    /// Probe the world under a body pose
    pub fn probe<Q: SurfaceQuery + ?Sized>(
        &self,
        query: &Q,
        position: Vec2,
        rotation_deg: f32,
    ) -> GroundProbe {
        let mask = self.config.mask;
        let anchor = self.anchor(position, rotation_deg);
        let grounded = query.overlap_box(anchor, self.config.size * 0.5, mask);

        if grounded {
            let body_down = -direction_from_degrees(rotation_deg + 90.0);
            let normal = query
                .cast_ray(position, body_down, self.config.normal_ray_length, mask)
                .map(|hit| hit.normal);
            GroundProbe {
                grounded,
                normal,
                near_ground: true,
            }
        } else {
            let near_ground = self.config.safe_rotation_height > 0.0
                && query
                    .cast_ray(position, Vec2::NEG_Y, self.config.safe_rotation_height, mask)
                    .is_some();
            GroundProbe {
                grounded,
                normal: None,
                near_ground,
            }
        }
    }
}
