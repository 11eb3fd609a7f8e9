//! Barrel bumper obstacle
//!
//! Launches the player away on contact, then goes inactive for a while.

use courier_core::{Color, EntityId, Timer};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::player::ExternalImpulseRequest;

/// Launches flatter than this get lifted so the player clears the ground
const MIN_LAUNCH_Y: f32 = 0.2;
const LIFTED_LAUNCH_Y: f32 = 0.5;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BumperConfig {
    /// Launch speed given to the player
    pub push_force: f32,
    /// Seconds the player loses control
    pub stun_time: f32,
    /// Seconds before the bumper can fire again
    pub reset_time: f32,
    /// Trigger radius around the barrel center
    pub radius: f32,
}

impl Default for BumperConfig {
    fn default() -> Self {
        Self {
            push_force: 25.0,
            stun_time: 0.3,
            reset_time: 1.5,
            radius: 0.75,
        }
    }
}

pub struct BarrelBumper {
    pub id: EntityId,
    pub position: Vec2,
    pub config: BumperConfig,
    cooldown: Timer,
    player_inside: bool,
}

impl BarrelBumper {
    pub fn new(position: Vec2, config: BumperConfig) -> Self {
        Self {
            id: EntityId::new(),
            position,
            config,
            cooldown: Timer::new(),
            player_inside: false,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.cooldown.is_active()
    }

    /// Launch direction for a player at `player_position`
    pub fn launch_direction(&self, player_position: Vec2) -> Vec2 {
        let mut direction = (player_position - self.position).normalize_or(Vec2::Y);
        if direction.y < MIN_LAUNCH_Y {
            direction.y = LIFTED_LAUNCH_Y;
            direction = direction.normalize();
        }
        direction
    }

    /// Check the player against the trigger. Fires once per entry while
    /// active and returns the knockback to apply.
    pub fn try_trigger(&mut self, player_position: Vec2) -> Option<ExternalImpulseRequest> {
        let inside = player_position.distance(self.position) <= self.config.radius;
        let entered = inside && !self.player_inside;
        self.player_inside = inside;

        if !entered || !self.is_active() {
            return None;
        }

        let direction = self.launch_direction(player_position);
        self.cooldown.arm(self.config.reset_time);
        debug!(id = ?self.id, ?direction, "bumper fired");
        Some(ExternalImpulseRequest::new(
            direction,
            self.config.push_force,
            self.config.stun_time,
        ))
    }

    pub fn tick(&mut self, dt: f32) {
        if self.cooldown.tick(dt) {
            debug!(id = ?self.id, "bumper reset");
        }
    }

    /// Gray while recharging
    pub fn tint(&self, base: Color) -> Color {
        if self.is_active() {
            base
        } else {
            Color::GRAY
        }
    }
}
