//! Arrow pointing from the player toward the delivery target

use courier_core::math::lerp_angle;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{FadeConfig, FadeCycle};
use crate::delivery::{DeliveryEvent, DeliveryObserver};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrowConfig {
    /// Easing speed toward the target heading
    pub rotation_speed: f32,
    pub fade: FadeConfig,
}

impl Default for ArrowConfig {
    fn default() -> Self {
        Self {
            rotation_speed: 10.0,
            fade: FadeConfig {
                fade_time: 0.5,
                hold_time: 5.0,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct DirectionArrow {
    pub config: ArrowConfig,
    pub position: Vec2,
    /// Rotation in degrees; 0 points up
    pub rotation: f32,
    target: Option<Vec2>,
    fade: FadeCycle,
}

impl DirectionArrow {
    pub fn new(config: ArrowConfig) -> Self {
        let fade = FadeCycle::new(config.fade.clone());
        Self {
            config,
            position: Vec2::ZERO,
            rotation: 0.0,
            target: None,
            fade,
        }
    }

    pub fn set_target(&mut self, target: Option<Vec2>) {
        self.target = target;
    }

    pub fn target(&self) -> Option<Vec2> {
        self.target
    }

    /// Start the visibility cycle. Ignored with no target.
    pub fn show(&mut self) {
        if self.target.is_some() {
            self.fade.show();
        }
    }

    /// Follow the player and ease toward the target heading
    pub fn update(&mut self, player_position: Vec2, dt: f32) {
        self.fade.tick(dt);

        let Some(target) = self.target else {
            return;
        };
        self.position = player_position;
        let to_target = target - player_position;
        if to_target.length_squared() <= f32::EPSILON {
            return;
        }
        let heading = to_target.y.atan2(to_target.x).to_degrees() - 90.0;
        self.rotation = lerp_angle(self.rotation, heading, self.config.rotation_speed * dt);
    }

    pub fn alpha(&self) -> f32 {
        self.fade.alpha()
    }

    pub fn fade(&self) -> &FadeCycle {
        &self.fade
    }
}

impl Default for DirectionArrow {
    fn default() -> Self {
        Self::new(ArrowConfig::default())
    }
}

impl DeliveryObserver for DirectionArrow {
    fn on_delivery_event(&mut self, event: &DeliveryEvent) {
        if let DeliveryEvent::NewOrder { position, .. } = event {
            self.set_target(Some(*position));
        }
    }
}
