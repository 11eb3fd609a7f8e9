//! Delivery doors

use courier_core::{Aabb2, EntityId};
use glam::Vec2;

/// A door the player can deliver to
#[derive(Debug, Clone)]
pub struct Door {
    pub id: EntityId,
    pub name: String,
    pub position: Vec2,
    /// Trigger volume
    pub bounds: Aabb2,
    /// Whether this is the current delivery target
    pub is_goal: bool,
    player_inside: bool,
}

/// What happened when the player moved relative to a door
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorContact {
    None,
    /// Player entered the goal door
    Goal,
    /// Player entered some other door
    Other,
}

impl Door {
    pub fn new(name: impl Into<String>, position: Vec2, size: Vec2) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            position,
            bounds: Aabb2::from_center_size(position, size),
            is_goal: false,
            player_inside: false,
        }
    }

    /// Track the player against the trigger; only entry counts
    pub fn track(&mut self, player_position: Vec2) -> DoorContact {
        let inside = self.bounds.contains(player_position);
        let entered = inside && !self.player_inside;
        self.player_inside = inside;

        match (entered, self.is_goal) {
            (false, _) => DoorContact::None,
            (true, true) => DoorContact::Goal,
            (true, false) => DoorContact::Other,
        }
    }
}
