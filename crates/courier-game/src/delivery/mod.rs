//! Delivery orders and scoring
//!
//! One door at a time is the goal. Reaching it scores the delivery and picks
//! the next door, favoring doors farther from the player.

mod door;
mod selection;

pub use door::{Door, DoorContact};
pub use selection::{roulette_index, select_weighted};

use courier_core::{ConfigError, EntityId};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::player::ControllerEvent;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Points for any completed delivery
    pub base_score: f32,
    /// Points lost per second spent on the delivery
    pub time_penalty: f32,
    /// Points lost per crash
    pub fall_penalty: f32,
    /// Points for each completed trick
    pub trick_points: f32,
    /// Doors closer than this to the player are never picked
    pub min_target_distance: f32,
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            base_score: 1000.0,
            time_penalty: 10.0,
            fall_penalty: 50.0,
            trick_points: 100.0,
            min_target_distance: 2.0,
            seed: None,
        }
    }
}

impl DeliveryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::require_non_negative("delivery.base_score", self.base_score)?;
        ConfigError::require_non_negative("delivery.time_penalty", self.time_penalty)?;
        ConfigError::require_non_negative("delivery.fall_penalty", self.fall_penalty)?;
        ConfigError::require_non_negative("delivery.trick_points", self.trick_points)?;
        ConfigError::require_non_negative("delivery.min_target_distance", self.min_target_distance)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryEvent {
    /// A new goal door was picked
    NewOrder {
        door: EntityId,
        name: String,
        position: Vec2,
    },
    /// The goal door was reached
    DeliveryCompleted { door: EntityId, score: f32 },
}

/// Receives delivery events, dispatched once per frame
pub trait DeliveryObserver {
    fn on_delivery_event(&mut self, event: &DeliveryEvent);
}

pub struct DeliveryManager {
    config: DeliveryConfig,
    doors: Vec<Door>,
    current: Option<usize>,
    delivering: bool,
    elapsed: f32,
    falls: u32,
    trick_score: f32,
    total_score: f32,
    completed: u32,
    rng: StdRng,
    events: Vec<DeliveryEvent>,
}

impl DeliveryManager {
    pub fn new(config: DeliveryConfig, doors: Vec<Door>) -> Result<Self, ConfigError> {
        config.validate()?;
        if doors.is_empty() {
            return Err(ConfigError::Missing("delivery doors"));
        }
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            config,
            doors,
            current: None,
            delivering: false,
            elapsed: 0.0,
            falls: 0,
            trick_score: 0.0,
            total_score: 0.0,
            completed: 0,
            rng,
            events: Vec::new(),
        })
    }

    /// Reset the order state and pick the next goal door
    pub fn start_new_delivery(&mut self, player_position: Vec2) {
        if let Some(previous) = self.current.and_then(|i| self.doors.get_mut(i)) {
            previous.is_goal = false;
        }

        self.elapsed = 0.0;
        self.falls = 0;
        self.trick_score = 0.0;
        self.delivering = true;

        let index = self.select_next_door(player_position);
        self.current = Some(index);

        let door = &mut self.doors[index];
        door.is_goal = true;
        info!(door = %door.name, "new order");
        self.events.push(DeliveryEvent::NewOrder {
            door: door.id,
            name: door.name.clone(),
            position: door.position,
        });
    }

    /// Index of the next goal door. Doors within `min_target_distance` are
    /// skipped; if none remain any door may be picked.
    fn select_next_door(&mut self, player_position: Vec2) -> usize {
        let candidates: Vec<(usize, f32)> = self
            .doors
            .iter()
            .enumerate()
            .map(|(i, door)| (i, player_position.distance(door.position)))
            .filter(|(_, distance)| *distance > self.config.min_target_distance)
            .collect();

        if candidates.is_empty() {
            return self.rng.gen_range(0..self.doors.len());
        }

        let weights: Vec<f32> = candidates.iter().map(|(_, d)| *d).collect();
        let pick = select_weighted(&weights, &mut self.rng).unwrap_or(candidates.len() - 1);
        candidates[pick].0
    }

    /// Score the running delivery and start the next one
    pub fn complete_delivery(&mut self, player_position: Vec2) {
        if !self.delivering {
            return;
        }
        self.delivering = false;

        let score = self.calculate_score();
        self.total_score += score;
        self.completed += 1;

        let door = self.current.map(|i| self.doors[i].id).unwrap_or_default();
        info!(score, elapsed = self.elapsed, falls = self.falls, "delivery completed");
        self.events
            .push(DeliveryEvent::DeliveryCompleted { door, score });

        self.start_new_delivery(player_position);
    }

    /// Score for the running delivery, never negative
    pub fn calculate_score(&self) -> f32 {
        let penalty =
            self.elapsed * self.config.time_penalty + self.falls as f32 * self.config.fall_penalty;
        (self.config.base_score + self.trick_score - penalty).max(0.0)
    }

    /// Route the player against every door trigger
    pub fn check_doors(&mut self, player_position: Vec2) {
        let mut reached_goal = false;
        for door in &mut self.doors {
            match door.track(player_position) {
                DoorContact::None => {}
                DoorContact::Goal => reached_goal = true,
                DoorContact::Other => debug!(door = %door.name, "not the goal door"),
            }
        }
        if reached_goal {
            self.complete_delivery(player_position);
        }
    }

    pub fn add_trick_score(&mut self, points: f32) {
        if self.delivering {
            self.trick_score += points;
            debug!(trick_score = self.trick_score, "trick points");
        }
    }

    pub fn register_fall(&mut self) {
        if self.delivering {
            self.falls += 1;
            debug!(falls = self.falls, "fall registered");
        }
    }

    /// Crashes count as falls, completed tricks score points
    pub fn handle_controller_event(&mut self, event: ControllerEvent) {
        match event {
            ControllerEvent::Crashed => self.register_fall(),
            ControllerEvent::TrickCompleted => self.add_trick_score(self.config.trick_points),
            _ => {}
        }
    }

    pub fn tick(&mut self, dt: f32) {
        if self.delivering {
            self.elapsed += dt;
        }
    }

    pub fn current_target(&self) -> Option<&Door> {
        self.current.and_then(|i| self.doors.get(i))
    }

    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn falls(&self) -> u32 {
        self.falls
    }

    pub fn trick_score(&self) -> f32 {
        self.trick_score
    }

    pub fn total_score(&self) -> f32 {
        self.total_score
    }

    pub fn completed(&self) -> u32 {
        self.completed
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> impl Iterator<Item = DeliveryEvent> + '_ {
        self.events.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doors() -> Vec<Door> {
        vec![
            Door::new("Home", Vec2::new(1.0, 0.0), Vec2::ONE),
            Door::new("Bakery", Vec2::new(20.0, 0.0), Vec2::ONE),
            Door::new("Library", Vec2::new(40.0, 0.0), Vec2::ONE),
        ]
    }

    fn manager() -> DeliveryManager {
        let config = DeliveryConfig {
            seed: Some(42),
            ..Default::default()
        };
        DeliveryManager::new(config, doors()).expect("valid delivery setup")
    }

    #[test]
    fn test_requires_doors() {
        assert!(DeliveryManager::new(DeliveryConfig::default(), Vec::new()).is_err());
    }

    #[test]
    fn test_new_delivery_skips_nearby_doors() {
        let mut deliveries = manager();
        for _ in 0..50 {
            deliveries.start_new_delivery(Vec2::ZERO);
            let target = deliveries.current_target().expect("target picked");
            assert_ne!(target.name, "Home");
            assert_eq!(deliveries.doors().iter().filter(|d| d.is_goal).count(), 1);
        }
    }

    #[test]
    fn test_new_order_event() {
        let mut deliveries = manager();
        deliveries.start_new_delivery(Vec2::ZERO);
        let events: Vec<_> = deliveries.drain_events().collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], DeliveryEvent::NewOrder { .. }));
    }

    #[test]
    fn test_falls_back_when_all_doors_are_close() {
        let config = DeliveryConfig {
            seed: Some(3),
            ..Default::default()
        };
        let close = vec![Door::new("Only", Vec2::new(0.5, 0.0), Vec2::ONE)];
        let mut deliveries = DeliveryManager::new(config, close).expect("valid setup");
        deliveries.start_new_delivery(Vec2::ZERO);
        assert_eq!(deliveries.current_target().map(|d| d.name.as_str()), Some("Only"));
    }

    #[test]
    fn test_score_formula() {
        let mut deliveries = manager();
        deliveries.start_new_delivery(Vec2::ZERO);
        deliveries.tick(10.0);
        deliveries.register_fall();
        deliveries.handle_controller_event(ControllerEvent::TrickCompleted);

        // 1000 + 100 - (10 * 10 + 1 * 50)
        assert_eq!(deliveries.calculate_score(), 950.0);
    }

    #[test]
    fn test_score_never_negative() {
        let mut deliveries = manager();
        deliveries.start_new_delivery(Vec2::ZERO);
        deliveries.tick(500.0);
        assert_eq!(deliveries.calculate_score(), 0.0);
    }

    #[test]
    fn test_goal_door_completes_delivery() {
        let mut deliveries = manager();
        deliveries.start_new_delivery(Vec2::ZERO);
        deliveries.drain_events().for_each(drop);
        deliveries.tick(2.0);

        let goal = deliveries.current_target().expect("target").position;
        deliveries.check_doors(goal);

        let events: Vec<_> = deliveries.drain_events().collect();
        assert!(matches!(
            events[0],
            DeliveryEvent::DeliveryCompleted { score, .. } if score == 980.0
        ));
        assert!(matches!(events[1], DeliveryEvent::NewOrder { .. }));
        assert_eq!(deliveries.completed(), 1);
        assert_eq!(deliveries.elapsed(), 0.0);
    }

    #[test]
    fn test_wrong_door_is_ignored() {
        let mut deliveries = manager();
        deliveries.start_new_delivery(Vec2::ZERO);
        deliveries.drain_events().for_each(drop);

        let home = Vec2::new(1.0, 0.0);
        deliveries.check_doors(home);
        assert_eq!(deliveries.drain_events().count(), 0);
        assert_eq!(deliveries.completed(), 0);
    }

    #[test]
    fn test_crash_registers_fall() {
        let mut deliveries = manager();
        deliveries.register_fall();
        assert_eq!(deliveries.falls(), 0);

        deliveries.start_new_delivery(Vec2::ZERO);
        deliveries.handle_controller_event(ControllerEvent::Crashed);
        deliveries.handle_controller_event(ControllerEvent::Jumped);
        assert_eq!(deliveries.falls(), 1);
    }
}
