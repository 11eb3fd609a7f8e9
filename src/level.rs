//! Level layout: ground geometry, doors, bumpers and the spawn point

use courier_game::{BarrelBumper, BumperConfig, Door};
use courier_physics::PhysicsWorld;
use glam::Vec2;
use tracing::info;

/// Size of every door trigger
const DOOR_SIZE: Vec2 = Vec2::new(1.5, 2.5);

/// A static piece of level geometry
#[derive(Debug, Clone)]
pub enum Terrain {
    /// Infinite flat floor at a height
    Ground { y: f32 },
    /// Straight segment
    Ramp { start: Vec2, end: Vec2 },
    /// Connected segments
    Hill { points: Vec<Vec2> },
    /// Solid block
    Block { center: Vec2, half_extents: Vec2 },
}

#[derive(Debug, Clone)]
pub struct Level {
    pub name: String,
    pub spawn: Vec2,
    pub terrain: Vec<Terrain>,
    /// Door names and positions
    pub doors: Vec<(String, Vec2)>,
    pub bumpers: Vec<Vec2>,
}

impl Level {
    /// A short street with a kicker ramp, a hill and a barrel
    pub fn demo() -> Self {
        Self {
            name: "Harbor Street".to_string(),
            spawn: Vec2::new(0.0, 1.0),
            terrain: vec![
                Terrain::Ground { y: 0.0 },
                Terrain::Ramp {
                    start: Vec2::new(8.0, 0.0),
                    end: Vec2::new(13.0, 2.0),
                },
                Terrain::Hill {
                    points: vec![
                        Vec2::new(30.0, 0.0),
                        Vec2::new(36.0, 3.0),
                        Vec2::new(42.0, 3.5),
                        Vec2::new(50.0, 0.0),
                    ],
                },
                Terrain::Block {
                    center: Vec2::new(-12.0, 2.0),
                    half_extents: Vec2::new(0.5, 2.0),
                },
            ],
            doors: vec![
                ("Corner Shop".to_string(), Vec2::new(-6.0, 1.25)),
                ("Bakery".to_string(), Vec2::new(22.0, 1.25)),
                ("Library".to_string(), Vec2::new(58.0, 1.25)),
                ("Harbor Office".to_string(), Vec2::new(75.0, 1.25)),
            ],
            bumpers: vec![Vec2::new(26.0, 0.75)],
        }
    }

    /// Add the level geometry to a physics world
    pub fn build_terrain(&self, physics: &mut PhysicsWorld) {
        for piece in &self.terrain {
            match piece {
                Terrain::Ground { y } => {
                    physics.create_ground(*y);
                }
                Terrain::Ramp { start, end } => {
                    physics.create_ramp(*start, *end);
                }
                Terrain::Hill { points } => {
                    physics.create_polyline(points);
                }
                Terrain::Block {
                    center,
                    half_extents,
                } => {
                    physics.create_static_box(*half_extents, *center);
                }
            }
        }
        info!(
            level = %self.name,
            pieces = self.terrain.len(),
            doors = self.doors.len(),
            bumpers = self.bumpers.len(),
            "level built"
        );
    }

    pub fn create_doors(&self) -> Vec<Door> {
        self.doors
            .iter()
            .map(|(name, position)| Door::new(name.clone(), *position, DOOR_SIZE))
            .collect()
    }

    pub fn create_bumpers(&self, config: &BumperConfig) -> Vec<BarrelBumper> {
        self.bumpers
            .iter()
            .map(|position| BarrelBumper::new(*position, config.clone()))
            .collect()
    }
}
