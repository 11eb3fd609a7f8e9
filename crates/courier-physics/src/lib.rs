//! Courier Physics - 2D collision queries using rapier2d
//!
//! Holds the static level geometry, answers the ray and overlap queries the
//! ground sensor needs, and moves the kinematic character body with collision.

mod character_body;
mod ground_sensor;

pub use character_body::{CharacterBody, CharacterBodyConfig, MotionSample, SurfaceImpact};
pub use ground_sensor::{GroundProbe, GroundSensor, GroundSensorConfig};

use glam::Vec2;
use nalgebra::Unit;
use rapier2d::parry::shape::Cuboid;
use rapier2d::prelude::*;

/// Collision layer bits used for memberships and query masks
pub mod layers {
    /// Walkable level geometry
    pub const GROUND: u32 = 1 << 0;
    /// Player characters
    pub const PLAYER: u32 = 1 << 1;
    /// Doors, bumpers and other trigger volumes
    pub const TRIGGER: u32 = 1 << 2;
}

/// Physics world configuration
#[derive(Debug, Clone)]
pub struct PhysicsConfig {
    /// Gravity vector (default: -9.81 on Y axis)
    pub gravity: Vec2,
    /// Physics timestep (default: 1/60)
    pub timestep: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.81),
            timestep: 1.0 / 60.0,
        }
    }
}

/// A ray or shape-cast hit against level geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Distance along the ray to the hit point
    pub distance: f32,
    /// World-space hit point
    pub point: Vec2,
    /// Surface normal at hit point
    pub normal: Vec2,
}

/// The queries a ground sensor needs from the world.
///
/// Implemented by [`PhysicsWorld`]; tests substitute scripted surfaces.
pub trait SurfaceQuery {
    /// Whether an axis-aligned box overlaps any collider in `mask`
    fn overlap_box(&self, center: Vec2, half_extents: Vec2, mask: u32) -> bool;

    /// First hit of a ray against colliders in `mask`
    fn cast_ray(&self, origin: Vec2, direction: Vec2, max_distance: f32, mask: u32)
        -> Option<SurfaceHit>;
}

fn mask_filter(mask: u32) -> QueryFilter<'static> {
    QueryFilter::default().groups(InteractionGroups::new(
        Group::ALL,
        Group::from_bits_truncate(mask),
    ))
}

/// Static level geometry plus the query pipeline over it
pub struct PhysicsWorld {
    /// Configuration
    pub config: PhysicsConfig,

    /// Rigid body storage (level geometry is parentless, so this stays empty)
    pub rigid_body_set: RigidBodySet,
    /// Collider storage
    pub collider_set: ColliderSet,

    /// Query pipeline for raycasts and shape casts
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            config,
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Query pipeline, for the character mover
    pub(crate) fn query_pipeline(&self) -> &QueryPipeline {
        &self.query_pipeline
    }

    /// Rebuild the query acceleration structure after colliders changed
    pub fn refresh_queries(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Add a static collider (ground, ramps, walls)
    pub fn add_static_collider(&mut self, collider: Collider) -> ColliderHandle {
        let handle = self.collider_set.insert(collider);
        self.refresh_queries();
        handle
    }

    /// Move a parentless collider
    pub fn set_collider_pose(&mut self, handle: ColliderHandle, position: Vec2, rotation_deg: f32) {
        if let Some(collider) = self.collider_set.get_mut(handle) {
            collider.set_position(Isometry::new(
                vector![position.x, position.y],
                rotation_deg.to_radians(),
            ));
        }
    }

    /// Cast a ray and get detailed hit information
    pub fn raycast_detailed(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Option<(ColliderHandle, SurfaceHit)> {
        let direction = direction.normalize_or_zero();
        if direction == Vec2::ZERO {
            return None;
        }
        let ray = Ray::new(point![origin.x, origin.y], vector![direction.x, direction.y]);

        self.query_pipeline
            .cast_ray_and_get_normal(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                filter,
            )
            .map(|(handle, intersection)| {
                let distance = intersection.time_of_impact;
                (
                    handle,
                    SurfaceHit {
                        distance,
                        point: origin + direction * distance,
                        normal: Vec2::new(intersection.normal.x, intersection.normal.y),
                    },
                )
            })
    }

    /// Create an infinite flat ground at height `y`
    pub fn create_ground(&mut self, y: f32) -> ColliderHandle {
        let normal = Unit::new_normalize(vector![0.0, 1.0]);
        let ground = ColliderBuilder::halfspace(normal)
            .translation(vector![0.0, y])
            .collision_groups(Self::ground_groups())
            .friction(0.0)
            .restitution(0.0)
            .build();
        self.add_static_collider(ground)
    }

    /// Create a straight ramp (or floor piece) between two points
    pub fn create_ramp(&mut self, start: Vec2, end: Vec2) -> ColliderHandle {
        let collider = ColliderBuilder::segment(point![start.x, start.y], point![end.x, end.y])
            .collision_groups(Self::ground_groups())
            .friction(0.0)
            .build();
        self.add_static_collider(collider)
    }

    /// Create a continuous surface through the given points (bowls, hills)
    pub fn create_polyline(&mut self, points: &[Vec2]) -> ColliderHandle {
        let vertices = points.iter().map(|p| point![p.x, p.y]).collect();
        let collider = ColliderBuilder::polyline(vertices, None)
            .collision_groups(Self::ground_groups())
            .friction(0.0)
            .build();
        self.add_static_collider(collider)
    }

    /// Create a static box collider
    pub fn create_static_box(&mut self, half_extents: Vec2, position: Vec2) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y)
            .translation(vector![position.x, position.y])
            .collision_groups(Self::ground_groups())
            .friction(0.0)
            .build();
        self.add_static_collider(collider)
    }

    fn ground_groups() -> InteractionGroups {
        InteractionGroups::new(Group::from_bits_truncate(layers::GROUND), Group::ALL)
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceQuery for PhysicsWorld {
    fn overlap_box(&self, center: Vec2, half_extents: Vec2, mask: u32) -> bool {
        let shape = Cuboid::new(vector![half_extents.x, half_extents.y]);
        let pose = Isometry::translation(center.x, center.y);
        self.query_pipeline
            .intersection_with_shape(
                &self.rigid_body_set,
                &self.collider_set,
                &pose,
                &shape,
                mask_filter(mask),
            )
            .is_some()
    }

    fn cast_ray(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: u32,
    ) -> Option<SurfaceHit> {
        self.raycast_detailed(origin, direction, max_distance, mask_filter(mask))
            .map(|(_, hit)| hit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physics_world_creation() {
        let world = PhysicsWorld::new();
        assert_eq!(world.config.gravity, Vec2::new(0.0, -9.81));
    }

    #[test]
    fn test_ground_creation() {
        let mut world = PhysicsWorld::new();
        let ground = world.create_ground(0.0);
        assert!(world.collider_set.get(ground).is_some());
    }

    #[test]
    fn test_raycast_hits_ground() {
        let mut world = PhysicsWorld::new();
        world.create_ground(0.0);

        let hit = world.cast_ray(Vec2::new(0.0, 10.0), Vec2::NEG_Y, 100.0, layers::GROUND);
        let hit = hit.expect("ray should hit the ground");
        assert!((hit.distance - 10.0).abs() < 1e-3);
        assert!((hit.normal - Vec2::Y).length() < 1e-3);
    }

    #[test]
    fn test_mask_excludes_other_layers() {
        let mut world = PhysicsWorld::new();
        world.create_ground(0.0);

        let hit = world.cast_ray(Vec2::new(0.0, 10.0), Vec2::NEG_Y, 100.0, layers::TRIGGER);
        assert!(hit.is_none());
    }

    #[test]
    fn test_overlap_box() {
        let mut world = PhysicsWorld::new();
        world.create_static_box(Vec2::new(5.0, 0.5), Vec2::ZERO);

        assert!(world.overlap_box(Vec2::new(0.0, 0.55), Vec2::new(0.25, 0.1), layers::GROUND));
        assert!(!world.overlap_box(Vec2::new(0.0, 2.0), Vec2::new(0.25, 0.1), layers::GROUND));
    }
}
