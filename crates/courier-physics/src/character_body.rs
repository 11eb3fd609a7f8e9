//! Kinematic character body using rapier2d's kinematic character controller

use glam::Vec2;
use rapier2d::control::{CharacterLength, KinematicCharacterController};
use rapier2d::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{layers, GroundProbe, PhysicsWorld};

/// Contacts recorded per move; later ones in the same move are dropped
const MAX_CONTACTS: usize = 4;

/// Character body configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterBodyConfig {
    /// Half height of the capsule's straight section (default: 0.25)
    pub half_height: f32,
    /// Capsule radius (default: 0.25)
    pub radius: f32,
    /// Maximum slope angle in degrees the mover will climb (default: 80)
    pub max_slope_angle: f32,
    /// Skin width for collision detection (default: 0.02)
    pub skin_width: f32,
    /// Whether to snap to ground when riding down slopes
    pub snap_to_ground: bool,
    /// Maximum ground snap distance
    pub ground_snap_distance: f32,
}

impl Default for CharacterBodyConfig {
    fn default() -> Self {
        Self {
            half_height: 0.25,
            radius: 0.25,
            max_slope_angle: 80.0,
            skin_width: 0.02,
            snap_to_ground: true,
            ground_snap_distance: 0.2,
        }
    }
}

/// The character's motion state, owned by its controller
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionSample {
    /// World position of the body origin
    pub position: Vec2,
    /// Linear velocity
    pub velocity: Vec2,
    /// Rotation in degrees, counter-clockwise
    pub rotation: f32,
    /// Angular velocity in degrees per second
    pub angular_velocity: f32,
    /// Grounded flag from the latest probe
    pub grounded: bool,
    /// Last surface normal the sensor reported
    pub contact_normal: Option<Vec2>,
    /// First surface the latest move ran into, if any
    pub impact: Option<SurfaceImpact>,
}

/// A surface hit during a move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceImpact {
    /// Velocity before the hit
    pub velocity: Vec2,
    /// Surface normal, pointing away from the surface
    pub normal: Vec2,
}

impl MotionSample {
    /// Record a ground probe. The contact normal is kept across probes that
    /// miss it.
    pub fn apply_probe(&mut self, probe: &GroundProbe) {
        self.grounded = probe.grounded;
        if let Some(normal) = probe.normal {
            self.contact_normal = Some(normal);
        }
    }
}

/// Kinematic body moved with collision against level geometry
pub struct CharacterBody {
    /// Configuration
    pub config: CharacterBodyConfig,
    /// Motion state
    pub motion: MotionSample,
    /// The collider handle for this character, once spawned
    pub collider_handle: Option<ColliderHandle>,
    /// Rapier's kinematic character controller
    controller: KinematicCharacterController,
}

impl CharacterBody {
    /// Create a new character body with default config
    pub fn new() -> Self {
        Self::with_config(CharacterBodyConfig::default())
    }

    /// Create a new character body with custom config
    pub fn with_config(config: CharacterBodyConfig) -> Self {
        let mut controller = KinematicCharacterController::default();
        controller.max_slope_climb_angle = config.max_slope_angle.to_radians();
        // Frictionless board: any slope slides
        controller.min_slope_slide_angle = 0.0;
        controller.autostep = None;
        controller.snap_to_ground = if config.snap_to_ground {
            Some(CharacterLength::Absolute(config.ground_snap_distance))
        } else {
            None
        };
        controller.offset = CharacterLength::Absolute(config.skin_width);

        Self {
            config,
            motion: MotionSample::default(),
            collider_handle: None,
            controller,
        }
    }

    /// Spawn the character in the physics world
    pub fn spawn(&mut self, physics: &mut PhysicsWorld, position: Vec2) -> ColliderHandle {
        self.motion = MotionSample {
            position,
            ..Default::default()
        };

        let collider = ColliderBuilder::capsule_y(self.config.half_height.max(0.01), self.config.radius)
            .translation(vector![position.x, position.y])
            .collision_groups(InteractionGroups::new(
                Group::from_bits_truncate(layers::PLAYER),
                Group::from_bits_truncate(layers::GROUND),
            ))
            .friction(0.0)
            .restitution(0.0)
            .build();

        let handle = physics.add_static_collider(collider);
        self.collider_handle = Some(handle);
        debug!(?position, "character body spawned");
        handle
    }

    /// Integrate one physics tick: gravity, rotation, then a collision-corrected
    /// move. Each surface hit removes the part of the velocity that points
    /// into it, so gravity keeps pulling the body along slopes and riding
    /// into a ramp turns speed along its surface.
    pub fn integrate(&mut self, physics: &mut PhysicsWorld, gravity_scale: f32, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        self.motion.velocity += physics.config.gravity * gravity_scale * dt;
        self.motion.rotation += self.motion.angular_velocity * dt;
        self.motion.impact = None;
        let desired = self.motion.velocity * dt;

        let Some(collider_handle) = self.collider_handle else {
            self.motion.position += desired;
            return;
        };

        let Some(collider) = physics.collider_set.get(collider_handle) else {
            return;
        };

        let shape = collider.shape();
        let current_pos = Isometry::new(
            vector![self.motion.position.x, self.motion.position.y],
            self.motion.rotation.to_radians(),
        );
        let filter = QueryFilter::default()
            .exclude_collider(collider_handle)
            .groups(InteractionGroups::new(
                Group::ALL,
                Group::from_bits_truncate(layers::GROUND),
            ));

        let mut normals = [Vec2::ZERO; MAX_CONTACTS];
        let mut contacts = 0;
        let movement = self.controller.move_shape(
            dt,
            &physics.rigid_body_set,
            &physics.collider_set,
            physics.query_pipeline(),
            shape,
            &current_pos,
            vector![desired.x, desired.y],
            filter,
            |collision| {
                if contacts < MAX_CONTACTS {
                    let normal = collision.hit.normal1;
                    normals[contacts] = Vec2::new(normal.x, normal.y);
                    contacts += 1;
                }
            },
        );

        self.motion.position += Vec2::new(movement.translation.x, movement.translation.y);
        for &normal in &normals[..contacts] {
            self.resolve_contact(normal);
        }

        physics.set_collider_pose(collider_handle, self.motion.position, self.motion.rotation);
    }

    /// Drop the velocity component going into a surface. The first surface
    /// actually pushed against is recorded as this move's impact.
    fn resolve_contact(&mut self, normal: Vec2) {
        let normal = normal.normalize_or_zero();
        let into = self.motion.velocity.dot(normal);
        if into >= 0.0 {
            return;
        }
        if self.motion.impact.is_none() {
            self.motion.impact = Some(SurfaceImpact {
                velocity: self.motion.velocity,
                normal,
            });
        }
        self.motion.velocity -= normal * into;
    }

    /// Set the character's position directly (teleport)
    pub fn set_position(&mut self, physics: &mut PhysicsWorld, position: Vec2) {
        self.motion.position = position;

        if let Some(handle) = self.collider_handle {
            physics.set_collider_pose(handle, position, self.motion.rotation);
        }
    }

    /// Get the character's position
    pub fn position(&self) -> Vec2 {
        self.motion.position
    }

    /// Set the character's velocity directly
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.motion.velocity = velocity;
    }
}

impl Default for CharacterBody {
    fn default() -> Self {
        Self::new()
    }
}
