//! Courier Core - Core types and utilities shared by every Courier crate
//!
//! This crate provides the foundational pieces used throughout the game:
//! - 2D math primitives (re-exported from glam) and angle helpers
//! - Countdown timers used by the controller, obstacles and HUD fades
//! - The fixed-timestep game clock
//! - Configuration errors

pub mod error;
pub mod math;
pub mod time;
pub mod timer;
pub mod types;

pub use error::ConfigError;
pub use glam::Vec2;
pub use time::{GameTime, TimeConfig};
pub use timer::Timer;
pub use types::{Aabb2, Color, EntityId};
