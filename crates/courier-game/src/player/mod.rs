//! Player controller module
//!
//! One configuration-driven skateboard controller. Optional behaviors (tricks,
//! dive, slope alignment and stick, air tilt, air steering, fall-to-speed)
//! are toggled through [`ControllerFeatures`].

mod combo;
mod config;
mod controller;
mod movement;
mod orientation;
mod state;
mod timers;
mod vertical;

pub use combo::{ComboContext, ComboKey, ComboOutcome, ComboStateMachine};
pub use config::{ControllerConfig, ControllerFeatures, JumpInputProfile};
pub use controller::PlayerController;
pub use movement::{DriveRate, MovementInput, MovementOutput, MovementSolver};
pub use orientation::{OrientationInput, OrientationOutput, OrientationStabilizer};
pub use state::{CharacterState, ControllerEvent, ExternalImpulseRequest};
pub use timers::{ExpiredTimers, PlayerTimer, TimerBank};
pub use vertical::VerticalSolver;
