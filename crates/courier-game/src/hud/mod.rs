//! Heads-up display state: delivery messages and the target arrow
//!
//! Holds what to show and how visible it is; drawing is left to the host.

mod arrow;
mod fade;
mod messages;

pub use arrow::{ArrowConfig, DirectionArrow};
pub use fade::{FadeConfig, FadeCycle, FadePhase};
pub use messages::{FadingMessage, MessageBoard};
