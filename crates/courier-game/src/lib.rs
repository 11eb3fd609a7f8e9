//! Courier Game - Game logic and systems
//!
//! Provides the skateboard player controller, input mapping, the barrel
//! bumper obstacle, the delivery loop and presentation state (animation
//! clips, HUD messages, the target arrow).

pub mod animation;
pub mod bumper;
pub mod delivery;
pub mod hud;
pub mod input;
pub mod player;

pub use animation::{sprite_tint, AnimationClip, AnimationSelector, PresentationFlags};
pub use bumper::{BarrelBumper, BumperConfig};
pub use delivery::{DeliveryConfig, DeliveryEvent, DeliveryManager, DeliveryObserver, Door};
pub use hud::{ArrowConfig, DirectionArrow, FadeConfig, FadeCycle, FadePhase, MessageBoard};
pub use input::{InputAction, InputBindings, InputHandler, InputState};
pub use player::{
    CharacterState, ControllerConfig, ControllerEvent, ControllerFeatures, ExternalImpulseRequest,
    JumpInputProfile, PlayerController,
};
