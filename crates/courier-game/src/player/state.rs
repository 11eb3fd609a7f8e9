//! Top-level character state and the messages that drive it from outside

use glam::Vec2;

/// The character's top-level state. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharacterState {
    /// Regular riding
    #[default]
    Normal,
    /// A trick is running; full control remains, landing crashes
    Trick,
    /// Failed landing; input ignored until the crash timer runs out
    Crashed,
    /// Knocked back by an obstacle; input ignored until the stun runs out
    Knockback,
}

impl CharacterState {
    /// Whether input and the locomotion solvers are suspended
    pub fn is_stunned(self) -> bool {
        matches!(self, Self::Crashed | Self::Knockback)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Trick => "trick",
            Self::Crashed => "crashed",
            Self::Knockback => "knockback",
        }
    }
}

/// One-shot knockback request sent by an obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExternalImpulseRequest {
    /// Unit launch direction
    pub direction: Vec2,
    /// Launch speed
    pub magnitude: f32,
    /// Seconds of lost control
    pub stun_duration: f32,
}

impl ExternalImpulseRequest {
    /// Build a request, normalizing the direction
    pub fn new(direction: Vec2, magnitude: f32, stun_duration: f32) -> Self {
        Self {
            direction: direction.normalize_or_zero(),
            magnitude,
            stun_duration: stun_duration.max(0.0),
        }
    }
}

/// Things the controller reports to the rest of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerEvent {
    /// A jump fired
    Jumped,
    /// A rising jump was cut short
    JumpCut,
    /// Ground contact began
    Landed,
    /// A combo key was accepted; carries the new step
    ComboAdvanced(u8),
    /// The combo completed and a trick started
    TrickStarted,
    /// A trick ran its full duration without touching ground
    TrickCompleted,
    /// Landed during a trick
    Crashed,
    /// Hit by an external impulse
    KnockedBack,
    /// Control returned after a crash or knockback
    Recovered,
}
