//! Animation clip selection and sprite cues
//!
//! Reads the controller's state flags once per presentation frame. Nothing
//! here feeds back into the simulation.

use courier_core::Color;
use serde::{Deserialize, Serialize};

use crate::player::CharacterState;

/// Intent magnitude that counts as "moving" for clip choice and facing
const MOVE_THRESHOLD: f32 = 0.1;

/// Discrete flags the presentation layer polls from the controller
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PresentationFlags {
    pub grounded: bool,
    pub crashed: bool,
    pub doing_trick: bool,
    pub horizontal_intent: f32,
}

/// Clips the player sprite can play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationClip {
    Idle,
    Run,
    Jump,
    Trick,
    Crash,
}

impl AnimationClip {
    /// Highest-priority clip for a set of flags:
    /// crashed, then trick, then airborne, then moving, then idle
    pub fn for_flags(flags: &PresentationFlags) -> Self {
        if flags.crashed {
            Self::Crash
        } else if flags.doing_trick {
            Self::Trick
        } else if !flags.grounded {
            Self::Jump
        } else if flags.horizontal_intent.abs() > MOVE_THRESHOLD {
            Self::Run
        } else {
            Self::Idle
        }
    }

    /// Clip name as authored in the sprite sheet
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Run => "Run",
            Self::Jump => "Jump",
            Self::Trick => "Trick",
            Self::Crash => "Crash",
        }
    }
}

/// Picks the clip to play and which way the sprite faces
#[derive(Debug, Clone)]
pub struct AnimationSelector {
    current: Option<AnimationClip>,
    facing_right: bool,
    /// Mirror the facing for sprites drawn facing left
    pub invert_flip: bool,
}

impl Default for AnimationSelector {
    fn default() -> Self {
        Self {
            current: None,
            facing_right: true,
            invert_flip: false,
        }
    }
}

impl AnimationSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update from this frame's flags. Returns the clip to start playing when
    /// it changed, `None` otherwise.
    pub fn update(&mut self, flags: &PresentationFlags) -> Option<AnimationClip> {
        if flags.grounded && flags.horizontal_intent.abs() > MOVE_THRESHOLD {
            self.facing_right = flags.horizontal_intent > 0.0;
        }

        let clip = AnimationClip::for_flags(flags);
        if self.current == Some(clip) {
            return None;
        }
        self.current = Some(clip);
        Some(clip)
    }

    pub fn current(&self) -> Option<AnimationClip> {
        self.current
    }

    pub fn facing_right(&self) -> bool {
        self.facing_right
    }

    /// Horizontal sprite scale: 1 facing right, -1 facing left
    pub fn facing_scale(&self) -> f32 {
        let scale = if self.facing_right { 1.0 } else { -1.0 };
        if self.invert_flip {
            -scale
        } else {
            scale
        }
    }
}

/// Sprite tint for a character state: red mid-trick, green while crashed
pub fn sprite_tint(state: CharacterState, base: Color) -> Color {
    match state {
        CharacterState::Trick => Color::RED,
        CharacterState::Crashed => Color::GREEN,
        CharacterState::Normal | CharacterState::Knockback => base,
    }
}
