//! Input system with action-based mapping
//!
//! Raw key events are mapped to [`InputAction`]s once per frame. The
//! controller reads the resulting [`InputState`]; it never sees key codes.

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use winit::event::{ElementState, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Game actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    /// Push left (A by default)
    MoveLeft,
    /// Push right (D by default)
    MoveRight,
    /// Up (W by default); second half of the sequence jump, release cuts a jump
    Up,
    /// Down (S by default); first half of the sequence jump
    Down,
    /// Direct jump button (K by default), honored by the button profiles
    Jump,
    /// First combo key (Q by default)
    TrickFirst,
    /// Second combo key (E by default)
    TrickSecond,
    /// Combo finisher (Space by default)
    TrickFinish,
    /// Tilt counter-clockwise in the air (Z by default)
    TiltLeft,
    /// Tilt clockwise in the air (C by default)
    TiltRight,
    /// Show the direction arrow (Alt by default)
    ShowArrow,
    /// Pause/unpause (Escape by default)
    Pause,
    /// Turn the board toward the pointer (right mouse button)
    Aim,
}

/// Current state of all inputs for a frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Actions currently held down
    pub held: HashSet<InputAction>,
    /// Actions that were just pressed this frame
    pub just_pressed: HashSet<InputAction>,
    /// Actions that were just released this frame
    pub just_released: HashSet<InputAction>,
    /// Pointer position in world space, once known
    pub pointer: Option<Vec2>,
}

impl InputState {
    /// Create a new empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an action is currently held
    pub fn is_held(&self, action: InputAction) -> bool {
        self.held.contains(&action)
    }

    /// Check if an action was just pressed this frame
    pub fn is_just_pressed(&self, action: InputAction) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Check if an action was just released this frame
    pub fn is_just_released(&self, action: InputAction) -> bool {
        self.just_released.contains(&action)
    }

    /// Record a press. Repeats while held do not count as new presses.
    pub fn press(&mut self, action: InputAction) {
        if !self.held.contains(&action) {
            self.just_pressed.insert(action);
        }
        self.held.insert(action);
    }

    /// Record a release
    pub fn release(&mut self, action: InputAction) {
        if self.held.remove(&action) {
            self.just_released.insert(action);
        }
    }

    /// Horizontal axis from the held move keys, in {-1, 0, 1}
    pub fn horizontal_axis(&self) -> f32 {
        let mut axis = 0.0;
        if self.is_held(InputAction::MoveLeft) {
            axis -= 1.0;
        }
        if self.is_held(InputAction::MoveRight) {
            axis += 1.0;
        }
        axis
    }

    /// Clear frame-specific data (call at end of frame)
    pub fn clear_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }

    /// Clear all input state
    pub fn clear_all(&mut self) {
        self.held.clear();
        self.pointer = None;
        self.clear_frame();
    }

    /// World-space aim point while aim is held
    pub fn aim_target(&self) -> Option<Vec2> {
        self.pointer.filter(|_| self.is_held(InputAction::Aim))
    }
}

/// Maps physical keys to game actions
#[derive(Debug, Clone)]
pub struct InputBindings {
    /// Key to action mappings
    bindings: HashMap<KeyCode, InputAction>,
}

impl Default for InputBindings {
    fn default() -> Self {
        let mut bindings = Self {
            bindings: HashMap::new(),
        };

        bindings.bind(KeyCode::KeyA, InputAction::MoveLeft);
        bindings.bind(KeyCode::KeyD, InputAction::MoveRight);
        bindings.bind(KeyCode::KeyW, InputAction::Up);
        bindings.bind(KeyCode::KeyS, InputAction::Down);

        // Arrow keys as alternative
        bindings.bind(KeyCode::ArrowLeft, InputAction::MoveLeft);
        bindings.bind(KeyCode::ArrowRight, InputAction::MoveRight);
        bindings.bind(KeyCode::ArrowUp, InputAction::Up);
        bindings.bind(KeyCode::ArrowDown, InputAction::Down);

        bindings.bind(KeyCode::KeyK, InputAction::Jump);

        // Air combo
        bindings.bind(KeyCode::KeyQ, InputAction::TrickFirst);
        bindings.bind(KeyCode::KeyE, InputAction::TrickSecond);
        bindings.bind(KeyCode::Space, InputAction::TrickFinish);

        bindings.bind(KeyCode::KeyZ, InputAction::TiltLeft);
        bindings.bind(KeyCode::KeyC, InputAction::TiltRight);

        bindings.bind(KeyCode::AltLeft, InputAction::ShowArrow);
        bindings.bind(KeyCode::AltRight, InputAction::ShowArrow);
        bindings.bind(KeyCode::Escape, InputAction::Pause);

        bindings
    }
}

impl InputBindings {
    /// Create new input bindings with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a key to an action, replacing any previous binding of that key
    pub fn bind(&mut self, key: KeyCode, action: InputAction) {
        self.bindings.insert(key, action);
    }

    /// Get the action for a key, if any
    pub fn get_key_action(&self, key: KeyCode) -> Option<InputAction> {
        self.bindings.get(&key).copied()
    }
}

/// Input handler that processes raw events and updates state
#[derive(Debug, Default)]
pub struct InputHandler {
    /// Current input state
    pub state: InputState,
    /// Input bindings
    pub bindings: InputBindings,
}

impl InputHandler {
    /// Create a new input handler with default bindings
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a keyboard event
    pub fn handle_keyboard(&mut self, physical_key: PhysicalKey, element_state: ElementState) {
        if let PhysicalKey::Code(key_code) = physical_key {
            if let Some(action) = self.bindings.get_key_action(key_code) {
                match element_state {
                    ElementState::Pressed => self.state.press(action),
                    ElementState::Released => self.state.release(action),
                }
            }
        }
    }

    /// Handle a mouse button event. Only the right button is mapped.
    pub fn handle_mouse_button(&mut self, button: MouseButton, element_state: ElementState) {
        if button != MouseButton::Right {
            return;
        }
        match element_state {
            ElementState::Pressed => self.state.press(InputAction::Aim),
            ElementState::Released => self.state.release(InputAction::Aim),
        }
    }

    /// Record the pointer, already converted to world space
    pub fn handle_pointer(&mut self, world_position: Vec2) {
        self.state.pointer = Some(world_position);
    }

    /// Clear frame-specific input data
    pub fn end_frame(&mut self) {
        self.state.clear_frame();
    }
}
