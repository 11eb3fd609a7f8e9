//! Scripted key and mouse input for headless runs

use glam::Vec2;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};

use courier_game::InputHandler;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScriptAction {
    Key(KeyCode, ElementState),
    Mouse(MouseButton, ElementState),
    /// Pointer moved, in world space
    Pointer(Vec2),
}

#[derive(Debug, Clone, Copy)]
pub struct ScriptEvent {
    /// Seconds since the run started
    pub at: f32,
    pub action: ScriptAction,
}

/// A time-ordered list of input events replayed into an [`InputHandler`]
#[derive(Debug, Clone, Default)]
pub struct InputScript {
    events: Vec<ScriptEvent>,
    cursor: usize,
}

impl InputScript {
    pub fn new(mut events: Vec<ScriptEvent>) -> Self {
        events.sort_by(|a, b| a.at.total_cmp(&b.at));
        Self { events, cursor: 0 }
    }

    /// Press at `at`, release after `hold`
    fn tap(events: &mut Vec<ScriptEvent>, key: KeyCode, at: f32, hold: f32) {
        events.push(ScriptEvent {
            at,
            action: ScriptAction::Key(key, ElementState::Pressed),
        });
        events.push(ScriptEvent {
            at: at + hold,
            action: ScriptAction::Key(key, ElementState::Released),
        });
    }

    /// Hold the aim button toward `target` for `hold` seconds
    fn aim(events: &mut Vec<ScriptEvent>, target: Vec2, at: f32, hold: f32) {
        events.push(ScriptEvent {
            at,
            action: ScriptAction::Pointer(target),
        });
        events.push(ScriptEvent {
            at,
            action: ScriptAction::Mouse(MouseButton::Right, ElementState::Pressed),
        });
        events.push(ScriptEvent {
            at: at + hold,
            action: ScriptAction::Mouse(MouseButton::Right, ElementState::Released),
        });
    }

    /// Ride right, ollie off the kicker, try a trick, then keep riding
    pub fn demo() -> Self {
        let mut events = Vec::new();
        Self::tap(&mut events, KeyCode::KeyD, 0.0, 9.0);
        Self::tap(&mut events, KeyCode::AltLeft, 0.5, 0.1);

        // Sequence jump near the kicker, released early for a short hop
        Self::tap(&mut events, KeyCode::KeyS, 1.40, 0.05);
        Self::tap(&mut events, KeyCode::KeyW, 1.50, 0.15);

        // Air combo
        Self::tap(&mut events, KeyCode::KeyQ, 1.70, 0.05);
        Self::tap(&mut events, KeyCode::KeyE, 1.85, 0.05);
        Self::tap(&mut events, KeyCode::Space, 2.00, 0.05);

        // Second jump, held
        Self::tap(&mut events, KeyCode::KeyS, 5.00, 0.05);
        Self::tap(&mut events, KeyCode::KeyW, 5.10, 0.40);

        // Aim up and ahead while airborne, only felt with aim rotation on
        Self::aim(&mut events, Vec2::new(60.0, 20.0), 5.30, 0.30);

        Self::tap(&mut events, KeyCode::AltLeft, 6.0, 0.1);
        Self::new(events)
    }

    /// Feed every event due by `time`
    pub fn apply(&mut self, time: f32, input: &mut InputHandler) {
        while let Some(event) = self.events.get(self.cursor) {
            if event.at > time {
                break;
            }
            match event.action {
                ScriptAction::Key(key, state) => input.handle_keyboard(PhysicalKey::Code(key), state),
                ScriptAction::Mouse(button, state) => input.handle_mouse_button(button, state),
                ScriptAction::Pointer(position) => input.handle_pointer(position),
            }
            self.cursor += 1;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.events.len()
    }

    /// Time of the last scripted event
    pub fn duration(&self) -> f32 {
        self.events.last().map_or(0.0, |e| e.at)
    }
}
