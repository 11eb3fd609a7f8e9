//! On-screen delivery messages

use tracing::debug;

use super::{FadeConfig, FadeCycle};
use crate::delivery::{DeliveryEvent, DeliveryObserver};

/// A line of text with its own fade cycle
#[derive(Debug, Clone, Default)]
pub struct FadingMessage {
    pub text: String,
    pub fade: FadeCycle,
}

impl FadingMessage {
    fn new(config: FadeConfig) -> Self {
        Self {
            text: String::new(),
            fade: FadeCycle::new(config),
        }
    }

    /// Replace the text and restart this message's cycle
    fn display(&mut self, text: String) {
        self.text = text;
        self.fade.show();
    }
}

/// The "delivery complete" and "new target" messages.
///
/// Showing one never interrupts the other.
#[derive(Debug, Clone)]
pub struct MessageBoard {
    pub delivery_complete: FadingMessage,
    pub new_target: FadingMessage,
    pub last_score: Option<f32>,
}

impl MessageBoard {
    pub fn new(config: FadeConfig) -> Self {
        Self {
            delivery_complete: FadingMessage::new(config.clone()),
            new_target: FadingMessage::new(config),
            last_score: None,
        }
    }

    pub fn show_delivery_complete(&mut self, score: f32) {
        self.last_score = Some(score);
        self.delivery_complete
            .display(format!("Delivery complete! +{score:.0}"));
    }

    pub fn show_new_target(&mut self, name: &str) {
        self.new_target.display(format!("New destination:\n{name}"));
    }

    pub fn tick(&mut self, dt: f32) {
        self.delivery_complete.fade.tick(dt);
        self.new_target.fade.tick(dt);
    }

    /// Messages currently on screen, with their alpha
    pub fn visible(&self) -> impl Iterator<Item = (&str, f32)> {
        [&self.delivery_complete, &self.new_target]
            .into_iter()
            .filter(|m| m.fade.is_visible())
            .map(|m| (m.text.as_str(), m.fade.alpha()))
    }
}

impl Default for MessageBoard {
    fn default() -> Self {
        Self::new(FadeConfig::default())
    }
}

impl DeliveryObserver for MessageBoard {
    fn on_delivery_event(&mut self, event: &DeliveryEvent) {
        match event {
            DeliveryEvent::NewOrder { name, .. } => self.show_new_target(name),
            DeliveryEvent::DeliveryCompleted { score, .. } => self.show_delivery_complete(*score),
        }
        debug!(?event, "message board updated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hud::FadePhase;
    use courier_core::EntityId;
    use glam::Vec2;

    #[test]
    fn test_messages_fade_independently() {
        let mut board = MessageBoard::default();
        board.show_delivery_complete(950.0);
        board.tick(1.0);
        assert_eq!(board.delivery_complete.fade.phase(), FadePhase::Holding);

        board.show_new_target("Bakery");
        assert_eq!(board.delivery_complete.fade.phase(), FadePhase::Holding);
        assert_eq!(board.new_target.fade.phase(), FadePhase::FadingIn);
        assert!(board.new_target.text.contains("Bakery"));
    }

    #[test]
    fn test_observer_routes_events() {
        let mut board = MessageBoard::default();
        board.on_delivery_event(&DeliveryEvent::NewOrder {
            door: EntityId::new(),
            name: "Library".to_string(),
            position: Vec2::ZERO,
        });
        board.on_delivery_event(&DeliveryEvent::DeliveryCompleted {
            door: EntityId::new(),
            score: 700.0,
        });

        assert_eq!(board.last_score, Some(700.0));
        board.tick(0.25);
        assert_eq!(board.visible().count(), 2);
    }
}
