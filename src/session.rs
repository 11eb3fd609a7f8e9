//! Game session: owns every system and wires them together each frame
//!
//! Frame order: input sampling, fixed physics ticks, controller events into
//! the delivery loop, delivery events out to the HUD, then presentation.

use courier_core::{Color, ConfigError, GameTime};
use courier_game::{
    sprite_tint, AnimationClip, AnimationSelector, BarrelBumper, ControllerEvent, DeliveryManager,
    DeliveryObserver, DirectionArrow, InputAction, InputHandler, MessageBoard, PlayerController,
};
use courier_physics::PhysicsWorld;
use glam::Vec2;
use tracing::{debug, info};

use crate::level::Level;
use crate::settings::GameSettings;

/// Counters reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    pub frames: u64,
    pub ticks: u64,
    pub jumps: u32,
    pub tricks: u32,
    pub crashes: u32,
    pub knockbacks: u32,
    pub deliveries: u32,
    pub score: f32,
}

pub struct Session {
    time: GameTime,
    physics: PhysicsWorld,
    input: InputHandler,
    player: PlayerController,
    bumpers: Vec<BarrelBumper>,
    deliveries: DeliveryManager,
    messages: MessageBoard,
    arrow: DirectionArrow,
    animator: AnimationSelector,
    base_tint: Color,
    tint: Color,
    stats: SessionStats,
}

impl Session {
    /// Build the world from validated settings and start the first order
    pub fn new(settings: &GameSettings, level: &Level) -> Result<Self, ConfigError> {
        settings.validate()?;

        let mut physics = PhysicsWorld::new();
        level.build_terrain(&mut physics);

        let mut player = PlayerController::new(settings.controller.clone())?;
        player.spawn(&mut physics, level.spawn);

        let mut deliveries = DeliveryManager::new(settings.delivery.clone(), level.create_doors())?;
        deliveries.start_new_delivery(level.spawn);

        let mut session = Self {
            time: GameTime::new(settings.time.clone()),
            physics,
            input: InputHandler::new(),
            player,
            bumpers: level.create_bumpers(&settings.bumper),
            deliveries,
            messages: MessageBoard::new(settings.messages.clone()),
            arrow: DirectionArrow::new(settings.arrow.clone()),
            animator: AnimationSelector::new(),
            base_tint: Color::WHITE,
            tint: Color::WHITE,
            stats: SessionStats::default(),
        };
        session.dispatch_delivery_events();
        Ok(session)
    }

    pub fn input_mut(&mut self) -> &mut InputHandler {
        &mut self.input
    }

    /// Run one frame of `raw_dt` seconds
    pub fn frame(&mut self, raw_dt: f32) {
        if self.input.state.is_just_pressed(InputAction::Pause) {
            self.time.toggle_pause();
            info!(paused = self.time.paused, "pause toggled");
        }
        self.time.update(raw_dt);
        self.stats.frames += 1;

        if !self.time.paused {
            self.player.handle_input(&self.input.state);
            if self.input.state.is_just_pressed(InputAction::ShowArrow) {
                self.arrow.show();
            }

            let dt = self.time.fixed_timestep();
            for _ in 0..self.time.fixed_steps() {
                self.fixed_tick(dt);
            }

            self.route_controller_events();
            self.deliveries.tick(self.time.delta_time);
            self.deliveries.check_doors(self.player.position());
            self.dispatch_delivery_events();
        }

        let dt = self.time.delta_time;
        self.messages.tick(dt);
        self.arrow.update(self.player.position(), dt);
        if let Some(clip) = self.animator.update(&self.player.flags()) {
            debug!(clip = clip.name(), "animation changed");
        }
        self.tint = sprite_tint(self.player.state(), self.base_tint);

        self.input.end_frame();
    }

    fn fixed_tick(&mut self, dt: f32) {
        self.player.fixed_update(&mut self.physics, dt);
        self.stats.ticks += 1;

        let position = self.player.position();
        for bumper in &mut self.bumpers {
            bumper.tick(dt);
            if let Some(request) = bumper.try_trigger(position) {
                self.player.apply_external_impulse(request);
            }
        }
    }

    fn route_controller_events(&mut self) {
        for event in self.player.drain_events() {
            match event {
                ControllerEvent::Jumped => self.stats.jumps += 1,
                ControllerEvent::TrickCompleted => self.stats.tricks += 1,
                ControllerEvent::Crashed => self.stats.crashes += 1,
                ControllerEvent::KnockedBack => self.stats.knockbacks += 1,
                _ => {}
            }
            self.deliveries.handle_controller_event(event);
        }
    }

    fn dispatch_delivery_events(&mut self) {
        let mut observers: [&mut dyn DeliveryObserver; 2] = [&mut self.messages, &mut self.arrow];
        for event in self.deliveries.drain_events() {
            for observer in observers.iter_mut() {
                observer.on_delivery_event(&event);
            }
        }
        self.stats.deliveries = self.deliveries.completed();
        self.stats.score = self.deliveries.total_score();
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn deliveries(&self) -> &DeliveryManager {
        &self.deliveries
    }

    pub fn messages(&self) -> &MessageBoard {
        &self.messages
    }

    pub fn arrow(&self) -> &DirectionArrow {
        &self.arrow
    }

    pub fn time(&self) -> &GameTime {
        &self.time
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn current_clip(&self) -> Option<AnimationClip> {
        self.animator.current()
    }

    pub fn player_tint(&self) -> Color {
        self.tint
    }

    /// Horizontal sprite scale, -1 when facing left
    pub fn facing_scale(&self) -> f32 {
        self.animator.facing_scale()
    }

    /// Move the player, e.g. for debugging a door
    #[cfg(test)]
    pub fn teleport_player(&mut self, position: Vec2) {
        self.player.teleport(&mut self.physics, position);
    }
}
