//! Skateboard player controller
//!
//! Input is sampled once per frame by [`PlayerController::handle_input`],
//! which only arms timers and records intent. All motion changes happen in
//! [`PlayerController::step`], once per fixed tick, in this order: ground
//! sensing, state arbitration, solvers, timer decrement. The one exception is
//! the fall-to-speed conversion, which needs the post-collision velocity and
//! runs right after the body moves.

use courier_core::ConfigError;
use courier_physics::{
    CharacterBody, GroundProbe, GroundSensor, MotionSample, PhysicsWorld, SurfaceImpact,
};
use glam::Vec2;
use tracing::{debug, info};

use crate::animation::PresentationFlags;
use crate::input::{InputAction, InputState};

use super::combo::{ComboContext, ComboKey, ComboOutcome, ComboStateMachine};
use super::movement::{MovementInput, MovementSolver};
use super::orientation::{OrientationInput, OrientationStabilizer};
use super::timers::{PlayerTimer, TimerBank};
use super::vertical::VerticalSolver;
use super::{CharacterState, ControllerConfig, ControllerEvent, ExternalImpulseRequest};

/// Events reserved up front so the tick never allocates
const EVENT_CAPACITY: usize = 32;

/// Per-frame intent, consumed by the next tick
#[derive(Debug, Clone, Copy, Default)]
struct Intent {
    horizontal: f32,
    tilt: f32,
    /// World-space point to turn toward
    aim: Option<Vec2>,
    jump_release_pending: bool,
}

/// The player character: motion, timers, combo and top-level state
pub struct PlayerController {
    config: ControllerConfig,
    body: CharacterBody,
    sensor: GroundSensor,
    timers: TimerBank,
    combo: ComboStateMachine,
    state: CharacterState,
    intent: Intent,
    /// Simulated seconds since spawn
    clock: f64,
    /// Gravity multiplier for the next integration
    gravity_scale: f32,
    /// Set while airborne, cleared by the first floor the body hits
    awaiting_touchdown: bool,
    events: Vec<ControllerEvent>,
}

impl PlayerController {
    /// Create a controller, validating its configuration
    pub fn new(config: ControllerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let sensor = GroundSensor::new(config.sensor.clone())?;
        let body = CharacterBody::with_config(config.body.clone());
        let gravity_scale = config.gravity_scale;

        Ok(Self {
            config,
            body,
            sensor,
            timers: TimerBank::new(),
            combo: ComboStateMachine::new(),
            state: CharacterState::Normal,
            intent: Intent::default(),
            clock: 0.0,
            gravity_scale,
            awaiting_touchdown: false,
            events: Vec::with_capacity(EVENT_CAPACITY),
        })
    }

    /// Spawn the player in the world at a position
    pub fn spawn(&mut self, physics: &mut PhysicsWorld, position: Vec2) {
        self.body.spawn(physics, position);
        self.timers.clear_all();
        self.combo = ComboStateMachine::new();
        self.state = CharacterState::Normal;
        self.intent = Intent::default();
        self.awaiting_touchdown = false;
        self.events.clear();
        info!(?position, "player spawned");
    }

    /// Teleport the player, keeping its state
    pub fn teleport(&mut self, physics: &mut PhysicsWorld, position: Vec2) {
        self.body.set_position(physics, position);
        self.body.set_velocity(Vec2::ZERO);
        self.awaiting_touchdown = false;
    }

    /// Sample one frame of input. Only timers and intent are written here.
    pub fn handle_input(&mut self, input: &InputState) {
        if self.state.is_stunned() {
            self.intent = Intent::default();
            return;
        }

        self.intent.horizontal = input.horizontal_axis();
        self.intent.tilt = if self.body.motion.grounded {
            0.0
        } else {
            let mut tilt = 0.0;
            if input.is_held(InputAction::TiltLeft) {
                tilt += 1.0;
            }
            if input.is_held(InputAction::TiltRight) {
                tilt -= 1.0;
            }
            tilt
        };
        self.intent.aim = input.aim_target();

        self.sample_jump(input);

        if self.config.features.trick_system {
            self.sample_combo(input);
        }
    }

    fn sample_jump(&mut self, input: &InputState) {
        let profile = self.config.jump_profile;

        if profile.allows_sequence() {
            if input.is_just_pressed(InputAction::Down) {
                self.timers
                    .arm(PlayerTimer::InputSequence, self.config.input_sequence_window);
            }
            if input.is_just_pressed(InputAction::Up)
                && self.timers.is_active(PlayerTimer::InputSequence)
            {
                self.timers.clear(PlayerTimer::InputSequence);
                self.timers
                    .arm(PlayerTimer::JumpBuffer, self.config.jump_buffer_time);
            }
        }

        if profile.allows_button() && input.is_just_pressed(InputAction::Jump) {
            self.timers
                .arm(PlayerTimer::JumpBuffer, self.config.jump_buffer_time);
        }

        if input.is_just_released(InputAction::Up) || input.is_just_released(InputAction::Jump) {
            self.intent.jump_release_pending = true;
        }
    }

    fn sample_combo(&mut self, input: &InputState) {
        let keys = [
            (InputAction::TrickFirst, ComboKey::First),
            (InputAction::TrickSecond, ComboKey::Second),
            (InputAction::TrickFinish, ComboKey::Finish),
        ];

        for (action, key) in keys {
            if !input.is_just_pressed(action) {
                continue;
            }
            let ctx = ComboContext {
                grounded: self.body.motion.grounded,
                locked: self.state != CharacterState::Normal
                    || self.timers.is_active(PlayerTimer::Trick),
                now: self.clock,
                window: self.config.combo_timeout_window,
                trick_duration: self.config.trick_duration,
            };
            match self.combo.feed(key, ctx, &mut self.timers) {
                ComboOutcome::Ignored => {}
                ComboOutcome::Advanced(step) => {
                    debug!(step, at = self.combo.last_input_at(), "combo advanced");
                    self.events.push(ControllerEvent::ComboAdvanced(step));
                }
                ComboOutcome::Completed => {
                    info!(duration = self.config.trick_duration, "trick started");
                    self.state = CharacterState::Trick;
                    self.events.push(ControllerEvent::TrickStarted);
                }
            }
        }
    }

    /// Knock the player back. Takes effect immediately and overrides any
    /// trick, combo or pending jump.
    pub fn apply_external_impulse(&mut self, request: ExternalImpulseRequest) {
        self.body
            .set_velocity(request.direction * request.magnitude);

        self.timers.clear(PlayerTimer::Trick);
        self.timers.clear(PlayerTimer::JumpBuffer);
        self.timers.clear(PlayerTimer::InputSequence);
        self.combo.reset(&mut self.timers);
        self.timers.arm(PlayerTimer::Crash, request.stun_duration);

        self.intent = Intent::default();
        self.state = CharacterState::Knockback;
        self.events.push(ControllerEvent::KnockedBack);
        info!(
            direction = ?request.direction,
            magnitude = request.magnitude,
            stun = request.stun_duration,
            "player knocked back"
        );
    }

    /// One fixed tick against the physics world: sense, step, integrate,
    /// then resolve a touchdown if the move hit the floor
    pub fn fixed_update(&mut self, physics: &mut PhysicsWorld, dt: f32) {
        let motion = &self.body.motion;
        let probe = self.sensor.probe(&*physics, motion.position, motion.rotation);
        self.step(probe, dt);
        self.body.integrate(physics, self.gravity_scale, dt);

        if let Some(impact) = self.body.motion.impact {
            self.touch_down(impact);
        }
    }

    /// Advance the controller by one tick given this tick's ground probe.
    ///
    /// Gravity itself is applied by the body integration that follows.
    pub fn step(&mut self, probe: GroundProbe, dt: f32) {
        let was_grounded = self.body.motion.grounded;
        self.body.motion.apply_probe(&probe);
        let grounded = probe.grounded;
        self.clock += f64::from(dt);
        if !grounded {
            self.awaiting_touchdown = true;
        }

        if grounded && !was_grounded {
            self.on_landed();
        }

        if self.timers.is_active(PlayerTimer::Crash) {
            self.step_stunned(dt);
            return;
        }

        if self.config.features.trick_system
            && grounded
            && self.timers.is_active(PlayerTimer::Trick)
        {
            self.crash();
            return;
        }

        if self.state.is_stunned() {
            self.recover();
        }
        self.state = if self.timers.is_active(PlayerTimer::Trick) {
            CharacterState::Trick
        } else {
            CharacterState::Normal
        };

        self.step_solvers(grounded, probe.near_ground, dt);

        let expired = self.timers.tick(dt);
        if expired.contains(PlayerTimer::Trick) && self.state == CharacterState::Trick {
            self.state = CharacterState::Normal;
            self.events.push(ControllerEvent::TrickCompleted);
            info!("trick completed");
        }
        if self.combo.expire(&self.timers) {
            debug!("combo window expired");
        }
    }

    fn on_landed(&mut self) {
        self.combo.reset(&mut self.timers);
        self.events.push(ControllerEvent::Landed);
    }

    /// First floor contact after being airborne. The velocity here is
    /// already the post-collision one.
    fn touch_down(&mut self, impact: SurfaceImpact) {
        if impact.normal.y <= 0.0 || !std::mem::take(&mut self.awaiting_touchdown) {
            return;
        }
        if !self.config.features.fall_to_speed {
            return;
        }

        let motion = &mut self.body.motion;
        if let Some(converted) = MovementSolver::convert_fall_to_speed(
            &self.config,
            impact.velocity,
            impact.normal,
            motion.velocity,
        ) {
            debug!(impact = ?impact.velocity, ?converted, "fall converted to speed");
            motion.velocity = converted;
        }
    }

    /// Crashed or knocked back: gravity and damping only
    fn step_stunned(&mut self, dt: f32) {
        let motion = &mut self.body.motion;
        motion.velocity *= 1.0 / (1.0 + self.config.stun_damping * dt);
        motion.angular_velocity = 0.0;
        self.intent.jump_release_pending = false;
        self.gravity_scale = VerticalSolver::gravity_scale(&self.config, motion.velocity);

        let expired = self.timers.tick(dt);
        if expired.contains(PlayerTimer::Crash) {
            self.recover();
            self.state = CharacterState::Normal;
        }
    }

    /// Failed landing. This tick does no movement and does not count
    /// against the crash timer.
    fn crash(&mut self) {
        self.timers.clear(PlayerTimer::Trick);
        self.timers.clear(PlayerTimer::JumpBuffer);
        self.timers.clear(PlayerTimer::InputSequence);
        self.timers
            .arm(PlayerTimer::Crash, self.config.crash_duration);
        self.combo.reset(&mut self.timers);

        self.intent = Intent::default();
        self.state = CharacterState::Crashed;
        self.gravity_scale = VerticalSolver::gravity_scale(&self.config, self.body.motion.velocity);
        self.events.push(ControllerEvent::Crashed);
        info!(duration = self.config.crash_duration, "crashed on landing");
    }

    fn recover(&mut self) {
        self.events.push(ControllerEvent::Recovered);
        info!(from = self.state.name(), "player recovered");
    }

    fn step_solvers(&mut self, grounded: bool, near_ground: bool, dt: f32) {
        let config = &self.config;
        let timers = &mut self.timers;
        let motion = &mut self.body.motion;

        VerticalSolver::refresh_coyote(config, timers, grounded);

        if std::mem::take(&mut self.intent.jump_release_pending)
            && VerticalSolver::apply_jump_cut(config, timers, &mut motion.velocity)
        {
            debug!(vy = motion.velocity.y, "jump cut");
            self.events.push(ControllerEvent::JumpCut);
        }

        let movement = MovementSolver::solve(
            config,
            MovementInput {
                intent: self.intent.horizontal,
                grounded,
                rotation: motion.rotation,
                velocity: motion.velocity,
            },
            dt,
        );
        motion.velocity = movement.velocity;

        motion.angular_velocity = 0.0;
        let orientation = OrientationStabilizer::solve(
            config,
            OrientationInput {
                grounded,
                rotation: motion.rotation,
                tilt: self.intent.tilt,
                near_ground,
                normal: motion.contact_normal,
            },
            dt,
        );
        motion.rotation = orientation.rotation;
        motion.velocity += orientation.velocity_delta;

        if let Some(target) = self.intent.aim.filter(|_| config.features.aim_rotation) {
            motion.rotation =
                OrientationStabilizer::aim(config, motion.rotation, motion.position, target, dt);
        }

        if VerticalSolver::try_jump(config, timers, &mut motion.velocity) {
            debug!(vy = motion.velocity.y, "jumped");
            self.events.push(ControllerEvent::Jumped);
        }

        self.gravity_scale = VerticalSolver::gravity_scale(config, motion.velocity);
    }

    /// Validated controller configuration
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Top-level character state
    pub fn state(&self) -> CharacterState {
        self.state
    }

    /// Full motion sample: pose, velocity, contact data
    pub fn motion(&self) -> &MotionSample {
        &self.body.motion
    }

    /// World position of the body
    pub fn position(&self) -> Vec2 {
        self.body.position()
    }

    /// Linear velocity in units per second
    pub fn velocity(&self) -> Vec2 {
        self.body.motion.velocity
    }

    /// Whether the latest ground probe found ground
    pub fn is_grounded(&self) -> bool {
        self.body.motion.grounded
    }

    /// Whether a trick is in progress
    pub fn is_doing_trick(&self) -> bool {
        self.state == CharacterState::Trick
    }

    /// Crashed or knocked back
    pub fn is_crashed(&self) -> bool {
        self.state.is_stunned()
    }

    /// Horizontal input from the latest frame, in [-1, 1]
    pub fn horizontal_intent(&self) -> f32 {
        self.intent.horizontal
    }

    /// State flags for the animation layer
    pub fn flags(&self) -> PresentationFlags {
        PresentationFlags {
            grounded: self.is_grounded(),
            crashed: self.is_crashed(),
            doing_trick: self.is_doing_trick(),
            horizontal_intent: self.horizontal_intent(),
        }
    }

    /// Countdown timers, read-only
    pub fn timers(&self) -> &TimerBank {
        &self.timers
    }

    /// Combo keys accepted so far, 0 when idle
    pub fn combo_step(&self) -> u8 {
        self.combo.step()
    }

    /// Gravity multiplier the next integration will use
    pub fn gravity_scale(&self) -> f32 {
        self.gravity_scale
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> impl Iterator<Item = ControllerEvent> + '_ {
        self.events.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::JumpInputProfile;

    const DT: f32 = 1.0 / 60.0;

    fn controller() -> PlayerController {
        PlayerController::new(ControllerConfig::default()).expect("default config is valid")
    }

    fn press(actions: &[InputAction]) -> InputState {
        let mut input = InputState::new();
        for action in actions {
            input.press(*action);
        }
        input
    }

    fn release(action: InputAction) -> InputState {
        let mut input = press(&[action]);
        input.clear_frame();
        input.release(action);
        input
    }

    fn flat() -> GroundProbe {
        GroundProbe::on_surface(Vec2::Y)
    }

    /// Down then Up, the sequence jump
    fn sequence_jump(player: &mut PlayerController) {
        player.handle_input(&press(&[InputAction::Down]));
        player.handle_input(&press(&[InputAction::Up]));
    }

    fn start_trick(player: &mut PlayerController) {
        player.handle_input(&press(&[InputAction::TrickFirst]));
        player.handle_input(&press(&[InputAction::TrickSecond]));
        player.handle_input(&press(&[InputAction::TrickFinish]));
    }

    fn assert_flags_consistent(player: &PlayerController) {
        let active = [
            player.state() == CharacterState::Normal,
            player.is_doing_trick(),
            player.state() == CharacterState::Crashed,
            player.state() == CharacterState::Knockback,
        ];
        assert_eq!(active.iter().filter(|a| **a).count(), 1);
        assert!(!(player.is_doing_trick() && player.is_crashed()));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ControllerConfig {
            jump_buffer_time: 0.0,
            ..Default::default()
        };
        assert!(PlayerController::new(config).is_err());
    }

    #[test]
    fn test_sequence_jump_sets_exact_velocity() {
        let mut player = controller();
        player.step(flat(), DT);

        sequence_jump(&mut player);
        assert!(player.timers().is_active(PlayerTimer::JumpBuffer));

        player.step(flat(), DT);
        assert_eq!(player.velocity().y, player.config().jump_force);
        assert_eq!(player.timers().remaining(PlayerTimer::JumpBuffer), 0.0);
        assert_eq!(player.timers().remaining(PlayerTimer::Coyote), 0.0);
        assert!(player.drain_events().any(|e| e == ControllerEvent::Jumped));
    }

    #[test]
    fn test_up_without_down_does_not_jump() {
        let mut player = controller();
        player.step(flat(), DT);

        player.handle_input(&press(&[InputAction::Up]));
        player.step(flat(), DT);
        assert_eq!(player.velocity().y, 0.0);
    }

    #[test]
    fn test_sequence_window_expires() {
        let mut player = controller();
        player.handle_input(&press(&[InputAction::Down]));
        for _ in 0..60 {
            player.step(flat(), DT);
        }
        player.handle_input(&press(&[InputAction::Up]));
        assert!(!player.timers().is_active(PlayerTimer::JumpBuffer));
    }

    #[test]
    fn test_coyote_jump_after_leaving_ground() {
        let mut player = controller();
        player.step(flat(), DT);
        player.step(GroundProbe::airborne(), DT);

        sequence_jump(&mut player);
        player.step(GroundProbe::airborne(), DT);
        assert_eq!(player.velocity().y, player.config().jump_force);
    }

    #[test]
    fn test_no_jump_once_coyote_runs_out() {
        let mut player = controller();
        player.step(flat(), DT);
        for _ in 0..20 {
            player.step(GroundProbe::airborne(), DT);
        }

        sequence_jump(&mut player);
        player.step(GroundProbe::airborne(), DT);
        assert_ne!(player.velocity().y, player.config().jump_force);
    }

    #[test]
    fn test_buffered_jump_fires_on_landing() {
        let mut player = controller();
        player.step(GroundProbe::airborne(), DT);
        sequence_jump(&mut player);
        player.step(GroundProbe::airborne(), DT);

        player.step(flat(), DT);
        assert_eq!(player.velocity().y, player.config().jump_force);
    }

    #[test]
    fn test_button_profile() {
        let config = ControllerConfig {
            jump_profile: JumpInputProfile::Button,
            ..Default::default()
        };
        let mut player = PlayerController::new(config).expect("valid config");
        player.step(flat(), DT);

        sequence_jump(&mut player);
        assert!(!player.timers().is_active(PlayerTimer::JumpBuffer));

        player.handle_input(&press(&[InputAction::Jump]));
        player.step(flat(), DT);
        assert_eq!(player.velocity().y, player.config().jump_force);
    }

    #[test]
    fn test_jump_cut_applies_once_per_release() {
        let mut player = controller();
        player.step(flat(), DT);
        sequence_jump(&mut player);
        player.step(flat(), DT);
        let jump_force = player.config().jump_force;

        player.handle_input(&release(InputAction::Up));
        player.step(GroundProbe::airborne(), DT);
        assert_eq!(player.velocity().y, jump_force * 0.5);

        // Key stays released; no further scaling
        player.handle_input(&InputState::new());
        player.step(GroundProbe::airborne(), DT);
        assert_eq!(player.velocity().y, jump_force * 0.5);
    }

    #[test]
    fn test_jump_cut_ignored_while_falling() {
        let mut player = controller();
        player.step(GroundProbe::airborne(), DT);
        player.apply_external_impulse(ExternalImpulseRequest::new(Vec2::NEG_Y, 4.0, 0.0));
        player.step(GroundProbe::airborne(), DT);

        player.handle_input(&release(InputAction::Up));
        player.step(GroundProbe::airborne(), DT);
        assert!(player.velocity().y < 0.0);
        assert!(player.velocity().y > -4.0 - 1e-4);
    }

    #[test]
    fn test_combo_starts_trick_in_air() {
        let mut player = controller();
        player.step(GroundProbe::airborne(), DT);

        start_trick(&mut player);
        assert!(player.is_doing_trick());
        assert_eq!(
            player.timers().remaining(PlayerTimer::Trick),
            player.config().trick_duration
        );
        assert_eq!(player.combo_step(), 0);

        player.step(GroundProbe::airborne(), DT);
        assert_eq!(player.state(), CharacterState::Trick);
        assert_flags_consistent(&player);
    }

    #[test]
    fn test_combo_rejected_on_ground() {
        let mut player = controller();
        player.step(flat(), DT);

        start_trick(&mut player);
        assert!(!player.is_doing_trick());
        assert!(!player.timers().is_active(PlayerTimer::Trick));
    }

    #[test]
    fn test_combo_times_out() {
        let mut player = controller();
        player.step(GroundProbe::airborne(), DT);

        player.handle_input(&press(&[InputAction::TrickFirst]));
        assert_eq!(player.combo_step(), 1);
        for _ in 0..40 {
            player.step(GroundProbe::airborne(), DT);
        }
        player.handle_input(&press(&[InputAction::TrickSecond]));
        assert_eq!(player.combo_step(), 0);
    }

    #[test]
    fn test_trick_completes_in_air() {
        let mut player = controller();
        player.step(GroundProbe::airborne(), DT);
        start_trick(&mut player);

        for _ in 0..70 {
            player.step(GroundProbe::airborne(), DT);
        }
        assert_eq!(player.state(), CharacterState::Normal);
        assert!(player
            .drain_events()
            .any(|e| e == ControllerEvent::TrickCompleted));
    }

    #[test]
    fn test_landing_during_trick_crashes() {
        let mut player = controller();
        player.step(GroundProbe::airborne(), DT);
        start_trick(&mut player);
        player.step(GroundProbe::airborne(), DT);

        player.step(flat(), DT);
        assert_eq!(player.state(), CharacterState::Crashed);
        assert!(player.is_crashed());
        assert!(!player.is_doing_trick());
        assert_eq!(player.timers().remaining(PlayerTimer::Trick), 0.0);
        assert_eq!(
            player.timers().remaining(PlayerTimer::Crash),
            player.config().crash_duration
        );
        assert_flags_consistent(&player);
    }

    #[test]
    fn test_crash_preempts_movement() {
        let mut player = controller();
        player.step(GroundProbe::airborne(), DT);
        start_trick(&mut player);
        player.handle_input(&press(&[InputAction::MoveRight]));

        player.step(flat(), DT);
        assert_eq!(player.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_crash_ignores_input_then_recovers() {
        let mut player = controller();
        player.step(GroundProbe::airborne(), DT);
        start_trick(&mut player);
        player.step(flat(), DT);

        player.handle_input(&press(&[InputAction::MoveRight]));
        assert_eq!(player.horizontal_intent(), 0.0);
        sequence_jump(&mut player);
        assert!(!player.timers().is_active(PlayerTimer::JumpBuffer));

        let ticks = (player.config().crash_duration / DT).ceil() as usize + 3;
        for _ in 0..ticks {
            player.step(flat(), DT);
            assert_flags_consistent(&player);
        }
        assert_eq!(player.state(), CharacterState::Normal);
        assert!(player.drain_events().any(|e| e == ControllerEvent::Recovered));

        player.handle_input(&press(&[InputAction::MoveRight]));
        assert_eq!(player.horizontal_intent(), 1.0);
    }

    #[test]
    fn test_trick_system_can_be_disabled() {
        let mut config = ControllerConfig::default();
        config.features.trick_system = false;
        let mut player = PlayerController::new(config).expect("valid config");
        player.step(GroundProbe::airborne(), DT);

        start_trick(&mut player);
        assert!(!player.is_doing_trick());
        player.step(flat(), DT);
        assert_eq!(player.state(), CharacterState::Normal);
    }

    #[test]
    fn test_external_impulse_is_exact() {
        let mut player = controller();
        player.step(GroundProbe::airborne(), DT);
        start_trick(&mut player);

        let request = ExternalImpulseRequest::new(Vec2::new(1.0, 0.5), 25.0, 0.3);
        player.apply_external_impulse(request);

        assert_eq!(player.velocity(), request.direction * 25.0);
        assert_eq!(player.timers().remaining(PlayerTimer::Crash), 0.3);
        assert_eq!(player.state(), CharacterState::Knockback);
        assert!(!player.timers().is_active(PlayerTimer::Trick));
        assert_eq!(player.combo_step(), 0);
        assert_flags_consistent(&player);
    }

    #[test]
    fn test_knockback_cancels_buffered_jump() {
        let mut player = controller();
        player.step(flat(), DT);
        sequence_jump(&mut player);

        player.apply_external_impulse(ExternalImpulseRequest::new(Vec2::X, 10.0, 0.3));
        player.step(flat(), DT);
        assert!(!player.timers().is_active(PlayerTimer::JumpBuffer));
        assert!(player.velocity().y <= 0.0);
    }

    #[test]
    fn test_knockback_damps_velocity() {
        let mut player = controller();
        player.apply_external_impulse(ExternalImpulseRequest::new(Vec2::X, 10.0, 0.3));
        player.step(GroundProbe::airborne(), DT);
        assert!(player.velocity().x < 10.0);
        assert!(player.velocity().x > 9.0);
    }

    #[test]
    fn test_landing_resets_partial_combo() {
        let mut player = controller();
        player.step(GroundProbe::airborne(), DT);
        player.handle_input(&press(&[InputAction::TrickFirst]));
        assert_eq!(player.combo_step(), 1);

        player.step(flat(), DT);
        assert_eq!(player.combo_step(), 0);
        assert!(player.drain_events().any(|e| e == ControllerEvent::Landed));
    }

    #[test]
    fn test_ground_acceleration_scenario() {
        let mut player = controller();
        player.step(flat(), DT);
        player.handle_input(&press(&[InputAction::MoveRight]));

        player.step(flat(), DT);
        let first = player.velocity().x;
        assert!(first > 0.0);
        assert!(first <= player.config().acceleration * DT + 1e-5);
    }

    #[test]
    fn test_gravity_scale_follows_vertical_speed() {
        let mut player = controller();
        player.apply_external_impulse(ExternalImpulseRequest::new(Vec2::NEG_Y, 5.0, 0.2));
        player.step(GroundProbe::airborne(), DT);
        assert_eq!(player.gravity_scale(), 7.5);
    }

    #[test]
    fn test_fixed_update_against_world() {
        let mut physics = PhysicsWorld::new();
        physics.create_ground(0.0);
        let mut player = controller();
        player.spawn(&mut physics, Vec2::new(0.0, 2.0));

        for _ in 0..180 {
            player.fixed_update(&mut physics, DT);
        }
        assert!(player.is_grounded());
        assert!(player.position().y > 0.0);
        assert!(player.position().y < 1.0);
    }

    #[test]
    fn test_both_profiles_share_jump_buffer() {
        let config = ControllerConfig {
            jump_profile: JumpInputProfile::Both,
            ..Default::default()
        };
        let mut player = PlayerController::new(config).expect("valid config");
        player.step(GroundProbe::airborne(), DT);

        sequence_jump(&mut player);
        for _ in 0..3 {
            player.step(GroundProbe::airborne(), DT);
        }
        let buffer = player.config().jump_buffer_time;
        assert!(player.timers().remaining(PlayerTimer::JumpBuffer) < buffer);

        // The newest press re-arms the same buffer
        player.handle_input(&press(&[InputAction::Jump]));
        assert_eq!(player.timers().remaining(PlayerTimer::JumpBuffer), buffer);

        player.step(flat(), DT);
        assert_eq!(player.velocity().y, player.config().jump_force);
        assert!(!player.timers().is_active(PlayerTimer::JumpBuffer));
    }

    #[test]
    fn test_solvers_run_during_trick() {
        let mut config = ControllerConfig::default();
        config.features.air_control = true;
        let mut player = PlayerController::new(config).expect("valid config");
        player.step(GroundProbe::airborne(), DT);
        start_trick(&mut player);

        player.handle_input(&press(&[InputAction::MoveRight]));
        player.step(GroundProbe::airborne(), DT);

        assert_eq!(player.state(), CharacterState::Trick);
        assert!(player.velocity().x > 0.0);
        assert_eq!(player.gravity_scale(), player.config().gravity_scale);
    }

    /// Ramp rising to the right, so downhill is toward -x
    fn ramp_world(degrees: f32, half_run: f32) -> PhysicsWorld {
        let mut physics = PhysicsWorld::new();
        let rise = half_run * degrees.to_radians().tan();
        physics.create_ramp(Vec2::new(-half_run, -rise), Vec2::new(half_run, rise));
        physics
    }

    fn slope_normal(degrees: f32) -> Vec2 {
        let angle = degrees.to_radians();
        Vec2::new(-angle.sin(), angle.cos())
    }

    /// Drop the player onto the ramp and return the touchdown impact along
    /// with the velocity right after it
    fn drop_onto_ramp(
        config: ControllerConfig,
    ) -> (SurfaceImpact, Vec2, PlayerController, PhysicsWorld) {
        let mut physics = ramp_world(45.0, 20.0);
        let mut player = PlayerController::new(config).expect("valid config");
        player.spawn(&mut physics, Vec2::new(0.0, 6.0));

        for _ in 0..120 {
            player.fixed_update(&mut physics, DT);
            if let Some(impact) = player.motion().impact {
                let velocity = player.velocity();
                return (impact, velocity, player, physics);
            }
        }
        panic!("player never reached the ramp");
    }

    #[test]
    fn test_rolls_downhill_without_input() {
        let mut physics = ramp_world(30.0, 40.0);
        let mut player = controller();
        player.spawn(&mut physics, Vec2::new(0.0, 0.8));

        for _ in 0..60 {
            player.fixed_update(&mut physics, DT);
        }

        let velocity = player.velocity();
        assert!(velocity.x < -5.0);
        assert!(velocity.y < 0.0);
        assert!(player.position().x < -2.0);
        // Moving along the surface, not into or off it
        let normal = slope_normal(30.0);
        assert!(velocity.normalize().dot(normal).abs() < 0.1);
    }

    #[test]
    fn test_steep_landing_keeps_slide_speed() {
        let (impact, velocity, mut player, mut physics) = drop_onto_ramp(ControllerConfig::default());

        let normal = slope_normal(45.0);
        assert!((impact.normal - normal).length() < 1e-3);
        assert!(impact.velocity.y < -10.0);

        let tangent = Vec2::new(normal.y, -normal.x);
        let slide = tangent * impact.velocity.dot(tangent);
        assert!(velocity.x < 0.0);
        assert!((velocity - slide).length() < 0.05 * slide.length());

        let touchdown_speed = velocity.length();
        for _ in 0..10 {
            player.fixed_update(&mut physics, DT);
        }
        assert!(player.velocity().length() > touchdown_speed);
    }

    #[test]
    fn test_steep_landing_converts_fall_to_speed() {
        let config = ControllerConfig {
            momentum_preservation: 1.5,
            ..Default::default()
        };
        let (impact, velocity, _, _) = drop_onto_ramp(config);

        let normal = impact.normal;
        let tangent = Vec2::new(normal.y, -normal.x);
        let expected = tangent * impact.velocity.dot(tangent) * 1.5;
        assert!((velocity - expected).length() < 1e-3);
    }

    fn aiming_at(target: Vec2) -> InputState {
        let mut input = press(&[InputAction::Aim]);
        input.pointer = Some(target);
        input
    }

    #[test]
    fn test_aim_turns_board_toward_pointer() {
        let mut config = ControllerConfig::default();
        config.features.aim_rotation = true;
        let mut player = PlayerController::new(config).expect("valid config");
        player.step(GroundProbe::airborne(), DT);

        player.handle_input(&aiming_at(player.position() + Vec2::new(0.0, 5.0)));
        for _ in 0..60 {
            player.step(GroundProbe::airborne(), DT);
        }
        assert!((player.motion().rotation - 90.0).abs() < 1e-3);

        // Releasing aim hands rotation back to the stabilizer
        player.handle_input(&release(InputAction::Aim));
        player.step(GroundProbe::airborne(), DT);
        assert!(player.motion().rotation < 90.0);
    }

    #[test]
    fn test_aim_ignored_when_disabled() {
        let mut player = controller();
        player.step(GroundProbe::airborne(), DT);

        player.handle_input(&aiming_at(player.position() + Vec2::new(0.0, 5.0)));
        player.step(GroundProbe::airborne(), DT);
        assert_eq!(player.motion().rotation, 0.0);
    }
}
