//! Locomotion controller.
//!
//! Steers the player towards the current target one tick at a time:
//!
//! 1. Resolve the target handle and compute the bearing
//! 2. Probe towards the target; track doors being waited on and lifts ridden
//! 3. Decide steering: backtrack, door wait, held maneuver, fresh avoidance
//!    or free steering, in that order
//! 4. Feed stuck, oscillation and loop detection; escalate the strategy
//! 5. Check arrival and write the movement outputs
//! 6. Navigation tone and progress cues on their own cadences
//!
//! Nothing here fails. A missing pose, a vanished target or a muted speech
//! backend all degrade to "no output this tick".

use glam::{Mat3, Vec3};

use crate::arbiter::Tier;
use crate::core::{Bearing, Cadence, CadenceConfig, Side, flat_forward, flat_right, horizontal_distance_sq};
use crate::entity::{EntityKind, Faction, TargetCategory};
use crate::history::{HistoryConfig, PositionHistory};
use crate::host::{Host, MovementSink, SpeechMode, WorldQuery};
use crate::phrases::capitalize;
use crate::sensor::{ObstacleSensor, ObstructionState, Sighting};
use crate::target::{Target, TargetSelector};
use crate::tone::ToneEncoder;
use crate::voice::{Announcer, CueOutcome};

use super::config::LocomotionConfig;
use super::progress::{ProgressCue, ProgressMonitor};
use super::state::NavigationState;
use super::steering::{Maneuver, Steering};
use super::strategy::{Escalation, EscalationCause, Strategy, StrategyMachine};
use super::tracking::{LiftEvent, TrackedDoor, TrackedLift};

const GIVE_UP_MESSAGE: &str = "Cannot reach target. Try manual navigation.";
const DOOR_OPENING_MESSAGE: &str = "Door opening.";

/// Engine parts the controller borrows for one tick.
pub struct TickContext<'a> {
    /// Ray sensor.
    pub sensor: &'a ObstacleSensor,
    /// Target selector.
    pub selector: &'a TargetSelector,
    /// Latest obstruction scan.
    pub obstruction: &'a ObstructionState,
    /// Gated speech.
    pub announcer: &'a mut Announcer,
    /// Tone channels.
    pub tones: &'a mut ToneEncoder,
    /// Host time (ms).
    pub now_ms: u64,
}

/// Result of a single controller tick.
#[derive(Clone, Debug, PartialEq)]
pub struct NavigationStep {
    /// Steering decided this tick (None if navigation did not run).
    pub decision: Option<Steering>,

    /// Values written to the movement sinks. Zero for released outputs.
    pub applied: Steering,

    /// Strategy after this tick.
    pub strategy: Strategy,

    /// Escalation triggered this tick.
    pub escalation: Option<(EscalationCause, Escalation)>,

    /// Whether the target was reached this tick.
    pub arrived: bool,

    /// Whether the player is stopped at a door.
    pub waiting_for_door: bool,

    /// Whether the player is standing on a lift.
    pub riding_lift: bool,

    /// 3D distance to the target.
    pub target_distance: Option<f32>,
}

impl NavigationStep {
    fn idle(strategy: Strategy, applied: Steering) -> Self {
        Self {
            decision: None,
            applied,
            strategy,
            escalation: None,
            arrived: false,
            waiting_for_door: false,
            riding_lift: false,
            target_distance: None,
        }
    }
}

/// Reactive locomotion towards a single target.
///
/// Owns the navigation flags, the strategy machine and the position
/// history. The engine calls [`LocomotionController::update`] once per tick
/// and routes player toggles through the `enable`/`toggle_*` methods.
///
/// ```rust,ignore
/// let mut controller = LocomotionController::new(
///     LocomotionConfig::default(),
///     HistoryConfig::default(),
///     &CadenceConfig::default(),
/// );
/// controller.enable();
/// controller.acquire_target(&host, &selector, position, faction, now_ms);
///
/// loop {
///     let step = controller.update(&mut host, ctx);
///     if step.arrived {
///         break;
///     }
/// }
/// ```
#[derive(Clone, Debug)]
pub struct LocomotionController {
    config: LocomotionConfig,
    state: NavigationState,
    strategy: StrategyMachine,
    history: PositionHistory,
    progress: ProgressMonitor,

    /// Held avoidance, if any.
    maneuver: Option<Maneuver>,
    smoothed_turn: f32,

    door: Option<TrackedDoor>,
    lift: Option<TrackedLift>,

    /// Consecutive moving ticks with negligible displacement.
    stuck_ticks: u32,
    last_position: Option<Vec3>,

    /// Arrival text waiting for the arbiter.
    pending_arrival: Option<String>,

    target_refresh: Cadence,
    history_sample: Cadence,
    navigation_tone: Cadence,
    progress_check: Cadence,

    /// Whether forward/strafe were last left at zero.
    drive_released: bool,
    /// Whether turn was last left at zero.
    turn_released: bool,
}

impl LocomotionController {
    /// Create a controller. Navigation starts disabled.
    pub fn new(config: LocomotionConfig, history: HistoryConfig, cadence: &CadenceConfig) -> Self {
        let strategy = StrategyMachine::new(config.strategy.cycle_limit);
        let progress = ProgressMonitor::new(config.progress.clone());

        Self {
            config,
            state: NavigationState::default(),
            strategy,
            history: PositionHistory::new(history),
            progress,
            maneuver: None,
            smoothed_turn: 0.0,
            door: None,
            lift: None,
            stuck_ticks: 0,
            last_position: None,
            pending_arrival: None,
            target_refresh: Cadence::every(cadence.target_refresh),
            history_sample: Cadence::every(cadence.history_sample),
            navigation_tone: Cadence::every(cadence.navigation_tone),
            progress_check: Cadence::every(cadence.progress),
            drive_released: true,
            turn_released: true,
        }
    }

    /// Navigation flags and target.
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Get the current configuration.
    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    /// Current strategy.
    pub fn strategy(&self) -> Strategy {
        self.strategy.current()
    }

    /// Completed strategy cycles.
    pub fn failures(&self) -> u32 {
        self.strategy.failures()
    }

    /// Held avoidance, if any.
    pub fn maneuver(&self) -> Option<Maneuver> {
        self.maneuver
    }

    /// Whether the player is stopped at a door.
    pub fn is_waiting_for_door(&self) -> bool {
        self.door.is_some()
    }

    /// Whether the player is riding a lift.
    pub fn is_riding_lift(&self) -> bool {
        self.lift.is_some()
    }

    /// Position samples.
    pub fn history(&self) -> &PositionHistory {
        &self.history
    }

    /// Turn navigation on. Arrival flags and the strategy start fresh.
    pub fn enable(&mut self) {
        self.state.enabled = true;
        self.state.clear_arrival();
        self.pending_arrival = None;
        self.reset_approach();
        log::info!("Auto-navigation enabled");
    }

    /// Turn navigation off. Outputs are released on the next tick.
    pub fn disable(&mut self) {
        self.state.enabled = false;
        self.pending_arrival = None;
        self.reset_approach();
        log::info!("Auto-navigation disabled");
    }

    /// Flip auto-rotation. Returns the new value.
    pub fn toggle_auto_rotate(&mut self) -> bool {
        self.state.auto_rotate = !self.state.auto_rotate;
        log::info!("Auto-rotate: {}", self.state.auto_rotate);
        self.state.auto_rotate
    }

    /// Flip auto-movement. Returns the new value.
    ///
    /// Turning it back on after arrival or a give-up starts a fresh approach.
    pub fn toggle_auto_move(&mut self) -> bool {
        self.state.auto_move = !self.state.auto_move;
        self.state.clear_arrival();
        self.pending_arrival = None;
        if self.state.auto_move {
            self.reset_approach();
        }
        log::info!("Auto-move: {}", self.state.auto_move);
        self.state.auto_move
    }

    /// Switch to the next target category and drop the current target.
    pub fn cycle_category(&mut self) -> TargetCategory {
        self.set_category(self.state.category.next());
        self.state.category
    }

    /// Target a specific category and drop the current target.
    pub fn set_category(&mut self, category: TargetCategory) {
        self.state.category = category;
        self.state.target = None;
        self.state.clear_arrival();
        self.pending_arrival = None;
        self.reset_approach();
        log::info!("Target category: {}", category.name());
    }

    /// Select the best target of the current category now.
    pub fn acquire_target<W: WorldQuery + ?Sized>(
        &mut self,
        world: &W,
        selector: &TargetSelector,
        player: Vec3,
        faction: Faction,
        now_ms: u64,
    ) -> Option<Target> {
        self.state.clear_arrival();
        self.pending_arrival = None;
        let target = selector.select(world, self.state.category, player, faction);
        if target.is_none() {
            log::info!("No {} target found", self.state.category.name());
        }
        self.set_target(target.clone(), now_ms);
        target
    }

    /// Main update function - call once per tick.
    pub fn update<H: Host>(&mut self, host: &mut H, ctx: TickContext<'_>) -> NavigationStep {
        let TickContext {
            sensor,
            selector,
            obstruction,
            announcer,
            tones,
            now_ms,
        } = ctx;

        if !self.state.enabled {
            let applied = self.apply(host, None);
            return NavigationStep::idle(self.strategy.current(), applied);
        }

        let (Some(position), Some(orientation)) = (host.player_position(), host.player_orientation())
        else {
            return NavigationStep::idle(self.strategy.current(), Steering::stop());
        };
        let faction = host.player_faction();

        if self.target_refresh.tick() {
            self.refresh_target(&*host, selector, position, faction, now_ms);
        }

        let Some(target) = self.resolve_target(&*host, selector, position) else {
            let applied = self.apply(host, None);
            return NavigationStep::idle(self.strategy.current(), applied);
        };

        self.strategy.tick();
        let bearing = Bearing::between(position, orientation, target.position);

        // Sensing
        let origin = sensor.chest(position);
        let toward = Vec3::new(
            target.position.x - position.x,
            0.0,
            target.position.z - position.z,
        )
        .normalize_or_zero();
        let heading = if toward == Vec3::ZERO {
            flat_forward(orientation)
        } else {
            toward
        };
        let probe = sensor
            .cast(&*host, origin, heading, self.config.probe_range)
            .filter(|s| s.entity != Some(target.id) && s.distance < bearing.horizontal_distance);

        self.track_lift(host, sensor, announcer, origin, now_ms);
        self.track_door(host, announcer, probe, now_ms);

        // Decision
        let decision = self.decide(
            &*host,
            sensor,
            obstruction,
            &bearing,
            probe,
            origin,
            orientation,
            faction,
        );

        let escalation = if self.state.drives_movement() && self.door.is_none() && self.lift.is_none()
        {
            self.detect_failure(position, &decision, now_ms).map(|cause| {
                let escalation = self.escalate(host, announcer, cause, now_ms);
                (cause, escalation)
            })
        } else {
            self.stuck_ticks = 0;
            self.last_position = None;
            None
        };

        if escalation.is_none()
            && self.strategy.current() == Strategy::Backtrack
            && self.strategy.ticks_in_strategy() > self.config.strategy.backtrack_ticks
        {
            log::info!("Backtrack finished, resuming direct path");
            self.strategy.resume_direct();
        }

        let arrived = self.check_arrival(&target, &bearing);
        if let Some(message) = self.pending_arrival.take() {
            match announcer.cue(host, Tier::High, &message, SpeechMode::Queued, now_ms) {
                CueOutcome::Suppressed => self.pending_arrival = Some(message),
                _ => self.state.arrival_announced = true,
            }
        }

        // Output
        let applied = self.apply(host, Some(&decision));

        if self.navigation_tone.tick()
            && !self.state.target_reached
            && announcer.arbiter().is_allowed(Tier::Low, now_ms)
        {
            tones.play_navigation(host, bearing.angle_offset(), bearing.vertical_ratio);
        }

        if self.progress_check.tick() && self.state.drives_movement() {
            let cue = self.progress.evaluate(bearing.distance, now_ms);
            if let Some(message) = cue.and_then(ProgressCue::message) {
                announcer.cue(host, Tier::Low, &message, SpeechMode::Queued, now_ms);
            }
        }

        NavigationStep {
            decision: Some(decision),
            applied,
            strategy: self.strategy.current(),
            escalation,
            arrived,
            waiting_for_door: self.door.is_some(),
            riding_lift: self.lift.is_some(),
            target_distance: Some(bearing.distance),
        }
    }

    fn set_target(&mut self, target: Option<Target>, now_ms: u64) {
        if let Some(t) = &target {
            log::info!("Target: {} at {:.0}", t.name, t.distance);
            self.progress.start(t.distance, now_ms);
        }
        self.state.target = target;
        self.reset_approach();
    }

    /// Periodic reselection. Only switches when a different entity wins.
    fn refresh_target<W: WorldQuery + ?Sized>(
        &mut self,
        world: &W,
        selector: &TargetSelector,
        position: Vec3,
        faction: Faction,
        now_ms: u64,
    ) {
        let current = self.state.target.as_ref().map(|t| t.id);
        if let Some(best) = selector.select(world, self.state.category, position, faction) {
            if Some(best.id) != current {
                log::debug!("Switching target to {:?}", best.id);
                self.set_target(Some(best), now_ms);
            }
        }
    }

    /// Re-read the target entity. Drops it if the handle went stale.
    fn resolve_target<W: WorldQuery + ?Sized>(
        &mut self,
        world: &W,
        selector: &TargetSelector,
        position: Vec3,
    ) -> Option<Target> {
        let id = self.state.target.as_ref()?.id;
        match selector.refresh(world, id, position) {
            Some(target) => {
                self.state.target = Some(target.clone());
                Some(target)
            }
            None => {
                log::info!("Target {:?} lost", id);
                self.state.target = None;
                self.reset_approach();
                None
            }
        }
    }

    fn reset_approach(&mut self) {
        self.strategy.reset();
        self.history.clear();
        self.maneuver = None;
        self.smoothed_turn = 0.0;
        self.door = None;
        self.lift = None;
        self.stuck_ticks = 0;
        self.last_position = None;
    }

    fn track_lift<H: Host>(
        &mut self,
        host: &mut H,
        sensor: &ObstacleSensor,
        announcer: &mut Announcer,
        origin: Vec3,
        now_ms: u64,
    ) {
        let reach = sensor.config().chest_height + self.config.lift_contact_margin;
        let under = sensor
            .cast(&*host, origin, Vec3::NEG_Y, reach)
            .filter(|s| s.class.kind().is_some_and(EntityKind::is_lift))
            .and_then(|s| s.entity);

        let Some(id) = under else {
            if let Some(lift) = self.lift.take() {
                log::debug!("Left lift {:?} after {} ms", lift.id, now_ms.saturating_sub(lift.ride_start_ms));
            }
            return;
        };

        let state = host.lift_state(id);
        let event = match self.lift.as_mut().filter(|lift| lift.id == id) {
            Some(lift) => lift.observe(state),
            None => {
                log::info!("Boarded lift {:?}", id);
                self.lift = Some(TrackedLift::new(id, state, now_ms));
                None
            }
        };

        if let Some(lift) = self.lift.as_mut() {
            if !lift.announced {
                let outcome = announcer.cue(
                    host,
                    Tier::Normal,
                    LiftEvent::Boarded.message(),
                    SpeechMode::Queued,
                    now_ms,
                );
                lift.announced = outcome != CueOutcome::Suppressed;
            }
        }
        if let Some(event) = event {
            announcer.cue(host, Tier::Normal, event.message(), SpeechMode::Queued, now_ms);
        }
    }

    fn track_door<H: Host>(
        &mut self,
        host: &mut H,
        announcer: &mut Announcer,
        probe: Option<Sighting>,
        now_ms: u64,
    ) {
        let ahead = probe
            .filter(|s| s.class.is_door() && s.distance < self.config.door_wait_distance)
            .and_then(|s| Some((s.entity?, s.class.kind()?)));

        let Some((id, kind)) = ahead else {
            if let Some(door) = self.door.take() {
                log::debug!("Door {:?} cleared after {} ms", door.id, door.waited_ms(now_ms));
            }
            return;
        };

        let state = host.door_state(id);
        let opening = match self.door.as_mut().filter(|door| door.id == id) {
            Some(door) => door.observe(state),
            None => {
                log::info!("Waiting for {} {:?}", kind.info().obstacle_name, id);
                self.door = Some(TrackedDoor::new(id, kind, state, now_ms));
                self.history.clear();
                self.stuck_ticks = 0;
                self.last_position = None;
                false
            }
        };

        if let Some(door) = self.door.as_mut() {
            if !door.announced {
                let message = format!(
                    "{} ahead. Press {} to open.",
                    capitalize(kind.info().obstacle_name),
                    self.config.interact_key
                );
                let outcome = announcer.cue(host, Tier::High, &message, SpeechMode::Queued, now_ms);
                door.announced = outcome != CueOutcome::Suppressed;
            }
        }
        if opening {
            announcer.cue(host, Tier::Normal, DOOR_OPENING_MESSAGE, SpeechMode::Queued, now_ms);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn decide<W: WorldQuery + ?Sized>(
        &mut self,
        world: &W,
        sensor: &ObstacleSensor,
        obstruction: &ObstructionState,
        bearing: &Bearing,
        probe: Option<Sighting>,
        origin: Vec3,
        orientation: Mat3,
        faction: Faction,
    ) -> Steering {
        let mut steering =
            self.choose_steering(world, sensor, bearing, probe, origin, orientation, faction);

        // Knee-high obstacle straight ahead: hop it rather than detour.
        let close = obstruction
            .forward_distance
            .is_some_and(|d| d < self.config.jump_distance);
        if steering.moves_forward() && close && obstruction.forward_is_clearable() {
            steering.jump = true;
        }
        steering
    }

    #[allow(clippy::too_many_arguments)]
    fn choose_steering<W: WorldQuery + ?Sized>(
        &mut self,
        world: &W,
        sensor: &ObstacleSensor,
        bearing: &Bearing,
        probe: Option<Sighting>,
        origin: Vec3,
        orientation: Mat3,
        faction: Faction,
    ) -> Steering {
        // Completion is handled after failure detection in `update`.
        if self.strategy.current() == Strategy::Backtrack {
            self.smoothed_turn = 0.0;
            return Steering::reverse(self.config.strategy.backtrack_speed);
        }

        if self.door.is_some() {
            self.smoothed_turn = 0.0;
            return Steering::stop();
        }

        if let Some(mut maneuver) = self.maneuver {
            let steering = self.maneuver_steering(&maneuver);
            maneuver.remaining = maneuver.remaining.saturating_sub(1);
            self.maneuver = (maneuver.remaining > 0).then_some(maneuver);
            return steering;
        }

        if let Some(obstacle) = probe {
            let threshold = if obstacle.class.is_threat_to(faction) {
                self.config.threat_avoid_distance
            } else {
                self.config.avoid_distance
            };

            if !obstacle.class.is_door() && obstacle.distance < threshold {
                let right = flat_right(orientation);
                let range = self.config.probe_range;
                let left_clear = sensor.clearance(world, origin, -right, range);
                let right_clear = sensor.clearance(world, origin, right, range);
                let side = self.choose_side(bearing.lateral, left_clear, right_clear);

                log::debug!(
                    "Avoiding {} at {:.0}: going {} (left {:.0}, right {:.0})",
                    obstacle.name(),
                    obstacle.distance,
                    side.name(),
                    left_clear,
                    right_clear
                );

                let maneuver = Maneuver {
                    side,
                    remaining: self.config.avoid_ticks.saturating_sub(1),
                };
                self.maneuver = (maneuver.remaining > 0).then_some(maneuver);
                return self.maneuver_steering(&maneuver);
            }
        }

        self.free_steering(bearing)
    }

    fn maneuver_steering(&mut self, maneuver: &Maneuver) -> Steering {
        let steering = maneuver.steering(
            self.config.forward_speed,
            self.config.strafe_speed,
            self.config.avoid_turn,
        );
        self.smoothed_turn = steering.turn;
        steering
    }

    /// Side to avoid towards: the target's side when it is open enough,
    /// otherwise the other one. Near-centre targets take the more open side.
    fn choose_side(&self, lateral: f32, left_clear: f32, right_clear: f32) -> Side {
        let preference = self.config.lateral_preference;
        let open = self.config.side_clear_distance;

        if lateral > preference {
            if right_clear > open { Side::Right } else { Side::Left }
        } else if lateral < -preference {
            if left_clear > open { Side::Left } else { Side::Right }
        } else if left_clear > right_clear {
            Side::Left
        } else {
            Side::Right
        }
    }

    fn free_steering(&mut self, bearing: &Bearing) -> Steering {
        let cfg = &self.config;

        let mut turn = 0.0;
        if bearing.horizontal_distance > cfg.rotate_min_distance {
            turn = (bearing.lateral * cfg.rotate_gain).clamp(-cfg.max_rotate, cfg.max_rotate);
        }

        let mut forward = 0.0;
        if bearing.alignment > cfg.forward_alignment {
            forward = cfg.forward_speed;
        } else if bearing.alignment < cfg.behind_alignment {
            turn = if bearing.lateral < 0.0 {
                -cfg.behind_turn
            } else {
                cfg.behind_turn
            };
        }

        self.smoothed_turn += (turn - self.smoothed_turn) * cfg.turn_smoothing;

        Steering {
            forward,
            strafe: 0.0,
            turn: self.smoothed_turn,
            jump: false,
        }
    }

    /// Stuck check every tick; oscillation and loop on history samples.
    ///
    /// Only ticks that command movement count: turning in place is not
    /// being stuck.
    fn detect_failure(
        &mut self,
        position: Vec3,
        decision: &Steering,
        now_ms: u64,
    ) -> Option<EscalationCause> {
        let moving = decision.forward != 0.0 || decision.strafe != 0.0;
        if !moving {
            self.stuck_ticks = 0;
            self.last_position = None;
            return None;
        }

        match self.last_position {
            Some(last) if horizontal_distance_sq(last, position) < self.config.stuck_displacement_sq => {
                self.stuck_ticks += 1;
            }
            _ => self.stuck_ticks = 0,
        }
        self.last_position = Some(position);

        if self.stuck_ticks >= self.config.stuck_ticks {
            return Some(EscalationCause::Stuck);
        }

        if self.history_sample.tick() {
            self.history.record(position, now_ms);
            if self.history.is_oscillating() {
                return Some(EscalationCause::Oscillation);
            }
            if let Some(age) = self.history.detect_loop() {
                log::debug!("Revisited position from {} samples ago", age);
                return Some(EscalationCause::Loop);
            }
        }
        None
    }

    fn escalate<H: Host>(
        &mut self,
        host: &mut H,
        announcer: &mut Announcer,
        cause: EscalationCause,
        now_ms: u64,
    ) -> Escalation {
        let escalation = self.strategy.escalate();
        self.history.clear();
        self.stuck_ticks = 0;
        self.last_position = None;
        self.maneuver = None;

        log::info!("{} detected: {:?}", cause.name(), escalation);

        match escalation {
            Escalation::Advanced(next) => {
                if let Some((side, ticks)) = next.maneuver(&self.config.strategy) {
                    self.maneuver = Some(Maneuver {
                        side,
                        remaining: ticks,
                    });
                }
                announcer.cue(host, Tier::Normal, next.cue(), SpeechMode::Queued, now_ms);
            }
            Escalation::Retrying { .. } => {
                announcer.cue(
                    host,
                    Tier::Normal,
                    Strategy::Direct.cue(),
                    SpeechMode::Queued,
                    now_ms,
                );
            }
            Escalation::GaveUp { failures } => {
                log::warn!("Giving up on target after {} strategy cycles", failures);
                self.state.auto_move = false;
                announcer.cue(
                    host,
                    Tier::Critical,
                    GIVE_UP_MESSAGE,
                    SpeechMode::Immediate,
                    now_ms,
                );
            }
        }
        escalation
    }

    fn check_arrival(&mut self, target: &Target, bearing: &Bearing) -> bool {
        if self.state.target_reached || bearing.distance >= self.config.arrival_distance {
            return false;
        }

        log::info!("Arrived at {} ({:.0})", target.name, bearing.distance);
        self.state.target_reached = true;
        self.state.auto_move = false;
        self.maneuver = None;
        self.pending_arrival = Some(self.arrival_message(target));
        true
    }

    fn arrival_message(&self, target: &Target) -> String {
        if target.kind.is_interactive() {
            format!(
                "Arrived at {}. Press {} to interact.",
                target.name, self.config.interact_key
            )
        } else if target.kind == EntityKind::Item {
            "Item nearby. Walk forward to collect.".to_string()
        } else {
            "Target reached.".to_string()
        }
    }

    /// Write outputs the player has handed over; zero released ones once.
    fn apply<M: MovementSink + ?Sized>(&mut self, sink: &mut M, decision: Option<&Steering>) -> Steering {
        let mut applied = Steering::stop();

        match decision {
            Some(d) if self.state.drives_movement() => {
                sink.set_forward_speed(d.forward);
                sink.set_strafe_speed(d.strafe);
                if d.jump {
                    sink.request_jump();
                }
                applied.forward = d.forward;
                applied.strafe = d.strafe;
                applied.jump = d.jump;
                self.drive_released = false;
            }
            _ if !self.drive_released => {
                sink.set_forward_speed(0.0);
                sink.set_strafe_speed(0.0);
                self.drive_released = true;
            }
            _ => {}
        }

        match decision {
            Some(d) if self.state.drives_rotation() => {
                sink.set_turn_rate(d.turn);
                applied.turn = d.turn;
                self.turn_released = false;
            }
            _ if !self.turn_released => {
                sink.set_turn_rate(0.0);
                self.turn_released = true;
            }
            _ => {}
        }

        applied
    }
}
