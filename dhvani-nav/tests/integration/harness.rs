//! Kinematic test host and simulation loop
//!
//! The host integrates the engine's movement outputs directly into the
//! player pose each step. There is no collision response: a frozen player
//! models one pinned against geometry.

use std::collections::HashMap;

use dhvani_nav::navigation::Escalation;
use dhvani_nav::{
    Channel, DoorState, EntityId, EntityKind, MovementSink, NavConfig, NavigationEngine,
    PlayerSource, RayHit, Result, SpeechMode, SpeechSink, TickReport, ToneRequest, ToneSink,
    Trigger, WorldQuery,
};
use glam::{Mat3, Vec3};

/// Harness configuration.
#[derive(Clone, Debug)]
pub struct HarnessConfig {
    /// Player travel per step at full forward speed
    pub move_per_tick: f32,
    /// Player rotation per step at full turn rate (radians)
    pub turn_per_tick: f32,
    /// Simulated time per step in milliseconds
    pub dt_ms: u64,
    /// Player ignores movement outputs
    pub frozen: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            move_per_tick: 300.0,
            turn_per_tick: 0.05,
            dt_ms: 16,
            frozen: false,
        }
    }
}

/// Solid axis-aligned box.
#[derive(Clone, Debug)]
struct Solid {
    min: Vec3,
    max: Vec3,
    entity: Option<EntityId>,
}

/// World and player state seen by the engine.
#[derive(Debug, Default)]
pub struct TestHost {
    pub position: Vec3,
    pub yaw: f32,
    entities: Vec<(EntityId, EntityKind, Vec3)>,
    solids: Vec<Solid>,
    pub doors: HashMap<EntityId, DoorState>,

    pub forward: f32,
    pub strafe: f32,
    pub turn: f32,
    pub jumps: u32,
    pub movement_writes: u32,
    pub spoken: Vec<(String, SpeechMode)>,
    pub tones: Vec<(Channel, ToneRequest)>,
}

impl TestHost {
    /// Player at the origin facing +Z.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entity with no collision body.
    pub fn with_marker(mut self, id: u32, kind: EntityKind, position: Vec3) -> Self {
        self.entities.push((EntityId(id), kind, position));
        self
    }

    /// Entity with a box body.
    pub fn with_body(mut self, id: u32, kind: EntityKind, min: Vec3, max: Vec3) -> Self {
        let id = EntityId(id);
        self.entities.push((id, kind, (min + max) * 0.5));
        self.solids.push(Solid {
            min,
            max,
            entity: Some(id),
        });
        self
    }

    /// Static geometry.
    pub fn with_wall(mut self, min: Vec3, max: Vec3) -> Self {
        self.solids.push(Solid {
            min,
            max,
            entity: None,
        });
        self
    }

    /// Body orientation from the current yaw.
    pub fn orientation(&self) -> Mat3 {
        Mat3::from_rotation_y(self.yaw)
    }

    /// Apply the latest movement outputs for one step.
    pub fn advance(&mut self, config: &HarnessConfig) {
        if config.frozen {
            return;
        }
        self.yaw += self.turn * config.turn_per_tick;
        let orientation = self.orientation();
        self.position += orientation.z_axis * self.forward * config.move_per_tick
            + orientation.x_axis * self.strafe * config.move_per_tick;
    }

    /// Number of utterances equal to `text`.
    pub fn count_spoken(&self, text: &str) -> usize {
        self.spoken.iter().filter(|(t, _)| t == text).count()
    }

    /// Spoken texts in order.
    pub fn texts(&self) -> Vec<&str> {
        self.spoken.iter().map(|(t, _)| t.as_str()).collect()
    }
}

fn slab(origin: Vec3, direction: Vec3, min: Vec3, max: Vec3, max_range: f32) -> Option<f32> {
    let mut near = 0.0f32;
    let mut far = max_range;
    for axis in 0..3 {
        let (o, d) = (origin[axis], direction[axis]);
        if d.abs() < 1e-6 {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let a = (min[axis] - o) / d;
        let b = (max[axis] - o) / d;
        near = near.max(a.min(b));
        far = far.min(a.max(b));
        if near > far {
            return None;
        }
    }
    Some(near)
}

impl WorldQuery for TestHost {
    fn live_entities(&self) -> Vec<EntityId> {
        self.entities.iter().map(|(id, _, _)| *id).collect()
    }

    fn entity_kind(&self, id: EntityId) -> Option<EntityKind> {
        self.entities.iter().find(|e| e.0 == id).map(|e| e.1)
    }

    fn entity_position(&self, id: EntityId) -> Option<Vec3> {
        self.entities.iter().find(|e| e.0 == id).map(|e| e.2)
    }

    fn raycast(&self, origin: Vec3, direction: Vec3, max_range: f32) -> Option<RayHit> {
        self.solids
            .iter()
            .filter(|s| {
                s.entity
                    .and_then(|id| self.doors.get(&id))
                    .map_or(true, |state| *state != DoorState::Open)
            })
            .filter_map(|s| slab(origin, direction, s.min, s.max, max_range).map(|t| (t, s)))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(t, s)| RayHit {
                distance: t,
                point: origin + direction * t,
                entity: s.entity,
                radius: s.entity.map(|_| (s.max - s.min).x.max((s.max - s.min).z) * 0.5),
            })
    }

    fn door_state(&self, id: EntityId) -> Option<DoorState> {
        self.doors.get(&id).copied()
    }
}

impl PlayerSource for TestHost {
    fn player_position(&self) -> Option<Vec3> {
        Some(self.position)
    }

    fn player_orientation(&self) -> Option<Mat3> {
        Some(self.orientation())
    }
}

impl MovementSink for TestHost {
    fn set_forward_speed(&mut self, speed: f32) {
        self.forward = speed;
        self.movement_writes += 1;
    }

    fn set_strafe_speed(&mut self, speed: f32) {
        self.strafe = speed;
        self.movement_writes += 1;
    }

    fn set_turn_rate(&mut self, rate: f32) {
        self.turn = rate;
        self.movement_writes += 1;
    }

    fn request_jump(&mut self) {
        self.jumps += 1;
    }
}

impl SpeechSink for TestHost {
    fn speak(&mut self, text: &str, mode: SpeechMode) -> Result<()> {
        self.spoken.push((text.to_string(), mode));
        Ok(())
    }
}

impl ToneSink for TestHost {
    fn play_tone(&mut self, channel: Channel, request: ToneRequest) -> Result<()> {
        self.tones.push((channel, request));
        Ok(())
    }

    fn is_playing(&self, _channel: Channel) -> bool {
        false
    }
}

/// Engine plus host stepped in lockstep.
pub struct TestHarness {
    pub config: HarnessConfig,
    pub engine: NavigationEngine,
    pub host: TestHost,
    pub now_ms: u64,
    pub ticks: u32,
    /// Every escalation with the tick it happened on
    pub escalations: Vec<(u32, Escalation)>,
    /// Tick of the first arrival
    pub arrived_at: Option<u32>,
}

impl TestHarness {
    /// Create a harness with default engine settings.
    pub fn new(config: HarnessConfig, host: TestHost) -> Self {
        Self::with_engine(config, NavConfig::default(), host)
    }

    /// Create a harness with explicit engine settings.
    pub fn with_engine(config: HarnessConfig, nav: NavConfig, host: TestHost) -> Self {
        Self {
            config,
            engine: NavigationEngine::new(nav),
            host,
            now_ms: 0,
            ticks: 0,
            escalations: Vec::new(),
            arrived_at: None,
        }
    }

    /// Deliver a player trigger at the current time.
    pub fn trigger(&mut self, trigger: Trigger) -> Vec<String> {
        self.engine.handle_trigger(trigger, &mut self.host, self.now_ms)
    }

    /// One engine tick followed by one kinematic step.
    pub fn step(&mut self) -> TickReport {
        self.ticks += 1;
        self.now_ms += self.config.dt_ms;

        let report = self.engine.tick(&mut self.host, self.now_ms);
        if let Some((_, escalation)) = report.navigation.escalation {
            self.escalations.push((self.ticks, escalation));
        }
        if report.navigation.arrived && self.arrived_at.is_none() {
            self.arrived_at = Some(self.ticks);
        }

        self.host.advance(&self.config);
        report
    }

    /// Step `ticks` times.
    pub fn run(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.step();
        }
    }

    /// Step until `done` holds or `max_ticks` pass. Returns whether it held.
    pub fn run_until(&mut self, max_ticks: u32, mut done: impl FnMut(&Self) -> bool) -> bool {
        for _ in 0..max_ticks {
            self.step();
            if done(self) {
                return true;
            }
        }
        false
    }
}
