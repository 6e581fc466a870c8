//! Simulated level for closed-loop runs.
//!
//! Geometry is a set of axis-aligned boxes on a floor at y = 0. Typed
//! entities are boxes (or bodiless markers) with a behaviour kind. Doors
//! open over time, lifts carry whoever stands on them, and the player walks
//! by the movement fractions the engine writes.
//!
//! Every speech and tone request lands in a transcript with its timestamp.

use std::collections::HashMap;

use dhvani_nav::{
    Channel, DoorState, EntityId, EntityKind, Faction, LiftState, MovementSink, PlayerSource,
    RayHit, SpeechMode, SpeechSink, ToneRequest, ToneSink, WorldQuery,
};
use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

/// Collision handling mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionMode {
    /// Reject the whole step on contact
    #[default]
    Stop,
    /// Keep whichever axis of the step is still free
    Slide,
}

/// Player movement and world timing parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Player speed at full forward input (units per second).
    /// Default: 20000
    pub move_speed: f32,

    /// Turn speed at full turn input (radians per second).
    /// Default: 3.0
    pub turn_speed: f32,

    /// Player collision radius.
    /// Default: 300
    pub player_radius: f32,

    /// Player body height.
    /// Default: 1800
    pub player_height: f32,

    /// Obstacle height the player walks onto.
    /// Default: 450
    pub step_height: f32,

    /// Obstacle height cleared while airborne.
    /// Default: 1200
    pub jump_clearance: f32,

    /// Airborne time per jump (ms).
    /// Default: 600
    pub jump_ms: u64,

    /// Collision response.
    /// Default: stop
    pub collision: CollisionMode,

    /// Reach of the interact action.
    /// Default: 4000
    pub interact_range: f32,

    /// Distance at which proximity doors open by themselves.
    /// Default: 3500
    pub proximity_range: f32,

    /// Time from opening to fully open (ms).
    /// Default: 1000
    pub door_open_ms: u64,

    /// How long a tone keeps its channel busy (ms).
    /// Default: 150
    pub tone_ms: u64,

    /// Player ignores movement input (pinned in geometry).
    /// Default: false
    pub rooted: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            move_speed: 20_000.0,
            turn_speed: 3.0,
            player_radius: 300.0,
            player_height: 1800.0,
            step_height: 450.0,
            jump_clearance: 1200.0,
            jump_ms: 600,
            collision: CollisionMode::Stop,
            interact_range: 4000.0,
            proximity_range: 3500.0,
            door_open_ms: 1000,
            tone_ms: 150,
            rooted: false,
        }
    }
}

/// Lift travel parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiftSpec {
    /// Vertical travel (negative goes down).
    /// Default: 3000
    pub rise: f32,

    /// Time a rider must stand on the lift before it starts (ms).
    /// Default: 500
    pub wait_ms: u64,

    /// Travel time (ms).
    /// Default: 3000
    pub travel_ms: u64,
}

impl Default for LiftSpec {
    fn default() -> Self {
        Self {
            rise: 3000.0,
            wait_ms: 500,
            travel_ms: 3000,
        }
    }
}

/// One-shot lift ride state.
#[derive(Clone, Debug)]
struct LiftMotion {
    spec: LiftSpec,
    state: LiftState,
    base_y: f32,
    boarded_at: Option<u64>,
    started_at: Option<u64>,
    finished: bool,
}

/// Typed world entity.
#[derive(Clone, Debug)]
pub struct SimEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Centre of the body, or the marker position.
    pub position: Vec3,
    /// Half extents of the collision body. None for markers.
    pub half: Option<Vec3>,
    door: Option<(DoorState, u64)>,
    lift: Option<LiftMotion>,
}

impl SimEntity {
    /// Entity with no collision body.
    pub fn marker(id: u32, kind: EntityKind, position: Vec3) -> Self {
        Self {
            id: EntityId(id),
            kind,
            position,
            half: None,
            door: None,
            lift: None,
        }
    }

    /// Entity with a box body. Doors start closed; lifts get default travel.
    pub fn body(id: u32, kind: EntityKind, position: Vec3, half: Vec3) -> Self {
        let mut entity = Self::marker(id, kind, position);
        entity.half = Some(half);
        if kind.is_door() {
            entity.door = Some((DoorState::Closed, 0));
        }
        if kind.is_lift() {
            entity = entity.with_lift(LiftSpec::default());
        }
        entity
    }

    /// Override lift travel.
    pub fn with_lift(mut self, spec: LiftSpec) -> Self {
        self.lift = Some(LiftMotion {
            spec,
            state: LiftState::Stopped,
            base_y: self.position.y,
            boarded_at: None,
            started_at: None,
            finished: false,
        });
        self
    }

    /// Start with the door already open.
    pub fn opened(mut self) -> Self {
        if self.door.is_some() {
            self.door = Some((DoorState::Open, 0));
        }
        self
    }

    /// Current door state, for doors.
    pub fn door_state(&self) -> Option<DoorState> {
        self.door.map(|(state, _)| state)
    }

    /// Current lift state, for lifts.
    pub fn lift_state(&self) -> Option<LiftState> {
        self.lift.as_ref().map(|l| l.state)
    }

    fn bounds(&self) -> Option<(Vec3, Vec3)> {
        self.half.map(|h| (self.position - h, self.position + h))
    }

    /// Open doors let rays and the player through.
    fn is_solid(&self) -> bool {
        self.half.is_some() && self.door_state() != Some(DoorState::Open)
    }
}

/// Static box.
#[derive(Clone, Debug)]
struct Solid {
    min: Vec3,
    max: Vec3,
    /// Free-standing props report a radius; walls do not.
    radius: Option<f32>,
}

/// Player pose and status.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerState {
    /// Feet position.
    pub position: Vec3,
    /// Heading in radians, clockwise from +Z seen from above.
    pub yaw: f32,
    /// View pitch in radians (positive = up).
    pub pitch: f32,
    pub faction: Faction,
    pub alive: bool,
}

impl PlayerState {
    /// Player standing at `position` facing `yaw`.
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self {
            position,
            yaw,
            pitch: 0.0,
            faction: Faction::Marine,
            alive: true,
        }
    }

    /// Body orientation (columns: right, up, forward).
    pub fn orientation(&self) -> Mat3 {
        Mat3::from_rotation_y(self.yaw)
    }
}

/// Latest movement outputs from the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MovementInput {
    pub forward: f32,
    pub strafe: f32,
    pub turn: f32,
    pub jump: bool,
}

/// Something the player heard or did.
#[derive(Clone, Debug, PartialEq)]
pub enum TranscriptEvent {
    Speech { text: String, mode: SpeechMode },
    Tone { channel: Channel, request: ToneRequest },
    Jump,
    DoorOpening(EntityId),
}

/// Timestamped transcript line.
#[derive(Clone, Debug, PartialEq)]
pub struct TranscriptEntry {
    pub at_ms: u64,
    pub event: TranscriptEvent,
}

/// The simulated level.
pub struct SimWorld {
    physics: PhysicsConfig,
    pub player: PlayerState,
    solids: Vec<Solid>,
    entities: Vec<SimEntity>,
    input: MovementInput,
    airborne_until: Option<u64>,
    busy_until: HashMap<Channel, u64>,
    transcript: Vec<TranscriptEntry>,
    now_ms: u64,
}

impl SimWorld {
    /// Empty level.
    pub fn new(physics: PhysicsConfig, player: PlayerState) -> Self {
        Self {
            physics,
            player,
            solids: Vec::new(),
            entities: Vec::new(),
            input: MovementInput::default(),
            airborne_until: None,
            busy_until: HashMap::new(),
            transcript: Vec::new(),
            now_ms: 0,
        }
    }

    /// Add wall geometry.
    pub fn add_wall(&mut self, min: Vec3, max: Vec3) {
        self.solids.push(Solid {
            min,
            max,
            radius: None,
        });
    }

    /// Add an untyped prop (crate, pillar).
    pub fn add_object(&mut self, min: Vec3, max: Vec3) {
        let size = max - min;
        self.solids.push(Solid {
            min,
            max,
            radius: Some(size.x.max(size.z) * 0.5),
        });
    }

    /// Add a typed entity.
    pub fn add_entity(&mut self, entity: SimEntity) {
        self.entities.push(entity);
    }

    /// Remove an entity (killed, collected). Returns whether it existed.
    pub fn remove_entity(&mut self, id: EntityId) -> bool {
        let before = self.entities.len();
        self.entities.retain(|e| e.id != id);
        self.entities.len() != before
    }

    pub fn physics(&self) -> &PhysicsConfig {
        &self.physics
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn input(&self) -> MovementInput {
        self.input
    }

    pub fn entity(&self, id: EntityId) -> Option<&SimEntity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    /// Spoken texts in order.
    pub fn spoken(&self) -> impl Iterator<Item = &str> {
        self.transcript.iter().filter_map(|entry| match &entry.event {
            TranscriptEvent::Speech { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Press the use key: opens the nearest closed door within reach.
    pub fn interact(&mut self) -> Option<EntityId> {
        let feet = self.player.position;
        let range = self.physics.interact_range;
        let now = self.now_ms;

        let door = self
            .entities
            .iter_mut()
            .filter(|e| e.door_state() == Some(DoorState::Closed))
            .map(|e| (horizontal_distance(feet, e.position), e))
            .filter(|(d, _)| *d <= range)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, e)| e)?;

        door.door = Some((DoorState::Opening, now));
        let id = door.id;
        tracing::info!("Interact: opening door {:?}", id);
        self.record(TranscriptEvent::DoorOpening(id));
        Some(id)
    }

    /// Advance doors, lifts and the player by `dt_ms`.
    pub fn step(&mut self, dt_ms: u64) {
        self.now_ms += dt_ms;
        self.update_doors();
        self.update_lifts();
        if self.player.alive && !self.physics.rooted {
            self.move_player(dt_ms as f32 / 1000.0);
        }
        self.input.jump = false;
        self.settle_player();
    }

    fn record(&mut self, event: TranscriptEvent) {
        self.transcript.push(TranscriptEntry {
            at_ms: self.now_ms,
            event,
        });
    }

    fn update_doors(&mut self) {
        let feet = self.player.position;
        let now = self.now_ms;
        let mut opened = Vec::new();

        for entity in &mut self.entities {
            let Some((state, since)) = entity.door else {
                continue;
            };
            let next = match state {
                DoorState::Closed
                    if entity.kind == EntityKind::ProximityDoor
                        && horizontal_distance(feet, entity.position)
                            < self.physics.proximity_range =>
                {
                    opened.push(entity.id);
                    Some(DoorState::Opening)
                }
                DoorState::Opening if now.saturating_sub(since) >= self.physics.door_open_ms => {
                    Some(DoorState::Open)
                }
                _ => None,
            };
            if let Some(next) = next {
                tracing::debug!("Door {:?}: {:?} -> {:?}", entity.id, state, next);
                entity.door = Some((next, now));
            }
        }

        for id in opened {
            self.record(TranscriptEvent::DoorOpening(id));
        }
    }

    fn update_lifts(&mut self) {
        let feet = self.player.position;
        let now = self.now_ms;

        for entity in &mut self.entities {
            let (Some(half), Some(lift)) = (entity.half, entity.lift.as_mut()) else {
                continue;
            };
            let top = entity.position.y + half.y;
            let riding = (feet.x - entity.position.x).abs() <= half.x
                && (feet.z - entity.position.z).abs() <= half.z
                && (feet.y - top).abs() < 100.0;

            match lift.state {
                LiftState::Stopped if !lift.finished => {
                    if !riding {
                        lift.boarded_at = None;
                        continue;
                    }
                    let boarded = *lift.boarded_at.get_or_insert(now);
                    if now.saturating_sub(boarded) >= lift.spec.wait_ms {
                        tracing::debug!("Lift {:?} departing", entity.id);
                        lift.state = LiftState::Moving;
                        lift.started_at = Some(now);
                    }
                }
                LiftState::Moving => {
                    let started = lift.started_at.unwrap_or(now);
                    let progress = if lift.spec.travel_ms == 0 {
                        1.0
                    } else {
                        (now.saturating_sub(started) as f32 / lift.spec.travel_ms as f32).min(1.0)
                    };
                    entity.position.y = lift.base_y + lift.spec.rise * progress;
                    if progress >= 1.0 {
                        tracing::debug!("Lift {:?} arrived", entity.id);
                        lift.state = LiftState::Stopped;
                        lift.finished = true;
                    }
                }
                LiftState::Stopped => {}
            }
        }
    }

    fn move_player(&mut self, dt: f32) {
        let input = self.input;
        self.player.yaw += input.turn.clamp(-1.0, 1.0) * self.physics.turn_speed * dt;

        if input.jump && self.airborne_until.map_or(true, |t| self.now_ms >= t) {
            self.airborne_until = Some(self.now_ms + self.physics.jump_ms);
            self.record(TranscriptEvent::Jump);
        }

        let orientation = self.player.orientation();
        let delta = (orientation.z_axis * input.forward.clamp(-1.0, 1.0)
            + orientation.x_axis * input.strafe.clamp(-1.0, 1.0))
            * self.physics.move_speed
            * dt;
        let from = self.player.position;
        let to = from + Vec3::new(delta.x, 0.0, delta.z);

        if !self.blocked(to) {
            self.player.position = to;
            return;
        }

        match self.physics.collision {
            CollisionMode::Stop => {}
            CollisionMode::Slide => {
                let along_x = Vec3::new(to.x, from.y, from.z);
                let along_z = Vec3::new(from.x, from.y, to.z);
                if !self.blocked(along_x) {
                    self.player.position = along_x;
                } else if !self.blocked(along_z) {
                    self.player.position = along_z;
                }
            }
        }
    }

    fn clearance(&self) -> f32 {
        match self.airborne_until {
            Some(t) if self.now_ms < t => self.physics.jump_clearance,
            _ => self.physics.step_height,
        }
    }

    fn boxes(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.solids.iter().map(|s| (s.min, s.max)).chain(
            self.entities
                .iter()
                .filter(|e| e.is_solid())
                .filter_map(SimEntity::bounds),
        )
    }

    /// Whether the player body at `feet` overlaps anything it cannot climb.
    fn blocked(&self, feet: Vec3) -> bool {
        let r = self.physics.player_radius;
        let climb = feet.y + self.clearance();
        let head = feet.y + self.physics.player_height;

        self.boxes().any(|(min, max)| {
            feet.x > min.x - r
                && feet.x < max.x + r
                && feet.z > min.z - r
                && feet.z < max.z + r
                && max.y > climb
                && min.y < head
        })
    }

    /// Stand on the highest surface under the player within climbing reach.
    fn settle_player(&mut self) {
        let feet = self.player.position;
        let climb = feet.y + self.clearance();

        let ground = self
            .boxes()
            .filter(|(min, max)| {
                feet.x >= min.x
                    && feet.x <= max.x
                    && feet.z >= min.z
                    && feet.z <= max.z
                    && max.y <= climb
            })
            .map(|(_, max)| max.y)
            .fold(0.0f32, f32::max);

        self.player.position.y = ground;
    }
}

fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}

/// Ray/box slab test. Distance to entry, or None.
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

impl WorldQuery for SimWorld {
    fn live_entities(&self) -> Vec<EntityId> {
        self.entities.iter().map(|e| e.id).collect()
    }

    fn entity_kind(&self, id: EntityId) -> Option<EntityKind> {
        self.entity(id).map(|e| e.kind)
    }

    fn entity_position(&self, id: EntityId) -> Option<Vec3> {
        self.entity(id).map(|e| e.position)
    }

    fn raycast(&self, origin: Vec3, direction: Vec3, max_range: f32) -> Option<RayHit> {
        let walls = self.solids.iter().filter_map(|s| {
            slab(origin, direction, s.min, s.max, max_range).map(|t| (t, None, s.radius))
        });
        let bodies = self
            .entities
            .iter()
            .filter(|e| e.is_solid())
            .filter_map(|e| {
                let (min, max) = e.bounds()?;
                let half = e.half?;
                slab(origin, direction, min, max, max_range)
                    .map(|t| (t, Some(e.id), Some(half.x.max(half.z))))
            });

        walls
            .chain(bodies)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(t, entity, radius)| RayHit {
                distance: t,
                point: origin + direction * t,
                entity,
                radius,
            })
    }

    fn door_state(&self, id: EntityId) -> Option<DoorState> {
        self.entity(id).and_then(SimEntity::door_state)
    }

    fn lift_state(&self, id: EntityId) -> Option<LiftState> {
        self.entity(id).and_then(SimEntity::lift_state)
    }
}

impl PlayerSource for SimWorld {
    fn player_position(&self) -> Option<Vec3> {
        self.player.alive.then_some(self.player.position)
    }

    fn player_orientation(&self) -> Option<Mat3> {
        self.player.alive.then(|| self.player.orientation())
    }

    fn view_pitch(&self) -> Option<f32> {
        self.player.alive.then_some(self.player.pitch)
    }

    fn player_faction(&self) -> Faction {
        self.player.faction
    }
}

impl MovementSink for SimWorld {
    fn set_forward_speed(&mut self, speed: f32) {
        self.input.forward = speed;
    }

    fn set_strafe_speed(&mut self, speed: f32) {
        self.input.strafe = speed;
    }

    fn set_turn_rate(&mut self, rate: f32) {
        self.input.turn = rate;
    }

    fn request_jump(&mut self) {
        self.input.jump = true;
    }
}

impl SpeechSink for SimWorld {
    fn speak(&mut self, text: &str, mode: SpeechMode) -> dhvani_nav::Result<()> {
        tracing::info!(at_ms = self.now_ms, ?mode, "{}", text);
        self.record(TranscriptEvent::Speech {
            text: text.to_string(),
            mode,
        });
        Ok(())
    }
}

impl ToneSink for SimWorld {
    fn play_tone(&mut self, channel: Channel, request: ToneRequest) -> dhvani_nav::Result<()> {
        tracing::debug!(
            at_ms = self.now_ms,
            channel = channel.name(),
            pan = request.pan,
            pitch = request.pitch,
            "tone"
        );
        self.busy_until
            .insert(channel, self.now_ms + self.physics.tone_ms);
        self.record(TranscriptEvent::Tone { channel, request });
        Ok(())
    }

    fn is_playing(&self, channel: Channel) -> bool {
        self.busy_until
            .get(&channel)
            .is_some_and(|until| self.now_ms < *until)
    }
}
