//! Host game interface.
//!
//! The engine never owns world entities or implements collision itself.
//! Everything it knows about the world comes through these traits, and
//! everything it does goes out through the sinks. Entity handles are
//! resolved fresh every tick.
//!
//! # Example
//!
//! ```ignore
//! struct MyGame { /* engine bindings */ }
//!
//! impl WorldQuery for MyGame {
//!     fn live_entities(&self) -> Vec<EntityId> { self.strategy_blocks() }
//!     fn entity_kind(&self, id: EntityId) -> Option<EntityKind> { self.kind_of(id) }
//!     fn entity_position(&self, id: EntityId) -> Option<Vec3> { self.position_of(id) }
//!     fn raycast(&self, origin: Vec3, dir: Vec3, max: f32) -> Option<RayHit> {
//!         self.line_of_sight(origin, dir, max)
//!     }
//! }
//! ```

use glam::{Mat3, Vec3};

use crate::entity::{EntityKind, Faction};
use crate::error::Result;

/// Stable handle to a world entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Result of a world ray cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
    /// Entity that was hit, if the hit object has one.
    pub entity: Option<EntityId>,
    /// Bounding radius of the hit object, if known.
    pub radius: Option<f32>,
}

impl RayHit {
    /// Hit against static geometry.
    pub fn geometry(distance: f32, point: Vec3) -> Self {
        Self {
            distance,
            point,
            entity: None,
            radius: None,
        }
    }
}

/// Observed state of a door.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoorState {
    Closed,
    Opening,
    Open,
    Closing,
}

impl DoorState {
    /// Whether the door is open or on its way to open.
    pub fn is_opening(self) -> bool {
        matches!(self, DoorState::Opening | DoorState::Open)
    }
}

/// Observed state of a lift or moving platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiftState {
    Stopped,
    Moving,
}

/// Live world queries.
pub trait WorldQuery {
    /// Handles of every live entity, in the host's enumeration order.
    fn live_entities(&self) -> Vec<EntityId>;

    /// Behaviour type of an entity. None if the handle is stale or untyped.
    fn entity_kind(&self, id: EntityId) -> Option<EntityKind>;

    /// World position of an entity. None if the handle is stale.
    fn entity_position(&self, id: EntityId) -> Option<Vec3>;

    /// Cast a ray. `direction` is a unit vector. Returns None when nothing is
    /// hit within `max_range`.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_range: f32) -> Option<RayHit>;

    /// Door state, for entities that are doors.
    fn door_state(&self, _id: EntityId) -> Option<DoorState> {
        None
    }

    /// Lift state, for entities that are lifts or platforms.
    fn lift_state(&self, _id: EntityId) -> Option<LiftState> {
        None
    }
}

/// Local player state.
pub trait PlayerSource {
    /// Player feet position. None when there is no live player.
    fn player_position(&self) -> Option<Vec3>;

    /// Player body orientation (columns: right, up, forward).
    fn player_orientation(&self) -> Option<Mat3>;

    /// View pitch in radians (positive = looking up).
    fn view_pitch(&self) -> Option<f32> {
        None
    }

    /// Which side the player is on. Decides which entities are threats.
    fn player_faction(&self) -> Faction {
        Faction::Marine
    }
}

/// Movement outputs. Values are fractions of the host's maximum in [-1, 1].
pub trait MovementSink {
    /// Forward speed (negative = backwards).
    fn set_forward_speed(&mut self, speed: f32);

    /// Strafe speed (positive = right).
    fn set_strafe_speed(&mut self, speed: f32);

    /// Turn rate (positive = clockwise seen from above).
    fn set_turn_rate(&mut self, rate: f32);

    /// Request a single jump.
    fn request_jump(&mut self);
}

/// How a spoken message interacts with speech already in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeechMode {
    /// Interrupt current speech.
    Immediate,
    /// Speak after current speech finishes.
    Queued,
    /// Interrupt and flush anything queued.
    Priority,
}

/// Speech output.
pub trait SpeechSink {
    /// Speak `text`.
    fn speak(&mut self, text: &str, mode: SpeechMode) -> Result<()>;
}

/// Independent single-voice tone outputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Nearest-threat radar.
    Radar,
    /// View pitch indicator.
    PitchIndicator,
    /// Target guidance.
    Navigation,
}

impl Channel {
    /// All channels.
    pub const ALL: [Channel; 3] = [Channel::Radar, Channel::PitchIndicator, Channel::Navigation];

    /// Channel name for logs.
    pub fn name(self) -> &'static str {
        match self {
            Channel::Radar => "radar",
            Channel::PitchIndicator => "pitch",
            Channel::Navigation => "navigation",
        }
    }
}

/// Encoded tone playback request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneRequest {
    /// Stereo position in [-1, 1] (negative = left).
    pub pan: f32,
    /// Vertical offset in [-1, 1] (negative = below).
    pub elevation: f32,
    /// Playback rate multiplier.
    pub pitch: f32,
    /// Linear gain in [0, 1].
    pub gain: f32,
}

/// Tone output.
pub trait ToneSink {
    /// Start a tone on `channel`.
    fn play_tone(&mut self, channel: Channel, request: ToneRequest) -> Result<()>;

    /// Whether `channel` is still sounding.
    fn is_playing(&self, channel: Channel) -> bool;
}

/// Everything the engine needs from the host.
pub trait Host: WorldQuery + PlayerSource + MovementSink + SpeechSink + ToneSink {}

impl<T> Host for T where T: WorldQuery + PlayerSource + MovementSink + SpeechSink + ToneSink {}
