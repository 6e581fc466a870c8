//! Scripted host for unit tests.
//!
//! World geometry is a list of axis-aligned boxes. Entities are boxes that
//! carry a handle and a kind. Outputs are recorded for inspection.

use std::collections::HashMap;

use glam::{Mat3, Vec3};

use crate::entity::{EntityKind, Faction};
use crate::error::{OutputError, Result};
use crate::host::{
    Channel, DoorState, EntityId, LiftState, MovementSink, PlayerSource, RayHit, SpeechMode,
    SpeechSink, ToneRequest, ToneSink, WorldQuery,
};

/// Solid box, optionally an entity.
#[derive(Clone, Debug)]
pub struct MockBox {
    pub min: Vec3,
    pub max: Vec3,
    pub entity: Option<EntityId>,
}

/// Entity record.
#[derive(Clone, Debug)]
pub struct MockEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Vec3,
}

#[derive(Debug, Default)]
pub struct MockHost {
    pub position: Option<Vec3>,
    pub orientation: Option<Mat3>,
    pub pitch: Option<f32>,
    pub faction: Faction,
    pub entities: Vec<MockEntity>,
    pub boxes: Vec<MockBox>,
    pub doors: HashMap<EntityId, DoorState>,
    pub lifts: HashMap<EntityId, LiftState>,

    pub forward: f32,
    pub strafe: f32,
    pub turn: f32,
    pub jumps: u32,
    pub movement_writes: u32,
    pub spoken: Vec<(String, SpeechMode)>,
    pub tones: Vec<(Channel, ToneRequest)>,
    pub speech_error: Option<OutputError>,
    pub tone_error: Option<OutputError>,
    pub busy: Vec<Channel>,
}

impl MockHost {
    /// Player at the origin facing +Z.
    pub fn new() -> Self {
        Self {
            position: Some(Vec3::ZERO),
            orientation: Some(Mat3::IDENTITY),
            ..Self::default()
        }
    }

    /// Add an entity with a cubic body of half-size `half`.
    pub fn with_entity(mut self, id: u32, kind: EntityKind, position: Vec3, half: f32) -> Self {
        let id = EntityId(id);
        self.entities.push(MockEntity { id, kind, position });
        self.boxes.push(MockBox {
            min: position - Vec3::splat(half),
            max: position + Vec3::splat(half),
            entity: Some(id),
        });
        self
    }

    /// Add an entity with no body.
    pub fn with_marker(mut self, id: u32, kind: EntityKind, position: Vec3) -> Self {
        self.entities.push(MockEntity {
            id: EntityId(id),
            kind,
            position,
        });
        self
    }

    /// Add plain geometry.
    pub fn with_box(mut self, min: Vec3, max: Vec3) -> Self {
        self.boxes.push(MockBox {
            min,
            max,
            entity: None,
        });
        self
    }

    /// Spoken texts in order.
    pub fn texts(&self) -> Vec<&str> {
        self.spoken.iter().map(|(t, _)| t.as_str()).collect()
    }

    /// Number of utterances equal to `text`.
    pub fn count_spoken(&self, text: &str) -> usize {
        self.spoken.iter().filter(|(t, _)| t == text).count()
    }

    /// Tones played on `channel`.
    pub fn tones_on(&self, channel: Channel) -> Vec<ToneRequest> {
        self.tones
            .iter()
            .filter(|(c, _)| *c == channel)
            .map(|(_, r)| *r)
            .collect()
    }
}

fn ray_box(origin: Vec3, direction: Vec3, min: Vec3, max: Vec3, max_range: f32) -> Option<f32> {
    let mut t_near = 0.0f32;
    let mut t_far = max_range;
    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];
        if d.abs() < 1e-6 {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let (t1, t2) = {
            let a = (min[axis] - o) * inv;
            let b = (max[axis] - o) * inv;
            if a < b { (a, b) } else { (b, a) }
        };
        t_near = t_near.max(t1);
        t_far = t_far.min(t2);
        if t_near > t_far {
            return None;
        }
    }
    Some(t_near)
}

impl WorldQuery for MockHost {
    fn live_entities(&self) -> Vec<EntityId> {
        self.entities.iter().map(|e| e.id).collect()
    }

    fn entity_kind(&self, id: EntityId) -> Option<EntityKind> {
        self.entities.iter().find(|e| e.id == id).map(|e| e.kind)
    }

    fn entity_position(&self, id: EntityId) -> Option<Vec3> {
        self.entities.iter().find(|e| e.id == id).map(|e| e.position)
    }

    fn raycast(&self, origin: Vec3, direction: Vec3, max_range: f32) -> Option<RayHit> {
        self.boxes
            .iter()
            .filter(|b| {
                b.entity
                    .and_then(|id| self.doors.get(&id))
                    .map_or(true, |s| *s != DoorState::Open)
            })
            .filter_map(|b| {
                ray_box(origin, direction, b.min, b.max, max_range).map(|t| (t, b))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(t, b)| RayHit {
                distance: t,
                point: origin + direction * t,
                entity: b.entity,
                radius: Some((b.max - b.min).x.max((b.max - b.min).z) * 0.5),
            })
    }

    fn door_state(&self, id: EntityId) -> Option<DoorState> {
        self.doors.get(&id).copied()
    }

    fn lift_state(&self, id: EntityId) -> Option<LiftState> {
        self.lifts.get(&id).copied()
    }
}

impl PlayerSource for MockHost {
    fn player_position(&self) -> Option<Vec3> {
        self.position
    }

    fn player_orientation(&self) -> Option<Mat3> {
        self.orientation
    }

    fn view_pitch(&self) -> Option<f32> {
        self.pitch
    }

    fn player_faction(&self) -> Faction {
        self.faction
    }
}

impl MovementSink for MockHost {
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

impl SpeechSink for MockHost {
    fn speak(&mut self, text: &str, mode: SpeechMode) -> Result<()> {
        if let Some(err) = &self.speech_error {
            return Err(err.clone());
        }
        self.spoken.push((text.to_string(), mode));
        Ok(())
    }
}

impl ToneSink for MockHost {
    fn play_tone(&mut self, channel: Channel, request: ToneRequest) -> Result<()> {
        if let Some(err) = &self.tone_error {
            return Err(err.clone());
        }
        self.tones.push((channel, request));
        Ok(())
    }

    fn is_playing(&self, channel: Channel) -> bool {
        self.busy.contains(&channel)
    }
}
