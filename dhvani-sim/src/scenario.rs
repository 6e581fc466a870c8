//! YAML scenario files.
//!
//! A scenario describes a level, the player's start, a schedule of player
//! actions, and what the run is expected to produce:
//!
//! ```yaml
//! name: corridor_switch
//! player:
//!   position: [0, 0, 0]
//! walls:
//!   - { min: [-3000, 0, -1000], max: [-2800, 3000, 20000] }
//! entities:
//!   - { id: 1, kind: switch, position: [0, 0, 15000] }
//! events:
//!   - { at_ms: 0, trigger: toggle-enabled }
//! expect:
//!   arrived: true
//!   spoken: ["Arrived at switch. Press SPACE to interact."]
//! ```

use std::collections::HashSet;
use std::path::Path;

use dhvani_nav::{EntityId, EntityKind, Faction, NavConfig, Trigger};
use glam::Vec3;
use serde::Deserialize;

use crate::error::{Result, SimError};
use crate::sim::SimOutcome;
use crate::world::{LiftSpec, PhysicsConfig, PlayerState, SimEntity, SimWorld};

fn default_tick_ms() -> u64 {
    16
}

fn default_max_ticks() -> u32 {
    3000
}

fn default_stop_when_done() -> bool {
    true
}

/// Complete scenario file
#[derive(Clone, Debug, Deserialize)]
pub struct Scenario {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Host frame time (default: 16)
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Tick budget (default: 3000)
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u32,

    /// End the run once the target is announced reached or abandoned
    /// (default: true)
    #[serde(default = "default_stop_when_done")]
    pub stop_when_done: bool,

    #[serde(default)]
    pub physics: PhysicsConfig,

    #[serde(default)]
    pub player: PlayerSpec,

    #[serde(default)]
    pub walls: Vec<BoxSpec>,

    /// Free-standing props (crates, pillars)
    #[serde(default)]
    pub objects: Vec<BoxSpec>,

    #[serde(default)]
    pub entities: Vec<EntitySpec>,

    #[serde(default)]
    pub events: Vec<ScenarioEvent>,

    /// Engine configuration for this run
    #[serde(default)]
    pub nav: NavConfig,

    #[serde(default)]
    pub expect: Expectations,
}

/// Player start
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PlayerSpec {
    pub position: Vec3,
    /// Heading in degrees, clockwise from +Z
    pub yaw_deg: f32,
    /// View pitch in radians
    pub pitch: f32,
    pub faction: Faction,
}

/// Axis-aligned box
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct BoxSpec {
    pub min: Vec3,
    pub max: Vec3,
}

/// Typed entity. `half` gives it a box body centred on `position`.
#[derive(Clone, Debug, Deserialize)]
pub struct EntitySpec {
    pub id: u32,
    pub kind: EntityKind,
    pub position: Vec3,
    #[serde(default)]
    pub half: Option<Vec3>,
    /// Doors only: start open
    #[serde(default)]
    pub open: bool,
    /// Lifts only: travel override
    #[serde(default)]
    pub lift: Option<LiftSpec>,
}

/// Player action at a point in time. Exactly one action per event.
#[derive(Clone, Debug, Deserialize)]
pub struct ScenarioEvent {
    pub at_ms: u64,
    #[serde(default)]
    pub trigger: Option<Trigger>,
    /// Press the use key
    #[serde(default)]
    pub interact: bool,
    /// Remove an entity by id
    #[serde(default)]
    pub remove: Option<u32>,
    /// Set the view pitch (radians)
    #[serde(default)]
    pub pitch: Option<f32>,
    /// Kill the player
    #[serde(default)]
    pub kill: bool,
}

/// Resolved event action
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EventAction {
    Trigger(Trigger),
    Interact,
    Remove(EntityId),
    Pitch(f32),
    Kill,
}

impl ScenarioEvent {
    /// The single action this event carries.
    pub fn action(&self) -> Result<EventAction> {
        let mut actions = Vec::new();
        if let Some(trigger) = self.trigger {
            actions.push(EventAction::Trigger(trigger));
        }
        if self.interact {
            actions.push(EventAction::Interact);
        }
        if let Some(id) = self.remove {
            actions.push(EventAction::Remove(EntityId(id)));
        }
        if let Some(pitch) = self.pitch {
            actions.push(EventAction::Pitch(pitch));
        }
        if self.kill {
            actions.push(EventAction::Kill);
        }

        match actions.as_slice() {
            [action] => Ok(*action),
            [] => Err(SimError::Scenario(format!(
                "event at {} ms has no action",
                self.at_ms
            ))),
            _ => Err(SimError::Scenario(format!(
                "event at {} ms has {} actions, expected one",
                self.at_ms,
                actions.len()
            ))),
        }
    }
}

/// Checks applied to the run outcome
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Expectations {
    pub arrived: Option<bool>,
    pub gave_up: Option<bool>,
    pub min_escalations: Option<usize>,
    pub max_escalations: Option<usize>,
    /// Texts that must have been spoken
    pub spoken: Vec<String>,
    /// Texts that must never have been spoken
    pub not_spoken: Vec<String>,
}

impl Expectations {
    /// First unmet expectation, as an error.
    pub fn verify(&self, outcome: &SimOutcome) -> Result<()> {
        let fail = |msg: String| Err(SimError::Expectation(msg));

        if let Some(arrived) = self.arrived {
            if outcome.arrived_at_ms.is_some() != arrived {
                return fail(format!(
                    "arrived = {}, expected {}",
                    outcome.arrived_at_ms.is_some(),
                    arrived
                ));
            }
        }
        if let Some(gave_up) = self.gave_up {
            if outcome.gave_up != gave_up {
                return fail(format!("gave_up = {}, expected {}", outcome.gave_up, gave_up));
            }
        }

        let escalations = outcome.escalations.len();
        if self.min_escalations.is_some_and(|min| escalations < min) {
            return fail(format!("{} escalations, expected at least {:?}", escalations, self.min_escalations));
        }
        if self.max_escalations.is_some_and(|max| escalations > max) {
            return fail(format!("{} escalations, expected at most {:?}", escalations, self.max_escalations));
        }

        for text in &self.spoken {
            if !outcome.spoken.iter().any(|s| s == text) {
                return fail(format!("never heard {:?}", text));
            }
        }
        for text in &self.not_spoken {
            if outcome.spoken.iter().any(|s| s == text) {
                return fail(format!("unexpectedly heard {:?}", text));
            }
        }
        Ok(())
    }
}

impl Scenario {
    /// Load and validate a scenario file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate a scenario document.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let scenario: Self = serde_yaml::from_str(yaml)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Reject scenarios that cannot run.
    pub fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            return Err(SimError::Scenario("tick_ms must be positive".to_string()));
        }

        for (i, b) in self.walls.iter().chain(&self.objects).enumerate() {
            if b.min.cmpge(b.max).any() {
                return Err(SimError::Scenario(format!(
                    "box {} has min {:?} not below max {:?}",
                    i, b.min, b.max
                )));
            }
        }

        let mut ids = HashSet::new();
        for entity in &self.entities {
            if !ids.insert(entity.id) {
                return Err(SimError::Scenario(format!("duplicate entity id {}", entity.id)));
            }
        }

        for event in &self.events {
            event.action()?;
        }

        self.nav.validate()?;
        Ok(())
    }

    /// Resolved events, ordered by time (stable for equal times).
    pub fn schedule(&self) -> Result<Vec<(u64, EventAction)>> {
        let mut events = self
            .events
            .iter()
            .map(|e| e.action().map(|a| (e.at_ms, a)))
            .collect::<Result<Vec<_>>>()?;
        events.sort_by_key(|(at, _)| *at);
        Ok(events)
    }

    /// Build the level.
    pub fn build_world(&self) -> SimWorld {
        let mut player = PlayerState::new(self.player.position, self.player.yaw_deg.to_radians());
        player.pitch = self.player.pitch;
        player.faction = self.player.faction;

        let mut world = SimWorld::new(self.physics.clone(), player);
        for wall in &self.walls {
            world.add_wall(wall.min, wall.max);
        }
        for object in &self.objects {
            world.add_object(object.min, object.max);
        }
        for spec in &self.entities {
            let mut entity = match spec.half {
                Some(half) => SimEntity::body(spec.id, spec.kind, spec.position, half),
                None => SimEntity::marker(spec.id, spec.kind, spec.position),
            };
            if let Some(lift) = spec.lift {
                entity = entity.with_lift(lift);
            }
            if spec.open {
                entity = entity.opened();
            }
            world.add_entity(entity);
        }
        world
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
name: minimal
entities:
  - { id: 1, kind: switch, position: [0, 0, 9000] }
  - { id: 2, kind: switch_door, position: [0, 1500, 4000], half: [1500, 1500, 100] }
events:
  - { at_ms: 500, interact: true }
  - { at_ms: 0, trigger: toggle-enabled }
"#;

    #[test]
    fn test_defaults_fill_in() {
        let s = Scenario::from_yaml(MINIMAL).unwrap();
        assert_eq!(s.tick_ms, 16);
        assert_eq!(s.max_ticks, 3000);
        assert!(s.stop_when_done);
        assert_eq!(s.player.position, Vec3::ZERO);
        assert_eq!(s.nav, NavConfig::default());
        assert!(s.expect.spoken.is_empty());
    }

    #[test]
    fn test_schedule_sorted_by_time() {
        let s = Scenario::from_yaml(MINIMAL).unwrap();
        let schedule = s.schedule().unwrap();
        assert_eq!(
            schedule,
            vec![
                (0, EventAction::Trigger(Trigger::ToggleEnabled)),
                (500, EventAction::Interact),
            ]
        );
    }

    #[test]
    fn test_build_world() {
        use dhvani_nav::{DoorState, WorldQuery};

        let s = Scenario::from_yaml(MINIMAL).unwrap();
        let world = s.build_world();
        assert_eq!(world.live_entities(), vec![EntityId(1), EntityId(2)]);
        assert_eq!(world.door_state(EntityId(2)), Some(DoorState::Closed));
        assert_eq!(world.door_state(EntityId(1)), None);
    }

    #[test]
    fn test_rejects_bad_events() {
        let none = "name: x\nevents:\n  - { at_ms: 5 }\n";
        assert!(matches!(Scenario::from_yaml(none), Err(SimError::Scenario(_))));

        let two = "name: x\nevents:\n  - { at_ms: 5, interact: true, kill: true }\n";
        assert!(matches!(Scenario::from_yaml(two), Err(SimError::Scenario(_))));

        let unknown = "name: x\nevents:\n  - { at_ms: 5, trigger: do-a-barrel-roll }\n";
        assert!(matches!(Scenario::from_yaml(unknown), Err(SimError::Scenario(_))));
    }

    #[test]
    fn test_rejects_bad_geometry_and_config() {
        let inverted = "name: x\nwalls:\n  - { min: [0, 0, 0], max: [-1, 10, 10] }\n";
        assert!(matches!(Scenario::from_yaml(inverted), Err(SimError::Scenario(_))));

        let dup = "name: x\nentities:\n  - { id: 1, kind: item, position: [0, 0, 0] }\n  - { id: 1, kind: item, position: [0, 0, 5] }\n";
        assert!(matches!(Scenario::from_yaml(dup), Err(SimError::Scenario(_))));

        let config = "name: x\nnav:\n  strategy:\n    cycle_limit: 0\n";
        assert!(matches!(Scenario::from_yaml(config), Err(SimError::Config(_))));
    }
}
