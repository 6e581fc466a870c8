//! Target selection.
//!
//! Scans live entities for the best instance of a requested category.
//! Score = distance - priority bonus; the lowest score wins and ties keep
//! the entity enumerated first.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::entity::{EntityKind, Faction, PriorityClass, TargetCategory};
use crate::host::{EntityId, WorldQuery};

/// Target scoring settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Bonus for entities hostile to the player.
    /// Default: 5000
    pub threat_bonus: f32,

    /// Bonus for switches, terminals and generators.
    /// Default: 2000
    pub mission_bonus: f32,

    /// Bonus for doors.
    /// Default: 1500
    pub door_bonus: f32,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            threat_bonus: 5000.0,
            mission_bonus: 2000.0,
            door_bonus: 1500.0,
        }
    }
}

/// A selected navigation target.
#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    /// Entity handle.
    pub id: EntityId,
    /// Behaviour type.
    pub kind: EntityKind,
    /// Position when selected.
    pub position: Vec3,
    /// 3D distance from the player when selected.
    pub distance: f32,
    /// Spoken name ("door", "switch").
    pub name: &'static str,
}

/// Picks targets from the live entity list.
#[derive(Clone, Debug, Default)]
pub struct TargetSelector {
    config: SelectorConfig,
}

impl TargetSelector {
    /// Create a selector.
    pub fn new(config: SelectorConfig) -> Self {
        Self { config }
    }

    /// Score reduction for `kind` when the player is `faction`.
    pub fn priority_bonus(&self, kind: EntityKind, faction: Faction) -> f32 {
        if kind.is_threat_to(faction) {
            return self.config.threat_bonus;
        }
        match kind.info().priority {
            PriorityClass::Mission => self.config.mission_bonus,
            PriorityClass::Door => self.config.door_bonus,
            PriorityClass::Plain => 0.0,
        }
    }

    /// Best target of `category` for a player at `player`.
    pub fn select<W: WorldQuery + ?Sized>(
        &self,
        world: &W,
        category: TargetCategory,
        player: Vec3,
        faction: Faction,
    ) -> Option<Target> {
        let mut best: Option<(f32, Target)> = None;

        for target in self.matching(world, category, player) {
            let score = target.distance - self.priority_bonus(target.kind, faction);
            if best.as_ref().map_or(true, |(s, _)| score < *s) {
                best = Some((score, target));
            }
        }

        best.map(|(score, target)| {
            log::debug!(
                "Selected {} at {:.0} (score {:.0})",
                target.name,
                target.distance,
                score
            );
            target
        })
    }

    /// Every entity of `category` within `range`, nearest first.
    pub fn within_range<W: WorldQuery + ?Sized>(
        &self,
        world: &W,
        category: TargetCategory,
        player: Vec3,
        range: f32,
    ) -> Vec<Target> {
        let mut found: Vec<Target> = self
            .matching(world, category, player)
            .filter(|t| t.distance <= range)
            .collect();
        found.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        found
    }

    /// Resolve a previously selected entity against the live world.
    pub fn refresh<W: WorldQuery + ?Sized>(&self, world: &W, id: EntityId, player: Vec3) -> Option<Target> {
        let kind = world.entity_kind(id)?;
        let position = world.entity_position(id)?;
        Some(Target {
            id,
            kind,
            position,
            distance: player.distance(position),
            name: kind.info().target_name,
        })
    }

    /// Nearest entity hostile to `faction` within `range`.
    pub fn nearest_threat<W: WorldQuery + ?Sized>(
        &self,
        world: &W,
        player: Vec3,
        faction: Faction,
        range: f32,
    ) -> Option<Target> {
        world
            .live_entities()
            .into_iter()
            .filter_map(|id| self.refresh(world, id, player))
            .filter(|t| t.kind.is_threat_to(faction) && t.distance <= range)
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn matching<'a, W: WorldQuery + ?Sized>(
        &'a self,
        world: &'a W,
        category: TargetCategory,
        player: Vec3,
    ) -> impl Iterator<Item = Target> + 'a {
        world.live_entities().into_iter().filter_map(move |id| {
            let kind = world.entity_kind(id)?;
            if !kind.in_category(category) {
                return None;
            }
            let position = world.entity_position(id)?;
            Some(Target {
                id,
                kind,
                position,
                distance: player.distance(position),
                name: kind.info().target_name,
            })
        })
    }
}
