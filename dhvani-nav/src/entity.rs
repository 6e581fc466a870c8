//! Entity behaviour types and their navigation properties.
//!
//! One lookup per [`EntityKind`] answers every question the engine asks
//! about a world entity: what to call it, which target categories it
//! belongs to, how strongly to prefer it, and how its radar tone sounds.

use serde::{Deserialize, Serialize};

/// Behaviour type tag of a world entity, as reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Alien,
    QueenAlien,
    Facehugger,
    Predator,
    Xenoborg,
    Marine,
    AutoGun,
    ProximityDoor,
    LiftDoor,
    SwitchDoor,
    Switch,
    Lift,
    Platform,
    Generator,
    Terminal,
    PowerCable,
    Fan,
    Hazard,
    SelfDestruct,
    Grenade,
    Rocket,
    Item,
    Debris,
    Corpse,
    Structure,
    Screen,
    Track,
}

/// Side the player is playing. Threats are relative to it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    #[default]
    Marine,
    Predator,
    Alien,
}

/// Target category requested by the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetCategory {
    /// Doors, switches, lifts, terminals, generators.
    #[default]
    Interactive,
    /// Other characters.
    Npc,
    /// Doors and lifts.
    Exit,
    /// Pickups.
    Item,
    /// Targeting disabled.
    None,
}

impl TargetCategory {
    /// Next category in the player-facing cycle.
    ///
    /// `None` re-enters the cycle at `Interactive`.
    pub fn next(self) -> Self {
        match self {
            TargetCategory::Interactive => TargetCategory::Npc,
            TargetCategory::Npc => TargetCategory::Exit,
            TargetCategory::Exit => TargetCategory::Item,
            TargetCategory::Item | TargetCategory::None => TargetCategory::Interactive,
        }
    }

    /// Spoken name.
    pub fn name(self) -> &'static str {
        match self {
            TargetCategory::Interactive => "interactive",
            TargetCategory::Npc => "enemy",
            TargetCategory::Exit => "exit",
            TargetCategory::Item => "item",
            TargetCategory::None => "none",
        }
    }
}

/// Coarse priority class used when ranking targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriorityClass {
    /// Switches, terminals, generators.
    Mission,
    /// Doors of any kind.
    Door,
    /// No bonus.
    Plain,
}

/// Static properties of an [`EntityKind`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KindInfo {
    /// Name used when the entity blocks a ray ("proximity door").
    pub obstacle_name: &'static str,
    /// Name used when the entity is a navigation target ("door").
    pub target_name: &'static str,
    /// Radar tone base pitch.
    pub pitch_multiplier: f32,
    /// Ranking class for target selection.
    pub priority: PriorityClass,
    /// Spoken guidance when the entity is directly ahead.
    pub guidance: Option<Guidance>,
}

/// How the player is expected to interact with an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Guidance {
    /// Press the use key on it (doors, switches).
    Operate,
    /// Stand on it (lifts).
    Ride,
    /// Press the use key to interact (terminals, generators).
    Interact,
}

impl EntityKind {
    /// Lookup table entry for this kind.
    pub fn info(self) -> KindInfo {
        use EntityKind::*;
        use PriorityClass::{Door, Mission, Plain};

        let (obstacle_name, target_name, pitch_multiplier, priority, guidance) = match self {
            Alien => ("alien", "alien", 0.75, Plain, None),
            QueenAlien => ("queen alien", "queen", 0.6, Plain, None),
            Facehugger => ("facehugger", "facehugger", 1.8, Plain, None),
            Predator => ("predator", "predator", 1.2, Plain, None),
            Xenoborg => ("xenoborg", "xenoborg", 0.9, Plain, None),
            Marine => ("marine", "marine", 1.5, Plain, None),
            AutoGun => ("autogun", "autogun", 1.0, Plain, None),
            ProximityDoor => ("proximity door", "door", 1.0, Door, Some(Guidance::Operate)),
            LiftDoor => ("lift door", "lift door", 1.0, Door, Some(Guidance::Operate)),
            SwitchDoor => ("door", "door", 1.0, Door, Some(Guidance::Operate)),
            Switch => ("switch", "switch", 1.0, Mission, Some(Guidance::Operate)),
            Lift => ("lift", "lift", 1.0, Plain, Some(Guidance::Ride)),
            Platform => ("lift", "lift", 1.0, Plain, Some(Guidance::Ride)),
            Generator => ("generator", "generator", 1.0, Mission, Some(Guidance::Interact)),
            Terminal => ("terminal", "terminal", 1.0, Mission, Some(Guidance::Interact)),
            PowerCable => ("power cable", "target", 1.0, Plain, None),
            Fan => ("fan", "target", 1.0, Plain, None),
            Hazard => ("hazard", "target", 1.0, Plain, None),
            SelfDestruct => ("self-destruct console", "target", 1.0, Plain, None),
            Grenade => ("grenade", "target", 1.0, Plain, None),
            Rocket => ("rocket", "target", 1.0, Plain, None),
            Item => ("object", "item", 1.0, Plain, None),
            Debris => ("debris", "target", 1.0, Plain, None),
            Corpse => ("corpse", "target", 1.0, Plain, None),
            Structure => ("structure", "target", 1.0, Plain, None),
            Screen => ("screen", "target", 1.0, Plain, None),
            Track => ("track", "target", 1.0, Plain, None),
        };

        KindInfo {
            obstacle_name,
            target_name,
            pitch_multiplier,
            priority,
            guidance,
        }
    }

    /// Whether this kind is a door the player must open.
    pub fn is_door(self) -> bool {
        matches!(
            self,
            EntityKind::ProximityDoor | EntityKind::LiftDoor | EntityKind::SwitchDoor
        )
    }

    /// Whether this kind is a lift or moving platform.
    pub fn is_lift(self) -> bool {
        matches!(self, EntityKind::Lift | EntityKind::Platform)
    }

    /// Whether this kind is a character.
    pub fn is_character(self) -> bool {
        matches!(
            self,
            EntityKind::Alien
                | EntityKind::QueenAlien
                | EntityKind::Facehugger
                | EntityKind::Predator
                | EntityKind::Xenoborg
                | EntityKind::Marine
        )
    }

    /// Whether this kind is something the player can operate.
    pub fn is_interactive(self) -> bool {
        self.info().guidance.is_some()
    }

    /// Whether this kind belongs to `category`.
    pub fn in_category(self, category: TargetCategory) -> bool {
        match category {
            TargetCategory::Interactive => self.is_interactive(),
            TargetCategory::Npc => self.is_character(),
            TargetCategory::Exit => self.is_door() || self.is_lift(),
            TargetCategory::Item => self == EntityKind::Item,
            TargetCategory::None => false,
        }
    }

    /// Whether this kind is hostile to a player of `faction`.
    pub fn is_threat_to(self, faction: Faction) -> bool {
        use EntityKind::*;
        match self {
            Alien | QueenAlien | Facehugger => faction != Faction::Alien,
            Predator => faction != Faction::Predator,
            Marine => faction != Faction::Marine,
            Xenoborg | AutoGun => true,
            _ => false,
        }
    }
}
