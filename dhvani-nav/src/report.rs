//! On-demand spoken reports.
//!
//! Each report is built from fresh ray casts and entity queries at the
//! moment the player asks for it. Builders return text only; the engine
//! decides how to speak it.

use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

use crate::core::{Direction, flat_forward, flat_right};
use crate::entity::{Faction, Guidance, TargetCategory};
use crate::host::WorldQuery;
use crate::phrases::{capitalize, nearness, spatial, spoken_distance, whole_meters};
use crate::sensor::{ObstacleClass, ObstacleSensor, Traversal};
use crate::target::{Target, TargetSelector};

/// Ranges and limits for on-demand reports.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Range of the look-ahead ray.
    /// Default: 12000
    pub ahead_range: f32,

    /// Range of the side rays used for detour guidance.
    /// Default: 8000
    pub side_range: f32,

    /// Side clearance that counts as an open way around.
    /// Default: 2000
    pub side_clear_distance: f32,

    /// Margin by which one side must beat the other to be recommended.
    /// Default: 1000
    pub side_margin: f32,

    /// Range of the four-way surroundings scan.
    /// Default: 12000
    pub surroundings_range: f32,

    /// Range of the ten-direction environment scan.
    /// Default: 18000
    pub environment_range: f32,

    /// Most entries spoken in an environment description.
    /// Default: 6
    pub environment_entries: usize,

    /// Most interactive elements listed by name.
    /// Default: 8
    pub interactive_entries: usize,

    /// Most radar contacts listed.
    /// Default: 5
    pub radar_entries: usize,

    /// Window in which an identical look-ahead report plays only its tone (ms).
    /// Default: 3000
    pub repeat_ms: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            ahead_range: 12_000.0,
            side_range: 8000.0,
            side_clear_distance: 2000.0,
            side_margin: 1000.0,
            surroundings_range: 12_000.0,
            environment_range: 18_000.0,
            environment_entries: 6,
            interactive_entries: 8,
            radar_entries: 5,
            repeat_ms: 3000,
        }
    }
}

/// Result of a look-ahead.
#[derive(Clone, Debug, PartialEq)]
pub struct AheadReport {
    /// Sentence to speak.
    pub text: String,
    /// Whether the ray hit anything.
    pub hit: bool,
}

/// Report builder for one player pose.
pub struct Survey<'a, W: ?Sized> {
    world: &'a W,
    sensor: &'a ObstacleSensor,
    config: &'a ReportConfig,
    feet: Vec3,
    orientation: Mat3,
}

impl<'a, W: WorldQuery + ?Sized> Survey<'a, W> {
    /// Survey from a player standing at `feet` facing `orientation`.
    pub fn new(
        world: &'a W,
        sensor: &'a ObstacleSensor,
        config: &'a ReportConfig,
        feet: Vec3,
        orientation: Mat3,
    ) -> Self {
        Self {
            world,
            sensor,
            config,
            feet,
            orientation,
        }
    }

    /// What lies along the view direction, and how to get past it.
    ///
    /// The ray follows the view pitch. Untyped hits are rated by height
    /// above the player's feet; a hit under jump height is only jumpable if
    /// a level ray at jump height passes over it.
    pub fn ahead(&self, interact_key: &str) -> AheadReport {
        let origin = self.sensor.chest(self.feet);
        let view = self.orientation.z_axis;

        let Some(hit) = self.sensor.cast(self.world, origin, view, self.config.ahead_range) else {
            return AheadReport {
                text: "Clear ahead.".to_string(),
                hit: false,
            };
        };

        let lead = format!(
            "{} {}, {:.0} millimeters.",
            hit.name(),
            nearness(hit.distance),
            hit.distance
        );
        let guidance = hit.class.kind().and_then(|k| k.info().guidance);

        let advice = match guidance {
            Some(g) => guidance_phrase(g, interact_key),
            None => match self.sensor.traversal(
                self.world,
                self.feet,
                flat_forward(self.orientation),
                &hit,
            ) {
                Traversal::Step => "Can walk over.".to_string(),
                Traversal::Clearable => "Can jump over.".to_string(),
                Traversal::Wall => self.detour_advice().to_string(),
            },
        };

        AheadReport {
            text: capitalize(&format!("{} {}", lead, advice)),
            hit: true,
        }
    }

    /// Which side, if any, offers a way around an obstacle ahead.
    pub fn detour_advice(&self) -> &'static str {
        let origin = self.sensor.chest(self.feet);
        let right = flat_right(self.orientation);
        let range = self.config.side_range;
        let left_clear = self.sensor.clearance(self.world, origin, -right, range);
        let right_clear = self.sensor.clearance(self.world, origin, right, range);

        let open = self.config.side_clear_distance;
        let margin = self.config.side_margin;
        match (left_clear > open, right_clear > open) {
            (true, true) if left_clear > right_clear + margin => "Go left to continue.",
            (true, true) if right_clear > left_clear + margin => "Go right to continue.",
            (true, true) => "Clear paths left and right.",
            (true, false) => "Go left to continue.",
            (false, true) => "Go right to continue.",
            (false, false) => "Path blocked. Try turning around.",
        }
    }

    /// Nearest obstacle front, left, right and back.
    pub fn surroundings(&self) -> String {
        let origin = self.sensor.chest(self.feet);
        let forward = flat_forward(self.orientation);
        let right = flat_right(self.orientation);
        let range = self.config.surroundings_range;

        let parts: Vec<String> = [
            ("Front", forward),
            ("Left", -right),
            ("Right", right),
            ("Back", -forward),
        ]
        .into_iter()
        .map(|(label, dir)| match self.sensor.cast(self.world, origin, dir, range) {
            Some(hit) => format!(
                "{}: {}, {} meters.",
                label,
                hit.name(),
                (hit.distance / 1000.0) as u32
            ),
            None => format!("{} clear.", label),
        })
        .collect();

        parts.join(" ")
    }

    /// Prioritised description of what surrounds the player in ten directions.
    ///
    /// Threats and characters come first, then interactive elements, then
    /// objects, then walls; ties go to the nearer hit.
    pub fn environment(&self, faction: Faction) -> String {
        let origin = self.sensor.chest(self.feet);
        let range = self.config.environment_range;

        let mut found: Vec<(u8, f32, Direction, ObstacleClass)> = Direction::ALL
            .into_iter()
            .filter_map(|dir| {
                self.sensor
                    .cast(self.world, origin, dir.to_world(self.orientation), range)
                    .map(|hit| (hit.class.describe_rank(faction), hit.distance, dir, hit.class))
            })
            .collect();

        let ahead_open = !found.iter().any(|(_, _, dir, _)| *dir == Direction::Ahead);
        if found.is_empty() {
            return "Area is clear in all directions.".to_string();
        }

        found.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));

        let mut text = String::new();
        if ahead_open {
            text.push_str("Open path ahead. ");
        }
        for (_, distance, dir, class) in found.iter().take(self.config.environment_entries) {
            let qualifier = spatial(*distance);
            let entry = if qualifier.is_empty() {
                format!(
                    "{} {}, {} meters. ",
                    class.name(),
                    dir.phrase(),
                    whole_meters(*distance)
                )
            } else {
                format!(
                    "{} {} {}, {} meters. ",
                    class.name(),
                    qualifier,
                    dir.phrase(),
                    whole_meters(*distance)
                )
            };
            text.push_str(&capitalize(&entry));
        }

        text.trim_end().to_string()
    }

    /// Interactive elements within `range`, nearest first.
    pub fn interactives(&self, selector: &TargetSelector, range: f32) -> String {
        let found = selector.within_range(self.world, TargetCategory::Interactive, self.feet, range);
        if found.is_empty() {
            return "No interactive elements detected nearby.".to_string();
        }

        let mut text = String::from("Interactive elements: ");
        for target in found.iter().take(self.config.interactive_entries) {
            text.push_str(&format!(
                "{} {}, {}. ",
                target.name,
                Direction::classify(self.feet, self.orientation, target.position).name(),
                spoken_distance(target.distance)
            ));
        }
        if found.len() > self.config.interactive_entries {
            text.push_str(&format!(
                "And {} more.",
                found.len() - self.config.interactive_entries
            ));
        }

        text.trim_end().to_string()
    }

    /// Threats, doors and lifts within `range`, nearest first.
    pub fn radar(&self, faction: Faction, range: f32) -> String {
        let mut contacts: Vec<(f32, &'static str, Direction)> = self
            .world
            .live_entities()
            .into_iter()
            .filter_map(|id| {
                let kind = self.world.entity_kind(id)?;
                if !(kind.is_threat_to(faction) || kind.is_door() || kind.is_lift()) {
                    return None;
                }
                let position = self.world.entity_position(id)?;
                let distance = self.feet.distance(position);
                (distance <= range).then(|| {
                    (
                        distance,
                        kind.info().target_name,
                        Direction::classify(self.feet, self.orientation, position),
                    )
                })
            })
            .collect();

        if contacts.is_empty() {
            return "Radar scan: no contacts nearby.".to_string();
        }

        contacts.sort_by(|a, b| a.0.total_cmp(&b.0));
        let mut text = String::from("Radar scan: ");
        for (_, name, dir) in contacts.iter().take(self.config.radar_entries) {
            text.push_str(&format!("{} {}. ", name, dir.name()));
        }

        text.trim_end().to_string()
    }
}

/// "Navigating to door. Front left, close."
pub fn target_announcement(target: &Target, feet: Vec3, orientation: Mat3) -> String {
    let direction = Direction::classify(feet, orientation, target.position);
    format!(
        "Navigating to {}. {}, {}.",
        target.name,
        capitalize(direction.name()),
        spoken_distance(target.distance)
    )
}

fn guidance_phrase(guidance: Guidance, interact_key: &str) -> String {
    match guidance {
        Guidance::Operate => format!("Press {} to operate.", interact_key),
        Guidance::Ride => "Step on to ride.".to_string(),
        Guidance::Interact => format!("Press {} to interact.", interact_key),
    }
}
