//! Obstacle sensor: ray casts and hit classification.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::entity::{EntityKind, Faction};
use crate::host::{EntityId, RayHit, WorldQuery};

/// Obstacle sensor settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Ray origin height above the player's feet.
    /// Default: 800
    pub chest_height: f32,

    /// Height difference the player walks over.
    /// Default: 450
    pub step_height: f32,

    /// Height difference the player can jump over.
    /// Default: 1200
    pub jump_height: f32,

    /// Diameter below which an untyped hit is a "small object".
    /// Default: 1000
    pub small_object_size: f32,

    /// Diameter below which an untyped hit is a "crate".
    /// Default: 3000
    pub crate_size: f32,

    /// Diameter below which an untyped hit is a "pillar".
    /// Default: 6000
    pub pillar_size: f32,

    /// Extra reach of the jump-height ray past the hit.
    /// Default: 500
    pub jump_clearance_margin: f32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            chest_height: 800.0,
            step_height: 450.0,
            jump_height: 1200.0,
            small_object_size: 1000.0,
            crate_size: 3000.0,
            pillar_size: 6000.0,
            jump_clearance_margin: 500.0,
        }
    }
}

/// What a ray ran into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObstacleClass {
    /// A typed world entity.
    Entity(EntityKind),
    /// Untyped object under the small-object size.
    SmallObject,
    /// Untyped object under the crate size.
    Crate,
    /// Untyped object under the pillar size.
    Pillar,
    /// Static geometry or anything larger.
    Wall,
}

impl ObstacleClass {
    /// Spoken name ("proximity door", "crate", "wall").
    pub fn name(self) -> &'static str {
        match self {
            ObstacleClass::Entity(kind) => kind.info().obstacle_name,
            ObstacleClass::SmallObject => "small object",
            ObstacleClass::Crate => "crate",
            ObstacleClass::Pillar => "pillar",
            ObstacleClass::Wall => "wall",
        }
    }

    /// Entity kind, if the hit was typed.
    pub fn kind(self) -> Option<EntityKind> {
        match self {
            ObstacleClass::Entity(kind) => Some(kind),
            _ => None,
        }
    }

    /// Whether the hit is a door.
    pub fn is_door(self) -> bool {
        self.kind().is_some_and(EntityKind::is_door)
    }

    /// Whether the hit is hostile to a player of `faction`.
    pub fn is_threat_to(self, faction: Faction) -> bool {
        self.kind().is_some_and(|k| k.is_threat_to(faction))
    }

    /// Rank for environment descriptions (0 = most important).
    pub fn describe_rank(self, faction: Faction) -> u8 {
        match self {
            ObstacleClass::Entity(kind) if kind.is_threat_to(faction) || kind.is_character() => 0,
            ObstacleClass::Entity(kind) if kind.is_interactive() => 1,
            ObstacleClass::Wall => 3,
            _ => 2,
        }
    }
}

/// Height relationship between the ray origin and a hit point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Traversal {
    /// Within step height: walk over it.
    Step,
    /// Within jump height: jump over it.
    Clearable,
    /// Too tall to get over.
    Wall,
}

impl Traversal {
    /// Whether the player can walk over it.
    pub fn is_jumpable(self) -> bool {
        self == Traversal::Step
    }

    /// Whether the player must jump to get over it.
    pub fn is_clearable(self) -> bool {
        self == Traversal::Clearable
    }
}

/// A classified ray hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sighting {
    /// Distance from the ray origin.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
    /// Hit entity, if any.
    pub entity: Option<EntityId>,
    /// Classification.
    pub class: ObstacleClass,
}

impl Sighting {
    /// Spoken name of what was hit.
    pub fn name(&self) -> &'static str {
        self.class.name()
    }
}

/// Casts and classifies rays through the host's world query.
///
/// Stateless: safe to call any number of times per tick.
#[derive(Clone, Debug, Default)]
pub struct ObstacleSensor {
    config: SensorConfig,
}

impl ObstacleSensor {
    /// Create a sensor.
    pub fn new(config: SensorConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Ray origin for a player standing at `feet`.
    pub fn chest(&self, feet: Vec3) -> Vec3 {
        feet + Vec3::Y * self.config.chest_height
    }

    /// Cast from `origin` along `direction`. None means clear within `max_range`.
    pub fn cast<W: WorldQuery + ?Sized>(
        &self,
        world: &W,
        origin: Vec3,
        direction: Vec3,
        max_range: f32,
    ) -> Option<Sighting> {
        let direction = direction.try_normalize()?;
        let hit = world.raycast(origin, direction, max_range)?;
        if hit.distance <= 0.0 || hit.distance > max_range {
            return None;
        }

        Some(Sighting {
            distance: hit.distance,
            point: hit.point,
            entity: hit.entity,
            class: self.classify(world, &hit),
        })
    }

    /// Free distance along a ray, `max_range` when clear.
    pub fn clearance<W: WorldQuery + ?Sized>(
        &self,
        world: &W,
        origin: Vec3,
        direction: Vec3,
        max_range: f32,
    ) -> f32 {
        self.cast(world, origin, direction, max_range)
            .map_or(max_range, |s| s.distance)
    }

    /// Classify a raw hit.
    pub fn classify<W: WorldQuery + ?Sized>(&self, world: &W, hit: &RayHit) -> ObstacleClass {
        if let Some(kind) = hit.entity.and_then(|id| world.entity_kind(id)) {
            return ObstacleClass::Entity(kind);
        }

        match hit.radius.map(|r| r * 2.0) {
            Some(d) if d < self.config.small_object_size => ObstacleClass::SmallObject,
            Some(d) if d < self.config.crate_size => ObstacleClass::Crate,
            Some(d) if d < self.config.pillar_size => ObstacleClass::Pillar,
            _ => ObstacleClass::Wall,
        }
    }

    /// How a player standing at `feet` gets past a hit seen along `direction`.
    ///
    /// Height is measured from the feet. A hit inside the jump band only
    /// counts as clearable when a ray cast at jump height passes over it.
    pub fn traversal<W: WorldQuery + ?Sized>(
        &self,
        world: &W,
        feet: Vec3,
        direction: Vec3,
        hit: &Sighting,
    ) -> Traversal {
        match self.analyze_height(feet.y, hit.point.y) {
            Traversal::Clearable => {
                let flat = Vec3::new(direction.x, 0.0, direction.z);
                let reach = Vec3::new(hit.point.x - feet.x, 0.0, hit.point.z - feet.z).length();
                let top = feet + Vec3::Y * self.config.jump_height;
                let over = self.cast(world, top, flat, reach + self.config.jump_clearance_margin);
                if over.is_some() {
                    Traversal::Wall
                } else {
                    Traversal::Clearable
                }
            }
            other => other,
        }
    }

    /// Classify the height difference between two heights.
    pub fn analyze_height(&self, origin_y: f32, hit_y: f32) -> Traversal {
        let delta = (hit_y - origin_y).abs();
        if delta < self.config.step_height {
            Traversal::Step
        } else if delta < self.config.jump_height {
            Traversal::Clearable
        } else {
            Traversal::Wall
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// World with one wall plane at z = wall_z and optional typed entity on it.
    struct MockWorld {
        wall_z: f32,
        entity: Option<(EntityId, EntityKind)>,
        radius: Option<f32>,
    }

    impl WorldQuery for MockWorld {
        fn live_entities(&self) -> Vec<EntityId> {
            self.entity.map(|(id, _)| vec![id]).unwrap_or_default()
        }

        fn entity_kind(&self, id: EntityId) -> Option<EntityKind> {
            self.entity.filter(|(e, _)| *e == id).map(|(_, k)| k)
        }

        fn entity_position(&self, _id: EntityId) -> Option<Vec3> {
            None
        }

        fn raycast(&self, origin: Vec3, direction: Vec3, max_range: f32) -> Option<RayHit> {
            if direction.z <= 0.0 {
                return None;
            }
            let t = (self.wall_z - origin.z) / direction.z;
            (t > 0.0 && t <= max_range).then(|| RayHit {
                distance: t,
                point: origin + direction * t,
                entity: self.entity.map(|(id, _)| id),
                radius: self.radius,
            })
        }
    }

    fn wall(z: f32) -> MockWorld {
        MockWorld {
            wall_z: z,
            entity: None,
            radius: None,
        }
    }

    #[test]
    fn test_height_bands() {
        let sensor = ObstacleSensor::default();
        for d in [-449.0, -200.0, 0.0, 300.0, 449.0] {
            let t = sensor.analyze_height(1000.0, 1000.0 + d);
            assert!(t.is_jumpable(), "delta {}", d);
            assert!(!t.is_clearable());
        }
        for d in [-1199.0, -450.0, 450.0, 800.0, 1199.0] {
            let t = sensor.analyze_height(1000.0, 1000.0 + d);
            assert!(t.is_clearable(), "delta {}", d);
            assert!(!t.is_jumpable());
        }
        for d in [-5000.0, -1200.0, 1200.0, 3000.0] {
            let t = sensor.analyze_height(1000.0, 1000.0 + d);
            assert!(!t.is_clearable() && !t.is_jumpable(), "delta {}", d);
        }
    }

    /// Box spanning all of x from `near` to `far` along +Z, `top` high.
    struct Block {
        near: f32,
        far: f32,
        top: f32,
    }

    impl WorldQuery for Block {
        fn live_entities(&self) -> Vec<EntityId> {
            Vec::new()
        }

        fn entity_kind(&self, _id: EntityId) -> Option<EntityKind> {
            None
        }

        fn entity_position(&self, _id: EntityId) -> Option<Vec3> {
            None
        }

        fn raycast(&self, origin: Vec3, direction: Vec3, max_range: f32) -> Option<RayHit> {
            if direction.z <= 0.0 || origin.y > self.top || origin.z > self.far {
                return None;
            }
            let t = ((self.near - origin.z) / direction.z).max(0.0);
            (t <= max_range).then(|| RayHit::geometry(t, origin + direction * t))
        }
    }

    #[test]
    fn test_traversal_from_feet() {
        let sensor = ObstacleSensor::default();
        let feet = Vec3::ZERO;
        let chest = sensor.chest(feet);

        let tall = Block { near: 1000.0, far: 1200.0, top: 3000.0 };
        let hit = sensor.cast(&tall, chest, Vec3::Z, 8000.0).expect("wall");
        assert_eq!(sensor.traversal(&tall, feet, Vec3::Z, &hit), Traversal::Wall);

        let crate_box = Block { near: 1500.0, far: 2500.0, top: 1000.0 };
        let hit = sensor.cast(&crate_box, chest, Vec3::Z, 8000.0).expect("crate");
        assert_eq!(
            sensor.traversal(&crate_box, feet, Vec3::Z, &hit),
            Traversal::Clearable
        );
    }

    #[test]
    fn test_traversal_foot_level_hit_is_step() {
        let sensor = ObstacleSensor::default();
        let feet = Vec3::new(0.0, 500.0, 0.0);
        let hit = Sighting {
            distance: 1000.0,
            point: Vec3::new(0.0, 500.0, 1000.0),
            entity: None,
            class: ObstacleClass::Wall,
        };
        let world = Block { near: 1000.0, far: 1200.0, top: 3000.0 };
        assert_eq!(sensor.traversal(&world, feet, Vec3::Z, &hit), Traversal::Step);
    }

    #[test]
    fn test_cast_hits_wall() {
        let sensor = ObstacleSensor::default();
        let hit = sensor
            .cast(&wall(1000.0), Vec3::new(0.0, 800.0, 0.0), Vec3::Z, 8000.0)
            .expect("wall in range");
        assert!((hit.distance - 1000.0).abs() < 0.01);
        assert_eq!(hit.class, ObstacleClass::Wall);
        assert_eq!(hit.name(), "wall");
    }

    #[test]
    fn test_cast_out_of_range_is_clear() {
        let sensor = ObstacleSensor::default();
        let world = wall(9000.0);
        assert!(sensor.cast(&world, Vec3::ZERO, Vec3::Z, 8000.0).is_none());
        assert_eq!(sensor.clearance(&world, Vec3::ZERO, Vec3::Z, 8000.0), 8000.0);
        assert_eq!(sensor.clearance(&world, Vec3::ZERO, Vec3::X, 8000.0), 8000.0);
    }

    #[test]
    fn test_cast_zero_direction_is_clear() {
        let sensor = ObstacleSensor::default();
        assert!(sensor.cast(&wall(10.0), Vec3::ZERO, Vec3::ZERO, 100.0).is_none());
    }

    #[test]
    fn test_classify_typed_entity() {
        let sensor = ObstacleSensor::default();
        let world = MockWorld {
            wall_z: 2000.0,
            entity: Some((EntityId(4), EntityKind::ProximityDoor)),
            radius: Some(100.0),
        };
        let hit = sensor.cast(&world, Vec3::ZERO, Vec3::Z, 8000.0).expect("door");
        assert!(hit.class.is_door());
        assert_eq!(hit.name(), "proximity door");
        assert_eq!(hit.entity, Some(EntityId(4)));
    }

    #[test]
    fn test_classify_by_size() {
        let sensor = ObstacleSensor::default();
        let cases = [
            (Some(400.0), "small object"),
            (Some(1200.0), "crate"),
            (Some(2500.0), "pillar"),
            (Some(4000.0), "wall"),
            (None, "wall"),
        ];
        for (radius, name) in cases {
            let world = MockWorld {
                wall_z: 500.0,
                entity: None,
                radius,
            };
            let hit = sensor.cast(&world, Vec3::ZERO, Vec3::Z, 8000.0).expect("hit");
            assert_eq!(hit.name(), name);
        }
    }

    #[test]
    fn test_describe_rank() {
        let f = Faction::Marine;
        assert_eq!(ObstacleClass::Entity(EntityKind::Alien).describe_rank(f), 0);
        assert_eq!(ObstacleClass::Entity(EntityKind::Switch).describe_rank(f), 1);
        assert_eq!(ObstacleClass::Crate.describe_rank(f), 2);
        assert_eq!(ObstacleClass::Wall.describe_rank(f), 3);
    }
}
