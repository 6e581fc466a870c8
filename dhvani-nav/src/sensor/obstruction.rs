//! Periodic forward/left/right obstruction scan with debounced alerts.

use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

use super::ray::{ObstacleClass, ObstacleSensor, Traversal};
use crate::arbiter::{AnnouncementArbiter, Tier};
use crate::core::{Side, flat_forward, flat_right};
use crate::host::WorldQuery;

/// Obstruction monitor settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstructionConfig {
    /// Whether spoken alerts start enabled.
    /// Default: true
    pub alerts_enabled: bool,

    /// Scan range for all three rays.
    /// Default: 12000
    pub range: f32,

    /// Forward distance under which an alert is considered.
    /// Default: 1500
    pub alert_distance: f32,

    /// Consecutive same-type scans required before an alert fires.
    /// Default: 3
    pub debounce_count: u32,

    /// Minimum time before the same alert type repeats (ms).
    /// Default: 3000
    pub repeat_ms: u64,
}

impl Default for ObstructionConfig {
    fn default() -> Self {
        Self {
            alerts_enabled: true,
            range: 12_000.0,
            alert_distance: 1500.0,
            debounce_count: 3,
            repeat_ms: 3000,
        }
    }
}

/// Collision alert category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertKind {
    /// Walkable step.
    Step,
    /// Obstacle that needs a jump.
    LowObstacle,
    /// Impassable.
    Wall,
}

impl AlertKind {
    /// Spoken alert.
    pub fn message(self) -> &'static str {
        match self {
            AlertKind::Step => "Step ahead.",
            AlertKind::LowObstacle => "Low obstacle. Jump.",
            AlertKind::Wall => "Wall ahead.",
        }
    }

    fn from_traversal(traversal: Traversal) -> Self {
        match traversal {
            Traversal::Step => AlertKind::Step,
            Traversal::Clearable => AlertKind::LowObstacle,
            Traversal::Wall => AlertKind::Wall,
        }
    }
}

/// Latest scan results and alert bookkeeping.
#[derive(Clone, Debug, Default)]
pub struct ObstructionState {
    /// Whether spoken alerts are on.
    pub alerts_enabled: bool,
    /// Forward hit distance, None when clear.
    pub forward_distance: Option<f32>,
    /// Forward hit classification.
    pub forward_class: Option<ObstacleClass>,
    /// Forward hit height relationship.
    pub forward_traversal: Option<Traversal>,
    /// Left clearance (scan range when clear).
    pub left_distance: f32,
    /// Right clearance (scan range when clear).
    pub right_distance: f32,
    /// Last alert spoken and when.
    pub last_alert: Option<(AlertKind, u64)>,
    pending: Option<AlertKind>,
    confirmations: u32,
}

impl ObstructionState {
    /// Whether something blocks the forward ray.
    pub fn forward_blocked(&self) -> bool {
        self.forward_distance.is_some()
    }

    /// Whether the forward hit can be walked over.
    pub fn forward_is_jumpable(&self) -> bool {
        self.forward_traversal.is_some_and(Traversal::is_jumpable)
    }

    /// Whether the forward hit must be jumped.
    pub fn forward_is_clearable(&self) -> bool {
        self.forward_traversal.is_some_and(Traversal::is_clearable)
    }

    /// Clearance on one side.
    pub fn side_distance(&self, side: Side) -> f32 {
        match side {
            Side::Left => self.left_distance,
            Side::Right => self.right_distance,
        }
    }
}

/// Scans around the player and decides when to speak collision alerts.
#[derive(Clone, Debug)]
pub struct ObstructionMonitor {
    config: ObstructionConfig,
    state: ObstructionState,
}

impl ObstructionMonitor {
    /// Create a monitor with nothing scanned yet.
    pub fn new(config: ObstructionConfig) -> Self {
        let state = ObstructionState {
            alerts_enabled: config.alerts_enabled,
            left_distance: config.range,
            right_distance: config.range,
            ..Default::default()
        };
        Self { config, state }
    }

    /// Latest scan state.
    pub fn state(&self) -> &ObstructionState {
        &self.state
    }

    /// Active configuration.
    pub fn config(&self) -> &ObstructionConfig {
        &self.config
    }

    /// Flip spoken alerts. Returns the new setting.
    pub fn toggle_alerts(&mut self) -> bool {
        self.state.alerts_enabled = !self.state.alerts_enabled;
        self.reset_debounce();
        self.state.alerts_enabled
    }

    /// Scan forward, left and right from the chest of a player at `feet`.
    ///
    /// Returns an alert when one passes the debounce, the repeat window and
    /// the arbiter's HIGH gate. The caller speaks it and records the tier.
    pub fn update<W: WorldQuery + ?Sized>(
        &mut self,
        world: &W,
        sensor: &ObstacleSensor,
        feet: Vec3,
        orientation: Mat3,
        arbiter: &AnnouncementArbiter,
        now_ms: u64,
    ) -> Option<AlertKind> {
        let origin = sensor.chest(feet);
        let forward = flat_forward(orientation);
        let right = flat_right(orientation);
        let range = self.config.range;

        match sensor.cast(world, origin, forward, range) {
            Some(hit) => {
                self.state.forward_distance = Some(hit.distance);
                self.state.forward_class = Some(hit.class);
                self.state.forward_traversal = Some(sensor.traversal(world, feet, forward, &hit));
            }
            None => {
                self.state.forward_distance = None;
                self.state.forward_class = None;
                self.state.forward_traversal = None;
            }
        }
        self.state.left_distance = sensor.clearance(world, origin, -right, range);
        self.state.right_distance = sensor.clearance(world, origin, right, range);

        if !self.state.alerts_enabled {
            return None;
        }

        let close = self
            .state
            .forward_distance
            .filter(|&d| d < self.config.alert_distance)
            .and(self.state.forward_traversal);

        let Some(traversal) = close else {
            self.reset_debounce();
            return None;
        };

        let kind = AlertKind::from_traversal(traversal);
        if self.state.pending == Some(kind) {
            self.state.confirmations += 1;
        } else {
            self.state.pending = Some(kind);
            self.state.confirmations = 1;
        }

        let confirmed = self.state.confirmations >= self.config.debounce_count;
        let fresh = match self.state.last_alert {
            Some((last, at)) => last != kind || now_ms.saturating_sub(at) > self.config.repeat_ms,
            None => true,
        };

        if confirmed && fresh && arbiter.is_allowed(Tier::High, now_ms) {
            log::debug!(
                "Obstruction alert {:?} at {:.0}",
                kind,
                self.state.forward_distance.unwrap_or_default()
            );
            self.state.last_alert = Some((kind, now_ms));
            Some(kind)
        } else {
            None
        }
    }

    fn reset_debounce(&mut self) {
        self.state.pending = None;
        self.state.confirmations = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;
    use crate::host::{EntityId, RayHit};

    /// Obstacle face ahead (+Z) with a configurable hit height and top.
    /// Rays starting above `top` pass over it.
    struct Corridor {
        ahead: Option<f32>,
        hit_height: f32,
        top: f32,
    }

    impl Corridor {
        fn wall(ahead: f32) -> Self {
            Self {
                ahead: Some(ahead),
                hit_height: 800.0,
                top: 3000.0,
            }
        }

        fn low(ahead: f32, top: f32) -> Self {
            Self {
                ahead: Some(ahead),
                hit_height: 800.0,
                top,
            }
        }

        fn floor_level(ahead: f32) -> Self {
            Self {
                ahead: Some(ahead),
                hit_height: 0.0,
                top: 3000.0,
            }
        }
    }

    impl WorldQuery for Corridor {
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
            if direction.z > 0.9 {
                if origin.y > self.top {
                    return None;
                }
                self.ahead.filter(|&d| d <= max_range).map(|d| {
                    RayHit::geometry(d, Vec3::new(origin.x, self.hit_height, origin.z + d))
                })
            } else if direction.x > 0.9 {
                Some(RayHit::geometry(3000.0, origin + Vec3::X * 3000.0))
            } else {
                None
            }
        }
    }

    fn monitor() -> (ObstructionMonitor, ObstacleSensor, AnnouncementArbiter) {
        (
            ObstructionMonitor::new(ObstructionConfig::default()),
            ObstacleSensor::default(),
            AnnouncementArbiter::default(),
        )
    }

    #[test]
    fn test_scan_fills_state() {
        let (mut m, sensor, arbiter) = monitor();
        let world = Corridor::floor_level(5000.0);
        m.update(&world, &sensor, Vec3::ZERO, Mat3::IDENTITY, &arbiter, 0);

        let s = m.state();
        assert_eq!(s.forward_distance, Some(5000.0));
        assert!(s.forward_is_jumpable());
        assert_eq!(s.right_distance, 3000.0);
        assert_eq!(s.left_distance, 12_000.0);
        assert_eq!(s.side_distance(Side::Right), 3000.0);
    }

    #[test]
    fn test_chest_high_wall_is_wall() {
        let (mut m, sensor, arbiter) = monitor();
        let world = Corridor::wall(1000.0);

        assert_eq!(m.update(&world, &sensor, Vec3::ZERO, Mat3::IDENTITY, &arbiter, 0), None);
        assert_eq!(m.update(&world, &sensor, Vec3::ZERO, Mat3::IDENTITY, &arbiter, 166), None);
        assert_eq!(
            m.update(&world, &sensor, Vec3::ZERO, Mat3::IDENTITY, &arbiter, 333),
            Some(AlertKind::Wall)
        );
        assert_eq!(m.state().forward_traversal, Some(Traversal::Wall));
        assert!(!m.state().forward_is_clearable());
    }

    #[test]
    fn test_low_obstacle_is_clearable() {
        let (mut m, sensor, arbiter) = monitor();
        let world = Corridor::low(1000.0, 1000.0);

        m.update(&world, &sensor, Vec3::ZERO, Mat3::IDENTITY, &arbiter, 0);
        m.update(&world, &sensor, Vec3::ZERO, Mat3::IDENTITY, &arbiter, 166);
        assert_eq!(
            m.update(&world, &sensor, Vec3::ZERO, Mat3::IDENTITY, &arbiter, 333),
            Some(AlertKind::LowObstacle)
        );
        assert!(m.state().forward_is_clearable());
        assert!(!m.state().forward_is_jumpable());
    }

    #[test]
    fn test_step_alert_needs_three_scans() {
        let (mut m, sensor, arbiter) = monitor();
        let world = Corridor::floor_level(1000.0);

        assert_eq!(m.update(&world, &sensor, Vec3::ZERO, Mat3::IDENTITY, &arbiter, 0), None);
        assert_eq!(m.update(&world, &sensor, Vec3::ZERO, Mat3::IDENTITY, &arbiter, 166), None);
        assert_eq!(
            m.update(&world, &sensor, Vec3::ZERO, Mat3::IDENTITY, &arbiter, 333),
            Some(AlertKind::Step)
        );
        assert_eq!(AlertKind::Step.message(), "Step ahead.");

        // Same type inside the repeat window stays quiet.
        for i in 0..10 {
            let t = 500 + i * 166;
            assert_eq!(m.update(&world, &sensor, Vec3::ZERO, Mat3::IDENTITY, &arbiter, t), None);
        }
        assert_eq!(
            m.update(&world, &sensor, Vec3::ZERO, Mat3::IDENTITY, &arbiter, 3400),
            Some(AlertKind::Step)
        );
    }

    #[test]
    fn test_alert_blocked_by_critical_cooldown() {
        let (mut m, sensor, mut arbiter) = monitor();
        let world = Corridor::wall(1000.0);
        arbiter.record_fired(Tier::Critical, 300);

        m.update(&world, &sensor, Vec3::ZERO, Mat3::IDENTITY, &arbiter, 100);
        m.update(&world, &sensor, Vec3::ZERO, Mat3::IDENTITY, &arbiter, 200);
        assert_eq!(m.update(&world, &sensor, Vec3::ZERO, Mat3::IDENTITY, &arbiter, 400), None);
        assert_eq!(
            m.update(&world, &sensor, Vec3::ZERO, Mat3::IDENTITY, &arbiter, 900),
            Some(AlertKind::Wall)
        );
    }

    #[test]
    fn test_debounce_resets_when_clear() {
        let (mut m, sensor, arbiter) = monitor();
        let near = Corridor::low(1000.0, 1000.0);
        let far = Corridor {
            ahead: None,
            hit_height: 0.0,
            top: 0.0,
        };

        m.update(&near, &sensor, Vec3::ZERO, Mat3::IDENTITY, &arbiter, 0);
        m.update(&near, &sensor, Vec3::ZERO, Mat3::IDENTITY, &arbiter, 100);
        m.update(&far, &sensor, Vec3::ZERO, Mat3::IDENTITY, &arbiter, 200);
        assert_eq!(m.update(&near, &sensor, Vec3::ZERO, Mat3::IDENTITY, &arbiter, 300), None);
        assert_eq!(m.update(&near, &sensor, Vec3::ZERO, Mat3::IDENTITY, &arbiter, 400), None);
        assert_eq!(
            m.update(&near, &sensor, Vec3::ZERO, Mat3::IDENTITY, &arbiter, 500),
            Some(AlertKind::LowObstacle)
        );
    }

    #[test]
    fn test_disabled_alerts_still_scan() {
        let (mut m, sensor, arbiter) = monitor();
        assert!(!m.toggle_alerts());
        let world = Corridor::wall(1000.0);
        for t in 0..5 {
            assert_eq!(m.update(&world, &sensor, Vec3::ZERO, Mat3::IDENTITY, &arbiter, t * 100), None);
        }
        assert!(m.state().forward_blocked());
    }
}
