//! Relative bearing between the player and a world point.

use std::f32::consts::PI;

use glam::{Mat3, Vec3};

/// Horizontal extent below which a target counts as directly above or below.
const MIN_HORIZONTAL: f32 = 1e-3;

/// Squared distance on the horizontal (XZ) plane.
#[inline]
pub fn horizontal_distance_sq(a: Vec3, b: Vec3) -> f32 {
    let dx = b.x - a.x;
    let dz = b.z - a.z;
    dx * dx + dz * dz
}

/// Signed horizontal relationship between a facing direction and a target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bearing {
    /// Cross product of forward and target direction (positive = target on the right).
    pub lateral: f32,
    /// Dot product of forward and target direction (1 = dead ahead, -1 = behind).
    pub alignment: f32,
    /// Distance on the horizontal plane.
    pub horizontal_distance: f32,
    /// Full 3D distance.
    pub distance: f32,
    /// Height difference over 3D distance (positive = target above).
    pub vertical_ratio: f32,
}

impl Bearing {
    /// Compute the bearing from `position` with `orientation` towards `target`.
    pub fn between(position: Vec3, orientation: Mat3, target: Vec3) -> Self {
        let forward = flat_forward(orientation);
        let delta = target - position;
        let horizontal = Vec3::new(delta.x, 0.0, delta.z);
        let horizontal_distance = horizontal.length();
        let distance = delta.length();

        let (lateral, alignment) = if horizontal_distance > MIN_HORIZONTAL {
            let dir = horizontal / horizontal_distance;
            (
                forward.z * dir.x - forward.x * dir.z,
                forward.x * dir.x + forward.z * dir.z,
            )
        } else {
            (0.0, 1.0)
        };

        let vertical_ratio = if distance > MIN_HORIZONTAL {
            delta.y / distance
        } else {
            0.0
        };

        Self {
            lateral,
            alignment,
            horizontal_distance,
            distance,
            vertical_ratio,
        }
    }

    /// Angle offset in [-1, 1] for tone encoding (negative = left).
    ///
    /// Targets behind the player saturate to -1 or 1 so they are never
    /// mistaken for near-centre targets.
    pub fn angle_offset(&self) -> f32 {
        if self.alignment < 0.0 {
            if self.lateral < 0.0 { -1.0 } else { 1.0 }
        } else {
            self.lateral.clamp(-1.0, 1.0)
        }
    }

    /// Signed angle to the target in radians (0 = ahead, positive = right).
    pub fn angle(&self) -> f32 {
        self.lateral.atan2(self.alignment)
    }
}

/// Forward axis of `orientation` projected onto the horizontal plane.
pub(crate) fn flat_forward(orientation: Mat3) -> Vec3 {
    let f = orientation.z_axis;
    let flat = Vec3::new(f.x, 0.0, f.z);
    if flat.length_squared() > MIN_HORIZONTAL * MIN_HORIZONTAL {
        flat.normalize()
    } else {
        Vec3::Z
    }
}

/// Right axis of `orientation` projected onto the horizontal plane.
pub(crate) fn flat_right(orientation: Mat3) -> Vec3 {
    let f = flat_forward(orientation);
    Vec3::new(f.z, 0.0, -f.x)
}

/// Lateral side relative to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Towards the player's left.
    Left,
    /// Towards the player's right.
    Right,
}

impl Side {
    /// -1 for left, 1 for right.
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }

    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// Coarse direction of a world point relative to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Ahead,
    AheadRight,
    Right,
    BehindRight,
    Behind,
    BehindLeft,
    Left,
    AheadLeft,
    Above,
    Below,
}

impl Direction {
    /// The eight horizontal octants in clockwise order starting ahead.
    pub const HORIZONTAL: [Direction; 8] = [
        Direction::Ahead,
        Direction::AheadRight,
        Direction::Right,
        Direction::BehindRight,
        Direction::Behind,
        Direction::BehindLeft,
        Direction::Left,
        Direction::AheadLeft,
    ];

    /// All ten scan directions.
    pub const ALL: [Direction; 10] = [
        Direction::Ahead,
        Direction::AheadRight,
        Direction::Right,
        Direction::BehindRight,
        Direction::Behind,
        Direction::BehindLeft,
        Direction::Left,
        Direction::AheadLeft,
        Direction::Above,
        Direction::Below,
    ];

    /// Classify `target` relative to a player at `position` facing `orientation`.
    ///
    /// Vertical directions win when the height difference exceeds the
    /// horizontal distance.
    pub fn classify(position: Vec3, orientation: Mat3, target: Vec3) -> Self {
        let bearing = Bearing::between(position, orientation, target);
        let dy = target.y - position.y;
        if dy.abs() > bearing.horizontal_distance {
            return if dy > 0.0 { Direction::Above } else { Direction::Below };
        }

        let octant = (bearing.angle() / (PI / 4.0)).round() as i32;
        Self::HORIZONTAL[octant.rem_euclid(8) as usize]
    }

    /// Unit vector for this direction in the player's frame.
    pub fn to_world(self, orientation: Mat3) -> Vec3 {
        let forward = flat_forward(orientation);
        let right = flat_right(orientation);
        let diag = std::f32::consts::FRAC_1_SQRT_2;
        match self {
            Direction::Ahead => forward,
            Direction::AheadRight => (forward + right) * diag,
            Direction::Right => right,
            Direction::BehindRight => (right - forward) * diag,
            Direction::Behind => -forward,
            Direction::BehindLeft => (-forward - right) * diag,
            Direction::Left => -right,
            Direction::AheadLeft => (forward - right) * diag,
            Direction::Above => Vec3::Y,
            Direction::Below => Vec3::NEG_Y,
        }
    }

    /// Short spoken name ("front left").
    pub fn name(self) -> &'static str {
        match self {
            Direction::Ahead => "ahead",
            Direction::AheadRight => "front right",
            Direction::Right => "right",
            Direction::BehindRight => "behind right",
            Direction::Behind => "behind",
            Direction::BehindLeft => "behind left",
            Direction::Left => "left",
            Direction::AheadLeft => "front left",
            Direction::Above => "above",
            Direction::Below => "below",
        }
    }

    /// Conversational phrase ("ahead to your left").
    pub fn phrase(self) -> &'static str {
        match self {
            Direction::Ahead => "ahead",
            Direction::AheadRight => "ahead to your right",
            Direction::Right => "to your right",
            Direction::BehindRight => "behind to your right",
            Direction::Behind => "behind you",
            Direction::BehindLeft => "behind to your left",
            Direction::Left => "to your left",
            Direction::AheadLeft => "ahead to your left",
            Direction::Above => "above",
            Direction::Below => "below",
        }
    }
}
