//! Locomotion controller configuration.

use serde::{Deserialize, Serialize};

use super::progress::ProgressConfig;
use super::strategy::StrategyConfig;

/// Configuration for the locomotion controller.
///
/// Speeds and turn rates are fractions of the host's maximum.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Forward speed while approaching.
    /// Default: 0.4
    pub forward_speed: f32,

    /// Strafe speed during avoidance.
    /// Default: 0.25
    pub strafe_speed: f32,

    /// Range of the probe ray cast towards the target.
    /// Default: 8000
    pub probe_range: f32,

    /// Distance at which a door in the way stops the player.
    /// Default: 3000
    pub door_wait_distance: f32,

    /// Distance at which an obstacle triggers avoidance.
    /// Default: 4000
    pub avoid_distance: f32,

    /// Avoidance distance for hostile entities.
    /// Default: 5000
    pub threat_avoid_distance: f32,

    /// Side clearance needed to prefer the target's side.
    /// Default: 2000
    pub side_clear_distance: f32,

    /// Lateral bearing beyond which the target's side is preferred.
    /// Default: 0.1
    pub lateral_preference: f32,

    /// Ticks an avoidance choice is held.
    /// Default: 30
    pub avoid_ticks: u32,

    /// Turn rate during avoidance.
    /// Default: 0.3
    pub avoid_turn: f32,

    /// Distance beyond which auto-rotation steers towards the target.
    /// Default: 2000
    pub rotate_min_distance: f32,

    /// Turn rate per unit of lateral bearing.
    /// Default: 1.0
    pub rotate_gain: f32,

    /// Largest turn rate while steering towards the target.
    /// Default: 0.5
    pub max_rotate: f32,

    /// Turn rate when the target is behind.
    /// Default: 0.7
    pub behind_turn: f32,

    /// Alignment above which the player walks forward.
    /// Default: 0.5
    pub forward_alignment: f32,

    /// Alignment below which the target counts as behind.
    /// Default: -0.3
    pub behind_alignment: f32,

    /// Exponential smoothing factor for turn output.
    /// Default: 0.15
    pub turn_smoothing: f32,

    /// Distance at which the target counts as reached.
    /// Default: 2500
    pub arrival_distance: f32,

    /// Squared per-tick movement under which the player counts as stuck.
    /// Default: 10000
    pub stuck_displacement_sq: f32,

    /// Consecutive stuck ticks before escalating.
    /// Default: 90
    pub stuck_ticks: u32,

    /// Forward distance under which a clearable obstacle is jumped.
    /// Default: 2500
    pub jump_distance: f32,

    /// Extra reach of the downward ray used to detect standing on a lift.
    /// Default: 300
    pub lift_contact_margin: f32,

    /// Key name spoken in interaction prompts.
    /// Default: "SPACE"
    pub interact_key: String,

    /// Strategy escalation. Loaded from its own top-level section.
    #[serde(skip)]
    pub strategy: StrategyConfig,

    /// Progress announcements.
    pub progress: ProgressConfig,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            forward_speed: 0.4,
            strafe_speed: 0.25,
            probe_range: 8000.0,
            door_wait_distance: 3000.0,
            avoid_distance: 4000.0,
            threat_avoid_distance: 5000.0,
            side_clear_distance: 2000.0,
            lateral_preference: 0.1,
            avoid_ticks: 30,
            avoid_turn: 0.3,
            rotate_min_distance: 2000.0,
            rotate_gain: 1.0,
            max_rotate: 0.5,
            behind_turn: 0.7,
            forward_alignment: 0.5,
            behind_alignment: -0.3,
            turn_smoothing: 0.15,
            arrival_distance: 2500.0,
            stuck_displacement_sq: 10_000.0,
            stuck_ticks: 90,
            jump_distance: 2500.0,
            lift_contact_margin: 300.0,
            interact_key: "SPACE".to_string(),
            strategy: StrategyConfig::default(),
            progress: ProgressConfig::default(),
        }
    }
}

impl LocomotionConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for forward speed.
    pub fn with_forward_speed(mut self, speed: f32) -> Self {
        self.forward_speed = speed;
        self
    }

    /// Builder-style setter for arrival distance.
    pub fn with_arrival_distance(mut self, distance: f32) -> Self {
        self.arrival_distance = distance;
        self
    }

    /// Builder-style setter for the stuck window.
    pub fn with_stuck_ticks(mut self, ticks: u32) -> Self {
        self.stuck_ticks = ticks;
        self
    }

    /// Builder-style setter for turn smoothing.
    pub fn with_turn_smoothing(mut self, factor: f32) -> Self {
        self.turn_smoothing = factor;
        self
    }

    /// Builder-style setter for strategy config.
    pub fn with_strategy(mut self, strategy: StrategyConfig) -> Self {
        self.strategy = strategy;
        self
    }
}
