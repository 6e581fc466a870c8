//! Navigation flags and the current target.

use glam::Vec3;

use crate::entity::TargetCategory;
use crate::target::Target;

/// Player-facing navigation state.
#[derive(Clone, Debug, PartialEq)]
pub struct NavigationState {
    /// Master switch for auto-navigation.
    pub enabled: bool,
    /// Whether the engine may turn the player.
    pub auto_rotate: bool,
    /// Whether the engine may move the player.
    pub auto_move: bool,
    /// Requested target category.
    pub category: TargetCategory,
    /// Current target, refreshed on a cadence.
    pub target: Option<Target>,
    /// Whether the arrival message has been spoken.
    pub arrival_announced: bool,
    /// Whether the target was reached.
    pub target_reached: bool,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            enabled: false,
            auto_rotate: true,
            auto_move: true,
            category: TargetCategory::Interactive,
            target: None,
            arrival_announced: false,
            target_reached: false,
        }
    }
}

impl NavigationState {
    /// Target position, if any.
    pub fn target_position(&self) -> Option<Vec3> {
        self.target.as_ref().map(|t| t.position)
    }

    /// Distance to the target at the last refresh.
    pub fn target_distance(&self) -> Option<f32> {
        self.target.as_ref().map(|t| t.distance)
    }

    /// Spoken name of the target.
    pub fn target_display_name(&self) -> Option<&'static str> {
        self.target.as_ref().map(|t| t.name)
    }

    /// Whether the engine should drive movement this tick.
    pub fn drives_movement(&self) -> bool {
        self.enabled && self.auto_move && !self.target_reached && self.target.is_some()
    }

    /// Whether the engine should drive turning this tick.
    pub fn drives_rotation(&self) -> bool {
        self.enabled && self.auto_rotate && self.target.is_some()
    }

    /// Clear arrival flags for a fresh approach.
    pub fn clear_arrival(&mut self) {
        self.arrival_announced = false;
        self.target_reached = false;
    }
}
