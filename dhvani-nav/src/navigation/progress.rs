//! Distance-to-target progress monitoring.

use serde::{Deserialize, Serialize};

/// Progress monitor settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Distance gained before a milestone is announced.
    /// Default: 5000
    pub milestone_distance: f32,

    /// Distance lost before "moving away" is announced.
    /// Default: 3000
    pub regression_distance: f32,

    /// Minimum time since the last progress before "moving away" (ms).
    /// Default: 5000
    pub regression_delay_ms: u64,

    /// Time without progress before "stalled" (ms).
    /// Default: 10000
    pub stall_ms: u64,

    /// Net change under which the player counts as stalled.
    /// Default: 2000
    pub stall_distance: f32,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            milestone_distance: 5000.0,
            regression_distance: 3000.0,
            regression_delay_ms: 5000,
            stall_ms: 10_000,
            stall_distance: 2000.0,
        }
    }
}

/// Progress event worth announcing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressCue {
    /// Closer by at least one milestone; whole meters remaining.
    Milestone(u32),
    /// Further away than the last announcement.
    MovingAway,
    /// No meaningful change for too long.
    Stalled,
}

impl ProgressCue {
    /// Spoken text. None for a zero-meter milestone.
    pub fn message(self) -> Option<String> {
        match self {
            ProgressCue::Milestone(0) => None,
            ProgressCue::Milestone(m) => Some(format!("{} meters.", m)),
            ProgressCue::MovingAway => Some("Moving away from target.".to_string()),
            ProgressCue::Stalled => Some("Navigation stalled.".to_string()),
        }
    }
}

/// Tracks distance to the target between announcements.
#[derive(Clone, Debug)]
pub struct ProgressMonitor {
    config: ProgressConfig,
    last_announced: f32,
    last_progress_ms: u64,
    closest: f32,
}

impl ProgressMonitor {
    /// Create a monitor with no baseline.
    pub fn new(config: ProgressConfig) -> Self {
        Self {
            config,
            last_announced: f32::MAX,
            last_progress_ms: 0,
            closest: f32::MAX,
        }
    }

    /// Set the baseline for a newly acquired target.
    pub fn start(&mut self, distance: f32, now_ms: u64) {
        self.last_announced = distance;
        self.last_progress_ms = now_ms;
        self.closest = distance;
    }

    /// Closest distance reached since the baseline was set.
    pub fn closest(&self) -> f32 {
        self.closest
    }

    /// Compare `distance` to the baseline.
    pub fn evaluate(&mut self, distance: f32, now_ms: u64) -> Option<ProgressCue> {
        if self.last_announced == f32::MAX {
            self.start(distance, now_ms);
            return None;
        }

        self.closest = self.closest.min(distance);
        let change = self.last_announced - distance;
        let since = now_ms.saturating_sub(self.last_progress_ms);

        if change >= self.config.milestone_distance {
            self.last_announced = distance;
            self.last_progress_ms = now_ms;
            log::info!("Progress: {:.0} to target", distance);
            Some(ProgressCue::Milestone((distance / 1000.0) as u32))
        } else if change <= -self.config.regression_distance && since > self.config.regression_delay_ms {
            self.last_announced = distance;
            self.last_progress_ms = now_ms;
            log::info!("Moving away from target");
            Some(ProgressCue::MovingAway)
        } else if since > self.config.stall_ms && change.abs() < self.config.stall_distance {
            self.last_progress_ms = now_ms;
            log::warn!("Navigation stalled at {:.0}", distance);
            Some(ProgressCue::Stalled)
        } else {
            None
        }
    }
}
