//! Tick-interval scheduling.
//!
//! Expensive per-frame work (ray scans, tone refresh, target refresh)
//! runs on a fixed tick interval rather than every frame.

use serde::{Deserialize, Serialize};

/// Fires once every `interval` ticks.
///
/// The first firing happens on the `interval`-th call to [`Cadence::tick`],
/// so a freshly reset cadence never fires on the tick it was reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cadence {
    interval: u32,
    elapsed: u32,
}

impl Cadence {
    /// Create a cadence firing every `interval` ticks (clamped to at least 1).
    pub fn every(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            elapsed: 0,
        }
    }

    /// Advance one tick. Returns true when the interval elapses.
    pub fn tick(&mut self) -> bool {
        self.elapsed += 1;
        if self.elapsed >= self.interval {
            self.elapsed = 0;
            true
        } else {
            false
        }
    }

    /// Configured interval in ticks.
    pub fn interval(&self) -> u32 {
        self.interval
    }
}

/// Tick intervals for periodic work.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CadenceConfig {
    /// Obstruction scan.
    /// Default: 10
    pub obstruction: u32,

    /// Target refresh.
    /// Default: 30
    pub target_refresh: u32,

    /// Position history sample.
    /// Default: 10
    pub history_sample: u32,

    /// Navigation tone.
    /// Default: 20
    pub navigation_tone: u32,

    /// Radar tone.
    /// Default: 30
    pub radar: u32,

    /// View pitch evaluation.
    /// Default: 20
    pub pitch: u32,

    /// Progress evaluation.
    /// Default: 60
    pub progress: u32,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            obstruction: 10,
            target_refresh: 30,
            history_sample: 10,
            navigation_tone: 20,
            radar: 30,
            pitch: 20,
            progress: 60,
        }
    }
}
