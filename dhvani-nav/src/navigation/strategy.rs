//! Locomotion strategy escalation.
//!
//! ```text
//! DIRECT -> WALL_FOLLOW_LEFT -> WALL_FOLLOW_RIGHT -> BACKTRACK
//!        -> WIDE_AROUND_LEFT -> WIDE_AROUND_RIGHT -> DIRECT (failure + 1)
//! ```
//!
//! Each completed cycle counts one failure. Once the failure limit is
//! reached the machine gives up: it resets to DIRECT and the caller hands
//! control back to the player.

use serde::{Deserialize, Serialize};

use crate::core::Side;

/// Strategy escalation settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Completed cycles before giving up.
    /// Default: 2
    pub cycle_limit: u32,

    /// Ticks a wall-follow maneuver is held.
    /// Default: 180
    pub wall_follow_ticks: u32,

    /// Ticks a wide-around maneuver is held.
    /// Default: 300
    pub wide_around_ticks: u32,

    /// Ticks spent reversing before returning to DIRECT.
    /// Default: 90
    pub backtrack_ticks: u32,

    /// Reverse speed while backtracking (fraction of maximum).
    /// Default: 0.25
    pub backtrack_speed: f32,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            cycle_limit: 2,
            wall_follow_ticks: 180,
            wide_around_ticks: 300,
            backtrack_ticks: 90,
            backtrack_speed: 0.25,
        }
    }
}

/// One locomotion strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Head straight for the target.
    #[default]
    Direct,
    /// Hug obstacles on the left.
    WallFollowLeft,
    /// Hug obstacles on the right.
    WallFollowRight,
    /// Reverse away from the obstruction.
    Backtrack,
    /// Long detour to the left.
    WideAroundLeft,
    /// Long detour to the right.
    WideAroundRight,
}

impl Strategy {
    /// Get a short description of the strategy.
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Direct => "Direct",
            Strategy::WallFollowLeft => "WallFollowLeft",
            Strategy::WallFollowRight => "WallFollowRight",
            Strategy::Backtrack => "Backtrack",
            Strategy::WideAroundLeft => "WideAroundLeft",
            Strategy::WideAroundRight => "WideAroundRight",
        }
    }

    /// Successor in the escalation cycle.
    pub fn next(self) -> Self {
        match self {
            Strategy::Direct => Strategy::WallFollowLeft,
            Strategy::WallFollowLeft => Strategy::WallFollowRight,
            Strategy::WallFollowRight => Strategy::Backtrack,
            Strategy::Backtrack => Strategy::WideAroundLeft,
            Strategy::WideAroundLeft => Strategy::WideAroundRight,
            Strategy::WideAroundRight => Strategy::Direct,
        }
    }

    /// Spoken cue on entering this strategy.
    pub fn cue(self) -> &'static str {
        match self {
            Strategy::Direct => "Retrying direct path.",
            Strategy::WallFollowLeft => "Trying wall follow left.",
            Strategy::WallFollowRight => "Trying wall follow right.",
            Strategy::Backtrack => "Backing up.",
            Strategy::WideAroundLeft => "Trying wide path left.",
            Strategy::WideAroundRight => "Trying wide path right.",
        }
    }

    /// Forced avoidance side and duration for this strategy, if any.
    pub fn maneuver(self, config: &StrategyConfig) -> Option<(Side, u32)> {
        match self {
            Strategy::WallFollowLeft => Some((Side::Left, config.wall_follow_ticks)),
            Strategy::WallFollowRight => Some((Side::Right, config.wall_follow_ticks)),
            Strategy::WideAroundLeft => Some((Side::Left, config.wide_around_ticks)),
            Strategy::WideAroundRight => Some((Side::Right, config.wide_around_ticks)),
            Strategy::Direct | Strategy::Backtrack => None,
        }
    }
}

/// Result of one escalation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Escalation {
    /// Moved to the next strategy within the cycle.
    Advanced(Strategy),
    /// Completed a cycle and restarted at DIRECT.
    Retrying {
        /// Failures so far.
        failures: u32,
    },
    /// Failure limit reached; reset to DIRECT.
    GaveUp {
        /// Failures so far.
        failures: u32,
    },
}

/// What prompted an escalation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EscalationCause {
    /// No movement for the stuck window.
    Stuck,
    /// Back-and-forth movement without progress.
    Oscillation,
    /// Returned to an earlier position.
    Loop,
}

impl EscalationCause {
    /// Cause name for logs.
    pub fn name(self) -> &'static str {
        match self {
            EscalationCause::Stuck => "stuck",
            EscalationCause::Oscillation => "oscillation",
            EscalationCause::Loop => "loop",
        }
    }
}

/// Escalation state machine.
#[derive(Clone, Debug, Default)]
pub struct StrategyMachine {
    current: Strategy,
    ticks_in_strategy: u32,
    failures: u32,
    cycle_limit: u32,
}

impl StrategyMachine {
    /// Create a machine at DIRECT with no failures.
    pub fn new(cycle_limit: u32) -> Self {
        Self {
            cycle_limit: cycle_limit.max(1),
            ..Default::default()
        }
    }

    /// Current strategy.
    pub fn current(&self) -> Strategy {
        self.current
    }

    /// Ticks spent in the current strategy.
    pub fn ticks_in_strategy(&self) -> u32 {
        self.ticks_in_strategy
    }

    /// Completed cycles without success.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Count one tick in the current strategy.
    pub fn tick(&mut self) {
        self.ticks_in_strategy = self.ticks_in_strategy.saturating_add(1);
    }

    /// Advance to the next strategy.
    pub fn escalate(&mut self) -> Escalation {
        let next = self.current.next();
        self.current = next;
        self.ticks_in_strategy = 0;

        if next != Strategy::Direct {
            return Escalation::Advanced(next);
        }

        self.failures += 1;
        if self.failures >= self.cycle_limit {
            Escalation::GaveUp {
                failures: self.failures,
            }
        } else {
            Escalation::Retrying {
                failures: self.failures,
            }
        }
    }

    /// Return to DIRECT without counting a failure (backtrack finished).
    pub fn resume_direct(&mut self) {
        self.current = Strategy::Direct;
        self.ticks_in_strategy = 0;
    }

    /// Forget everything (new target or navigation restart).
    pub fn reset(&mut self) {
        self.current = Strategy::Direct;
        self.ticks_in_strategy = 0;
        self.failures = 0;
    }
}
