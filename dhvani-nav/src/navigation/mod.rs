//! Auto-navigation towards a selected target.
//!
//! The [`LocomotionController`] runs the per-tick decision loop. Around it:
//!
//! - [`StrategyMachine`]: escalation when the direct approach keeps failing
//! - [`ProgressMonitor`]: distance milestones, regression and stall cues
//! - [`TrackedDoor`] / [`TrackedLift`]: waiting at doors and riding lifts
//! - [`NavigationState`]: the player-facing flags

mod config;
mod controller;
mod progress;
mod state;
mod steering;
mod strategy;
mod tracking;

pub use config::LocomotionConfig;
pub use controller::{LocomotionController, NavigationStep, TickContext};
pub use progress::{ProgressConfig, ProgressCue, ProgressMonitor};
pub use state::NavigationState;
pub use steering::{Maneuver, Steering};
pub use strategy::{Escalation, EscalationCause, Strategy, StrategyConfig, StrategyMachine};
pub use tracking::{LiftEvent, TrackedDoor, TrackedLift};
