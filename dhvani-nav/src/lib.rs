//! # Dhvani-Nav: Audio Navigation for First-Person Games
//!
//! A reactive navigation assistant that lets a player who cannot see the
//! screen move through a 3D level by ear. Each host frame the engine senses
//! the surroundings with ray casts, steers the player towards a selected
//! target, and reports through speech and positional tones.
//!
//! ## Features
//!
//! - **Target Selection**: Picks the best entity of a requested category
//!   (interactive, enemy, exit, item) with faction-aware priorities
//! - **Obstacle Sensing**: Classifies ray hits (typed entity, crate, pillar,
//!   wall) and rates them as step, jumpable or impassable
//! - **Locomotion**: Turn and walk towards the target, avoid obstacles, wait
//!   for doors, ride lifts, and escalate through recovery strategies when
//!   stuck
//! - **Audio Output**: Prioritised speech with tier cooldowns, plus three
//!   single-voice tone channels (navigation, radar, view pitch)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dhvani_nav::{NavConfig, NavigationEngine, Trigger};
//!
//! let mut engine = NavigationEngine::new(NavConfig::load_default()?);
//! engine.handle_trigger(Trigger::ToggleEnabled, &mut host, now_ms);
//!
//! loop {
//!     let report = engine.tick(&mut host, now_ms);
//!     if report.navigation.arrived {
//!         break;
//!     }
//! }
//! ```
//!
//! The host implements the traits in [`host`]: world queries, player pose,
//! movement outputs, speech and tones.
//!
//! ## Coordinate Frame
//!
//! - **X-right**, **Y-up**, **Z-forward**
//! - Distances in game units (roughly millimetres)
//! - **Turn rate**: positive is clockwise seen from above
//! - **Strafe**: positive is to the player's right
//!
//! ## Architecture
//!
//! - [`core`]: Bearings, directions and tick cadences
//! - [`host`]: Traits the game implements
//! - [`entity`]: Entity kinds, factions and target categories
//! - [`sensor`]: Ray classification and the obstruction monitor
//! - [`target`]: Target selection
//! - [`arbiter`]: Speech priority tiers and cooldowns
//! - [`tone`]: Tone encoding and channel management
//! - [`history`]: Position samples with oscillation and loop detection
//! - [`navigation`]: Locomotion controller and strategy escalation
//! - [`report`]: On-demand spoken reports
//! - [`engine`]: Per-tick pipeline and player triggers
//! - [`config`]: YAML configuration
//!
//! ## Data Flow
//!
//! ```text
//!     ┌──────────────┐      ┌──────────────────┐
//!     │  WorldQuery  │─────►│  ObstacleSensor  │
//!     │ PlayerSource │      │ ObstructionMonitor│
//!     └──────┬───────┘      └────────┬─────────┘
//!            │                       │ ObstructionState
//!            ▼                       ▼
//!     ┌──────────────┐      ┌──────────────────┐
//!     │TargetSelector│─────►│   Locomotion     │──► MovementSink
//!     └──────────────┘      │   Controller     │
//!                           └────────┬─────────┘
//!                                    │ cues
//!                                    ▼
//!                           ┌──────────────────┐
//!                           │ Arbiter + Tones  │──► SpeechSink / ToneSink
//!                           └──────────────────┘
//! ```

pub mod arbiter;
pub mod config;
pub mod core;
pub mod engine;
pub mod entity;
pub mod error;
pub mod history;
pub mod host;
pub mod navigation;
pub mod phrases;
pub mod report;
pub mod sensor;
pub mod target;
pub mod tone;
pub mod voice;

#[cfg(test)]
mod mock;

// Re-export main types at crate root
pub use config::{ConfigLoadError, NavConfig};
pub use engine::{NavigationEngine, TickReport, Trigger};
pub use error::{OutputError, Result};

// Re-export host seams
pub use host::{
    Channel, DoorState, EntityId, Host, LiftState, MovementSink, PlayerSource, RayHit,
    SpeechMode, SpeechSink, ToneRequest, ToneSink, WorldQuery,
};

// Re-export navigation types
pub use arbiter::{AnnouncementArbiter, Tier};
pub use entity::{EntityKind, Faction, TargetCategory};
pub use navigation::{
    LocomotionConfig, LocomotionController, NavigationState, NavigationStep, Strategy,
};
pub use sensor::{AlertKind, ObstacleSensor, ObstructionMonitor};
pub use target::{Target, TargetSelector};
