//! DhvaniSim - Headless closed-loop simulator for dhvani-nav
//!
//! Runs the navigation engine against a simulated level without a game:
//!
//! - [`world`]: Box geometry, typed entities, doors, lifts and a walking player
//! - [`scenario`]: YAML scenario files with scheduled player actions and
//!   expected outcomes
//! - [`sim`]: The lockstep loop and run outcome
//!
//! Speech and tones are logged through `tracing` and kept in a transcript.

pub mod error;
pub mod scenario;
pub mod sim;
pub mod world;

pub use error::{Result, SimError};
pub use scenario::{Expectations, Scenario};
pub use sim::{SimOutcome, Simulation};
pub use world::{CollisionMode, PhysicsConfig, SimWorld};
