//! Unified configuration loading.
//!
//! Loads all engine configuration from a single YAML file. Every section is
//! optional; missing sections and fields take their defaults.
//!
//! ```yaml
//! navigation:
//!   forward_speed: 0.5
//!   arrival_distance: 2000
//! strategy:
//!   cycle_limit: 3
//! cadence:
//!   navigation_tone: 15
//! ```

mod error;
mod nav;

pub use error::ConfigLoadError;
pub use nav::NavConfig;
