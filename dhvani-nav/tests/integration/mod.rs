//! Closed-loop integration tests for dhvani-nav
//!
//! These tests drive the public [`dhvani_nav::NavigationEngine`] against a
//! small kinematic host: box geometry, a player that turns and walks by the
//! commanded fractions, and recorded speech and tones.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p dhvani-nav --test integration -- --nocapture
//! ```

mod harness;
mod scenarios;

// Re-export for test convenience
pub use harness::{HarnessConfig, TestHarness, TestHost};
