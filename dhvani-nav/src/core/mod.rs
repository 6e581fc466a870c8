//! Core geometric types and tick scheduling.
//!
//! ## Coordinate Frame
//!
//! - **X-right**, **Y-up**, **Z-forward** (left-handed, game-engine style)
//! - Distances are game units (roughly millimetres)
//! - Player orientation is a [`glam::Mat3`] whose columns are the player's
//!   right, up and forward axes. Facing +Z is the identity.

mod bearing;
mod cadence;

pub use bearing::{Bearing, Direction, Side, horizontal_distance_sq};
pub(crate) use bearing::{flat_forward, flat_right};
pub use cadence::{Cadence, CadenceConfig};

pub use glam::{Mat3, Vec3};
