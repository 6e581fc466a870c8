//! Ray-based obstacle sensing.
//!
//! - [`ObstacleSensor`]: single ray casts with hit classification
//! - [`ObstructionMonitor`]: periodic forward/left/right scan with
//!   debounced collision alerts

mod obstruction;
mod ray;

pub use obstruction::{AlertKind, ObstructionConfig, ObstructionMonitor, ObstructionState};
pub use ray::{ObstacleClass, ObstacleSensor, SensorConfig, Sighting, Traversal};
