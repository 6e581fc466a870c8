//! Door and lift tracking.
//!
//! Handles are looked up fresh every tick; nothing here holds a reference
//! into the world. A tracker exists only while its door is being waited on
//! or its lift ridden.

use crate::entity::EntityKind;
use crate::host::{DoorState, EntityId, LiftState};

/// A door the player is stopped in front of.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackedDoor {
    /// Door handle.
    pub id: EntityId,
    /// Door kind.
    pub kind: EntityKind,
    /// Last observed state, if the host reports one.
    pub last_state: Option<DoorState>,
    /// When the wait began (ms).
    pub wait_start_ms: u64,
    /// Whether the stop has been announced.
    pub announced: bool,
    /// Whether the opening has been announced.
    pub opening_announced: bool,
}

impl TrackedDoor {
    /// Start waiting on a door.
    pub fn new(id: EntityId, kind: EntityKind, state: Option<DoorState>, now_ms: u64) -> Self {
        Self {
            id,
            kind,
            last_state: state,
            wait_start_ms: now_ms,
            announced: false,
            opening_announced: false,
        }
    }

    /// Record a new observation. Returns true the first time the door is
    /// seen opening.
    pub fn observe(&mut self, state: Option<DoorState>) -> bool {
        let was_opening = self.last_state.is_some_and(DoorState::is_opening);
        self.last_state = state;
        let opening = state.is_some_and(DoorState::is_opening);

        if opening && !was_opening && !self.opening_announced {
            self.opening_announced = true;
            true
        } else {
            false
        }
    }

    /// How long the player has waited (ms).
    pub fn waited_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.wait_start_ms)
    }
}

/// Lift state transition worth announcing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiftEvent {
    /// Stepped onto a lift.
    Boarded,
    /// The lift started moving.
    Moving,
    /// The lift stopped.
    Stopped,
}

impl LiftEvent {
    /// Spoken text.
    pub fn message(self) -> &'static str {
        match self {
            LiftEvent::Boarded => "On lift.",
            LiftEvent::Moving => "Lift moving.",
            LiftEvent::Stopped => "Lift stopped.",
        }
    }
}

/// A lift the player is standing on.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackedLift {
    /// Lift handle.
    pub id: EntityId,
    /// Last observed state.
    pub last_state: Option<LiftState>,
    /// When the ride began (ms).
    pub ride_start_ms: u64,
    /// Whether boarding has been announced.
    pub announced: bool,
}

impl TrackedLift {
    /// Start tracking a lift.
    pub fn new(id: EntityId, state: Option<LiftState>, now_ms: u64) -> Self {
        Self {
            id,
            last_state: state,
            ride_start_ms: now_ms,
            announced: false,
        }
    }

    /// Record a new observation. Returns a state change, if any.
    pub fn observe(&mut self, state: Option<LiftState>) -> Option<LiftEvent> {
        let previous = self.last_state;
        self.last_state = state;
        match (previous, state) {
            (Some(LiftState::Stopped) | None, Some(LiftState::Moving)) => Some(LiftEvent::Moving),
            (Some(LiftState::Moving), Some(LiftState::Stopped)) => Some(LiftEvent::Stopped),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_door_opening_reported_once() {
        let mut door = TrackedDoor::new(
            EntityId(3),
            EntityKind::ProximityDoor,
            Some(DoorState::Closed),
            1000,
        );
        assert!(!door.observe(Some(DoorState::Closed)));
        assert!(door.observe(Some(DoorState::Opening)));
        assert!(!door.observe(Some(DoorState::Open)));
        assert!(!door.observe(Some(DoorState::Closing)));
        assert!(!door.observe(Some(DoorState::Opening)));
        assert_eq!(door.waited_ms(2500), 1500);
    }

    #[test]
    fn test_door_without_state() {
        let mut door = TrackedDoor::new(EntityId(1), EntityKind::SwitchDoor, None, 0);
        assert!(!door.observe(None));
    }

    #[test]
    fn test_lift_transitions() {
        let mut lift = TrackedLift::new(EntityId(9), Some(LiftState::Stopped), 0);
        assert_eq!(lift.observe(Some(LiftState::Stopped)), None);
        assert_eq!(lift.observe(Some(LiftState::Moving)), Some(LiftEvent::Moving));
        assert_eq!(lift.observe(Some(LiftState::Moving)), None);
        assert_eq!(lift.observe(Some(LiftState::Stopped)), Some(LiftEvent::Stopped));
        assert_eq!(LiftEvent::Boarded.message(), "On lift.");
    }
}
