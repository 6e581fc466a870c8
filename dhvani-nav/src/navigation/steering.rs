//! Movement commands produced by the controller.

use crate::core::Side;

/// One tick of movement output.
///
/// Values are fractions of the host's maximum.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Steering {
    /// Forward speed (negative = backwards).
    pub forward: f32,
    /// Strafe speed (positive = right).
    pub strafe: f32,
    /// Turn rate (positive = clockwise).
    pub turn: f32,
    /// Whether to jump this tick.
    pub jump: bool,
}

impl Steering {
    /// No movement.
    pub fn stop() -> Self {
        Self::default()
    }

    /// Straight reverse at `speed`.
    pub fn reverse(speed: f32) -> Self {
        Self {
            forward: -speed.abs(),
            ..Self::default()
        }
    }

    /// Whether this command moves the player forward.
    pub fn moves_forward(&self) -> bool {
        self.forward > 0.0
    }

    /// Whether this is a stop command.
    pub fn is_stop(&self) -> bool {
        self.forward == 0.0 && self.strafe == 0.0 && self.turn == 0.0 && !self.jump
    }
}

/// A held sideways avoidance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Maneuver {
    /// Side being moved towards.
    pub side: Side,
    /// Ticks left.
    pub remaining: u32,
}

impl Maneuver {
    /// Steering while the maneuver is active.
    pub fn steering(&self, forward: f32, strafe: f32, turn: f32) -> Steering {
        Steering {
            forward,
            strafe: self.side.sign() * strafe,
            turn: self.side.sign() * turn,
            jump: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steering_helpers() {
        assert!(Steering::stop().is_stop());
        let back = Steering::reverse(0.25);
        assert_eq!(back.forward, -0.25);
        assert!(!back.moves_forward());
        assert!(!back.is_stop());
    }

    #[test]
    fn test_maneuver_direction() {
        let left = Maneuver {
            side: Side::Left,
            remaining: 30,
        };
        let s = left.steering(0.4, 0.25, 0.3);
        assert_eq!(s.strafe, -0.25);
        assert_eq!(s.turn, -0.3);
        assert!(s.moves_forward());
    }
}
