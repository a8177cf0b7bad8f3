//! Held-key movement state and the pointer lock that gates it.

use glam::Vec2;

use super::input::Intent;

/// Whether look and move input currently steer the viewpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlLock {
    #[default]
    Unlocked,
    Locked,
}

impl ControlLock {
    pub fn is_locked(self) -> bool {
        self == Self::Locked
    }
}

/// Four independent held-key flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocomotionState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl LocomotionState {
    pub fn set(&mut self, intent: Intent, held: bool) {
        match intent {
            Intent::Forward => self.forward = held,
            Intent::Back => self.back = held,
            Intent::Left => self.left = held,
            Intent::Right => self.right = held,
        }
    }

    /// Unit (or zero) direction: x is strafe right, y is forward.
    /// Opposite keys cancel.
    pub fn direction(&self) -> Vec2 {
        let axis = |positive: bool, negative: bool| f32::from(u8::from(positive)) - f32::from(u8::from(negative));
        Vec2::new(axis(self.right, self.left), axis(self.forward, self.back)).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_movement_is_normalized() {
        let mut state = LocomotionState::default();
        state.set(Intent::Forward, true);
        state.set(Intent::Right, true);
        let direction = state.direction();
        assert!((direction.length() - 1.0).abs() < 1e-6);
        assert!(direction.x > 0.0 && direction.y > 0.0);
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut state = LocomotionState::default();
        state.set(Intent::Left, true);
        state.set(Intent::Right, true);
        assert_eq!(state.direction(), Vec2::ZERO);
    }
}
