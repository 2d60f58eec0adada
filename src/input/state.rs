//! Input state management
//!
//! Polls both keyboard (macroquad) and gamepad input, combining them into
//! one action-based API and finally into the per-frame `FrameInput` the
//! game session consumes.

use macroquad::prelude::*;
use crate::game::FrameInput;
use super::{GameAction, Gamepad};

/// Unified input state for keyboard and gamepad
pub struct InputState {
    gamepad: Gamepad,
    /// Stick deflection that counts as a held direction (0.0-1.0)
    pub stick_threshold: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            gamepad: Gamepad::new(),
            stick_threshold: 0.5,
        }
    }

    /// Call once per frame before checking actions
    pub fn poll(&mut self) {
        self.gamepad.poll();
    }

    pub fn has_gamepad(&self) -> bool {
        self.gamepad.has_gamepad()
    }

    /// Check if action is currently held down
    pub fn action_down(&self, action: GameAction) -> bool {
        action.keys().iter().any(|k| is_key_down(*k))
            || action.buttons().iter().any(|b| self.gamepad.is_button_down(*b))
            || self.stick_down(action)
    }

    /// Check if action was just pressed this frame
    pub fn action_pressed(&self, action: GameAction) -> bool {
        action.keys().iter().any(|k| is_key_pressed(*k))
            || action.buttons().iter().any(|b| self.gamepad.is_button_pressed(*b))
    }

    /// Left stick pushed past the threshold counts as walking
    fn stick_down(&self, action: GameAction) -> bool {
        let x = self.gamepad.left_stick().x;
        match action {
            GameAction::MoveLeft => x < -self.stick_threshold,
            GameAction::MoveRight => x > self.stick_threshold,
            _ => false,
        }
    }

    /// This frame's gameplay input
    pub fn frame_input(&self) -> FrameInput {
        resolve_frame_input(|a| self.action_down(a), |a| self.action_pressed(a))
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a `FrameInput` from action queries. Walking is held, jump and
/// attack fire once per press.
pub fn resolve_frame_input(
    down: impl Fn(GameAction) -> bool,
    pressed: impl Fn(GameAction) -> bool,
) -> FrameInput {
    FrameInput {
        left: down(GameAction::MoveLeft),
        right: down(GameAction::MoveRight),
        jump: pressed(GameAction::Jump),
        attack: pressed(GameAction::Attack),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_keys_move() {
        let input = resolve_frame_input(|a| a == GameAction::MoveLeft, |_| false);
        assert!(input.left);
        assert!(!input.right);
        assert_eq!(input.horizontal(), -1.0);
        assert!(!input.jump && !input.attack);
    }

    #[test]
    fn test_holding_jump_is_not_a_press() {
        let input = resolve_frame_input(|a| a == GameAction::Jump, |_| false);
        assert!(!input.jump);

        let input = resolve_frame_input(|_| false, |a| a == GameAction::Jump || a == GameAction::Attack);
        assert!(input.jump);
        assert!(input.attack);
    }

    #[test]
    fn test_both_directions_cancel() {
        let input = resolve_frame_input(
            |a| matches!(a, GameAction::MoveLeft | GameAction::MoveRight),
            |_| false,
        );
        assert_eq!(input.horizontal(), 0.0);
    }
}
