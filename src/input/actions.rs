//! Game action definitions
//!
//! Keyboard layout follows the classic platformer setup: A/D or the arrow
//! keys to walk, W or Up to jump, Space to attack.

use macroquad::input::KeyCode;
use super::gamepad::button;

/// Everything the player can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    // Movement (held)
    MoveLeft,
    MoveRight,

    // Moves (pressed)
    Jump,
    Attack,

    // System
    Pause,
    Restart,    // only while paused
    Quit,       // only while paused or after victory
}

impl GameAction {
    pub const ALL: [GameAction; 7] = [
        GameAction::MoveLeft,
        GameAction::MoveRight,
        GameAction::Jump,
        GameAction::Attack,
        GameAction::Pause,
        GameAction::Restart,
        GameAction::Quit,
    ];

    /// Keyboard keys bound to this action
    pub fn keys(self) -> &'static [KeyCode] {
        match self {
            GameAction::MoveLeft => &[KeyCode::A, KeyCode::Left],
            GameAction::MoveRight => &[KeyCode::D, KeyCode::Right],
            GameAction::Jump => &[KeyCode::W, KeyCode::Up],
            GameAction::Attack => &[KeyCode::Space],
            GameAction::Pause => &[KeyCode::Escape],
            GameAction::Restart => &[KeyCode::R],
            GameAction::Quit => &[KeyCode::Q],
        }
    }

    /// Gamepad buttons bound to this action (standard mapping indices)
    pub fn buttons(self) -> &'static [u32] {
        match self {
            GameAction::MoveLeft => &[button::DPAD_LEFT],
            GameAction::MoveRight => &[button::DPAD_RIGHT],
            GameAction::Jump => &[button::A],
            GameAction::Attack => &[button::X, button::RB],
            GameAction::Pause => &[button::START],
            GameAction::Restart => &[button::SELECT],
            GameAction::Quit => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_action_has_a_key() {
        for action in GameAction::ALL {
            assert!(!action.keys().is_empty(), "{:?} has no key", action);
        }
    }

    #[test]
    fn test_bindings_do_not_overlap() {
        for a in GameAction::ALL {
            for b in GameAction::ALL {
                if a != b {
                    assert!(a.keys().iter().all(|k| !b.keys().contains(k)), "{:?} and {:?} share a key", a, b);
                }
            }
        }
    }
}
