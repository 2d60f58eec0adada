//! Gamepad support
//!
//! Native: Uses gilrs crate for cross-platform gamepad input
//! WASM: No gamepad; keyboard only

use macroquad::prelude::Vec2;

// Standard gamepad button indices (Xbox layout names)
pub mod button {
    pub const A: u32 = 0;           // South
    pub const B: u32 = 1;           // East
    pub const X: u32 = 2;           // West
    pub const Y: u32 = 3;           // North
    pub const LB: u32 = 4;
    pub const RB: u32 = 5;
    pub const SELECT: u32 = 8;
    pub const START: u32 = 9;
    pub const DPAD_UP: u32 = 12;
    pub const DPAD_DOWN: u32 = 13;
    pub const DPAD_LEFT: u32 = 14;
    pub const DPAD_RIGHT: u32 = 15;
}

/// Edge detection over two button masks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonMasks {
    pub current: u32,
    pub previous: u32,
}

impl ButtonMasks {
    /// Shift in this frame's mask
    pub fn push(&mut self, mask: u32) {
        self.previous = self.current;
        self.current = mask;
    }

    pub fn down(&self, button: u32) -> bool {
        self.current & (1 << button) != 0
    }

    /// Down now, up last frame
    pub fn pressed(&self, button: u32) -> bool {
        self.down(button) && self.previous & (1 << button) == 0
    }
}

// ============================================================================
// Native Implementation (gilrs)
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
mod platform {
    use super::*;
    use gilrs::{Axis, Button as GilrsButton, Gilrs};

    pub struct Gamepad {
        gilrs: Option<Gilrs>,
        deadzone: f32,
        masks: ButtonMasks,
    }

    impl Gamepad {
        pub fn new() -> Self {
            let gilrs = match Gilrs::new() {
                Ok(g) => Some(g),
                Err(e) => {
                    log::warn!("Gamepad support unavailable: {}", e);
                    None
                }
            };
            Self {
                gilrs,
                deadzone: 0.15,
                masks: ButtonMasks::default(),
            }
        }

        /// Call once per frame before reading buttons
        pub fn poll(&mut self) {
            if let Some(gilrs) = &mut self.gilrs {
                // Events update gilrs' internal state
                while gilrs.next_event().is_some() {}
            }
            let mask = self.read_mask();
            self.masks.push(mask);
        }

        pub fn has_gamepad(&self) -> bool {
            self.active().is_some()
        }

        fn active(&self) -> Option<gilrs::Gamepad<'_>> {
            self.gilrs.as_ref()?.gamepads().next().map(|(_, gp)| gp)
        }

        fn read_mask(&self) -> u32 {
            let Some(gp) = self.active() else { return 0 };
            let mapping = [
                (GilrsButton::South, button::A),
                (GilrsButton::East, button::B),
                (GilrsButton::West, button::X),
                (GilrsButton::North, button::Y),
                (GilrsButton::LeftTrigger, button::LB),
                (GilrsButton::RightTrigger, button::RB),
                (GilrsButton::Select, button::SELECT),
                (GilrsButton::Start, button::START),
                (GilrsButton::DPadUp, button::DPAD_UP),
                (GilrsButton::DPadDown, button::DPAD_DOWN),
                (GilrsButton::DPadLeft, button::DPAD_LEFT),
                (GilrsButton::DPadRight, button::DPAD_RIGHT),
            ];
            mapping
                .iter()
                .filter(|(b, _)| gp.is_pressed(*b))
                .fold(0, |mask, (_, bit)| mask | (1 << bit))
        }

        pub fn is_button_down(&self, button: u32) -> bool {
            self.masks.down(button)
        }

        pub fn is_button_pressed(&self, button: u32) -> bool {
            self.masks.pressed(button)
        }

        pub fn left_stick(&self) -> Vec2 {
            let Some(gp) = self.active() else { return Vec2::ZERO };
            let x = gp.value(Axis::LeftStickX);
            let y = -gp.value(Axis::LeftStickY);
            apply_deadzone(x, y, self.deadzone)
        }
    }

    impl Default for Gamepad {
        fn default() -> Self {
            Self::new()
        }
    }
}

// ============================================================================
// WASM Implementation (none)
// ============================================================================

#[cfg(target_arch = "wasm32")]
mod platform {
    use super::*;

    #[derive(Default)]
    pub struct Gamepad;

    impl Gamepad {
        pub fn new() -> Self {
            Self
        }

        pub fn poll(&mut self) {}

        pub fn has_gamepad(&self) -> bool {
            false
        }

        pub fn is_button_down(&self, _button: u32) -> bool {
            false
        }

        pub fn is_button_pressed(&self, _button: u32) -> bool {
            false
        }

        pub fn left_stick(&self) -> Vec2 {
            Vec2::ZERO
        }
    }
}

// ============================================================================
// Shared utilities
// ============================================================================

/// Apply radial deadzone with linear rescaling
pub fn apply_deadzone(x: f32, y: f32, deadzone: f32) -> Vec2 {
    let len = (x * x + y * y).sqrt();
    if len < deadzone {
        return Vec2::ZERO;
    }
    // Rescale from deadzone..1.0 to 0.0..1.0
    let scale = (len - deadzone) / (1.0 - deadzone) / len;
    Vec2::new(x * scale, y * scale)
}

pub use platform::Gamepad;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadzone() {
        assert_eq!(apply_deadzone(0.1, 0.0, 0.15), Vec2::ZERO);
        assert!((apply_deadzone(1.0, 0.0, 0.15).x - 1.0).abs() < 1e-6);
        let half = apply_deadzone(0.575, 0.0, 0.15);
        assert!((half.x - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_button_edges() {
        let mut masks = ButtonMasks::default();
        masks.push(1 << button::A);
        assert!(masks.pressed(button::A));
        assert!(masks.down(button::A));

        masks.push(1 << button::A);
        assert!(!masks.pressed(button::A));
        assert!(masks.down(button::A));

        masks.push(0);
        assert!(!masks.down(button::A));
    }
}
