//! Keyboard mapping
//!
//! Browser `KeyboardEvent.key` values are mapped to game keys; the set of
//! held keys is folded into a `TickInput` each frame.

use crate::sim::TickInput;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Jump,
    Pause,
}

impl Key {
    /// Map a `KeyboardEvent.key` value
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            "ArrowUp" | "w" | "W" | " " | "Spacebar" => Some(Key::Jump),
            "Escape" | "p" | "P" => Some(Key::Pause),
            _ => None,
        }
    }

    /// Movement and jump keys would otherwise scroll the page
    pub fn suppresses_default(self) -> bool {
        !matches!(self, Key::Pause)
    }
}

/// Currently pressed movement keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    left: bool,
    right: bool,
    jump: bool,
}

impl HeldKeys {
    pub fn press(&mut self, key: Key) {
        self.set(key, true);
    }

    pub fn release(&mut self, key: Key) {
        self.set(key, false);
    }

    /// Drop everything (focus loss means key-up events never arrive)
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn set(&mut self, key: Key, down: bool) {
        match key {
            Key::Left => self.left = down,
            Key::Right => self.right = down,
            Key::Jump => self.jump = down,
            Key::Pause => {}
        }
    }

    /// Held keys as simulation input. Jump is level-triggered: holding it
    /// jumps again on the next landing.
    pub fn to_input(self) -> TickInput {
        TickInput {
            left: self.left,
            right: self.right,
            jump: self.jump,
        }
    }
}
