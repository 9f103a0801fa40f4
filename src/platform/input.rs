//! Key state latch
//!
//! Hosts forward raw key transitions here; the frame driver turns them into
//! one immutable [`TickInput`] per tick.

use crate::sim::TickInput;

/// Logical keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Fire,
}

/// Held keys plus a fire latch
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: TickInput,
    /// Fire pressed since the last consumed tick
    fire_latched: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Up => self.held.up = true,
            Key::Down => self.held.down = true,
            Key::Left => self.held.left = true,
            Key::Right => self.held.right = true,
            Key::Fire => {
                self.held.fire = true;
                self.fire_latched = true;
            }
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Up => self.held.up = false,
            Key::Down => self.held.down = false,
            Key::Left => self.held.left = false,
            Key::Right => self.held.right = false,
            Key::Fire => self.held.fire = false,
        }
    }

    /// Snapshot for the next tick; a press released before the tick still counts
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            fire: self.held.fire || self.fire_latched,
            ..self.held
        }
    }

    /// Clear one-shot state after a tick has consumed it
    pub fn consume(&mut self) {
        self.fire_latched = false;
    }
}
