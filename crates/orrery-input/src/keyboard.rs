//! Frame-coherent keyboard state.
//!
//! Physical key codes are used so WASD sits under the same fingers on every
//! keyboard layout.

use std::collections::HashSet;

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// The parts of a key event the tracker cares about.
#[derive(Debug, Clone, Copy)]
pub struct RawKeyEvent {
    pub key: PhysicalKey,
    pub state: ElementState,
    pub repeat: bool,
}

impl RawKeyEvent {
    pub fn new(code: KeyCode, state: ElementState) -> Self {
        Self {
            key: PhysicalKey::Code(code),
            state,
            repeat: false,
        }
    }
}

/// Held keys plus the keys pressed during the current frame.
///
/// Feed it with [`process_event`](Self::process_event), query it, then call
/// [`clear_transients`](Self::clear_transients) once the frame is done.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    pressed: HashSet<PhysicalKey>,
    just_pressed: HashSet<PhysicalKey>,
}

impl KeyboardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_event(&mut self, event: &KeyEvent) {
        self.process_raw(RawKeyEvent {
            key: event.physical_key,
            state: event.state,
            repeat: event.repeat,
        });
    }

    /// Repeat events are ignored; a held key stays pressed until released.
    pub fn process_raw(&mut self, event: RawKeyEvent) {
        if event.repeat {
            return;
        }
        match event.state {
            ElementState::Pressed => {
                if self.pressed.insert(event.key) {
                    self.just_pressed.insert(event.key);
                }
            }
            ElementState::Released => {
                self.pressed.remove(&event.key);
            }
        }
    }

    #[must_use]
    pub fn is_pressed(&self, key: PhysicalKey) -> bool {
        self.pressed.contains(&key)
    }

    /// Shorthand for `is_pressed(PhysicalKey::Code(code))`.
    #[must_use]
    pub fn is_code_pressed(&self, code: KeyCode) -> bool {
        self.is_pressed(PhysicalKey::Code(code))
    }

    /// Pressed since the last [`clear_transients`](Self::clear_transients),
    /// even if already released again.
    #[must_use]
    pub fn just_pressed(&self, key: PhysicalKey) -> bool {
        self.just_pressed.contains(&key)
    }

    /// Shorthand for `just_pressed(PhysicalKey::Code(code))`.
    #[must_use]
    pub fn code_just_pressed(&self, code: KeyCode) -> bool {
        self.just_pressed(PhysicalKey::Code(code))
    }

    /// Forget every held key, e.g. when the window loses focus and release
    /// events will never arrive.
    pub fn release_all(&mut self) {
        self.pressed.clear();
    }

    pub fn clear_transients(&mut self) {
        self.just_pressed.clear();
    }
}
