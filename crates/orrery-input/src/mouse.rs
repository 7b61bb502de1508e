//! Frame-coherent mouse state for free-look cameras.
//!
//! While the cursor is captured, look deltas come from raw
//! `DeviceEvent::MouseMotion`. Otherwise they are differences between
//! successive `CursorMoved` positions, and the first position seen after
//! startup (or after [`reset_anchor`](MouseState::reset_anchor)) only seeds
//! the anchor so the view does not jump.

use glam::Vec2;
use tracing::{debug, warn};
use winit::event::MouseScrollDelta;
use winit::window::{CursorGrabMode, Window};

/// Pixels of a touchpad scroll that count as one wheel line.
pub const PIXELS_PER_LINE: f64 = 40.0;

#[derive(Debug, Clone, Default)]
pub struct MouseState {
    /// Last cursor position, `None` until the first `CursorMoved`.
    anchor: Option<Vec2>,
    delta: Vec2,
    scroll: f32,
    captured: bool,
}

impl MouseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a `CursorMoved` event (window coordinates, y down).
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        let position = Vec2::new(x as f32, y as f32);
        if let Some(previous) = self.anchor
            && !self.captured
        {
            self.delta += position - previous;
        }
        self.anchor = Some(position);
    }

    /// Process a `DeviceEvent::MouseMotion` raw delta. Ignored unless captured.
    pub fn on_raw_motion(&mut self, dx: f64, dy: f64) {
        if self.captured {
            self.delta += Vec2::new(dx as f32, dy as f32);
        }
    }

    /// Process a `MouseWheel` event. Positive is away from the user.
    pub fn on_scroll(&mut self, delta: MouseScrollDelta) {
        self.scroll += match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
        };
    }

    /// Forget the last cursor position so the next move only re-seeds it.
    pub fn reset_anchor(&mut self) {
        self.anchor = None;
    }

    /// Grab and hide the cursor, or release it.
    ///
    /// Tries `Locked` first and falls back to `Confined` where locking is
    /// unsupported.
    pub fn set_captured(&mut self, window: &Window, captured: bool) {
        self.captured = captured;
        self.reset_anchor();
        if captured {
            if let Err(err) = window.set_cursor_grab(CursorGrabMode::Locked) {
                debug!("cursor lock unavailable ({err}), confining instead");
                if let Err(err) = window.set_cursor_grab(CursorGrabMode::Confined) {
                    warn!("failed to grab cursor: {err}");
                }
            }
            window.set_cursor_visible(false);
        } else {
            if let Err(err) = window.set_cursor_grab(CursorGrabMode::None) {
                warn!("failed to release cursor: {err}");
            }
            window.set_cursor_visible(true);
        }
    }

    #[cfg(test)]
    pub(crate) fn set_captured_flag(&mut self, captured: bool) {
        self.captured = captured;
        self.reset_anchor();
    }

    pub fn clear_transients(&mut self) {
        self.delta = Vec2::ZERO;
        self.scroll = 0.0;
    }

    /// Raw movement since the last clear, y down.
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    /// Movement since the last clear as a look offset: y is flipped so that
    /// moving the mouse up yields a positive pitch offset.
    #[must_use]
    pub fn look_offset(&self) -> Vec2 {
        Vec2::new(self.delta.x, -self.delta.y)
    }

    /// Wheel lines accumulated since the last clear.
    #[must_use]
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    #[must_use]
    pub fn is_captured(&self) -> bool {
        self.captured
    }
}
