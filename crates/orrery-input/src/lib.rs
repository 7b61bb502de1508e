//! Keyboard and mouse state accumulated from winit events.
//!
//! Both trackers are fed from the event loop and read once per frame by the
//! frame loop, which then clears their per-frame transients.

pub mod keyboard;
pub mod mouse;

pub use keyboard::{KeyboardState, RawKeyEvent};
pub use mouse::MouseState;
