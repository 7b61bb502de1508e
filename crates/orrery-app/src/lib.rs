//! The orrery application: window, event loop and per-frame rendering of the
//! solar system.

pub mod clock;
pub mod controls;
pub mod error;
pub mod renderer;
pub mod solar;
pub mod window;

pub use clock::{FrameClock, MAX_FRAME_TIME};
pub use error::AppError;
pub use renderer::{FrameView, Renderer};
pub use solar::{BodyTransform, SolarSystem};
pub use window::{AppState, run};
