//! Everything that can stop the orrery.

use orrery_config::ConfigError;
use orrery_render::{RenderContextError, SceneError, TextureError, UniformError};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("GPU initialization failed: {0}")]
    RenderContext(#[from] RenderContextError),

    #[error("failed to build scene pipelines: {0}")]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error("uniform error: {0}")]
    Uniform(#[from] UniformError),

    #[error("GPU out of memory")]
    OutOfMemory,
}
