//! Configuration for the orrery.
//!
//! Settings persist to disk as a RON file and can be overridden from the
//! command line. The solar system itself is described here as a table of
//! bodies, so adding or retuning a planet is a config edit.

mod cli;
mod config;
mod error;
mod scene;

pub use cli::CliArgs;
pub use config::{
    AssetConfig, CameraConfig, Config, DebugConfig, LightingConfig, WindowConfig,
    default_config_dir,
};
pub use error::ConfigError;
pub use scene::{BodyConfig, RingConfig, SceneConfig, SunConfig};
