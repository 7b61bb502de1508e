//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::scene::SceneConfig;

const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Starting camera and its tuning.
    pub camera: CameraConfig,
    /// Point lights shared by every lit body.
    pub lighting: LightingConfig,
    /// Sun, planets and backdrop.
    pub scene: SceneConfig,
    /// Where textures and shader overrides live.
    pub assets: AssetConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Start in borderless fullscreen.
    pub fullscreen: bool,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Window title.
    pub title: String,
}

/// Camera configuration. Angles are in degrees.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub world_up: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Degrees per unit of mouse movement.
    pub sensitivity: f32,
    /// Initial vertical field of view.
    pub zoom: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
}

/// Lighting configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightingConfig {
    /// World-space point light positions. The body shader takes exactly
    /// six; missing entries are filled from the defaults, extras ignored.
    pub positions: Vec<[f32; 3]>,
}

/// Asset locations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetConfig {
    /// Root directory that texture paths are relative to.
    pub root: PathBuf,
    /// Directory holding `<program>.vert.wgsl` / `<program>.frag.wgsl`
    /// overrides. Built-in shaders are used when unset.
    pub shader_dir: Option<PathBuf>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 900,
            fullscreen: false,
            vsync: true,
            title: "Orrery - Solar System".to_string(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 3.0],
            world_up: [0.0, 1.0, 0.0],
            yaw: -90.0,
            pitch: 0.0,
            speed: 10.0,
            sensitivity: 0.05,
            zoom: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            positions: vec![
                [2.0, 0.0, 0.0],
                [-2.0, 0.0, 0.0],
                [0.0, 2.0, 0.0],
                [0.0, -2.0, 0.0],
                [0.0, 0.0, 2.0],
                [0.0, 0.0, -2.0],
            ],
        }
    }
}

impl LightingConfig {
    /// Exactly `N` light positions: configured ones first, defaults after.
    pub fn fixed<const N: usize>(&self) -> [[f32; 3]; N] {
        let defaults = Self::default().positions;
        std::array::from_fn(|i| {
            self.positions
                .get(i)
                .or_else(|| defaults.get(i))
                .copied()
                .unwrap_or([0.0; 3])
        })
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
            shader_dir: None,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// The platform config directory for the orrery, e.g. `~/.config/orrery`.
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("orrery"))
        .ok_or(ConfigError::NoConfigDir)
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(false)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Resolve an asset-relative path against `assets.root`.
    pub fn asset_path(&self, relative: &str) -> PathBuf {
        self.assets.root.join(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(4))
                .unwrap();
        assert!(ron_str.contains("width: 1200"));
        assert!(ron_str.contains("height: 900"));
        assert!(ron_str.contains("saturn"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(window: (width: 800), debug: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 900);
        assert_eq!(config.camera, CameraConfig::default());
        assert_eq!(config.scene.bodies.len(), 8);
    }

    #[test]
    fn test_custom_body_table() {
        let ron_str = r#"(
            scene: (
                bodies: [
                    (name: "moonlet", texture: "textures/moon.png", orbit_radius: 2.0, size: 0.1),
                ],
            ),
        )"#;
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.scene.bodies.len(), 1);
        let body = &config.scene.bodies[0];
        assert_eq!(body.name, "moonlet");
        assert_eq!(body.spin_axis, [0.0, 1.0, 0.0]);
        assert!(body.ring.is_none());
        assert_eq!(config.scene.sphere_longitude_segments, 36);
    }

    #[test]
    fn test_extra_field_ignored() {
        let ron_str = "(future_setting: true)";
        let result: Result<Config, _> = ron::from_str(ron_str);
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.width = 1920;
        config.camera.position = [1.0, 2.0, 3.0];
        config.scene.bodies.truncate(3);
        config.assets.shader_dir = Some(PathBuf::from("shaders"));

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("orrery");
        let config = Config::load_or_create(&nested).unwrap();
        assert_eq!(config, Config::default());
        assert!(nested.join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.scene.bodies[2].orbit_speed = 1.0;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.map(|c| c.scene.bodies[2].orbit_speed), Some(1.0));
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_light_positions_padded_to_six() {
        let lighting = LightingConfig {
            positions: vec![[9.0, 9.0, 9.0]],
        };
        let lights: [[f32; 3]; 6] = lighting.fixed();
        assert_eq!(lights[0], [9.0, 9.0, 9.0]);
        assert_eq!(lights[1], [-2.0, 0.0, 0.0]);
        assert_eq!(lights[5], [0.0, 0.0, -2.0]);
    }

    #[test]
    fn test_asset_path_joins_root() {
        let config = Config::default();
        assert_eq!(
            config.asset_path("textures/sun.bmp"),
            PathBuf::from("assets/textures/sun.bmp")
        );
    }
}
