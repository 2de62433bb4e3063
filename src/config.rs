//! Runtime configuration
//!
//! Everything is optional: a missing file, table or key falls back to the
//! defaults below, so a TOML file only has to name what it changes.
//!
//! ```toml
//! [server]
//! port = 8080
//!
//! [viewer]
//! asset_root = "dist"
//!
//! [[viewer.videos]]
//! name = "jv1"
//! frames = "dist/frames/jv1"
//! fps = 24.0
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::composer::SceneLayout;
use crate::error::Result;

/// Static host settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    /// Directory served for every path other than `/` and `/bonus`
    pub static_dir: PathBuf,
    /// Body returned for `/`
    pub greeting: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 80,
            static_dir: PathBuf::from("dist"),
            greeting: "Happy Birthday!".to_string(),
        }
    }
}

/// A directory of numbered frames played back as a named video source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoConfig {
    pub name: String,
    pub frames: PathBuf,
    #[serde(default = "default_fps")]
    pub fps: f32,
}

fn default_fps() -> f32 {
    30.0
}

/// Desktop viewer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub width: u32,
    pub height: u32,
    /// Directory that layout asset paths are relative to
    pub asset_root: PathBuf,
    /// Radians of yaw or pitch per pixel of mouse drag
    pub look_speed: f32,
    pub videos: Vec<VideoConfig>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            asset_root: PathBuf::from("dist"),
            look_speed: 0.005,
            videos: Vec::new(),
        }
    }
}

/// Top-level configuration shared by both binaries
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub viewer: ViewerConfig,
    pub layout: SceneLayout,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Loads `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KeepsakeError;

    #[test]
    fn test_defaults_match_the_published_site() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 80);
        assert_eq!(config.server.static_dir, PathBuf::from("dist"));
        assert_eq!(config.server.greeting, "Happy Birthday!");
        assert_eq!(config.layout.panels.len(), 26);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [server]
            port = 8080

            [[viewer.videos]]
            name = "jv1"
            frames = "frames/jv1"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.greeting, "Happy Birthday!");
        assert_eq!(config.viewer.width, 1280);
        assert_eq!(config.viewer.videos.len(), 1);
        assert_eq!(config.viewer.videos[0].fps, 30.0);
        assert_eq!(config.layout, SceneLayout::default());
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(AppConfig::from_toml_str("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let result = AppConfig::from_toml_str("[server]\nport = \"eighty\"");
        assert!(matches!(result, Err(KeepsakeError::Config(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = AppConfig::load_or_default(Some(Path::new("/nonexistent/keepsake.toml")));
        assert!(matches!(result, Err(KeepsakeError::Io(_))));
    }
}
