//! Viewport configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::types::{Result, Vec3};

/// Full viewport configuration. Every field has a default so partial JSON
/// files are accepted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub camera: CameraConfig,
    pub renderer: RendererConfig,
    pub controls: ControlsConfig,
    pub highlight: HighlightConfig,
    pub fly_to: FlyToConfig,
    /// Prefix for click-to-navigate targets. Navigation is off when unset.
    pub base_url: Option<String>,
}

impl ViewportConfig {
    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        log::debug!("Loaded viewport config from {}", path.display());
        Ok(config)
    }

    /// Save as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Perspective camera setup
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
}

impl CameraConfig {
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 53.0,
            near: 0.1,
            far: 5000.0,
            position: [0.0, 3.2, 13.0],
        }
    }
}

/// Renderer setup
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Keep an alpha channel so the page behind shows through
    pub alpha: bool,
    pub antialias: bool,
    /// Device pixel ratio; `None` asks the host
    pub pixel_ratio: Option<f64>,
    /// Linear RGBA used by `clear`
    pub clear_color: [f64; 4],
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            alpha: true,
            antialias: true,
            pixel_ratio: None,
            clear_color: [0.0, 0.0, 0.0, 0.0],
        }
    }
}

/// Orbit controls setup
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub min_distance: f32,
    pub max_distance: f32,
    pub zoom_speed: f32,
    pub rotate_speed: f32,
    pub enable_pan: bool,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            min_distance: 1.0,
            max_distance: 200.0,
            zoom_speed: 2.0,
            rotate_speed: 1.0,
            enable_pan: false,
            auto_rotate: true,
            auto_rotate_speed: 0.2,
        }
    }
}

/// Hover highlight setup
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Material opacity of the hovered object
    pub opacity: f32,
    /// Geometry name shown without the "section" prefix
    pub floor_name: String,
    /// Extra pixels added to the canvas size when placing the label
    pub label_offset: f32,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            opacity: 0.4,
            floor_name: "floor".to_string(),
            label_offset: 5.0,
        }
    }
}

/// Keyframe times of the click fly-to clip, in seconds
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlyToConfig {
    pub turn_start: f32,
    pub turn_end: f32,
    pub move_start: f32,
    pub move_end: f32,
}

impl Default for FlyToConfig {
    fn default() -> Self {
        Self {
            turn_start: 0.0,
            turn_end: 0.3,
            move_start: 0.3,
            move_end: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewportConfig::default();
        assert_eq!(config.camera.fov_degrees, 53.0);
        assert_eq!(config.camera.position(), Vec3::new(0.0, 3.2, 13.0));
        assert_eq!(config.controls.max_distance, 200.0);
        assert!(!config.controls.enable_pan);
        assert_eq!(config.highlight.opacity, 0.4);
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: ViewportConfig =
            serde_json::from_str(r#"{ "base_url": "https://x/", "controls": { "zoom_speed": 4.0 } }"#)
                .unwrap();
        assert_eq!(config.base_url.as_deref(), Some("https://x/"));
        assert_eq!(config.controls.zoom_speed, 4.0);
        assert_eq!(config.controls.min_distance, 1.0);
        assert_eq!(config.fly_to, FlyToConfig::default());
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("viewport.json");

        let mut config = ViewportConfig::default();
        config.base_url = Some("https://example.org/rooms/".to_string());
        config.highlight.opacity = 0.6;
        config.save(&path).unwrap();

        let loaded = ViewportConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ViewportConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, crate::core::Error::Io(_)));
    }
}
