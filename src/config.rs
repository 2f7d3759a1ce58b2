//! Runtime configuration: built-in defaults, optionally overridden by a JSON file.

use std::f32::consts::FRAC_PI_2;
use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use crate::camera::{CameraPose, Orientation};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("`{field}` is not a hex color: {value:?}")]
    Color { field: &'static str, value: String },
    #[error("`{field}` {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Resource, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct GalleryConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub floor: FloorConfig,
    pub walls: WallConfig,
    pub paintings: PaintingConfig,
    pub show_diagnostics: bool,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Gallery Walk".into(),
            width: 1280.0,
            height: 800.0,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct PoseConfig {
    pub position: [f32; 3],
    /// Euler angles in radians, applied X then Y then Z.
    pub rotation: [f32; 3],
}

impl PoseConfig {
    pub fn pose(&self) -> CameraPose {
        let [pitch, yaw, roll] = self.rotation;
        CameraPose {
            translation: Vec3::from_array(self.position),
            orientation: Orientation { pitch, yaw, roll },
        }
    }
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: [0.0; 3],
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub top_down: PoseConfig,
    pub first_person: PoseConfig,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 90.0,
            near: 0.1,
            far: 5000.0,
            top_down: PoseConfig {
                position: [0.0, 100.0, 0.0],
                rotation: [-FRAC_PI_2, 0.0, 0.0],
            },
            first_person: PoseConfig {
                position: [0.0, 2.0, 0.0],
                rotation: [0.0; 3],
            },
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ControlsConfig {
    /// World units per frame.
    pub move_speed: f32,
    /// Radians of yaw per pixel of horizontal drag.
    pub rotation_speed: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            move_speed: 0.5,
            rotation_speed: 0.005,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FloorConfig {
    pub tile_size: f32,
    pub columns: u32,
    pub rows: u32,
    pub light: String,
    pub dark: String,
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self {
            tile_size: 2.0,
            columns: 50,
            rows: 200,
            light: "#ffffff".into(),
            dark: "#808080".into(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WallConfig {
    pub length: f32,
    pub height: f32,
    /// Distance of each wall from the room's center line.
    pub offset: f32,
    pub color: String,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            length: 200.0,
            height: 20.0,
            offset: 100.0,
            color: "#808080".into(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PaintingConfig {
    pub width: f32,
    pub height: f32,
    pub inset: f32,
    /// Image paths relative to `assets/`, hung front to back.
    pub left: Vec<String>,
    pub right: Vec<String>,
}

impl Default for PaintingConfig {
    fn default() -> Self {
        Self {
            width: 12.0,
            height: 8.0,
            inset: 0.05,
            left: Vec::new(),
            right: Vec::new(),
        }
    }
}

impl GalleryConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("window.width", self.window.width)?;
        positive("window.height", self.window.height)?;
        if !(self.camera.fov_degrees > 0.0 && self.camera.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid {
                field: "camera.fov_degrees",
                reason: "must lie strictly between 0 and 180",
            });
        }
        positive("camera.near", self.camera.near)?;
        if self.camera.far <= self.camera.near {
            return Err(ConfigError::Invalid {
                field: "camera.far",
                reason: "must be greater than camera.near",
            });
        }
        positive("controls.move_speed", self.controls.move_speed)?;
        positive("controls.rotation_speed", self.controls.rotation_speed)?;
        positive("floor.tile_size", self.floor.tile_size)?;
        if self.floor.columns == 0 || self.floor.rows == 0 {
            return Err(ConfigError::Invalid {
                field: "floor",
                reason: "needs at least one column and one row",
            });
        }
        finite_pose("camera.top_down", &self.camera.top_down)?;
        finite_pose("camera.first_person", &self.camera.first_person)?;
        positive("walls.length", self.walls.length)?;
        positive("walls.height", self.walls.height)?;
        positive("walls.offset", self.walls.offset)?;
        positive("paintings.width", self.paintings.width)?;
        positive("paintings.height", self.paintings.height)?;
        // Paintings hang on the room side of the wall plane.
        let inset = self.paintings.inset;
        if !(inset >= 0.0 && inset < self.walls.offset) {
            return Err(ConfigError::Invalid {
                field: "paintings.inset",
                reason: "must be at least 0 and less than walls.offset",
            });
        }
        Palette::from_config(self).map(|_| ())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: "must be a positive number",
        })
    }
}

/// Parsed scene colors.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub floor_light: Color,
    pub floor_dark: Color,
    pub wall: Color,
}

impl Palette {
    pub fn from_config(config: &GalleryConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            floor_light: parse_color("floor.light", &config.floor.light)?,
            floor_dark: parse_color("floor.dark", &config.floor.dark)?,
            wall: parse_color("walls.color", &config.walls.color)?,
        })
    }
}

fn finite_pose(field: &'static str, pose: &PoseConfig) -> Result<(), ConfigError> {
    if pose.position.iter().chain(&pose.rotation).all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: "position and rotation must be finite numbers",
        })
    }
}

fn parse_color(field: &'static str, value: &str) -> Result<Color, ConfigError> {
    Srgba::hex(value)
        .map(Color::from)
        .map_err(|_| ConfigError::Color {
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_gallery_room() {
        let config = GalleryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.floor.columns, 50);
        assert_eq!(config.floor.rows, 200);
        assert_eq!(config.walls.offset, 100.0);
        assert_eq!(config.camera.top_down.position, [0.0, 100.0, 0.0]);
        assert_eq!(config.camera.first_person.pose().translation, Vec3::new(0.0, 2.0, 0.0));
        assert!(config.paintings.left.is_empty());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config: GalleryConfig = serde_json::from_str(
            r#"{
                "controls": { "move_speed": 1.25 },
                "paintings": { "left": ["paintings/dawn.jpg", "paintings/dusk.jpg"] }
            }"#,
        )
        .unwrap();
        assert_eq!(config.controls.move_speed, 1.25);
        assert_eq!(config.controls.rotation_speed, 0.005);
        assert_eq!(config.paintings.left.len(), 2);
        assert_eq!(config.paintings.width, 12.0);
        assert_eq!(config.walls, WallConfig::default());
    }

    #[test]
    fn bad_color_is_rejected() {
        let mut config = GalleryConfig::default();
        config.walls.color = "granite".into();
        match config.validate() {
            Err(ConfigError::Color { field, value }) => {
                assert_eq!(field, "walls.color");
                assert_eq!(value, "granite");
            }
            other => panic!("expected color error, got {other:?}"),
        }
    }

    #[test]
    fn empty_grid_and_inverted_clip_planes_are_rejected() {
        let mut config = GalleryConfig::default();
        config.floor.rows = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "floor", .. })
        ));

        let mut config = GalleryConfig::default();
        config.camera.far = 0.05;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "camera.far", .. })
        ));
    }

    #[test]
    fn painting_inset_must_stay_inside_the_room() {
        for inset in [-0.5, 100.0, 250.0, f32::NAN] {
            let mut config = GalleryConfig::default();
            config.paintings.inset = inset;
            assert!(
                matches!(
                    config.validate(),
                    Err(ConfigError::Invalid { field: "paintings.inset", .. })
                ),
                "inset {inset}"
            );
        }

        let mut config = GalleryConfig::default();
        config.paintings.inset = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn non_finite_pose_is_rejected() {
        let mut config = GalleryConfig::default();
        config.camera.top_down.position[1] = f32::INFINITY;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "camera.top_down", .. })
        ));

        let mut config = GalleryConfig::default();
        config.camera.first_person.rotation[0] = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "camera.first_person", .. })
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = GalleryConfig::load(Path::new("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("does/not/exist.json"));
    }

    #[test]
    fn palette_parses_hex_with_and_without_hash() {
        let mut config = GalleryConfig::default();
        config.floor.dark = "808080".into();
        let palette = Palette::from_config(&config).unwrap();
        assert_eq!(palette.floor_light, Color::from(Srgba::WHITE));
        assert_eq!(palette.floor_dark, palette.wall);
    }
}
