//! Emulator configuration
//!
//! Every struct here deserializes from JSON with defaults for missing fields,
//! so a config file only needs to name what it changes:
//!
//! ```json
//! { "width": 128, "height": 32, "transform": "smoothscale", "scale": 4 }
//! ```

use std::path::{Path, PathBuf};

use display_specs::{ColorMode, DisplaySpec};
use serde::{Deserialize, Serialize};

use crate::error::{EmulatorError, Result};
use crate::transform::Transform;

/// Device geometry and presentation shared by every backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmulatorConfig {
    /// Physical panel width in pixels
    pub width: u32,
    /// Physical panel height in pixels
    pub height: u32,
    /// Rotation applied to every frame before rendering
    pub rotation: Rotation,
    /// Colour depth frames are converted to
    pub mode: ColorMode,
    /// How each frame is rescaled or re-rendered
    pub transform: Transform,
    /// Upscaling factor (1 = no scaling, 2 = 2x for visibility, etc.)
    pub scale: u32,
}

impl EmulatorConfig {
    /// Default configuration: 128×64 RGB, scale2x at 2x
    pub const DEFAULT: Self = Self {
        width: 128,
        height: 64,
        rotation: Rotation::Degrees0,
        mode: ColorMode::Rgb,
        transform: Transform::Scale2x,
        scale: 2,
    };

    /// No transform, no upscaling (1:1 pixel mapping)
    pub const NATIVE: Self = Self {
        width: 128,
        height: 64,
        rotation: Rotation::Degrees0,
        mode: ColorMode::Rgb,
        transform: Transform::None,
        scale: 1,
    };

    /// Configuration matching a display specification
    ///
    /// Uses the spec's suggested transform when it names a known one.
    pub fn for_spec(spec: &DisplaySpec) -> Self {
        let transform = spec
            .suggested_transform
            .and_then(|name| name.parse().ok())
            .unwrap_or(Transform::Identity);
        let scale = match transform {
            Transform::None => 1,
            _ => 2,
        };
        Self {
            width: spec.width,
            height: spec.height,
            rotation: Rotation::Degrees0,
            mode: spec.color_mode,
            transform,
            scale,
        }
    }

    /// Replace the geometry, keeping everything else
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Replace transform and scale together
    pub fn with_transform(mut self, transform: Transform, scale: u32) -> Self {
        self.transform = transform;
        self.scale = scale;
        self
    }

    /// Load from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(EmulatorError::from)
    }
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Display rotation modes
///
/// Rotation is applied to each frame before it is rendered: callers draw in
/// logical coordinates (e.g. 64×128 for a rotated 128×64 panel) and the
/// emulator turns the frame back to the panel's physical orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Rotation {
    /// No rotation (landscape: width × height)
    #[default]
    Degrees0,
    /// Rotate 90° clockwise (portrait: height × width)
    Degrees90,
    /// Rotate 180° (upside-down landscape: width × height)
    Degrees180,
    /// Rotate 270° clockwise / 90° counter-clockwise (portrait: height × width)
    Degrees270,
}

impl Rotation {
    /// Check if rotation swaps width and height
    pub fn swaps_dimensions(&self) -> bool {
        matches!(self, Rotation::Degrees90 | Rotation::Degrees270)
    }

    /// Calculate logical dimensions after rotation
    pub fn apply_to_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        if self.swaps_dimensions() {
            (height, width)
        } else {
            (width, height)
        }
    }

    /// Number of quarter turns (0-3)
    pub fn quarter_turns(&self) -> u8 {
        match self {
            Rotation::Degrees0 => 0,
            Rotation::Degrees90 => 1,
            Rotation::Degrees180 => 2,
            Rotation::Degrees270 => 3,
        }
    }
}

impl TryFrom<u8> for Rotation {
    type Error = String;

    fn try_from(turns: u8) -> std::result::Result<Self, Self::Error> {
        match turns {
            0 => Ok(Rotation::Degrees0),
            1 => Ok(Rotation::Degrees90),
            2 => Ok(Rotation::Degrees180),
            3 => Ok(Rotation::Degrees270),
            other => Err(format!("rotation must be 0-3 quarter turns, got {other}")),
        }
    }
}

impl From<Rotation> for u8 {
    fn from(rotation: Rotation) -> Self {
        rotation.quarter_turns()
    }
}

/// Settings for the numbered-PNG capture backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Output filename; `{}` or `{:06}` is replaced by the 1-based frame number
    pub file_template: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            file_template: "frame_{:06}.png".to_string(),
        }
    }
}

/// Settings for the animated GIF backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GifConfig {
    /// Where the animation is written on flush
    pub filename: PathBuf,
    /// Per-frame delay in milliseconds
    pub duration_ms: u32,
    /// Number of repeats; 0 loops forever
    pub loop_count: u16,
    /// Stop recording after this many frames
    pub max_frames: Option<u32>,
}

impl Default for GifConfig {
    fn default() -> Self {
        Self {
            filename: PathBuf::from("emulator_anim.gif"),
            duration_ms: 10,
            loop_count: 0,
            max_frames: None,
        }
    }
}

/// Settings for the windowed backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Upper bound on presented frames per second (0 = unlimited)
    pub frame_rate: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Display Emulator".to_string(),
            frame_rate: 60,
        }
    }
}

/// Settings for the terminal backends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Switch to the alternate screen while the backend owns the terminal
    pub alternate_screen: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            alternate_screen: true,
        }
    }
}

/// Everything the demo binary can read from one JSON file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Geometry and pipeline
    pub emulator: EmulatorConfig,
    /// `capture` backend
    pub capture: CaptureConfig,
    /// `gifanim` backend
    pub gif: GifConfig,
    /// `window` backend
    pub window: WindowConfig,
    /// `asciiart` and `asciiblock` backends
    pub terminal: TerminalConfig,
}

impl FileConfig {
    /// Load from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(EmulatorError::from)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_rotation_dimensions() {
        assert_eq!(Rotation::Degrees0.apply_to_dimensions(128, 64), (128, 64));
        assert_eq!(Rotation::Degrees90.apply_to_dimensions(128, 64), (64, 128));
        assert_eq!(Rotation::Degrees180.apply_to_dimensions(128, 64), (128, 64));
        assert_eq!(Rotation::Degrees270.apply_to_dimensions(128, 64), (64, 128));
    }

    #[test]
    fn test_rotation_from_quarter_turns() {
        assert_eq!(Rotation::try_from(1), Ok(Rotation::Degrees90));
        assert!(Rotation::try_from(4).is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EmulatorConfig::from_json(r#"{ "width": 32, "rotation": 3 }"#).unwrap();
        assert_eq!(config.width, 32);
        assert_eq!(config.height, 64);
        assert_eq!(config.rotation, Rotation::Degrees270);
        assert_eq!(config.transform, Transform::Scale2x);
    }

    #[test]
    fn test_json_transform_and_mode_names() {
        let config =
            EmulatorConfig::from_json(r#"{ "transform": "led_matrix", "mode": "monochrome" }"#)
                .unwrap();
        assert_eq!(config.transform, Transform::LedMatrix);
        assert_eq!(config.mode, ColorMode::Monochrome);
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let err = EmulatorConfig::from_json(r#"{ "rotation": 9 }"#).unwrap_err();
        assert!(matches!(err, EmulatorError::Config(_)));
    }

    #[test]
    fn test_for_spec_uses_suggested_transform() {
        let config = EmulatorConfig::for_spec(&display_specs::displays::MAX7219_8X8);
        assert_eq!(config.transform, Transform::LedMatrix);
        assert_eq!((config.width, config.height), (8, 8));

        let config = EmulatorConfig::for_spec(&display_specs::displays::ST7789_240X240);
        assert_eq!(config.transform, Transform::Identity);
    }

    #[test]
    fn test_file_config_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emu.json");
        std::fs::write(
            &path,
            r#"{ "gif": { "duration_ms": 40, "max_frames": 3 }, "window": { "frame_rate": 30 } }"#,
        )
        .unwrap();
        let config = FileConfig::from_json_file(&path).unwrap();
        assert_eq!(config.gif.duration_ms, 40);
        assert_eq!(config.gif.max_frames, Some(3));
        assert_eq!(config.gif.loop_count, 0);
        assert_eq!(config.window.frame_rate, 30);
        assert_eq!(config.emulator, EmulatorConfig::DEFAULT);
    }
}
