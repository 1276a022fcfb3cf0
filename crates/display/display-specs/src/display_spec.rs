//! Display specification types
//!
//! Defines the characteristics of pixel displays needed to emulate them.

use core::fmt;
use core::str::FromStr;

/// Complete specification of a pixel display
///
/// Contains everything the emulator needs to stand in for the panel:
/// - Physical resolution
/// - Colour depth
/// - The transform that makes the emulated output look like the real thing
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DisplaySpec {
    /// Display name (e.g., "SSD1306 128×64 OLED")
    pub name: &'static str,

    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,

    /// Display controller chip
    pub controller: Controller,

    /// Native colour depth of the panel
    pub color_mode: ColorMode,

    /// Transform name that best imitates the panel (e.g. `"led_matrix"`)
    ///
    /// `None` means a plain pixel upscale is appropriate.
    pub suggested_transform: Option<&'static str>,
}

impl DisplaySpec {
    /// Get display aspect ratio (width / height)
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Total number of pixels
    pub fn pixel_count(&self) -> u32 {
        self.width.saturating_mul(self.height)
    }

    /// Whether the panel can show more than two levels per pixel
    pub fn is_color(&self) -> bool {
        !matches!(self.color_mode, ColorMode::Monochrome)
    }
}

/// Display controller chips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Controller {
    /// Solomon Systech SSD1306 monochrome OLED
    SSD1306,
    /// Sino Wealth SH1106 monochrome OLED (132 column RAM)
    SH1106,
    /// Solomon Systech SSD1351 16-bit colour OLED
    SSD1351,
    /// Sitronix ST7735 colour TFT
    ST7735,
    /// Sitronix ST7789 colour TFT
    ST7789,
    /// Ilitek ILI9341 colour TFT
    ILI9341,
    /// Maxim MAX7219 LED matrix / seven-segment driver
    MAX7219,
    /// WorldSemi WS2812 addressable RGB LEDs
    WS2812,
    /// Generic/unknown controller
    Generic,
}

/// Colour depth of the device framebuffer
///
/// Mirrors the image modes a display driver accepts: 1-bit, 24-bit and
/// 24-bit with alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ColorMode {
    /// 1 bit per pixel, on or off
    Monochrome,
    /// 24-bit RGB
    #[default]
    Rgb,
    /// 24-bit RGB plus 8-bit alpha
    Rgba,
}

impl ColorMode {
    /// Short mode name as used by display drivers (`"1"`, `"RGB"`, `"RGBA"`)
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::Monochrome => "1",
            ColorMode::Rgb => "RGB",
            ColorMode::Rgba => "RGBA",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a colour mode name is not recognised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseColorModeError;

impl fmt::Display for ParseColorModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected one of: 1, monochrome, RGB, RGBA")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseColorModeError {}

impl FromStr for ColorMode {
    type Err = ParseColorModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" | "monochrome" | "mono" => Ok(ColorMode::Monochrome),
            "RGB" | "rgb" => Ok(ColorMode::Rgb),
            "RGBA" | "rgba" => Ok(ColorMode::Rgba),
            _ => Err(ParseColorModeError),
        }
    }
}
