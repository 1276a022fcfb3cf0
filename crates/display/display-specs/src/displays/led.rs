//! LED matrix and seven-segment specifications
//!
//! For these panels one framebuffer pixel is one physical LED (or one
//! segment), so the emulator substitutes glyphs instead of scaling pixels.

use crate::{ColorMode, Controller, DisplaySpec};

/// MAX7219 driving a single 8×8 LED matrix
pub const MAX7219_8X8: DisplaySpec = DisplaySpec {
    name: "MAX7219 8×8 LED matrix",
    width: 8,
    height: 8,
    controller: Controller::MAX7219,
    color_mode: ColorMode::Monochrome,
    suggested_transform: Some("led_matrix"),
};

/// MAX7219 driving eight seven-segment digits
///
/// Each column is one digit; rows 0-6 are segments A-G, row 7 is the
/// decimal point.
pub const MAX7219_SEVEN_SEGMENT_8: DisplaySpec = DisplaySpec {
    name: "MAX7219 8-digit seven-segment",
    width: 8,
    height: 8,
    controller: Controller::MAX7219,
    color_mode: ColorMode::Monochrome,
    suggested_transform: Some("seven_segment"),
};

/// WS2812 16×16 RGB LED panel
pub const WS2812_16X16: DisplaySpec = DisplaySpec {
    name: "WS2812 16×16 LED panel",
    width: 16,
    height: 16,
    controller: Controller::WS2812,
    color_mode: ColorMode::Rgb,
    suggested_transform: Some("led_matrix"),
};
