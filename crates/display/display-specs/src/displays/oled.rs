//! OLED display specifications

use crate::{ColorMode, Controller, DisplaySpec};

/// SSD1306 128×64 monochrome OLED
///
/// The ubiquitous 0.96" I2C/SPI module.
pub const SSD1306_128X64: DisplaySpec = DisplaySpec {
    name: "SSD1306 128×64 OLED",
    width: 128,
    height: 64,
    controller: Controller::SSD1306,
    color_mode: ColorMode::Monochrome,
    suggested_transform: Some("scale2x"),
};

/// SSD1306 128×32 monochrome OLED (0.91" strip)
pub const SSD1306_128X32: DisplaySpec = DisplaySpec {
    name: "SSD1306 128×32 OLED",
    width: 128,
    height: 32,
    controller: Controller::SSD1306,
    color_mode: ColorMode::Monochrome,
    suggested_transform: Some("scale2x"),
};

/// SH1106 128×64 monochrome OLED (1.3")
pub const SH1106_128X64: DisplaySpec = DisplaySpec {
    name: "SH1106 128×64 OLED",
    width: 128,
    height: 64,
    controller: Controller::SH1106,
    color_mode: ColorMode::Monochrome,
    suggested_transform: Some("scale2x"),
};

/// SSD1351 128×128 colour OLED
pub const SSD1351_128X128: DisplaySpec = DisplaySpec {
    name: "SSD1351 128×128 OLED",
    width: 128,
    height: 128,
    controller: Controller::SSD1351,
    color_mode: ColorMode::Rgb,
    suggested_transform: Some("smoothscale"),
};
