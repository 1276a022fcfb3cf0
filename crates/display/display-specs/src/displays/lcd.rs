//! TFT LCD display specifications

use crate::{ColorMode, Controller, DisplaySpec};

/// ST7735 160×128 colour TFT (1.8")
pub const ST7735_160X128: DisplaySpec = DisplaySpec {
    name: "ST7735 160×128 TFT",
    width: 160,
    height: 128,
    controller: Controller::ST7735,
    color_mode: ColorMode::Rgb,
    suggested_transform: Some("smoothscale"),
};

/// ST7789 240×240 colour IPS (1.3")
pub const ST7789_240X240: DisplaySpec = DisplaySpec {
    name: "ST7789 240×240 IPS",
    width: 240,
    height: 240,
    controller: Controller::ST7789,
    color_mode: ColorMode::Rgb,
    suggested_transform: None,
};

/// ILI9341 320×240 colour TFT (2.8")
pub const ILI9341_320X240: DisplaySpec = DisplaySpec {
    name: "ILI9341 320×240 TFT",
    width: 320,
    height: 240,
    controller: Controller::ILI9341,
    color_mode: ColorMode::Rgb,
    suggested_transform: None,
};
