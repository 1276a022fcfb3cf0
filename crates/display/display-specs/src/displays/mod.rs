//! Pre-configured display specifications
//!
//! Common SPI/I2C panel templates grouped by technology.

pub mod lcd;
pub mod led;
pub mod oled;

pub use lcd::*;
pub use led::*;
pub use oled::*;

use crate::DisplaySpec;

/// Every bundled preset, in catalogue order
pub const ALL: &[&DisplaySpec] = &[
    &oled::SSD1306_128X64,
    &oled::SSD1306_128X32,
    &oled::SH1106_128X64,
    &oled::SSD1351_128X128,
    &lcd::ST7735_160X128,
    &lcd::ST7789_240X240,
    &lcd::ILI9341_320X240,
    &led::MAX7219_8X8,
    &led::MAX7219_SEVEN_SEGMENT_8,
    &led::WS2812_16X16,
];

/// Look up a preset by its exact name
pub fn by_name(name: &str) -> Option<&'static DisplaySpec> {
    ALL.iter().copied().find(|spec| spec.name == name)
}
