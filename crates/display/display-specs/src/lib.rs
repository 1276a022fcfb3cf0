//! Pixel Display Specifications
//!
//! Geometry and colour capabilities of the small OLED, LCD and LED panels that
//! the emulator backends stand in for.
//!
//! # Features
//!
//! - **no_std compatible** - Works on embedded systems
//! - **Display templates** - Pre-configured specs for common SPI/I2C panels
//! - **Serde support** - Optional serialization/deserialization for JSON configs
//!
//! # Example
//!
//! ```
//! use display_specs::displays::SSD1306_128X64;
//!
//! let spec = SSD1306_128X64;
//! assert_eq!((spec.width, spec.height), (128, 64));
//! assert_eq!(spec.pixel_count(), 8192);
//! ```
//!
//! # Custom Display Specs
//!
//! ```
//! use display_specs::{ColorMode, Controller, DisplaySpec};
//!
//! const MY_DISPLAY: DisplaySpec = DisplaySpec {
//!     name: "Custom Matrix",
//!     width: 32,
//!     height: 8,
//!     controller: Controller::MAX7219,
//!     color_mode: ColorMode::Monochrome,
//!     suggested_transform: Some("led_matrix"),
//! };
//! assert_eq!(MY_DISPLAY.aspect_ratio(), 4.0);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

mod display_spec;
pub mod displays;

pub use display_spec::{ColorMode, Controller, DisplaySpec, ParseColorModeError};
