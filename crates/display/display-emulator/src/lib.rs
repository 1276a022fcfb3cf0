//! Pseudo-Display Emulator
//!
//! Backends that stand in for a physical OLED/LCD/LED panel: the same frame
//! a driver would push over SPI/I2C is written to a PNG file, an animated
//! GIF, a desktop window or the terminal instead.
//!
//! - Capture (numbered PNG files)
//! - GifAnim (animated GIF written on flush)
//! - WindowDisplay (winit + softbuffer; absent with the `headless` feature)
//! - AsciiArt / AsciiBlock (crossterm, 256-colour terminal rendering)
//!
//! Every backend runs frames through the same pipeline: colour-mode
//! conversion and rotation, contrast blend, then one of the named
//! [`Transform`]s.
//!
//! # Example
//!
//! ```no_run
//! use display_emulator::{Canvas, Capture, CaptureConfig, Device, EmulatorConfig};
//! use embedded_graphics::pixelcolor::Rgb888;
//! use embedded_graphics::prelude::*;
//! use embedded_graphics::primitives::{Circle, PrimitiveStyle};
//!
//! # fn main() -> display_emulator::Result<()> {
//! let mut device = Capture::new(EmulatorConfig::DEFAULT, CaptureConfig::default())?;
//! let (width, height) = device.size();
//!
//! let mut canvas = Canvas::new(width, height);
//! Circle::new(Point::new(40, 8), 48)
//!     .into_styled(PrimitiveStyle::with_stroke(Rgb888::WHITE, 1))
//!     .draw(&mut canvas)
//!     .ok();
//!
//! let _ = device.display(&canvas.image())?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod canvas;
pub mod capture;
pub mod clut;
pub mod config;
pub mod device;
mod error;
pub mod gifanim;
pub mod glyphs;
pub mod scale2x;
pub mod segment_mapper;
pub mod terminal;
pub mod transform;

#[cfg(not(feature = "headless"))]
mod window;
#[cfg(not(feature = "headless"))]
pub mod windowed;

pub use backend::{probe, registered_backends, Availability, Backend, Capabilities};
pub use canvas::Canvas;
pub use capture::Capture;
pub use clut::{rgb_to_palette_index, ColorCube};
pub use config::{
    CaptureConfig, EmulatorConfig, FileConfig, GifConfig, Rotation, TerminalConfig, WindowConfig,
};
pub use device::{Device, DisplayOutcome, Emulator};
pub use display_specs::{ColorMode, DisplaySpec};
pub use error::{EmulatorError, Result};
pub use gifanim::GifAnim;
pub use glyphs::GlyphAtlas;
pub use terminal::asciiart::AsciiArt;
pub use terminal::asciiblock::AsciiBlock;
pub use terminal::{CrosstermHost, MemoryTerminal, OutputCapture, TerminalHost};
pub use transform::{Transform, Transformer};

#[cfg(not(feature = "headless"))]
pub use windowed::WindowDisplay;
