//! Glyph atlas for the LED-matrix and seven-segment transforms
//!
//! The built-in atlas is drawn once with embedded-graphics primitives, so no
//! image assets need to ship with the crate. PNG assets can be loaded
//! instead with [`GlyphAtlas::from_files`].

use std::path::Path;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle};

use image::RgbImage;

use crate::canvas::Canvas;
use crate::error::{EmulatorError, Result};

/// Width and height of one built-in LED glyph
pub const LED_SIZE: u32 = 16;

/// Width of one cell in the seven-segment sheet
pub const SEGMENT_CELL_WIDTH: u32 = 30;

/// Height of one cell in the seven-segment sheet
pub const SEGMENT_CELL_HEIGHT: u32 = 50;

/// Cells per row in the seven-segment sheet
pub const SHEET_COLUMNS: u32 = 16;

/// Rows of cells in the seven-segment sheet (128 codes / 16)
pub const SHEET_ROWS: u32 = 8;

/// Segment bit assignments: `A` is the top bar, then clockwise, `G` is the middle.
pub mod segment {
    /// Top
    pub const A: u8 = 0x40;
    /// Upper right
    pub const B: u8 = 0x20;
    /// Lower right
    pub const C: u8 = 0x10;
    /// Bottom
    pub const D: u8 = 0x08;
    /// Lower left
    pub const E: u8 = 0x04;
    /// Upper left
    pub const F: u8 = 0x02;
    /// Middle
    pub const G: u8 = 0x01;
    /// Decimal point; not part of the 7-bit sheet index
    pub const DP: u8 = 0x80;
}

const LIT: Rgb888 = Rgb888::new(255, 48, 16);
const UNLIT: Rgb888 = Rgb888::new(48, 12, 8);
const LED_ON_RIM: Rgb888 = Rgb888::new(160, 16, 16);
const LED_ON_CORE: Rgb888 = Rgb888::new(255, 64, 48);
const LED_ON_GLINT: Rgb888 = Rgb888::new(255, 200, 190);
const LED_OFF_BODY: Rgb888 = Rgb888::new(56, 20, 20);

/// Segment bars within one 30×50 cell: (bit, top-left, size)
const SEGMENT_BARS: [(u8, (i32, i32), (u32, u32)); 7] = [
    (segment::A, (8, 4), (14, 4)),
    (segment::B, (22, 8), (4, 15)),
    (segment::C, (22, 27), (4, 15)),
    (segment::D, (8, 42), (14, 4)),
    (segment::E, (4, 27), (4, 15)),
    (segment::F, (4, 8), (4, 15)),
    (segment::G, (8, 23), (14, 4)),
];

/// Read-only glyph images used by the glyph-substituting transforms
#[derive(Debug, Clone)]
pub struct GlyphAtlas {
    led_on: RgbImage,
    led_off: RgbImage,
    seven_segment: RgbImage,
}

impl GlyphAtlas {
    /// Procedurally rendered atlas
    pub fn builtin() -> Self {
        Self {
            led_on: render_led(true),
            led_off: render_led(false),
            seven_segment: render_segment_sheet(),
        }
    }

    /// Load the three assets from PNG (or any format `image` decodes)
    ///
    /// Both LED glyphs must have the same size.
    pub fn from_files(
        led_on: impl AsRef<Path>,
        led_off: impl AsRef<Path>,
        seven_segment: impl AsRef<Path>,
    ) -> Result<Self> {
        let led_on = image::open(led_on)?.to_rgb8();
        let led_off = image::open(led_off)?.to_rgb8();
        let seven_segment = image::open(seven_segment)?.to_rgb8();
        Self::from_images(led_on, led_off, seven_segment)
    }

    /// Build from already-decoded images
    pub fn from_images(led_on: RgbImage, led_off: RgbImage, seven_segment: RgbImage) -> Result<Self> {
        if led_on.dimensions() != led_off.dimensions() {
            return Err(EmulatorError::InvalidGlyphAtlas(format!(
                "LED glyphs differ in size: on {:?}, off {:?}",
                led_on.dimensions(),
                led_off.dimensions()
            )));
        }
        if led_on.width() == 0 || led_on.height() == 0 {
            return Err(EmulatorError::InvalidGlyphAtlas(
                "LED glyphs are empty".to_string(),
            ));
        }
        Ok(Self {
            led_on,
            led_off,
            seven_segment,
        })
    }

    /// Glyph shown for a lit LED
    pub fn led_on(&self) -> &RgbImage {
        &self.led_on
    }

    /// Glyph shown for a dark LED
    pub fn led_off(&self) -> &RgbImage {
        &self.led_off
    }

    /// Size of one LED glyph
    pub fn led_size(&self) -> (u32, u32) {
        self.led_on.dimensions()
    }

    /// The full seven-segment sheet
    pub fn seven_segment(&self) -> &RgbImage {
        &self.seven_segment
    }

    /// Top-left corner of the sheet cell for a 7-bit segment code
    #[allow(clippy::arithmetic_side_effects)] // code is masked to 0..=127
    pub fn segment_cell_origin(code: u8) -> (u32, u32) {
        let code = u32::from(code & 0x7F);
        (
            (code % SHEET_COLUMNS) * SEGMENT_CELL_WIDTH,
            (code / SHEET_COLUMNS) * SEGMENT_CELL_HEIGHT,
        )
    }
}

impl Default for GlyphAtlas {
    fn default() -> Self {
        Self::builtin()
    }
}

fn render_led(lit: bool) -> RgbImage {
    let mut canvas = Canvas::new(LED_SIZE, LED_SIZE);
    // Drawing into a Canvas is infallible.
    let _ = if lit {
        Circle::new(Point::new(1, 1), LED_SIZE - 2)
            .into_styled(PrimitiveStyle::with_fill(LED_ON_RIM))
            .draw(&mut canvas)
            .and_then(|()| {
                Circle::new(Point::new(3, 3), LED_SIZE - 6)
                    .into_styled(PrimitiveStyle::with_fill(LED_ON_CORE))
                    .draw(&mut canvas)
            })
            .and_then(|()| {
                Circle::new(Point::new(5, 4), 3)
                    .into_styled(PrimitiveStyle::with_fill(LED_ON_GLINT))
                    .draw(&mut canvas)
            })
    } else {
        Circle::new(Point::new(1, 1), LED_SIZE - 2)
            .into_styled(PrimitiveStyle::with_fill(LED_OFF_BODY))
            .draw(&mut canvas)
    };
    canvas.into_rgb()
}

/// Draw every 7-bit code into its own cell
#[allow(clippy::arithmetic_side_effects)] // offsets stay inside the sheet
fn render_segment_sheet() -> RgbImage {
    let mut canvas = Canvas::new(
        SHEET_COLUMNS * SEGMENT_CELL_WIDTH,
        SHEET_ROWS * SEGMENT_CELL_HEIGHT,
    );
    for code in 0u8..0x80 {
        let (cx, cy) = GlyphAtlas::segment_cell_origin(code);
        let origin = Point::new(cx as i32, cy as i32);
        for (bit, (x, y), (w, h)) in SEGMENT_BARS {
            let color = if code & bit != 0 { LIT } else { UNLIT };
            let _ = Rectangle::new(origin + Point::new(x, y), Size::new(w, h))
                .into_styled(PrimitiveStyle::with_fill(color))
                .draw(&mut canvas);
        }
    }
    canvas.into_rgb()
}

/// Centre of a segment bar within a cell, for tests and asset validation
#[allow(clippy::arithmetic_side_effects)] // bar geometry is a small constant table
pub fn segment_center(bit: u8) -> Option<(u32, u32)> {
    SEGMENT_BARS
        .iter()
        .find(|(b, _, _)| *b == bit)
        .map(|(_, (x, y), (w, h))| (*x as u32 + w / 2, *y as u32 + h / 2))
}
