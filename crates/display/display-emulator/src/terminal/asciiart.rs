//! Coloured ASCII-art terminal backend
//!
//! Each frame is resampled to the terminal width, then every pixel becomes
//! one character: brightness picks a glyph from a ramp ordered by ink
//! coverage, colour picks the nearest 256-colour palette entry.

use std::convert::Infallible;
use std::io::Write;

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};

use super::{fit_to_columns, CrosstermHost, OutputCapture, TerminalHost, TerminalSession};
use crate::backend::Backend;
use crate::clut::ColorCube;
use crate::config::{EmulatorConfig, TerminalConfig};
use crate::device::{Device, DisplayOutcome, Emulator};
use crate::error::Result;

/// Width over height of one character cell (the 6×10 font's cell)
const CELL_ASPECT: f32 = 6.0 / 10.0;

/// Draws frames as coloured ASCII characters
#[derive(Debug)]
pub struct AsciiArt<H: TerminalHost = CrosstermHost> {
    emulator: Emulator,
    session: TerminalSession<H>,
    cube: ColorCube,
    ramp: Vec<char>,
}

impl AsciiArt<CrosstermHost> {
    /// Take over the process's terminal
    pub fn new(config: EmulatorConfig, terminal: &TerminalConfig, capture: OutputCapture) -> Result<Self> {
        let host = CrosstermHost::new(Backend::AsciiArt, terminal)?;
        Self::with_host(config, host, capture)
    }
}

impl<H: TerminalHost> AsciiArt<H> {
    /// Paint on any [`TerminalHost`]
    pub fn with_host(config: EmulatorConfig, host: H, capture: OutputCapture) -> Result<Self> {
        let emulator = Emulator::new(config)?;
        let session = TerminalSession::start(host, capture)?;
        Ok(Self {
            emulator,
            session,
            cube: ColorCube::new(),
            ramp: glyph_ramp(),
        })
    }

    /// The screen being painted
    pub fn host(&self) -> &H {
        self.session.host()
    }

    /// Output buffered while the screen is owned
    pub fn capture(&self) -> &OutputCapture {
        self.session.capture()
    }

    /// Glyphs from least to most ink
    pub fn ramp(&self) -> &[char] {
        &self.ramp
    }

    fn paint(&mut self, surface: &RgbImage) -> Result<()> {
        let (columns, rows) = self.session.host().size()?;
        let (width, height) = fit_to_columns(surface.width(), surface.height(), columns, CELL_ASPECT);
        if width == 0 {
            return Ok(());
        }
        let resized = imageops::resize(surface, width, height, FilterType::Lanczos3);

        let mut out = self.session.host_mut().out();
        queue!(&mut out, Clear(ClearType::All))?;

        // Rows past the bottom of the screen are dropped
        for (y, row) in (0..rows).zip(resized.rows()) {
            queue!(&mut out, MoveTo(0, y))?;
            let mut current = None;
            for pixel in row {
                let color = self.cube.index_of(*pixel);
                if current != Some(color) {
                    queue!(&mut out, SetForegroundColor(Color::AnsiValue(color)))?;
                    current = Some(color);
                }
                queue!(&mut out, Print(glyph_for(&self.ramp, luminance(pixel.0))))?;
            }
        }

        queue!(&mut out, ResetColor)?;
        out.flush()?;
        Ok(())
    }
}

impl<H: TerminalHost> Device for AsciiArt<H> {
    fn display(&mut self, image: &DynamicImage) -> Result<DisplayOutcome> {
        let surface = self.emulator.render(image)?;
        self.paint(&surface)?;
        Ok(DisplayOutcome::Continue)
    }

    fn emulator(&self) -> &Emulator {
        &self.emulator
    }

    fn emulator_mut(&mut self) -> &mut Emulator {
        &mut self.emulator
    }

    fn cleanup(&mut self) -> Result<()> {
        self.session.finish()
    }
}

impl<H: TerminalHost> Drop for AsciiArt<H> {
    fn drop(&mut self) {
        if let Err(error) = self.session.finish() {
            tracing::warn!(%error, "failed to restore terminal");
        }
    }
}

/// ITU-R 601 luma, `0.299 R + 0.587 G + 0.114 B`
#[allow(clippy::arithmetic_side_effects)] // at most 1000 × 255
pub fn luminance([r, g, b]: [u8; 3]) -> u8 {
    let weighted = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
    u8::try_from(weighted / 1000).unwrap_or(u8::MAX)
}

/// Ramp entry for a brightness, rounding to the nearest step
fn glyph_for(ramp: &[char], grey: u8) -> char {
    let last = ramp.len().saturating_sub(1);
    let index = (f32::from(grey) / 255.0 * last as f32 + 0.5) as usize;
    ramp.get(index.min(last)).copied().unwrap_or(' ')
}

/// ASCII letters, digits, punctuation and space, ordered by how many pixels
/// each lights in the 6×10 font
pub fn glyph_ramp() -> Vec<char> {
    let letters = ('a'..='z').chain('A'..='Z');
    let digits = '0'..='9';
    let punctuation = ('!'..='~').filter(char::is_ascii_punctuation);

    let mut ramp: Vec<char> = letters
        .chain(digits)
        .chain(punctuation)
        .chain(std::iter::once(' '))
        .collect();
    ramp.sort_by_key(|&ch| ink_coverage(ch));
    ramp
}

/// Pixels lit when `ch` is drawn in the 6×10 font
pub fn ink_coverage(ch: char) -> usize {
    let mut counter = InkCounter::default();
    let mut buf = [0u8; 4];
    let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    // InkCounter never fails
    let _ = Text::with_baseline(ch.encode_utf8(&mut buf), Point::zero(), style, Baseline::Top)
        .draw(&mut counter);
    counter.lit
}

/// Draw target that only counts lit pixels
#[derive(Default)]
struct InkCounter {
    lit: usize,
}

impl OriginDimensions for InkCounter {
    fn size(&self) -> Size {
        FONT_6X10.character_size
    }
}

impl DrawTarget for InkCounter {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.lit = self
            .lit
            .saturating_add(pixels.into_iter().filter(|Pixel(_, c)| c.is_on()).count());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::terminal::MemoryTerminal;
    use image::Rgb;

    fn native(width: u32, height: u32) -> EmulatorConfig {
        EmulatorConfig::NATIVE.with_size(width, height)
    }

    #[test]
    fn test_ramp_covers_printable_ascii() {
        let ramp = glyph_ramp();
        assert_eq!(ramp.len(), 95);
        assert_eq!(ramp.first(), Some(&' '));
        let position = |c: char| ramp.iter().position(|&r| r == c).unwrap();
        assert!(position('.') < position('@'));
        assert!(position('-') < position('#'));
    }

    #[test]
    fn test_ramp_is_sorted_by_ink() {
        let ramp = glyph_ramp();
        let ink: Vec<usize> = ramp.iter().map(|&c| ink_coverage(c)).collect();
        assert!(ink.windows(2).all(|w| w.first() <= w.last()));
        assert_eq!(ink_coverage(' '), 0);
    }

    #[test]
    fn test_glyph_for_extremes() {
        let ramp = glyph_ramp();
        assert_eq!(glyph_for(&ramp, 0), ' ');
        assert_eq!(Some(&glyph_for(&ramp, 255)), ramp.last());
    }

    #[test]
    fn test_luminance() {
        assert_eq!(luminance([0, 0, 0]), 0);
        assert_eq!(luminance([255, 255, 255]), 255);
        assert_eq!(luminance([255, 0, 0]), 76);
    }

    #[test]
    fn test_display_paints_palette_colours() {
        let terminal = MemoryTerminal::new(16, 8);
        let mut art = AsciiArt::with_host(native(8, 4), terminal.clone(), OutputCapture::new()).unwrap();
        assert!(terminal.is_entered());

        let white = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 4, Rgb([255, 255, 255])));
        assert_eq!(art.display(&white).unwrap(), DisplayOutcome::Continue);

        let output = String::from_utf8(terminal.output()).unwrap();
        assert!(output.contains("\x1b[38;5;231m"));
        let densest = *art.ramp().last().unwrap();
        assert!(output.contains(densest));
    }

    #[test]
    fn test_rows_clipped_to_screen() {
        // 16 columns for a 4×40 image would need far more than 3 rows
        let terminal = MemoryTerminal::new(16, 3);
        let mut art = AsciiArt::with_host(native(4, 40), terminal.clone(), OutputCapture::new()).unwrap();
        let _ = art.display(&DynamicImage::new_rgb8(4, 40)).unwrap();

        let output = String::from_utf8(terminal.output()).unwrap();
        assert!(output.contains("\x1b[3;1H"));
        assert!(!output.contains("\x1b[4;1H"));
    }

    #[test]
    fn test_cleanup_restores_and_replays_once() {
        let terminal = MemoryTerminal::new(16, 8);
        let capture = OutputCapture::new();
        let mut art = AsciiArt::with_host(native(8, 4), terminal.clone(), capture.clone()).unwrap();
        write!(capture.stderr(), "logged while painting").unwrap();

        art.cleanup().unwrap();
        art.cleanup().unwrap();
        drop(art);

        assert!(!terminal.is_entered());
        assert_eq!(terminal.leave_count(), 1);
        assert_eq!(terminal.errors(), b"logged while painting");
    }
}
