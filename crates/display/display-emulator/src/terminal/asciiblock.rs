//! Half-block terminal backend
//!
//! Every character cell shows two pixels stacked vertically: the lower one
//! as the foreground of `▄`, the upper one as the background. With the
//! image resampled to the terminal width, one cell row covers two source
//! rows.

use std::io::Write;

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};

use super::{fit_to_columns, CrosstermHost, OutputCapture, TerminalHost, TerminalSession};
use crate::backend::Backend;
use crate::clut::ColorCube;
use crate::config::{EmulatorConfig, TerminalConfig};
use crate::device::{Device, DisplayOutcome, Emulator};
use crate::error::Result;

/// Lower half block
pub const HALF_BLOCK: char = '▄';

/// Draws frames as coloured half-block characters
#[derive(Debug)]
pub struct AsciiBlock<H: TerminalHost = CrosstermHost> {
    emulator: Emulator,
    session: TerminalSession<H>,
    cube: ColorCube,
}

impl AsciiBlock<CrosstermHost> {
    /// Take over the process's terminal
    pub fn new(config: EmulatorConfig, terminal: &TerminalConfig, capture: OutputCapture) -> Result<Self> {
        let host = CrosstermHost::new(Backend::AsciiBlock, terminal)?;
        Self::with_host(config, host, capture)
    }
}

impl<H: TerminalHost> AsciiBlock<H> {
    /// Paint on any [`TerminalHost`]
    pub fn with_host(config: EmulatorConfig, host: H, capture: OutputCapture) -> Result<Self> {
        let emulator = Emulator::new(config)?;
        let session = TerminalSession::start(host, capture)?;
        Ok(Self {
            emulator,
            session,
            cube: ColorCube::new(),
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

    #[allow(clippy::arithmetic_side_effects)] // y + 1 < height inside the pair loop
    fn paint(&mut self, surface: &RgbImage) -> Result<()> {
        let (columns, rows) = self.session.host().size()?;
        let (width, height) = fit_to_columns(surface.width(), surface.height(), columns, 1.0);
        if width == 0 {
            return Ok(());
        }
        let resized = imageops::resize(surface, width, height, FilterType::Lanczos3);

        let mut out = self.session.host_mut().out();
        // An odd final row has no partner and is not drawn
        let pairs = (0..height.saturating_sub(1)).step_by(2);
        for (cell_row, y) in (0..rows).zip(pairs) {
            queue!(&mut out, MoveTo(0, cell_row))?;
            for x in 0..width {
                let upper = self.cube.index_of(*resized.get_pixel(x, y));
                let lower = self.cube.index_of(*resized.get_pixel(x, y + 1));
                queue!(
                    &mut out,
                    SetBackgroundColor(Color::AnsiValue(upper)),
                    SetForegroundColor(Color::AnsiValue(lower)),
                    Print(HALF_BLOCK)
                )?;
            }
            queue!(&mut out, ResetColor)?;
        }

        out.flush()?;
        Ok(())
    }
}

impl<H: TerminalHost> Device for AsciiBlock<H> {
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

impl<H: TerminalHost> Drop for AsciiBlock<H> {
    fn drop(&mut self) {
        if let Err(error) = self.session.finish() {
            tracing::warn!(%error, "failed to restore terminal");
        }
    }
}
