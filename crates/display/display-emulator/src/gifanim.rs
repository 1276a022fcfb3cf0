//! Animated GIF backend
//!
//! Frames are kept in memory until [`GifAnim::write_animation`] encodes them
//! in one go. A successful write clears the frame list, so the flush on cleanup
//! or drop never writes the same animation twice.

use std::fs::File;
use std::io::BufWriter;

use image::buffer::ConvertBuffer;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, Frame, RgbImage, RgbaImage};

use crate::config::{EmulatorConfig, GifConfig};
use crate::device::{Device, DisplayOutcome, Emulator};
use crate::error::Result;

/// NeuQuant speed passed to the encoder (1 = best, 30 = fastest)
const QUANTIZER_SPEED: i32 = 10;

/// Collects frames and writes them as a looping animated GIF
#[derive(Debug)]
pub struct GifAnim {
    emulator: Emulator,
    config: GifConfig,
    frames: Vec<RgbImage>,
    count: u32,
}

impl GifAnim {
    /// Fails on an invalid transform/scale combination
    pub fn new(config: EmulatorConfig, gif: GifConfig) -> Result<Self> {
        Ok(Self {
            emulator: Emulator::new(config)?,
            config: gif,
            frames: Vec::new(),
            count: 0,
        })
    }

    /// Frames recorded since construction
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Frames waiting to be written
    pub fn pending(&self) -> usize {
        self.frames.len()
    }

    /// Output settings
    pub fn config(&self) -> &GifConfig {
        &self.config
    }

    /// Encode every pending frame to [`GifConfig::filename`]
    ///
    /// Returns the number of frames written. With no pending frames nothing
    /// is written and the file is not created.
    pub fn write_animation(&mut self) -> Result<usize> {
        if self.frames.is_empty() {
            return Ok(0);
        }
        let written = self.frames.len();

        tracing::debug!(frames = written, "building animated GIF");
        self.encode()?;
        // Pending frames survive a failed write
        self.frames.clear();

        let bytes = std::fs::metadata(&self.config.filename).map_or(0, |m| m.len());
        tracing::info!(
            frames = written,
            path = %self.config.filename.display(),
            bytes,
            "wrote animation"
        );
        Ok(written)
    }

    fn encode(&self) -> Result<()> {
        let file = File::create(&self.config.filename)?;
        let mut encoder = GifEncoder::new_with_speed(BufWriter::new(file), QUANTIZER_SPEED);
        encoder.set_repeat(repeat_for(self.config.loop_count))?;

        let delay = Delay::from_numer_denom_ms(self.config.duration_ms, 1);
        encoder.encode_frames(self.frames.iter().map(|surface| {
            let rgba: RgbaImage = surface.convert();
            Frame::from_parts(rgba, 0, 0, delay)
        }))?;
        Ok(())
    }
}

/// GIF loop count: 0 repeats forever
fn repeat_for(loop_count: u16) -> Repeat {
    match loop_count {
        0 => Repeat::Infinite,
        n => Repeat::Finite(n),
    }
}

impl Device for GifAnim {
    fn display(&mut self, image: &DynamicImage) -> Result<DisplayOutcome> {
        let surface = self.emulator.render(image)?;
        self.frames.push(surface);
        self.count = self.count.saturating_add(1);
        tracing::debug!(frame = self.count, "recording frame");

        match self.config.max_frames {
            Some(max) if max > 0 && self.count >= max => {
                tracing::info!(max_frames = max, "frame limit reached");
                Ok(DisplayOutcome::FrameLimitReached)
            }
            _ => Ok(DisplayOutcome::Continue),
        }
    }

    fn emulator(&self) -> &Emulator {
        &self.emulator
    }

    fn emulator_mut(&mut self) -> &mut Emulator {
        &mut self.emulator
    }

    fn cleanup(&mut self) -> Result<()> {
        self.write_animation().map(|_| ())
    }
}

impl Drop for GifAnim {
    fn drop(&mut self) {
        if let Err(error) = self.write_animation() {
            tracing::warn!(%error, "failed to write animation on drop");
        }
    }
}
