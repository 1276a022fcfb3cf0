//! Seven-Segment Clock Example
//!
//! Renders a ticking "HH.MM.SS" readout on an emulated 8-digit MAX7219
//! seven-segment display and records it as an animated GIF.
//!
//! Run with: cargo run -p display-emulator --example seven_segment_clock

#![allow(clippy::arithmetic_side_effects)] // clock arithmetic on small values

use display_emulator::segment_mapper::{dot_muncher, segment_surface};
use display_emulator::{Device, EmulatorConfig, GifAnim, GifConfig};
use display_specs::displays::MAX7219_SEVEN_SEGMENT_8;
use image::{DynamicImage, Rgb};

fn main() -> display_emulator::Result<()> {
    let config = EmulatorConfig::for_spec(&MAX7219_SEVEN_SEGMENT_8);
    let gif = GifConfig {
        filename: "seven_segment_clock.gif".into(),
        duration_ms: 250,
        max_frames: Some(40),
        ..GifConfig::default()
    };
    let mut device = GifAnim::new(config, gif)?;
    let (width, _) = device.size();

    let mut seconds: u32 = 12 * 3600 + 34 * 60 + 50;
    loop {
        let (h, m, s) = (seconds / 3600 % 24, seconds / 60 % 60, seconds % 60);
        // Blink the separators every other frame
        let text = if seconds % 2 == 0 {
            format!("  {h:02}.{m:02}.{s:02}")
        } else {
            format!("  {h:02}{m:02}{s:02}")
        };

        let mut codes: Vec<u8> = dot_muncher(&text, Some(' ')).collect();
        codes.resize(width as usize, 0);
        let surface = segment_surface(&codes, Rgb([255, 255, 255]));

        let outcome = device.display(&DynamicImage::ImageRgb8(surface))?;
        if outcome.is_finished() {
            break;
        }
        seconds = seconds.wrapping_add(1);
    }

    let frames = device.write_animation()?;
    println!("Wrote {frames} frames to {}", device.config().filename.display());
    Ok(())
}
