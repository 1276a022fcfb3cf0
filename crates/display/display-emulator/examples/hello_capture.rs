//! Hello Capture Example
//!
//! Draws a simple scene on a 128×64 canvas and writes it through every
//! file-based transform.
//!
//! Run with: cargo run -p display-emulator --example hello_capture

use display_emulator::{Canvas, Capture, CaptureConfig, Device, EmulatorConfig, Transform};
use embedded_graphics::mono_font::{ascii::FONT_6X10, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle, Triangle};
use embedded_graphics::text::Text;

fn main() -> display_emulator::Result<()> {
    println!("Display Emulator - capture");
    println!("==========================\n");

    let mut canvas = Canvas::new(128, 64);

    Rectangle::new(Point::zero(), Size::new(128, 64))
        .into_styled(PrimitiveStyle::with_stroke(Rgb888::WHITE, 1))
        .draw(&mut canvas)
        .ok();
    Circle::new(Point::new(8, 14), 36)
        .into_styled(PrimitiveStyle::with_fill(Rgb888::RED))
        .draw(&mut canvas)
        .ok();
    Triangle::new(Point::new(52, 50), Point::new(72, 14), Point::new(92, 50))
        .into_styled(PrimitiveStyle::with_stroke(Rgb888::GREEN, 2))
        .draw(&mut canvas)
        .ok();
    Text::new("Hello!", Point::new(84, 10), MonoTextStyle::new(&FONT_6X10, Rgb888::CYAN))
        .draw(&mut canvas)
        .ok();

    for transform in [
        Transform::None,
        Transform::Scale2x,
        Transform::Smoothscale,
        Transform::Identity,
        Transform::LedMatrix,
    ] {
        let scale = if transform == Transform::None { 1 } else { 2 };
        let config = EmulatorConfig::DEFAULT.with_transform(transform, scale);
        let capture = CaptureConfig {
            file_template: format!("hello_{transform}.png"),
        };

        let mut device = Capture::new(config, capture)?;
        let _ = device.display(&canvas.image())?;
        if let Some(path) = device.last_path() {
            println!("  {transform:>12} -> {}", path.display());
        }
    }

    Ok(())
}
