//! Animated demo scene

use display_emulator::Canvas;
use embedded_graphics::mono_font::{ascii::FONT_6X10, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

/// Border, a bouncing ball with a colour that cycles, a sweeping line and
/// the frame number
pub fn draw(canvas: &mut Canvas, frame: u32) {
    canvas.clear_black();

    let width = i32::try_from(canvas.width()).unwrap_or(i32::MAX);
    let height = i32::try_from(canvas.height()).unwrap_or(i32::MAX);
    let tick = i32::try_from(frame).unwrap_or(i32::MAX);

    Rectangle::new(Point::zero(), canvas.bounding_box().size)
        .into_styled(PrimitiveStyle::with_stroke(Rgb888::WHITE, 1))
        .draw(canvas)
        .ok();

    let diameter = (height / 3).max(3);
    let x = bounce(tick.wrapping_mul(2), width - diameter);
    let y = bounce(tick.wrapping_mul(3), height - diameter);
    Circle::new(Point::new(x, y), diameter.unsigned_abs())
        .into_styled(PrimitiveStyle::with_fill(hue(frame.wrapping_mul(4))))
        .draw(canvas)
        .ok();

    let sweep = bounce(tick, width - 1);
    Line::new(Point::new(sweep, 0), Point::new(width - 1 - sweep, height - 1))
        .into_styled(PrimitiveStyle::with_stroke(Rgb888::CYAN, 1))
        .draw(canvas)
        .ok();

    Text::with_baseline(
        &frame.to_string(),
        Point::new(2, 2),
        MonoTextStyle::new(&FONT_6X10, Rgb888::YELLOW),
        Baseline::Top,
    )
    .draw(canvas)
    .ok();
}

/// Position moving back and forth across `0..=span`
fn bounce(position: i32, span: i32) -> i32 {
    if span <= 0 {
        return 0;
    }
    let period = span * 2;
    let phase = position.rem_euclid(period);
    if phase <= span {
        phase
    } else {
        period - phase
    }
}

/// Fully saturated colour around the wheel, `angle` in 0..768
fn hue(angle: u32) -> Rgb888 {
    let step = (angle % 768) as u16;
    let rise = (step % 256) as u8;
    let fall = 255 - rise;
    match step / 256 {
        0 => Rgb888::new(fall, rise, 0),
        1 => Rgb888::new(0, fall, rise),
        _ => Rgb888::new(rise, 0, fall),
    }
}
