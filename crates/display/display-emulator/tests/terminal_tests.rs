//! Terminal backends against an in-memory screen

#![allow(clippy::unwrap_used)]

use std::io::Write;

use display_emulator::{
    AsciiArt, AsciiBlock, Device, DisplayOutcome, EmulatorConfig, MemoryTerminal, OutputCapture,
    Transform,
};
use image::{DynamicImage, Rgb, RgbImage};

fn white(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([255, 255, 255])))
}

/// Text written since the last cursor-home sequence
fn last_frame(terminal: &MemoryTerminal) -> String {
    let output = String::from_utf8(terminal.output()).unwrap();
    output
        .rsplit_once("\x1b[1;1H")
        .map(|(_, frame)| frame.to_string())
        .unwrap_or_default()
}

#[test]
fn test_asciiblock_scaled_pipeline() {
    let terminal = MemoryTerminal::new(32, 40);
    let config = EmulatorConfig::DEFAULT.with_size(16, 8);
    let mut device = AsciiBlock::with_host(config, terminal.clone(), OutputCapture::new()).unwrap();

    assert_eq!(device.emulator().transform(), Transform::Scale2x);
    assert_eq!(device.display(&white(16, 8)).unwrap(), DisplayOutcome::Continue);

    // 32×16 after scale2x, one cell per column, two rows per cell
    assert_eq!(last_frame(&terminal).matches('▄').count(), 32 * 8);
}

#[test]
fn test_contrast_is_idempotent() {
    let terminal = MemoryTerminal::new(8, 8);
    let config = EmulatorConfig::NATIVE.with_size(8, 4);
    let mut device = AsciiBlock::with_host(config, terminal.clone(), OutputCapture::new()).unwrap();
    let _ = device.display(&white(8, 4)).unwrap();

    let _ = device.contrast(0).unwrap();
    let hidden = last_frame(&terminal);
    let _ = device.contrast(0).unwrap();
    assert_eq!(last_frame(&terminal), hidden);
    assert!(!hidden.contains("231"));

    let _ = device.contrast(255).unwrap();
    let shown = last_frame(&terminal);
    let _ = device.contrast(255).unwrap();
    assert_eq!(last_frame(&terminal), shown);
    assert!(shown.contains("\x1b[48;5;231m"));
}

#[test]
fn test_asciiart_restores_terminal_and_replays_logs() {
    let terminal = MemoryTerminal::new(40, 20);
    let capture = OutputCapture::new();
    let mut device = AsciiArt::with_host(
        EmulatorConfig::NATIVE.with_size(20, 10),
        terminal.clone(),
        capture.clone(),
    )
    .unwrap();

    let _ = device.display(&white(20, 10)).unwrap();
    writeln!(capture.stdout(), "frame 1 done").unwrap();
    writeln!(capture.stderr(), "slow frame").unwrap();
    assert!(terminal.is_entered());
    assert!(terminal.errors().is_empty());

    device.cleanup().unwrap();
    device.cleanup().unwrap();

    assert!(!terminal.is_entered());
    assert_eq!(terminal.enter_count(), 1);
    assert_eq!(terminal.leave_count(), 1);
    assert!(String::from_utf8(terminal.output()).unwrap().ends_with("frame 1 done\n"));
    assert_eq!(terminal.errors(), b"slow frame\n");
}

#[test]
fn test_drop_restores_terminal() {
    let terminal = MemoryTerminal::new(10, 10);
    {
        let _device = AsciiArt::with_host(
            EmulatorConfig::NATIVE.with_size(4, 4),
            terminal.clone(),
            OutputCapture::new(),
        )
        .unwrap();
        assert!(terminal.is_entered());
    }
    assert!(!terminal.is_entered());
    assert_eq!(terminal.leave_count(), 1);
}
