// Demo binary: scene math is on small canvas coordinates.
#![allow(
    missing_docs,
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation
)]

mod scene;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use display_emulator::{
    probe, AsciiArt, AsciiBlock, Availability, Backend, Canvas, Capture, ColorMode, Device,
    DisplayOutcome, FileConfig, GifAnim, OutputCapture, Rotation, Transform,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "display-demo")]
#[command(about = "Render an animated scene through a pseudo-display backend", long_about = None)]
#[command(version)]
struct Cli {
    /// Backend: capture, gifanim, window, asciiart, asciiblock
    #[arg(short, long, default_value = "window")]
    backend: Backend,

    /// JSON file with emulator and backend settings; flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start from a bundled panel preset, e.g. "SSD1306 128×64"
    #[arg(long)]
    preset: Option<String>,

    /// Panel width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Panel height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Rotation in quarter turns clockwise (0-3)
    #[arg(long, value_parser = parse_rotation)]
    rotate: Option<Rotation>,

    /// Colour mode: 1, RGB or RGBA
    #[arg(long)]
    mode: Option<ColorMode>,

    /// none, scale2x, smoothscale, identity, led_matrix, seven_segment
    #[arg(long)]
    transform: Option<Transform>,

    /// Upscaling factor
    #[arg(long)]
    scale: Option<u32>,

    /// Frames to draw; 0 runs until the backend asks to stop
    #[arg(short, long, default_value_t = 120)]
    frames: u32,

    /// Pause between frames for the file and terminal backends
    #[arg(long, default_value_t = 50)]
    delay_ms: u64,

    /// Capture file template or GIF file name
    #[arg(short, long)]
    output: Option<String>,

    /// Stop the GIF after this many frames
    #[arg(long)]
    max_frames: Option<u32>,

    /// Print which backends work here and exit
    #[arg(long)]
    list: bool,
}

fn parse_rotation(s: &str) -> Result<Rotation, String> {
    let turns: u8 = s.parse().map_err(|e| format!("{e}"))?;
    Rotation::try_from(turns)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let capture = if cli.backend.uses_terminal() && !cli.list {
        OutputCapture::new()
    } else {
        OutputCapture::passthrough()
    };
    let log_sink = capture.clone();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(move || log_sink.stderr())
        .with_ansi(!capture.is_capturing())
        .init();

    if cli.list {
        list_backends();
        return Ok(());
    }

    let config = load_config(&cli)?;
    let frame_delay = Duration::from_millis(cli.delay_ms);
    let mut device = open_device(cli.backend, &config, capture)
        .with_context(|| format!("failed to open the {} backend", cli.backend))?;

    let (width, height) = device.size();
    tracing::info!(
        backend = %cli.backend,
        width,
        height,
        transform = %device.emulator().transform(),
        "demo started"
    );

    let result = run(device.as_mut(), width, height, cli.frames, frame_delay, cli.backend);
    device.cleanup().context("failed to flush the backend")?;

    let (frames, outcome) = result?;
    tracing::info!(frames, ?outcome, "demo finished");
    Ok(())
}

fn list_backends() {
    for (backend, availability) in probe().iter() {
        match availability {
            Availability::Available => println!("{backend:<12} available"),
            Availability::Unavailable(reason) => println!("{backend:<12} unavailable: {reason}"),
        }
    }
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let mut config = match &cli.config {
        Some(path) => FileConfig::from_json_file(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => FileConfig::default(),
    };

    if let Some(name) = &cli.preset {
        let Some(spec) = display_specs::displays::by_name(name) else {
            bail!("unknown preset {name:?}");
        };
        config.emulator = display_emulator::EmulatorConfig::for_spec(spec);
    }

    let emulator = &mut config.emulator;
    if let Some(width) = cli.width {
        emulator.width = width;
    }
    if let Some(height) = cli.height {
        emulator.height = height;
    }
    if let Some(rotation) = cli.rotate {
        emulator.rotation = rotation;
    }
    if let Some(mode) = cli.mode {
        emulator.mode = mode;
    }
    if let Some(transform) = cli.transform {
        emulator.transform = transform;
    }
    if let Some(scale) = cli.scale {
        emulator.scale = scale;
    }

    if let Some(output) = &cli.output {
        config.capture.file_template.clone_from(output);
        config.gif.filename = PathBuf::from(output);
    }
    if cli.max_frames.is_some() {
        config.gif.max_frames = cli.max_frames;
    }
    Ok(config)
}

fn open_device(
    backend: Backend,
    config: &FileConfig,
    capture: OutputCapture,
) -> Result<Box<dyn Device>> {
    let emulator = config.emulator.clone();
    let device: Box<dyn Device> = match backend {
        Backend::Capture => Box::new(Capture::new(emulator, config.capture.clone())?),
        Backend::GifAnim => Box::new(GifAnim::new(emulator, config.gif.clone())?),
        Backend::AsciiArt => Box::new(AsciiArt::new(emulator, &config.terminal, capture)?),
        Backend::AsciiBlock => Box::new(AsciiBlock::new(emulator, &config.terminal, capture)?),
        #[cfg(not(feature = "headless"))]
        Backend::Window => Box::new(display_emulator::WindowDisplay::new(
            emulator,
            config.window.clone(),
        )?),
        #[cfg(feature = "headless")]
        Backend::Window => bail!("built with the headless feature; no window backend"),
    };
    Ok(device)
}

/// Feed frames until the count runs out or the device stops the session
fn run(
    device: &mut dyn Device,
    width: u32,
    height: u32,
    frames: u32,
    delay: Duration,
    backend: Backend,
) -> Result<(u32, DisplayOutcome)> {
    let mut canvas = Canvas::new(width, height);
    let mut drawn = 0;

    loop {
        if frames > 0 && drawn >= frames {
            return Ok((drawn, DisplayOutcome::Continue));
        }

        scene::draw(&mut canvas, drawn);
        let outcome = device
            .display(&canvas.image())
            .with_context(|| format!("frame {drawn} failed"))?;
        drawn += 1;

        if outcome.is_finished() {
            return Ok((drawn, outcome));
        }
        if backend != Backend::Window && !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}
