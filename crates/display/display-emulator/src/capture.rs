//! Numbered PNG capture backend

use std::path::PathBuf;

use image::{DynamicImage, ImageFormat};

use crate::config::{CaptureConfig, EmulatorConfig};
use crate::device::{Device, DisplayOutcome, Emulator};
use crate::error::Result;

/// Writes every frame to its own PNG file
///
/// The filename comes from [`CaptureConfig::file_template`] with the 1-based
/// frame counter substituted; a template without a placeholder overwrites
/// the same file each time.
#[derive(Debug)]
pub struct Capture {
    emulator: Emulator,
    file_template: String,
    count: u64,
    last_path: Option<PathBuf>,
}

impl Capture {
    /// Fails on an invalid transform/scale combination
    pub fn new(config: EmulatorConfig, capture: CaptureConfig) -> Result<Self> {
        Ok(Self {
            emulator: Emulator::new(config)?,
            file_template: capture.file_template,
            count: 0,
            last_path: None,
        })
    }

    /// Frames written so far
    pub fn count(&self) -> u64 {
        self.count
    }

    /// File written by the most recent frame
    pub fn last_path(&self) -> Option<&PathBuf> {
        self.last_path.as_ref()
    }
}

impl Device for Capture {
    fn display(&mut self, image: &DynamicImage) -> Result<DisplayOutcome> {
        let surface = self.emulator.render(image)?;

        self.count = self.count.saturating_add(1);
        let path = PathBuf::from(frame_filename(&self.file_template, self.count));
        tracing::debug!(frame = self.count, path = %path.display(), "writing frame");
        surface.save_with_format(&path, ImageFormat::Png)?;
        self.last_path = Some(path);

        Ok(DisplayOutcome::Continue)
    }

    fn emulator(&self) -> &Emulator {
        &self.emulator
    }

    fn emulator_mut(&mut self) -> &mut Emulator {
        &mut self.emulator
    }
}

/// Substitute the frame number into the first `{}`-style placeholder
///
/// Accepts `{}`, `{0}`, `{:6}`, `{:06}` and `{0:06}`. Templates with no
/// recognisable placeholder are returned unchanged.
pub fn frame_filename(template: &str, frame: u64) -> String {
    let Some((head, rest)) = template.split_once('{') else {
        return template.to_string();
    };
    let Some((placeholder, tail)) = rest.split_once('}') else {
        return template.to_string();
    };
    match format_counter(placeholder, frame) {
        Some(number) => format!("{head}{number}{tail}"),
        None => template.to_string(),
    }
}

fn format_counter(placeholder: &str, frame: u64) -> Option<String> {
    let (index, spec) = placeholder.split_once(':').unwrap_or((placeholder, ""));
    if !index.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if spec.is_empty() {
        return Some(frame.to_string());
    }

    let width: usize = spec.parse().ok()?;
    Some(if spec.starts_with('0') {
        format!("{frame:0width$}")
    } else {
        format!("{frame:width$}")
    })
}
