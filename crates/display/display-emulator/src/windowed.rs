//! Windowed backend
//!
//! The window is opened on the first frame, sized to the transformed
//! surface. Closing it or pressing Escape ends the session with
//! [`DisplayOutcome::QuitRequested`].

use std::time::{Duration, Instant};

use image::DynamicImage;

use crate::backend::{self, Availability, Backend};
use crate::config::{EmulatorConfig, WindowConfig};
use crate::device::{Device, DisplayOutcome, Emulator};
use crate::error::{EmulatorError, Result};
use crate::window::Window;

/// Caps how often frames are presented
#[derive(Debug, Clone)]
pub struct FrameClock {
    interval: Option<Duration>,
    last_tick: Option<Instant>,
}

impl FrameClock {
    /// `0` disables the limit
    pub fn new(frame_rate: u32) -> Self {
        let interval = (frame_rate > 0).then(|| Duration::from_secs_f64(1.0 / f64::from(frame_rate)));
        Self {
            interval,
            last_tick: None,
        }
    }

    /// Minimum time between frames, if limited
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Sleep until one interval has passed since the previous tick
    pub fn tick(&mut self) {
        if let (Some(interval), Some(last)) = (self.interval, self.last_tick) {
            if let Some(remaining) = interval.checked_sub(last.elapsed()) {
                std::thread::sleep(remaining);
            }
        }
        self.last_tick = Some(Instant::now());
    }
}

/// Renders frames into a desktop window
pub struct WindowDisplay {
    emulator: Emulator,
    title: String,
    clock: FrameClock,
    window: Option<Window>,
    quit: bool,
}

impl WindowDisplay {
    /// Fails with [`EmulatorError::BackendUnavailable`] when no window can be
    /// opened here
    pub fn new(config: EmulatorConfig, window: WindowConfig) -> Result<Self> {
        if let Availability::Unavailable(reason) = backend::window_availability() {
            return Err(EmulatorError::BackendUnavailable {
                backend: Backend::Window,
                reason,
            });
        }
        Ok(Self {
            emulator: Emulator::new(config)?,
            title: window.title,
            clock: FrameClock::new(window.frame_rate),
            window: None,
            quit: false,
        })
    }

    /// Whether the window has been opened
    pub fn is_open(&self) -> bool {
        self.window.is_some()
    }

    /// Whether the user closed the window
    ///
    /// winit allows one event loop per process, so a closed window is never
    /// reopened and every later frame reports [`DisplayOutcome::QuitRequested`].
    pub fn quit_requested(&self) -> bool {
        self.quit
    }
}

impl Device for WindowDisplay {
    fn display(&mut self, image: &DynamicImage) -> Result<DisplayOutcome> {
        if self.quit {
            return Ok(DisplayOutcome::QuitRequested);
        }
        let surface = self.emulator.render(image)?;
        self.clock.tick();

        let window = match self.window.take() {
            Some(window) => window,
            None => Window::new(&self.title, surface.width(), surface.height())?,
        };
        let window = self.window.insert(window);

        if window.poll_quit() {
            tracing::info!("window closed");
            self.window = None;
            self.quit = true;
            return Ok(DisplayOutcome::QuitRequested);
        }

        window.present(&surface)?;
        Ok(DisplayOutcome::Continue)
    }

    fn emulator(&self) -> &Emulator {
        &self.emulator
    }

    fn emulator_mut(&mut self) -> &mut Emulator {
        &mut self.emulator
    }

    fn cleanup(&mut self) -> Result<()> {
        if self.window.take().is_some() {
            tracing::debug!("window closed by cleanup");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_closed_window_stays_closed() {
        let mut display = WindowDisplay {
            emulator: Emulator::new(EmulatorConfig::NATIVE.with_size(4, 4)).unwrap(),
            title: String::new(),
            clock: FrameClock::new(0),
            window: None,
            quit: true,
        };
        let frame = DynamicImage::new_rgb8(4, 4);

        assert_eq!(display.display(&frame).unwrap(), DisplayOutcome::QuitRequested);
        assert_eq!(display.display(&frame).unwrap(), DisplayOutcome::QuitRequested);
        assert!(!display.is_open());
        assert!(display.quit_requested());
    }

    #[test]
    fn test_frame_clock_interval() {
        assert_eq!(FrameClock::new(0).interval(), None);
        assert_eq!(FrameClock::new(50).interval(), Some(Duration::from_millis(20)));
    }

    #[test]
    fn test_frame_clock_limits_rate() {
        let mut clock = FrameClock::new(100);
        let start = Instant::now();
        clock.tick();
        clock.tick();
        clock.tick();
        assert!(start.elapsed() >= Duration::from_millis(18));
    }
}
