//! Isolated window management layer
//!
//! Based on softbuffer pattern: https://github.com/rust-windowing/softbuffer
//! All winit/softbuffer code lives here; the rest of the crate only sees
//! [`Window::present`] and [`Window::poll_quit`].

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use image::RgbImage;
use softbuffer::{Context, Surface};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window as WinitWindow, WindowAttributes, WindowId};

use crate::error::{EmulatorError, Result};

type WindowSurface = Surface<Arc<WinitWindow>, Arc<WinitWindow>>;

/// Pack an RGB pixel as softbuffer's `0x00RRGGBB`
fn pack_pixel([r, g, b]: [u8; 3]) -> u32 {
    (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// Creates the window and its surface on the first `resumed` callback
struct WindowCreator {
    window_attributes: Option<WindowAttributes>,
    created: Option<(Arc<WinitWindow>, WindowSurface)>,
    error: Option<String>,
}

impl WindowCreator {
    fn create(&mut self, event_loop: &ActiveEventLoop, attributes: WindowAttributes) -> std::result::Result<(), String> {
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .map_err(|e| format!("failed to create window: {e}"))?,
        );
        let context =
            Context::new(window.clone()).map_err(|e| format!("failed to create context: {e}"))?;
        let surface = Surface::new(&context, window.clone())
            .map_err(|e| format!("failed to create surface: {e}"))?;
        self.created = Some((window, surface));
        Ok(())
    }
}

impl ApplicationHandler for WindowCreator {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.created.is_some() {
            return;
        }
        if let Some(attributes) = self.window_attributes.take() {
            if let Err(error) = self.create(event_loop, attributes) {
                self.error = Some(error);
            }
        }
    }

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, _: WindowEvent) {}
}

/// Records quit requests while events are pumped
#[derive(Default)]
struct EventHandler {
    quit_requested: bool,
}

impl ApplicationHandler for EventHandler {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {
        // Window is already created before events are pumped
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.quit_requested = true;
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape) =>
            {
                self.quit_requested = true;
                event_loop.exit();
            }
            _ => {}
        }
    }
}

/// Window management (isolated from application logic)
pub struct Window {
    event_loop: EventLoop<()>,
    window: Arc<WinitWindow>,
    surface: WindowSurface,
    width: u32,
    height: u32,
}

impl Window {
    /// Open a non-resizable window whose client area is exactly
    /// `width × height` pixels
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self> {
        let (Some(surface_width), Some(surface_height)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            return Err(EmulatorError::Window(format!("cannot open a {width}×{height} window")));
        };

        let mut event_loop = EventLoop::new().map_err(|e| EmulatorError::Window(e.to_string()))?;

        let window_attributes = WindowAttributes::default()
            .with_title(title)
            .with_inner_size(winit::dpi::PhysicalSize::new(width, height))
            .with_resizable(false);

        let mut creator = WindowCreator {
            window_attributes: Some(window_attributes),
            created: None,
            error: None,
        };

        // Pump the event loop once to create the window
        let _ = event_loop.pump_app_events(Some(Duration::from_millis(1)), &mut creator);

        let (window, mut surface) = match (creator.created, creator.error) {
            (Some(created), _) => created,
            (None, Some(error)) => return Err(EmulatorError::Window(error)),
            (None, None) => return Err(EmulatorError::Window("window was not created".to_string())),
        };

        // Sized once; the emulated panel never changes size
        surface
            .resize(surface_width, surface_height)
            .map_err(|e| EmulatorError::Window(e.to_string()))?;

        tracing::info!(width, height, title, "window opened");

        Ok(Self {
            event_loop,
            window,
            surface,
            width,
            height,
        })
    }

    /// Blit a frame; it must match the window size
    pub fn present(&mut self, frame: &RgbImage) -> Result<()> {
        if frame.dimensions() != (self.width, self.height) {
            return Err(EmulatorError::SizeMismatch {
                expected_width: self.width,
                expected_height: self.height,
                actual_width: frame.width(),
                actual_height: frame.height(),
            });
        }

        let mut buffer = self
            .surface
            .buffer_mut()
            .map_err(|e| EmulatorError::Window(e.to_string()))?;
        for (dst, pixel) in buffer.iter_mut().zip(frame.pixels()) {
            *dst = pack_pixel(pixel.0);
        }
        buffer
            .present()
            .map_err(|e| EmulatorError::Window(e.to_string()))?;

        self.window.request_redraw();
        Ok(())
    }

    /// Process pending OS events without blocking
    ///
    /// Returns `true` once the window was closed or Escape was pressed.
    pub fn poll_quit(&mut self) -> bool {
        let mut handler = EventHandler::default();
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut handler);
        handler.quit_requested || matches!(status, PumpStatus::Exit(_))
    }
}
