//! Backend registry and capability probe
//!
//! Which backends can run depends on how the crate was built and where it
//! runs. [`probe`] checks once and records a typed [`Availability`] for each
//! backend; unavailable backends are left out of [`Capabilities::registered`].

use std::fmt;
use std::io::IsTerminal;
use std::str::FromStr;

use crate::error::{EmulatorError, Result};

/// Every output sink this crate provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Numbered PNG files
    Capture,
    /// Animated GIF written on flush
    GifAnim,
    /// Desktop window
    Window,
    /// Coloured ASCII glyphs in the terminal
    AsciiArt,
    /// Coloured half-blocks in the terminal
    AsciiBlock,
}

impl Backend {
    /// Every backend, in registration order
    pub const ALL: [Backend; 5] = [
        Backend::Capture,
        Backend::GifAnim,
        Backend::Window,
        Backend::AsciiArt,
        Backend::AsciiBlock,
    ];

    /// Name used on the command line and in config files
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Capture => "capture",
            Backend::GifAnim => "gifanim",
            Backend::Window => "window",
            Backend::AsciiArt => "asciiart",
            Backend::AsciiBlock => "asciiblock",
        }
    }

    /// Whether the backend takes over the terminal
    pub fn uses_terminal(&self) -> bool {
        matches!(self, Backend::AsciiArt | Backend::AsciiBlock)
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = EmulatorError;

    fn from_str(s: &str) -> Result<Self> {
        Backend::ALL
            .into_iter()
            .find(|b| b.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| EmulatorError::UnknownBackend(s.to_string()))
    }
}

/// Result of probing one backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    /// Usable here
    Available,
    /// Not usable, with the reason
    Unavailable(String),
}

impl Availability {
    /// `true` for [`Availability::Available`]
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

/// Availability of every backend, captured once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    entries: Vec<(Backend, Availability)>,
}

impl Capabilities {
    /// Build from explicit probe results
    pub fn from_entries(entries: Vec<(Backend, Availability)>) -> Self {
        Self { entries }
    }

    /// Probe result for one backend; unprobed backends are unavailable
    pub fn availability(&self, backend: Backend) -> Availability {
        self.entries
            .iter()
            .find(|(b, _)| *b == backend)
            .map_or_else(
                || Availability::Unavailable("not probed".to_string()),
                |(_, a)| a.clone(),
            )
    }

    /// Backends that can be constructed here
    pub fn registered(&self) -> Vec<Backend> {
        self.entries
            .iter()
            .filter(|(_, a)| a.is_available())
            .map(|(b, _)| *b)
            .collect()
    }

    /// Fail with [`EmulatorError::BackendUnavailable`] unless `backend` is usable
    pub fn require(&self, backend: Backend) -> Result<()> {
        match self.availability(backend) {
            Availability::Available => Ok(()),
            Availability::Unavailable(reason) => {
                Err(EmulatorError::BackendUnavailable { backend, reason })
            }
        }
    }

    /// Every backend with its availability, in [`Backend::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = &(Backend, Availability)> {
        self.entries.iter()
    }
}

/// Check every backend against the current build and environment
pub fn probe() -> Capabilities {
    let entries = Backend::ALL
        .into_iter()
        .map(|backend| (backend, probe_one(backend)))
        .collect();
    let capabilities = Capabilities::from_entries(entries);

    for (backend, availability) in capabilities.iter() {
        if let Availability::Unavailable(reason) = availability {
            tracing::debug!(%backend, %reason, "backend unavailable");
        }
    }

    capabilities
}

/// Names of the backends usable on this machine
pub fn registered_backends() -> Vec<Backend> {
    probe().registered()
}

fn probe_one(backend: Backend) -> Availability {
    match backend {
        Backend::Capture | Backend::GifAnim => Availability::Available,
        Backend::Window => window_availability(),
        Backend::AsciiArt | Backend::AsciiBlock => terminal_availability(),
    }
}

#[cfg(feature = "headless")]
pub(crate) fn window_availability() -> Availability {
    Availability::Unavailable("built with the headless feature".to_string())
}

#[cfg(not(feature = "headless"))]
pub(crate) fn window_availability() -> Availability {
    if cfg!(target_os = "linux")
        && std::env::var_os("DISPLAY").is_none()
        && std::env::var_os("WAYLAND_DISPLAY").is_none()
    {
        return Availability::Unavailable(
            "no display server (DISPLAY and WAYLAND_DISPLAY are unset)".to_string(),
        );
    }
    Availability::Available
}

pub(crate) fn terminal_availability() -> Availability {
    if std::io::stdout().is_terminal() {
        Availability::Available
    } else {
        Availability::Unavailable("stdout is not a terminal".to_string())
    }
}
