//! Error type shared by every backend

use crate::backend::Backend;

/// Errors raised by the emulator core and its backends
///
/// Precondition violations (`SizeMismatch`, `InvalidAlpha`, `InvalidScale`,
/// `Scale2xRequiresScale2`) are caller bugs and are never recovered from.
/// I/O failures are passed through unchanged; nothing here retries.
#[derive(Debug, thiserror::Error)]
pub enum EmulatorError {
    /// Image handed to `display` does not match the configured geometry
    #[error("image is {actual_width}×{actual_height}, device expects {expected_width}×{expected_height}")]
    SizeMismatch {
        /// Logical width the device accepts
        expected_width: u32,
        /// Logical height the device accepts
        expected_height: u32,
        /// Width of the image given
        actual_width: u32,
        /// Height of the image given
        actual_height: u32,
    },

    /// Blend alpha outside `0.0..=1.0`
    #[error("alpha {0} is outside 0.0..=1.0")]
    InvalidAlpha(f32),

    /// Scale factor of zero
    #[error("scale must be at least 1, got {0}")]
    InvalidScale(u32),

    /// `scale2x` is only defined for a scale factor of exactly two
    #[error("scale2x transform requires scale = 2, got {0}")]
    Scale2xRequiresScale2(u32),

    /// Transform name not recognised
    #[error("unknown transform: {0}")]
    UnknownTransform(String),

    /// Backend name not recognised
    #[error("unknown backend: {0}")]
    UnknownBackend(String),

    /// Backend cannot run on this machine
    #[error("{backend} backend unavailable: {reason}")]
    BackendUnavailable {
        /// Backend that was requested
        backend: Backend,
        /// Why the probe rejected it
        reason: String,
    },

    /// Glyph assets are unusable
    #[error("invalid glyph atlas: {0}")]
    InvalidGlyphAtlas(String),

    /// Window or drawing surface could not be created or presented
    #[error("window error: {0}")]
    Window(String),

    /// File or terminal I/O failed
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Image encode or decode failed
    #[error(transparent)]
    Image(#[from] image::ImageError),

    /// JSON configuration did not parse
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate
pub type Result<T, E = EmulatorError> = std::result::Result<T, E>;
