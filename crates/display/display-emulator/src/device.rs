//! Device core shared by every backend
//!
//! [`Emulator`] owns the display geometry, the frame preprocessing
//! (colour-mode conversion and rotation), the contrast blend and the
//! [`Transformer`]. Backends wrap one and implement [`Device`] on top of it.

use display_specs::ColorMode;
use image::{imageops, DynamicImage, Rgb, RgbImage};

use crate::config::{EmulatorConfig, Rotation};
use crate::error::{EmulatorError, Result};
use crate::glyphs::GlyphAtlas;
use crate::transform::{Transform, Transformer};

/// Luminance at or above which a monochrome pixel is lit
pub const MONOCHROME_THRESHOLD: u8 = 128;

/// What the caller should do after handing a frame to a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum DisplayOutcome {
    /// Keep sending frames
    Continue,
    /// The backend's `max_frames` has been reached
    FrameLimitReached,
    /// The user closed the window or pressed Escape
    QuitRequested,
}

impl DisplayOutcome {
    /// Whether the caller should stop its render loop
    pub fn is_finished(&self) -> bool {
        !matches!(self, DisplayOutcome::Continue)
    }
}

/// Geometry, preprocessing and transform state for one emulated panel
#[derive(Debug, Clone)]
pub struct Emulator {
    config: EmulatorConfig,
    logical_size: (u32, u32),
    transformer: Transformer,
    alpha: f32,
    last_image: Option<DynamicImage>,
}

impl Emulator {
    /// Establish capabilities from a configuration
    ///
    /// A scale of 1 selects the `none` transform, and `none` forces the
    /// scale to 1. `scale2x` with any other scale is rejected here.
    pub fn new(config: EmulatorConfig) -> Result<Self> {
        Self::with_atlas(config, GlyphAtlas::builtin())
    }

    /// Like [`Emulator::new`], with custom LED and seven-segment glyphs
    pub fn with_atlas(config: EmulatorConfig, atlas: GlyphAtlas) -> Result<Self> {
        if config.scale == 0 {
            return Err(EmulatorError::InvalidScale(0));
        }

        let mut config = config;
        if config.scale == 1 {
            config.transform = Transform::None;
        }
        if config.transform == Transform::None {
            config.scale = 1;
        }
        if config.transform == Transform::Scale2x && config.scale != 2 {
            return Err(EmulatorError::Scale2xRequiresScale2(config.scale));
        }

        let transformer = Transformer::with_atlas(config.width, config.height, config.scale, atlas)?;
        let logical_size = config
            .rotation
            .apply_to_dimensions(config.width, config.height);

        tracing::debug!(
            width = config.width,
            height = config.height,
            rotation = u8::from(config.rotation),
            mode = %config.mode,
            transform = %config.transform,
            scale = config.scale,
            "emulator capabilities"
        );

        Ok(Self {
            config,
            logical_size,
            transformer,
            alpha: 1.0,
            last_image: None,
        })
    }

    /// Effective configuration, after transform/scale normalisation
    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    /// Size callers draw at: physical size, swapped for 90°/270° rotation
    pub fn size(&self) -> (u32, u32) {
        self.logical_size
    }

    /// Panel size in its native orientation
    pub fn physical_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Colour mode frames are converted to
    pub fn mode(&self) -> ColorMode {
        self.config.mode
    }

    /// Rotation applied before rendering
    pub fn rotation(&self) -> Rotation {
        self.config.rotation
    }

    /// Effective transform after normalisation
    pub fn transform(&self) -> Transform {
        self.config.transform
    }

    /// Effective scale after normalisation
    pub fn scale(&self) -> u32 {
        self.config.scale
    }

    /// Dispatcher configured for the physical size and scale
    pub fn transformer(&self) -> &Transformer {
        &self.transformer
    }

    /// Current blend level in `0.0..=1.0`
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Set the blend level directly
    pub fn set_alpha(&mut self, alpha: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(EmulatorError::InvalidAlpha(alpha));
        }
        self.alpha = alpha;
        Ok(())
    }

    /// Set the blend level from a 0-255 contrast value
    pub fn set_contrast(&mut self, level: u8) {
        self.alpha = f32::from(level) / 255.0;
    }

    /// Most recent frame passed to [`Emulator::render`], in logical orientation
    pub fn last_image(&self) -> Option<&DynamicImage> {
        self.last_image.as_ref()
    }

    /// Reject frames whose size differs from [`Emulator::size`]
    pub fn check_size(&self, image: &DynamicImage) -> Result<()> {
        let (actual_width, actual_height) = (image.width(), image.height());
        let (expected_width, expected_height) = self.logical_size;
        if (actual_width, actual_height) != self.logical_size {
            return Err(EmulatorError::SizeMismatch {
                expected_width,
                expected_height,
                actual_width,
                actual_height,
            });
        }
        Ok(())
    }

    /// Convert to the configured colour mode, then rotate to the physical
    /// orientation
    pub fn preprocess(&self, image: &DynamicImage) -> RgbImage {
        let converted = match self.config.mode {
            ColorMode::Monochrome => to_monochrome(image),
            ColorMode::Rgb | ColorMode::Rgba => image.to_rgb8(),
        };
        match self.config.rotation {
            Rotation::Degrees0 => converted,
            Rotation::Degrees90 => imageops::rotate90(&converted),
            Rotation::Degrees180 => imageops::rotate180(&converted),
            Rotation::Degrees270 => imageops::rotate270(&converted),
        }
    }

    /// Full pipeline for one frame: size check, preprocess, contrast blend,
    /// transform
    ///
    /// The frame is remembered for later contrast changes.
    pub fn render(&mut self, image: &DynamicImage) -> Result<RgbImage> {
        self.check_size(image)?;
        self.last_image = Some(image.clone());

        let mut frame = self.preprocess(image);
        if self.alpha < 1.0 {
            blend_with_black(&mut frame, self.alpha);
        }
        self.transformer.apply(self.config.transform, frame)
    }
}

/// Luminance threshold, expanded back to black/white RGB
fn to_monochrome(image: &DynamicImage) -> RgbImage {
    let luma = image.to_luma8();
    RgbImage::from_fn(luma.width(), luma.height(), |x, y| {
        if luma.get_pixel(x, y).0[0] >= MONOCHROME_THRESHOLD {
            Rgb([255, 255, 255])
        } else {
            Rgb([0, 0, 0])
        }
    })
}

/// Blend towards black: `v * alpha`, truncated
fn blend_with_black(frame: &mut RgbImage, alpha: f32) {
    for pixel in frame.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            *channel = (f32::from(*channel) * alpha) as u8;
        }
    }
}

/// Operations every emulated display offers
///
/// Implementors provide [`Device::display`] and access to their
/// [`Emulator`]; contrast handling is shared.
pub trait Device {
    /// Render one frame; the image must match [`Device::size`]
    fn display(&mut self, image: &DynamicImage) -> Result<DisplayOutcome>;

    /// Shared pipeline state
    fn emulator(&self) -> &Emulator;

    /// Mutable pipeline state, used by `contrast`
    fn emulator_mut(&mut self) -> &mut Emulator;

    /// Release exclusive resources; safe to call more than once
    fn cleanup(&mut self) -> Result<()> {
        Ok(())
    }

    /// Logical size frames must have
    fn size(&self) -> (u32, u32) {
        self.emulator().size()
    }

    /// Colour mode frames are converted to
    fn mode(&self) -> ColorMode {
        self.emulator().mode()
    }

    /// Fully opaque
    fn show(&mut self) -> Result<DisplayOutcome> {
        self.contrast(0xFF)
    }

    /// Fully transparent (black)
    fn hide(&mut self) -> Result<DisplayOutcome> {
        self.contrast(0x00)
    }

    /// Change the blend level and re-render the last frame
    ///
    /// Nothing is rendered if no frame has been displayed yet.
    fn contrast(&mut self, level: u8) -> Result<DisplayOutcome> {
        self.emulator_mut().set_contrast(level);
        match self.emulator().last_image().cloned() {
            Some(image) => self.display(&image),
            None => Ok(DisplayOutcome::Continue),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn config(width: u32, height: u32) -> EmulatorConfig {
        EmulatorConfig::NATIVE.with_size(width, height)
    }

    #[test]
    fn test_scale_one_forces_none() {
        let emu = Emulator::new(config(8, 4).with_transform(Transform::Smoothscale, 1)).unwrap();
        assert_eq!(emu.transform(), Transform::None);
        assert_eq!(emu.scale(), 1);
    }

    #[test]
    fn test_none_forces_scale_one() {
        let emu = Emulator::new(config(8, 4).with_transform(Transform::None, 4)).unwrap();
        assert_eq!(emu.scale(), 1);
    }

    #[test]
    fn test_scale2x_with_wrong_scale_rejected() {
        let err = Emulator::new(config(8, 4).with_transform(Transform::Scale2x, 3)).unwrap_err();
        assert!(matches!(err, EmulatorError::Scale2xRequiresScale2(3)));
    }

    #[test]
    fn test_zero_scale_rejected() {
        let err = Emulator::new(config(8, 4).with_transform(Transform::Identity, 0)).unwrap_err();
        assert!(matches!(err, EmulatorError::InvalidScale(0)));
    }

    #[test]
    fn test_rotation_swaps_logical_size() {
        let mut cfg = config(128, 64);
        cfg.rotation = Rotation::Degrees90;
        let mut emu = Emulator::new(cfg).unwrap();
        assert_eq!(emu.size(), (64, 128));
        assert_eq!(emu.physical_size(), (128, 64));

        let out = emu.render(&DynamicImage::new_rgb8(64, 128)).unwrap();
        assert_eq!(out.dimensions(), (128, 64));
    }

    #[test]
    fn test_rotation_is_clockwise() {
        let mut cfg = config(2, 1);
        cfg.rotation = Rotation::Degrees90;
        let emu = Emulator::new(cfg).unwrap();

        // Logical 1×2: white on top
        let mut logical = RgbImage::new(1, 2);
        logical.put_pixel(0, 0, Rgb([255, 255, 255]));
        let physical = emu.preprocess(&DynamicImage::ImageRgb8(logical));

        // Clockwise quarter turn moves the top pixel to the right
        assert_eq!(*physical.get_pixel(1, 0), Rgb([255, 255, 255]));
        assert_eq!(*physical.get_pixel(0, 0), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_size_mismatch() {
        let mut emu = Emulator::new(config(8, 4)).unwrap();
        let err = emu.render(&DynamicImage::new_rgb8(4, 8)).unwrap_err();
        assert!(matches!(err, EmulatorError::SizeMismatch { .. }));
        assert!(emu.last_image().is_none());
    }

    #[test]
    fn test_monochrome_threshold() {
        let mut cfg = config(2, 1);
        cfg.mode = ColorMode::Monochrome;
        let emu = Emulator::new(cfg).unwrap();
        let image = RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgb([100, 100, 100])
            } else {
                Rgb([200, 200, 200])
            }
        });
        let out = emu.preprocess(&DynamicImage::ImageRgb8(image));
        assert_eq!(*out.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*out.get_pixel(1, 0), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_alpha_blend_truncates() {
        let mut emu = Emulator::new(config(1, 1)).unwrap();
        emu.set_alpha(0.5).unwrap();
        let out = emu
            .render(&DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, Rgb([255, 101, 1]))))
            .unwrap();
        assert_eq!(*out.get_pixel(0, 0), Rgb([127, 50, 0]));
    }

    #[test]
    fn test_invalid_alpha() {
        let mut emu = Emulator::new(config(1, 1)).unwrap();
        assert!(matches!(emu.set_alpha(1.5), Err(EmulatorError::InvalidAlpha(_))));
        assert!(matches!(emu.set_alpha(-0.1), Err(EmulatorError::InvalidAlpha(_))));
        assert_eq!(emu.alpha(), 1.0);
    }

    #[test]
    fn test_contrast_extremes() {
        let mut emu = Emulator::new(config(1, 1)).unwrap();
        let white = DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, Rgb([255, 255, 255])));

        emu.set_contrast(0);
        assert_eq!(*emu.render(&white).unwrap().get_pixel(0, 0), Rgb([0, 0, 0]));

        emu.set_contrast(255);
        assert_eq!(*emu.render(&white).unwrap().get_pixel(0, 0), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_outcome_finished() {
        assert!(!DisplayOutcome::Continue.is_finished());
        assert!(DisplayOutcome::FrameLimitReached.is_finished());
        assert!(DisplayOutcome::QuitRequested.is_finished());
    }
}
