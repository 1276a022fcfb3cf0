//! Transform dispatch
//!
//! A [`Transformer`] is built once per device with the device's physical size
//! and scale factor. Each named [`Transform`] then turns one frame into the
//! surface that the backend writes out.

use std::fmt;
use std::str::FromStr;

use image::imageops::{self, FilterType};
use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::error::{EmulatorError, Result};
use crate::glyphs::{GlyphAtlas, SEGMENT_CELL_HEIGHT, SEGMENT_CELL_WIDTH};
use crate::scale2x;

/// Named transform, fixed when a device is constructed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    /// Pass the frame through untouched (scale is forced to 1)
    None,
    /// AdvanceMAME Scale2X; requires scale = 2
    #[default]
    Scale2x,
    /// Bilinear resample to `size × scale`
    Smoothscale,
    /// Nearest-neighbour resample to `size × scale`
    #[serde(alias = "identity_rescale")]
    Identity,
    /// One LED glyph per pixel
    LedMatrix,
    /// One seven-segment digit per column
    SevenSegment,
}

impl Transform {
    /// Every transform, in documentation order
    pub const ALL: [Transform; 6] = [
        Transform::None,
        Transform::Scale2x,
        Transform::Smoothscale,
        Transform::Identity,
        Transform::LedMatrix,
        Transform::SevenSegment,
    ];

    /// Name used in configs and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Transform::None => "none",
            Transform::Scale2x => "scale2x",
            Transform::Smoothscale => "smoothscale",
            Transform::Identity => "identity",
            Transform::LedMatrix => "led_matrix",
            Transform::SevenSegment => "seven_segment",
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Transform {
    type Err = EmulatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "identity_rescale" => Ok(Transform::Identity),
            _ => Transform::ALL
                .into_iter()
                .find(|t| t.name() == s)
                .ok_or_else(|| EmulatorError::UnknownTransform(s.to_string())),
        }
    }
}

/// Dispatches named transforms for one device geometry
#[derive(Debug, Clone)]
pub struct Transformer {
    input_size: (u32, u32),
    output_size: (u32, u32),
    scale: u32,
    atlas: GlyphAtlas,
}

impl Transformer {
    /// Transformer with the built-in glyph atlas
    pub fn new(width: u32, height: u32, scale: u32) -> Result<Self> {
        Self::with_atlas(width, height, scale, GlyphAtlas::builtin())
    }

    /// Transformer with caller-provided glyph assets
    pub fn with_atlas(width: u32, height: u32, scale: u32, atlas: GlyphAtlas) -> Result<Self> {
        if scale == 0 {
            return Err(EmulatorError::InvalidScale(scale));
        }
        let output_size = (
            width.checked_mul(scale).ok_or(EmulatorError::InvalidScale(scale))?,
            height.checked_mul(scale).ok_or(EmulatorError::InvalidScale(scale))?,
        );
        Ok(Self {
            input_size: (width, height),
            output_size,
            scale,
            atlas,
        })
    }

    /// Size every input surface must have
    pub fn input_size(&self) -> (u32, u32) {
        self.input_size
    }

    /// Target size of the rescaling transforms
    pub fn output_size(&self) -> (u32, u32) {
        self.output_size
    }

    /// Configured scale factor
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Glyphs used by the LED and seven-segment transforms
    pub fn atlas(&self) -> &GlyphAtlas {
        &self.atlas
    }

    /// Run one named transform
    pub fn apply(&self, transform: Transform, surface: RgbImage) -> Result<RgbImage> {
        self.check_input(&surface)?;
        match transform {
            Transform::None => Ok(self.none(surface)),
            Transform::Scale2x => self.scale2x(&surface),
            Transform::Smoothscale => Ok(self.smoothscale(&surface)),
            Transform::Identity => Ok(self.identity(&surface)),
            Transform::LedMatrix => Ok(self.led_matrix(&surface)),
            Transform::SevenSegment => Ok(self.seven_segment(&surface)),
        }
    }

    fn check_input(&self, surface: &RgbImage) -> Result<()> {
        let (actual_width, actual_height) = surface.dimensions();
        if (actual_width, actual_height) != self.input_size {
            return Err(EmulatorError::SizeMismatch {
                expected_width: self.input_size.0,
                expected_height: self.input_size.1,
                actual_width,
                actual_height,
            });
        }
        Ok(())
    }

    /// Identity; used when the scale is 1
    pub fn none(&self, surface: RgbImage) -> RgbImage {
        surface
    }

    /// Edge-preserving 2× pixel-art upscale
    pub fn scale2x(&self, surface: &RgbImage) -> Result<RgbImage> {
        if self.scale != 2 {
            return Err(EmulatorError::Scale2xRequiresScale2(self.scale));
        }
        Ok(scale2x::scale2x(surface))
    }

    /// Bilinear resample to the output size
    pub fn smoothscale(&self, surface: &RgbImage) -> RgbImage {
        let (width, height) = self.output_size;
        imageops::resize(surface, width, height, FilterType::Triangle)
    }

    /// Nearest-neighbour resample to the output size
    ///
    /// Fast, not smooth: each source pixel becomes a `scale × scale` block.
    #[allow(clippy::arithmetic_side_effects)] // x < output width, and output = input × scale
    pub fn identity(&self, surface: &RgbImage) -> RgbImage {
        let (width, height) = self.output_size;
        let scale = self.scale;
        RgbImage::from_fn(width, height, |x, y| *surface.get_pixel(x / scale, y / scale))
    }

    /// One LED glyph per pixel: lit for any non-black pixel
    #[allow(clippy::arithmetic_side_effects)] // glyph origin is within the w·gw × h·gh canvas
    pub fn led_matrix(&self, surface: &RgbImage) -> RgbImage {
        let (glyph_width, glyph_height) = self.atlas.led_size();
        let (width, height) = surface.dimensions();
        let mut out = RgbImage::new(width * glyph_width, height * glyph_height);

        for (x, y, pixel) in surface.enumerate_pixels() {
            let glyph = if is_lit(pixel) {
                self.atlas.led_on()
            } else {
                self.atlas.led_off()
            };
            imageops::replace(
                &mut out,
                glyph,
                i64::from(x * glyph_width),
                i64::from(y * glyph_height),
            );
        }

        out
    }

    /// One seven-segment digit per column
    ///
    /// Every row but the last contributes one bit, top row first; the low 7
    /// bits index the segment sheet. Column 0 is drawn rightmost.
    #[allow(clippy::arithmetic_side_effects)] // x < width, so width - x - 1 never underflows
    pub fn seven_segment(&self, surface: &RgbImage) -> RgbImage {
        let (width, height) = surface.dimensions();
        let mut out = RgbImage::new(
            width * SEGMENT_CELL_WIDTH,
            height * SEGMENT_CELL_HEIGHT / 8,
        );

        for x in 0..width {
            let code = column_code(surface, x);
            let (cell_x, cell_y) = GlyphAtlas::segment_cell_origin(code);
            let cell = imageops::crop_imm(
                self.atlas.seven_segment(),
                cell_x,
                cell_y,
                SEGMENT_CELL_WIDTH,
                SEGMENT_CELL_HEIGHT,
            )
            .to_image();
            imageops::replace(
                &mut out,
                &cell,
                i64::from((width - x - 1) * SEGMENT_CELL_WIDTH),
                0,
            );
        }

        out
    }
}

fn is_lit(pixel: &image::Rgb<u8>) -> bool {
    pixel.0.iter().any(|&channel| channel > 0)
}

/// Pack a column's lit rows (all but the last, top first) into a 7-bit code
fn column_code(surface: &RgbImage, x: u32) -> u8 {
    let rows = surface.height().saturating_sub(1);
    let byte = (0..rows).fold(0u8, |byte, y| {
        (byte << 1) | u8::from(is_lit(surface.get_pixel(x, y)))
    });
    byte & 0x7F
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
    use super::*;
    use crate::glyphs::segment;
    use crate::segment_mapper::{regular, segment_surface};
    use image::Rgb;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    fn checkerboard(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                WHITE
            } else {
                Rgb([0, 0, 0])
            }
        })
    }

    #[test]
    fn test_transform_names_round_trip() {
        for t in Transform::ALL {
            assert_eq!(t.name().parse::<Transform>().unwrap(), t);
        }
        assert_eq!(
            "identity_rescale".parse::<Transform>().unwrap(),
            Transform::Identity
        );
        assert!(matches!(
            "bicubic".parse::<Transform>(),
            Err(EmulatorError::UnknownTransform(_))
        ));
    }

    #[test]
    fn test_zero_scale_rejected() {
        assert!(matches!(
            Transformer::new(8, 8, 0),
            Err(EmulatorError::InvalidScale(0))
        ));
    }

    #[test]
    fn test_none_returns_input() {
        let tf = Transformer::new(5, 3, 1).unwrap();
        let src = checkerboard(5, 3);
        assert_eq!(tf.apply(Transform::None, src.clone()).unwrap(), src);
    }

    #[test]
    fn test_scale2x_requires_scale_two() {
        let tf = Transformer::new(4, 4, 3).unwrap();
        let err = tf.apply(Transform::Scale2x, checkerboard(4, 4)).unwrap_err();
        assert!(matches!(err, EmulatorError::Scale2xRequiresScale2(3)));

        let tf = Transformer::new(4, 4, 2).unwrap();
        let out = tf.apply(Transform::Scale2x, checkerboard(4, 4)).unwrap();
        assert_eq!(out.dimensions(), (8, 8));
    }

    #[test]
    fn test_rescales_hit_output_size() {
        for scale in [1, 2, 3, 5] {
            let tf = Transformer::new(7, 3, scale).unwrap();
            let expected = (7 * scale, 3 * scale);
            let smooth = tf.apply(Transform::Smoothscale, checkerboard(7, 3)).unwrap();
            let fast = tf.apply(Transform::Identity, checkerboard(7, 3)).unwrap();
            assert_eq!(smooth.dimensions(), expected);
            assert_eq!(fast.dimensions(), expected);
        }
    }

    #[test]
    fn test_identity_is_block_replication() {
        let tf = Transformer::new(2, 2, 3).unwrap();
        let out = tf.identity(&checkerboard(2, 2));
        for y in 0..6 {
            for x in 0..6 {
                let expected = if (x / 3 + y / 3) % 2 == 0 { WHITE } else { Rgb([0, 0, 0]) };
                assert_eq!(*out.get_pixel(x, y), expected);
            }
        }
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let tf = Transformer::new(8, 8, 2).unwrap();
        let err = tf.apply(Transform::Identity, checkerboard(8, 7)).unwrap_err();
        assert!(matches!(
            err,
            EmulatorError::SizeMismatch {
                expected_height: 8,
                actual_height: 7,
                ..
            }
        ));
    }

    #[test]
    fn test_led_matrix_all_off() {
        let tf = Transformer::new(4, 3, 16).unwrap();
        let out = tf.apply(Transform::LedMatrix, RgbImage::new(4, 3)).unwrap();
        let (gw, gh) = tf.atlas().led_size();
        assert_eq!(out.dimensions(), (4 * gw, 3 * gh));
        for ty in 0..3 {
            for tx in 0..4 {
                let tile = imageops::crop_imm(&out, tx * gw, ty * gh, gw, gh).to_image();
                assert_eq!(&tile, tf.atlas().led_off());
            }
        }
    }

    #[test]
    fn test_led_matrix_all_on() {
        let tf = Transformer::new(3, 2, 16).unwrap();
        // Any non-black channel counts as lit
        let out = tf
            .apply(Transform::LedMatrix, RgbImage::from_pixel(3, 2, Rgb([0, 0, 1])))
            .unwrap();
        let (gw, gh) = tf.atlas().led_size();
        for ty in 0..2 {
            for tx in 0..3 {
                let tile = imageops::crop_imm(&out, tx * gw, ty * gh, gw, gh).to_image();
                assert_eq!(&tile, tf.atlas().led_on());
            }
        }
    }

    #[test]
    fn test_column_code_packs_top_rows() {
        // Rows 0 and 6 lit in an 8-row column -> bits 6 and 0
        let mut surface = RgbImage::new(1, 8);
        surface.put_pixel(0, 0, WHITE);
        surface.put_pixel(0, 6, WHITE);
        // Last row never contributes
        surface.put_pixel(0, 7, WHITE);
        assert_eq!(column_code(&surface, 0), segment::A | segment::G);
    }

    #[test]
    fn test_seven_segment_renders_sheet_cells_mirrored() {
        let codes: Vec<u8> = regular("12", None).collect();
        let surface = segment_surface(&codes, WHITE);
        let tf = Transformer::new(2, 8, 1).unwrap();
        let out = tf.apply(Transform::SevenSegment, surface).unwrap();
        assert_eq!(out.dimensions(), (60, 50));

        for (position, &code) in codes.iter().enumerate() {
            let (cx, cy) = GlyphAtlas::segment_cell_origin(code);
            let expected = imageops::crop_imm(tf.atlas().seven_segment(), cx, cy, 30, 50).to_image();
            let actual = imageops::crop_imm(&out, position as u32 * 30, 0, 30, 50).to_image();
            assert_eq!(actual, expected, "digit {position}");
        }
    }
}
