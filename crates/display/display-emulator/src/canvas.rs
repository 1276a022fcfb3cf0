//! Drawable pixel surface
//!
//! [`Canvas`] plays the role of the driver-side framebuffer: draw on it with
//! embedded-graphics, then hand [`Canvas::image`] to a backend's `display`.

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::*;
use image::{DynamicImage, Rgb, RgbImage};

/// RGB framebuffer that implements [`DrawTarget`]
///
/// Out-of-bounds pixels are silently dropped, matching how embedded display
/// drivers clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    /// Create a black canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::new(width, height),
        }
    }

    /// Wrap an existing image
    pub fn from_image(image: RgbImage) -> Self {
        Self { image }
    }

    /// Canvas width in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Canvas height in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Fill the whole canvas with black
    pub fn clear_black(&mut self) {
        self.fill(Rgb([0, 0, 0]));
    }

    /// Fill the whole canvas with one colour
    pub fn fill(&mut self, color: Rgb<u8>) {
        for pixel in self.image.pixels_mut() {
            *pixel = color;
        }
    }

    /// Snapshot suitable for `Device::display`
    pub fn image(&self) -> DynamicImage {
        DynamicImage::ImageRgb8(self.image.clone())
    }

    /// Borrow the underlying pixels
    pub fn as_rgb(&self) -> &RgbImage {
        &self.image
    }

    /// Consume the canvas and return its pixels
    pub fn into_rgb(self) -> RgbImage {
        self.image
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) else {
                continue;
            };
            if x < self.image.width() && y < self.image.height() {
                self.image
                    .put_pixel(x, y, Rgb([color.r(), color.g(), color.b()]));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    #[test]
    fn test_canvas_starts_black() {
        let canvas = Canvas::new(4, 3);
        assert_eq!(canvas.size(), Size::new(4, 3));
        assert!(canvas.as_rgb().pixels().all(|p| *p == Rgb([0, 0, 0])));
    }

    #[test]
    fn test_draw_rectangle() {
        let mut canvas = Canvas::new(10, 10);
        Rectangle::new(Point::new(2, 2), Size::new(3, 3))
            .into_styled(PrimitiveStyle::with_fill(Rgb888::WHITE))
            .draw(&mut canvas)
            .unwrap();

        assert_eq!(*canvas.as_rgb().get_pixel(3, 3), Rgb([255, 255, 255]));
        assert_eq!(*canvas.as_rgb().get_pixel(5, 5), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_out_of_bounds_is_clipped() {
        let mut canvas = Canvas::new(4, 4);
        Rectangle::new(Point::new(-2, -2), Size::new(10, 10))
            .into_styled(PrimitiveStyle::with_fill(Rgb888::RED))
            .draw(&mut canvas)
            .unwrap();
        assert!(canvas.as_rgb().pixels().all(|p| *p == Rgb([255, 0, 0])));
    }

    #[test]
    fn test_image_snapshot() {
        let mut canvas = Canvas::new(2, 2);
        canvas.fill(Rgb([1, 2, 3]));
        let image = canvas.image().to_rgb8();
        assert_eq!(*image.get_pixel(1, 1), Rgb([1, 2, 3]));
    }
}
