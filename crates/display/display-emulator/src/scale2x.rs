//! AdvanceMAME Scale2X
//!
//! Each source pixel `E` becomes a 2×2 block computed from its four edge
//! neighbours:
//!
//! ```text
//!     B            E0 E1
//!   D E F   ->     E2 E3
//!     H
//! ```
//!
//! When `B != H` and `D != F`:
//! `E0 = D if D == B`, `E1 = F if B == F`, `E2 = D if D == H`,
//! `E3 = F if H == F`; every other output copies `E`. Neighbours outside
//! the image are clamped to the edge pixel.

use image::{Pixel, RgbImage};

/// Upscale an image to exactly twice its size without blurring edges
#[allow(clippy::arithmetic_side_effects)] // x, y < dimensions; 2x of a valid image size fits in u32
pub fn scale2x(src: &RgbImage) -> RgbImage {
    let (width, height) = src.dimensions();
    let mut dst = RgbImage::new(width * 2, height * 2);
    if width == 0 || height == 0 {
        return dst;
    }

    for y in 0..height {
        let up = y.saturating_sub(1);
        let down = (y + 1).min(height - 1);
        for x in 0..width {
            let left = x.saturating_sub(1);
            let right = (x + 1).min(width - 1);

            let b = *src.get_pixel(x, up);
            let d = *src.get_pixel(left, y);
            let e = *src.get_pixel(x, y);
            let f = *src.get_pixel(right, y);
            let h = *src.get_pixel(x, down);

            let (e0, e1, e2, e3) = if b != h && d != f {
                (
                    if d == b { d } else { e },
                    if b == f { f } else { e },
                    if d == h { d } else { e },
                    if h == f { f } else { e },
                )
            } else {
                (e, e, e, e)
            };

            let (dx, dy) = (x * 2, y * 2);
            dst.put_pixel(dx, dy, e0);
            dst.put_pixel(dx + 1, dy, e1);
            dst.put_pixel(dx, dy + 1, e2);
            dst.put_pixel(dx + 1, dy + 1, e3);
        }
    }

    dst
}

/// Whether an image contains only colours present in another
///
/// Scale2X never invents colours; used by tests and debug assertions.
pub fn palette_preserved(src: &RgbImage, dst: &RgbImage) -> bool {
    dst.pixels()
        .all(|p| src.pixels().any(|q| q.channels() == p.channels()))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)]
    use super::*;
    use image::Rgb;

    const W: Rgb<u8> = Rgb([255, 255, 255]);
    const K: Rgb<u8> = Rgb([0, 0, 0]);

    fn image_from(rows: &[&[Rgb<u8>]]) -> RgbImage {
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |r| r.len()) as u32;
        RgbImage::from_fn(width, height, |x, y| rows[y as usize][x as usize])
    }

    #[test]
    fn test_output_is_double_size() {
        let out = scale2x(&RgbImage::new(7, 3));
        assert_eq!(out.dimensions(), (14, 6));
    }

    #[test]
    fn test_empty_image() {
        assert_eq!(scale2x(&RgbImage::new(0, 0)).dimensions(), (0, 0));
    }

    #[test]
    fn test_single_pixel_is_replicated() {
        let out = scale2x(&image_from(&[&[W]]));
        assert!(out.pixels().all(|p| *p == W));
    }

    #[test]
    fn test_flat_image_stays_flat() {
        let src = RgbImage::from_pixel(4, 4, Rgb([10, 20, 30]));
        let out = scale2x(&src);
        assert!(out.pixels().all(|p| *p == Rgb([10, 20, 30])));
    }

    #[test]
    fn test_diagonal_is_smoothed() {
        // A 45° staircase: the black pixel at the centre gets its corners
        // filled from matching white neighbours.
        let src = image_from(&[&[W, W, K], &[W, K, K], &[K, K, K]]);
        let out = scale2x(&src);

        // Centre pixel E=K has B=W (up), D=W (left), F=K, H=K.
        // B != H and D != F, D == B so E0 = W; the rest stay K.
        assert_eq!(*out.get_pixel(2, 2), W);
        assert_eq!(*out.get_pixel(3, 2), K);
        assert_eq!(*out.get_pixel(2, 3), K);
        assert_eq!(*out.get_pixel(3, 3), K);
    }

    #[test]
    fn test_vertical_line_is_not_widened() {
        let src = image_from(&[&[K, W, K], &[K, W, K], &[K, W, K]]);
        let out = scale2x(&src);
        // Middle column: B == H, so every output copies E.
        for y in 0..6 {
            assert_eq!(*out.get_pixel(2, y), W);
            assert_eq!(*out.get_pixel(3, y), W);
            assert_eq!(*out.get_pixel(1, y), K);
            assert_eq!(*out.get_pixel(4, y), K);
        }
    }

    #[test]
    fn test_isolated_pixel_stays_square() {
        let src = image_from(&[&[K, K, K], &[K, W, K], &[K, K, K]]);
        let out = scale2x(&src);
        // All four neighbours equal: B == H, block copies E.
        for (x, y) in [(2, 2), (3, 2), (2, 3), (3, 3)] {
            assert_eq!(*out.get_pixel(x, y), W);
        }
        assert_eq!(out.pixels().filter(|p| **p == W).count(), 4);
    }

    #[test]
    fn test_palette_is_preserved() {
        let src = RgbImage::from_fn(9, 5, |x, y| {
            if (x * y) % 3 == 0 {
                Rgb([200, 0, 0])
            } else {
                Rgb([0, 0, 200])
            }
        });
        assert!(palette_preserved(&src, &scale2x(&src)));
    }
}
