//! 24-bit RGB to xterm-256 colour cube lookup
//!
//! Terminal colours 16..=231 form a 6×6×6 cube whose channel levels are
//! `[0x00, 0x5f, 0x87, 0xaf, 0xd7, 0xff]`. Each channel snaps to the nearest
//! level independently.

use std::collections::HashMap;

use image::Rgb;

/// Channel levels of the colour cube
pub const CUBE_LEVELS: [u8; 6] = [0x00, 0x5f, 0x87, 0xaf, 0xd7, 0xff];

/// First palette index of the colour cube
pub const CUBE_OFFSET: u8 = 16;

/// Doubled midpoints between consecutive cube levels
///
/// Stored doubled so the comparison stays in integers: `(a + b) / 2 < v`
/// is `a + b < 2v`.
const DOUBLED_SNAPS: [u16; 5] = snaps();

#[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)] // i + 1 < 6, sums of two u8
const fn snaps() -> [u16; 5] {
    let mut out = [0u16; 5];
    let mut i = 0;
    while i < 5 {
        out[i] = CUBE_LEVELS[i] as u16 + CUBE_LEVELS[i + 1] as u16;
        i += 1;
    }
    out
}

/// Cube coordinate (0..=5) of one channel value
#[allow(clippy::arithmetic_side_effects)] // at most 510
fn cube_coordinate(value: u8) -> u8 {
    let doubled = u16::from(value) * 2;
    DOUBLED_SNAPS.iter().filter(|&&snap| snap < doubled).count() as u8
}

/// Map an RGB triple to the nearest xterm-256 colour cube index
///
/// Total over every 8-bit triple; the result is always in `16..=231`.
///
/// ```
/// use display_emulator::clut::rgb_to_palette_index;
///
/// assert_eq!(rgb_to_palette_index(0, 0, 0), 16);
/// assert_eq!(rgb_to_palette_index(100, 100, 100), 59);
/// assert_eq!(rgb_to_palette_index(255, 255, 255), 231);
/// ```
#[allow(clippy::arithmetic_side_effects)] // coordinates are 0..=5, max 5*36+5*6+5+16 = 231
pub fn rgb_to_palette_index(r: u8, g: u8, b: u8) -> u8 {
    cube_coordinate(r) * 36 + cube_coordinate(g) * 6 + cube_coordinate(b) + CUBE_OFFSET
}

/// Memoizing wrapper around [`rgb_to_palette_index`]
///
/// Owned by whichever renderer needs it. Unbounded: a single frame rarely
/// holds more than a few thousand distinct colours.
#[derive(Debug, Default, Clone)]
pub struct ColorCube {
    cache: HashMap<[u8; 3], u8>,
}

impl ColorCube {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Palette index for an RGB triple, computing it at most once
    pub fn index(&mut self, r: u8, g: u8, b: u8) -> u8 {
        *self
            .cache
            .entry([r, g, b])
            .or_insert_with(|| rgb_to_palette_index(r, g, b))
    }

    /// Palette index for an `image` pixel
    pub fn index_of(&mut self, pixel: Rgb<u8>) -> u8 {
        let [r, g, b] = pixel.0;
        self.index(r, g, b)
    }

    /// Number of distinct colours seen so far
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether no colour has been looked up yet
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regression_anchor() {
        assert_eq!(rgb_to_palette_index(100, 100, 100), 59);
    }

    #[test]
    fn test_cube_corners() {
        assert_eq!(rgb_to_palette_index(0, 0, 0), 16);
        assert_eq!(rgb_to_palette_index(255, 0, 0), 196);
        assert_eq!(rgb_to_palette_index(0, 255, 0), 46);
        assert_eq!(rgb_to_palette_index(0, 0, 255), 21);
        assert_eq!(rgb_to_palette_index(255, 255, 255), 231);
    }

    #[test]
    fn test_levels_map_to_themselves() {
        for (i, &level) in CUBE_LEVELS.iter().enumerate() {
            assert_eq!(cube_coordinate(level) as usize, i, "level {level:#04x}");
        }
    }

    #[test]
    fn test_snap_boundaries() {
        // Midpoint between 0x00 and 0x5f is 47.5
        assert_eq!(cube_coordinate(47), 0);
        assert_eq!(cube_coordinate(48), 1);
        // Midpoint between 0x5f and 0x87 is 115 (exact): ties stay low
        assert_eq!(cube_coordinate(115), 1);
        assert_eq!(cube_coordinate(116), 2);
        assert_eq!(cube_coordinate(235), 4);
        assert_eq!(cube_coordinate(236), 5);
    }

    #[test]
    fn test_total_and_in_range() {
        for r in (0..=255u8).step_by(5) {
            for g in (0..=255u8).step_by(5) {
                for b in (0..=255u8).step_by(5) {
                    let idx = rgb_to_palette_index(r, g, b);
                    assert!((16..=231).contains(&idx));
                }
            }
        }
    }

    #[test]
    fn test_cache_is_consistent_and_memoized() {
        let mut cube = ColorCube::new();
        assert!(cube.is_empty());
        assert_eq!(cube.index(100, 100, 100), 59);
        assert_eq!(cube.index(100, 100, 100), 59);
        assert_eq!(cube.len(), 1);
        assert_eq!(cube.index_of(Rgb([255, 0, 0])), 196);
        assert_eq!(cube.len(), 2);
    }
}
