//! Text to seven-segment code mapping
//!
//! Codes use the MAX7219 "no-decode" bit order: `0x40` is segment A (top),
//! then B, C, D, E, F clockwise, `0x01` is G (middle) and `0x80` the decimal
//! point. Letters that a seven-segment digit cannot show (K, M, W, X) are
//! absent and map to the `notfound` character.

use image::{Rgb, RgbImage};

const DP: u8 = crate::glyphs::segment::DP;

/// Segment code for one character, if it can be displayed
pub fn code_for(ch: char) -> Option<u8> {
    let code = match ch {
        ' ' => 0x00,
        '-' => 0x01,
        '_' => 0x08,
        '\'' => 0x02,
        '0' => 0x7e,
        '1' => 0x30,
        '2' => 0x6d,
        '3' => 0x79,
        '4' => 0x33,
        '5' => 0x5b,
        '6' => 0x5f,
        '7' => 0x70,
        '8' => 0x7f,
        '9' => 0x7b,
        'a' => 0x7d,
        'b' => 0x1f,
        'c' => 0x0d,
        'd' => 0x3d,
        'e' => 0x6f,
        'f' => 0x47,
        'g' => 0x7b,
        'h' => 0x17,
        'i' => 0x10,
        'j' => 0x18,
        'l' => 0x06,
        'n' => 0x15,
        'o' => 0x1d,
        'p' => 0x67,
        'q' => 0x73,
        'r' => 0x05,
        's' => 0x5b,
        't' => 0x0f,
        'u' | 'v' => 0x1c,
        'y' => 0x3b,
        'z' => 0x6d,
        'A' => 0x77,
        'B' => 0x7f,
        'C' => 0x4e,
        'D' | 'O' => 0x7e,
        'E' => 0x4f,
        'F' => 0x47,
        'G' => 0x5e,
        'H' => 0x37,
        'I' => 0x30,
        'J' => 0x38,
        'L' => 0x0e,
        'N' => 0x76,
        'P' => 0x67,
        'Q' => 0x73,
        'R' => 0x46,
        'S' => 0x5b,
        'T' => 0x0f,
        'U' | 'V' => 0x3e,
        'Y' => 0x3b,
        'Z' => 0x6d,
        ',' | '.' => DP,
        '!' => 0xb0,
        '?' => 0xe5,
        _ => return None,
    };
    Some(code)
}

/// One code per character
///
/// Characters without a glyph are replaced by `notfound`'s code, or skipped
/// when `notfound` is `None` (or itself has no glyph).
pub fn regular(text: &str, notfound: Option<char>) -> impl Iterator<Item = u8> + '_ {
    let undefined = notfound.and_then(code_for);
    text.chars().filter_map(move |ch| code_for(ch).or(undefined))
}

/// Like [`regular`], but a `.` or `,` lights the decimal point of the
/// preceding character instead of taking a digit of its own
///
/// ```
/// use display_emulator::segment_mapper::dot_muncher;
///
/// let codes: Vec<u8> = dot_muncher("3.14", Some('_')).collect();
/// assert_eq!(codes, vec![0x79 | 0x80, 0x30, 0x33]);
/// ```
pub fn dot_muncher(text: &str, notfound: Option<char>) -> impl Iterator<Item = u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut pending: Option<u8> = None;

    for code in regular(text, notfound) {
        if code == DP {
            // A leading or doubled dot gets a digit of its own
            out.push(pending.take().map_or(DP, |prev| prev | DP));
        } else if let Some(prev) = pending.replace(code) {
            out.push(prev);
        }
    }
    out.extend(pending);
    out.into_iter()
}

/// Build a surface that drives the seven-segment transform
///
/// One column per code, 8 rows: row `k` (0-6) is lit when bit `0x40 >> k`
/// is set (A..G), row 7 holds the decimal point. Columns are stored right to
/// left so the rendered digits read in text order.
#[allow(clippy::arithmetic_side_effects)] // x < codes.len(), k < 7
pub fn segment_surface(codes: &[u8], lit: Rgb<u8>) -> RgbImage {
    let width = u32::try_from(codes.len()).unwrap_or(u32::MAX);
    let mut surface = RgbImage::new(width, 8);
    for (i, &code) in codes.iter().enumerate() {
        let x = width - 1 - i as u32;
        for k in 0..7u32 {
            if code & (0x40 >> k) != 0 {
                surface.put_pixel(x, k, lit);
            }
        }
        if code & DP != 0 {
            surface.put_pixel(x, 7, lit);
        }
    }
    surface
}
