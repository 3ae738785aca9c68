//! Packed-pixel helpers shared by every drawing backend.
//!
//! Pixels are stored as the little-endian bytes of a packed `0xAARRGGBB`
//! value, so byte 0 is blue, 1 green, 2 red and 3 alpha.

/// Fixed pixel depth of every buffer in this crate
pub const BYTES_PER_PIXEL: usize = 4;

pub const OPAQUE: u32 = 0xff00_0000;

#[inline]
pub const fn alpha_of(c: u32) -> u8 {
    (c >> 24) as u8
}

/// Force the alpha channel of a packed colour to fully opaque
#[inline]
pub const fn opaque(c: u32) -> u32 {
    c | OPAQUE
}

/// Byte length of a `width x height` buffer
#[inline]
pub const fn buffer_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * BYTES_PER_PIXEL
}

#[inline]
pub fn read_pixel(src: &[u8]) -> u32 {
    u32::from_le_bytes([src[0], src[1], src[2], src[3]])
}

#[inline]
pub fn write_pixel(dest: &mut [u8], c: u32) {
    dest[..BYTES_PER_PIXEL].copy_from_slice(&c.to_le_bytes());
}

/// Linear blend of the three colour channels toward `c` by its alpha:
/// `dest + (src - dest) * alpha / 255`. The stored alpha byte ends up opaque.
#[inline]
pub fn blend_pixel(dest: &mut [u8], c: u32) {
    let src = c.to_le_bytes();
    let alpha = i32::from(alpha_of(c));
    for i in 0..3 {
        let d = i32::from(dest[i]);
        dest[i] = (d + (i32::from(src[i]) - d) * alpha / 255) as u8;
    }
    dest[3] = 255;
}

/// Write one pixel with the standard alpha rules: transparent is skipped,
/// opaque overwrites, anything in between blends.
#[inline]
pub fn plot(dest: &mut [u8], c: u32) {
    match alpha_of(c) {
        0 => {},
        255 => write_pixel(dest, c),
        _ => blend_pixel(dest, c),
    }
}

/// Per-channel interpolation from `c1` (step 0) toward `c2` (step `steps`).
/// The result is opaque.
#[inline]
pub fn lerp_colour(c1: u32, c2: u32, step: u32, steps: u32) -> u32 {
    if steps == 0 {
        return opaque(c1);
    }
    let a = c1.to_le_bytes();
    let b = c2.to_le_bytes();
    let mut out = [0u8, 0, 0, 255];
    for i in 0..3 {
        let from = i64::from(a[i]);
        let to = i64::from(b[i]);
        out[i] = (from + (to - from) * i64::from(step) / i64::from(steps)) as u8;
    }
    u32::from_le_bytes(out)
}
