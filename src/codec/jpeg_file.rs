//! JPEG decode and encode through the `image` crate's codec.
//!
//! Alpha is dropped on encode and forced opaque on decode.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

use super::ImageError;
use crate::gfx::{pixel, Drawable, Surface, BYTES_PER_PIXEL};

pub const DEFAULT_QUALITY: u8 = 95;

pub fn decode(data: &[u8]) -> Result<Surface<'static>, ImageError> {
    let rgb = image::load_from_memory_with_format(data, image::ImageFormat::Jpeg)?.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut pixels = Vec::with_capacity(pixel::buffer_len(width, height));
    for px in rgb.pixels() {
        let [r, g, b] = px.0;
        pixels.extend_from_slice(&[b, g, r, 0xff]);
    }
    log::debug!("jpeg: {}x{}", width, height);
    Surface::from_pixels(width, height, pixels).ok_or(ImageError::InvalidDimensions(width, height))
}

pub fn encode(surface: &Surface<'_>, quality: u8) -> Result<Vec<u8>, ImageError> {
    let (width, height) = (surface.width(), surface.height());
    if width == 0 || height == 0 {
        return Err(ImageError::InvalidDimensions(width, height));
    }

    let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
    for px in surface.data().chunks_exact(BYTES_PER_PIXEL) {
        rgb.extend_from_slice(&[px[2], px[1], px[0]]);
    }

    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100)).encode(
        &rgb,
        width,
        height,
        ExtendedColorType::Rgb8,
    )?;
    Ok(out)
}
