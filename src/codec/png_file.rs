//! PNG decode and encode.

use png::{BitDepth, ColorType, Transformations};

use super::ImageError;
use crate::gfx::{pixel, Drawable, Surface, BYTES_PER_PIXEL};

/// Decode any PNG colour type to an 8-bit surface.
/// Sources without an alpha channel come out opaque.
pub fn decode(data: &[u8]) -> Result<Surface<'static>, ImageError> {
    let mut decoder = png::Decoder::new(data);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    let (width, height) = (info.width, info.height);

    let (colour, depth) = reader.output_color_type();
    if depth != BitDepth::Eight {
        return Err(ImageError::UnsupportedDepth(depth as u8));
    }
    let channels = colour.samples();
    let mut pixels = Vec::with_capacity(pixel::buffer_len(width, height));

    for row in buf[..info.buffer_size()].chunks_exact(info.line_size) {
        for px in row[..width as usize * channels].chunks_exact(channels) {
            let bgra = match colour {
                ColorType::Rgba => [px[2], px[1], px[0], px[3]],
                ColorType::Rgb => [px[2], px[1], px[0], 0xff],
                ColorType::GrayscaleAlpha => [px[0], px[0], px[0], px[1]],
                ColorType::Grayscale => [px[0], px[0], px[0], 0xff],
                // EXPAND turns palettes into RGB(A)
                ColorType::Indexed => return Err(ImageError::UnsupportedImageType(colour as u8)),
            };
            pixels.extend_from_slice(&bgra);
        }
    }

    log::debug!("png: {}x{} {:?}", width, height, colour);
    Surface::from_pixels(width, height, pixels).ok_or(ImageError::InvalidDimensions(width, height))
}

/// Encode as 8-bit RGBA, keeping the alpha channel
pub fn encode(surface: &Surface<'_>) -> Result<Vec<u8>, ImageError> {
    let (width, height) = (surface.width(), surface.height());
    if width == 0 || height == 0 {
        return Err(ImageError::InvalidDimensions(width, height));
    }

    let mut rgba = Vec::with_capacity(surface.data_len());
    for px in surface.data().chunks_exact(BYTES_PER_PIXEL) {
        rgba.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
    }

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(ColorType::Rgba);
        encoder.set_depth(BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&rgba)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_raw(width: u32, height: u32, colour: ColorType, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(colour);
            encoder.set_depth(BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        out
    }

    #[test]
    fn test_round_trip_keeps_alpha() {
        let mut s = Surface::new(3, 2);
        s.draw_pixel(0, 0, 0xffff0000);
        s.data_mut()[4..8].copy_from_slice(&0x40112233u32.to_le_bytes());
        let back = decode(&encode(&s).unwrap()).unwrap();
        assert_eq!(back.data(), s.data());
    }

    #[test]
    fn test_rgb_source_is_opaque() {
        let png = encode_raw(2, 1, ColorType::Rgb, &[1, 2, 3, 4, 5, 6]);
        let s = decode(&png).unwrap();
        assert_eq!(s.get_pixel(0, 0), Some(0xff010203));
        assert_eq!(s.get_pixel(1, 0), Some(0xff040506));
    }

    #[test]
    fn test_grayscale_source() {
        let png = encode_raw(2, 1, ColorType::Grayscale, &[0x10, 0xf0]);
        let s = decode(&png).unwrap();
        assert_eq!(s.get_pixel(0, 0), Some(0xff101010));
        assert_eq!(s.get_pixel(1, 0), Some(0xfff0f0f0));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(decode(b"\x89PNG but not really"), Err(ImageError::Png(_))));
    }
}
