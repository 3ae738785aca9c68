//! Truevision TGA reader.
//!
//! Only 24-bit truecolour images are accepted, either uncompressed (type 2)
//! or run-length encoded (type 10). Rows are stored bottom-up in the file.

use super::ImageError;
use crate::gfx::{pixel, Surface, BYTES_PER_PIXEL};

const HEADER_LEN: usize = 18;
const TYPE_TRUECOLOUR: u8 = 2;
const TYPE_TRUECOLOUR_RLE: u8 = 10;
const FILE_BYTES_PER_PIXEL: usize = 3;
const MAX_PACKET_PIXELS: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TgaHeader {
    pub id_len: u8,
    pub colour_map_type: u8,
    pub image_type: u8,
    pub width: u16,
    pub height: u16,
    pub bits_per_pixel: u8,
    pub descriptor: u8,
}

impl TgaHeader {
    pub fn parse(data: &[u8]) -> Result<Self, ImageError> {
        if data.len() < HEADER_LEN {
            return Err(ImageError::Truncated);
        }
        Ok(Self {
            id_len: data[0],
            colour_map_type: data[1],
            image_type: data[2],
            // 3..8 colour map fields, 8..12 origin
            width: u16::from_le_bytes([data[12], data[13]]),
            height: u16::from_le_bytes([data[14], data[15]]),
            bits_per_pixel: data[16],
            descriptor: data[17],
        })
    }

    pub fn is_rle(&self) -> bool {
        self.image_type == TYPE_TRUECOLOUR_RLE
    }

    fn validate(&self) -> Result<(), ImageError> {
        if self.colour_map_type != 0 {
            return Err(ImageError::UnsupportedColourMap(self.colour_map_type));
        }
        if self.image_type != TYPE_TRUECOLOUR && self.image_type != TYPE_TRUECOLOUR_RLE {
            return Err(ImageError::UnsupportedImageType(self.image_type));
        }
        if self.bits_per_pixel != 24 {
            return Err(ImageError::UnsupportedDepth(self.bits_per_pixel));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ImageError::InvalidDimensions(u32::from(self.width), u32::from(self.height)));
        }
        Ok(())
    }
}

/// Decode a TGA file held in memory into an opaque surface
pub fn decode(data: &[u8]) -> Result<Surface<'static>, ImageError> {
    let header = TgaHeader::parse(data)?;
    header.validate()?;

    let body = data
        .get(HEADER_LEN + usize::from(header.id_len)..)
        .ok_or(ImageError::Truncated)?;
    let (width, height) = (u32::from(header.width), u32::from(header.height));
    let count = width as usize * height as usize;

    let bgr = if header.is_rle() {
        unpack_rle(body, count)?
    } else {
        let len = count * FILE_BYTES_PER_PIXEL;
        body.get(..len).ok_or(ImageError::Truncated)?.to_vec()
    };

    let stride = width as usize * BYTES_PER_PIXEL;
    let file_stride = width as usize * FILE_BYTES_PER_PIXEL;
    let mut pixels = vec![0u8; pixel::buffer_len(width, height)];
    for (file_row, src) in bgr.chunks_exact(file_stride).enumerate() {
        let row = height as usize - 1 - file_row;
        let dest = &mut pixels[row * stride..(row + 1) * stride];
        for (d, s) in dest.chunks_exact_mut(BYTES_PER_PIXEL).zip(src.chunks_exact(FILE_BYTES_PER_PIXEL)) {
            d.copy_from_slice(&[s[0], s[1], s[2], 0xff]);
        }
    }

    log::debug!(
        "tga: {}x{} {}",
        width,
        height,
        if header.is_rle() { "rle" } else { "raw" }
    );
    Surface::from_pixels(width, height, pixels).ok_or(ImageError::InvalidDimensions(width, height))
}

/// Expand RLE packets into `count` raw 3-byte pixels.
/// Packets may run across row boundaries; a run past the end is cut short.
fn unpack_rle(mut data: &[u8], count: usize) -> Result<Vec<u8>, ImageError> {
    // Each packet byte yields at most 128 pixels
    let reachable = data.len().saturating_mul(MAX_PACKET_PIXELS);
    let mut out = Vec::with_capacity(count.min(reachable) * FILE_BYTES_PER_PIXEL);
    let mut remaining = count;

    while remaining > 0 {
        let (&packet, rest) = data.split_first().ok_or(ImageError::Truncated)?;
        data = rest;
        let n = (usize::from(packet & 0x7f) + 1).min(remaining);

        if packet & 0x80 != 0 {
            let px = data.get(..FILE_BYTES_PER_PIXEL).ok_or(ImageError::Truncated)?;
            for _ in 0..n {
                out.extend_from_slice(px);
            }
            data = &data[FILE_BYTES_PER_PIXEL..];
        } else {
            let len = n * FILE_BYTES_PER_PIXEL;
            out.extend_from_slice(data.get(..len).ok_or(ImageError::Truncated)?);
            data = &data[len..];
        }
        remaining -= n;
    }
    Ok(out)
}
