//! Image file decode/encode for [`Surface`].
//!
//! The `decode_*`/`encode_*` functions return [`ImageError`]. The
//! `Surface::load_*` and `Surface::save_*` entry points log failures and
//! report them as `None`/`false`.

pub mod jpeg_file;
pub mod png_file;
pub mod tga;

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::gfx::Surface;

pub use jpeg_file::DEFAULT_QUALITY;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image data ends early")]
    Truncated,
    #[error("colour-mapped images are not supported (map type {0})")]
    UnsupportedColourMap(u8),
    #[error("image type {0} is not supported")]
    UnsupportedImageType(u8),
    #[error("{0} bits per pixel is not supported")]
    UnsupportedDepth(u8),
    #[error("invalid image dimensions {0}x{1}")]
    InvalidDimensions(u32, u32),
    #[error("unrecognised image file extension: {0}")]
    UnknownFormat(String),
    #[error("png decode: {0}")]
    Png(#[from] png::DecodingError),
    #[error("png encode: {0}")]
    PngEncode(#[from] png::EncodingError),
    #[error("jpeg: {0}")]
    Jpeg(#[from] image::ImageError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Tga,
    Jpeg,
    Png,
}

impl ImageFormat {
    /// Pick a format from the file extension, case-insensitively
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "tga" => Ok(Self::Tga),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            _ => Err(ImageError::UnknownFormat(path.display().to_string())),
        }
    }
}

pub fn decode(data: &[u8], format: ImageFormat) -> Result<Surface<'static>, ImageError> {
    match format {
        ImageFormat::Tga => tga::decode(data),
        ImageFormat::Jpeg => jpeg_file::decode(data),
        ImageFormat::Png => png_file::decode(data),
    }
}

/// Read and decode a file, choosing the decoder from its extension
pub fn decode_file(path: impl AsRef<Path>) -> Result<Surface<'static>, ImageError> {
    let path = path.as_ref();
    let format = ImageFormat::from_path(path)?;
    decode(&fs::read(path)?, format)
}

/// Encode as JPEG or PNG; TGA is read-only
pub fn encode(surface: &Surface<'_>, format: ImageFormat, jpeg_quality: u8) -> Result<Vec<u8>, ImageError> {
    match format {
        ImageFormat::Jpeg => jpeg_file::encode(surface, jpeg_quality),
        ImageFormat::Png => png_file::encode(surface),
        ImageFormat::Tga => Err(ImageError::UnknownFormat("tga output".to_string())),
    }
}

pub fn encode_file(surface: &Surface<'_>, path: impl AsRef<Path>, jpeg_quality: u8) -> Result<(), ImageError> {
    let path = path.as_ref();
    let bytes = encode(surface, ImageFormat::from_path(path)?, jpeg_quality)?;
    fs::write(path, bytes)?;
    Ok(())
}

fn logged<T>(what: &str, path: &Path, result: Result<T, ImageError>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            log::error!("{}: {}: {}", what, path.display(), e);
            None
        },
    }
}

fn load_as(what: &str, path: &Path, format: ImageFormat) -> Option<Surface<'static>> {
    let result = fs::read(path).map_err(ImageError::from).and_then(|data| decode(&data, format));
    logged(what, path, result)
}

impl Surface<'static> {
    /// Load any supported image, dispatching on the file extension
    pub fn load_image(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        logged("load_image", path, decode_file(path))
    }

    pub fn load_tga(path: impl AsRef<Path>) -> Option<Self> {
        load_as("load_tga", path.as_ref(), ImageFormat::Tga)
    }

    pub fn load_jpeg(path: impl AsRef<Path>) -> Option<Self> {
        load_as("load_jpeg", path.as_ref(), ImageFormat::Jpeg)
    }

    /// Decode a JPEG already in memory
    pub fn load_jpeg_bytes(data: &[u8]) -> Option<Self> {
        match jpeg_file::decode(data) {
            Ok(s) => Some(s),
            Err(e) => {
                log::error!("load_jpeg: {}", e);
                None
            },
        }
    }

    pub fn load_png(path: impl AsRef<Path>) -> Option<Self> {
        load_as("load_png", path.as_ref(), ImageFormat::Png)
    }
}

impl Surface<'_> {
    pub fn encode_jpeg(&self, quality: u8) -> Result<Vec<u8>, ImageError> {
        jpeg_file::encode(self, quality)
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, ImageError> {
        png_file::encode(self)
    }

    /// Write a JPEG at the default quality of 95
    pub fn save_jpeg(&self, path: impl AsRef<Path>) -> bool {
        self.save_jpeg_with_quality(path, DEFAULT_QUALITY)
    }

    pub fn save_jpeg_with_quality(&self, path: impl AsRef<Path>, quality: u8) -> bool {
        let path = path.as_ref();
        let result = self.encode_jpeg(quality).and_then(|b| fs::write(path, b).map_err(ImageError::from));
        logged("save_jpeg", path, result).is_some()
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let result = self.encode_png().and_then(|b| fs::write(path, b).map_err(ImageError::from));
        logged("save_png", path, result).is_some()
    }

    /// Encode by extension (.jpg/.jpeg/.png)
    pub fn save_image(&self, path: impl AsRef<Path>, jpeg_quality: u8) -> bool {
        let path = path.as_ref();
        logged("save_image", path, encode_file(self, path, jpeg_quality)).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::Drawable;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("rasterkit-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ImageFormat::from_path("a/b.TGA").unwrap(), ImageFormat::Tga);
        assert_eq!(ImageFormat::from_path("x.jpeg").unwrap(), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_path("x.JPG").unwrap(), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_path("x.png").unwrap(), ImageFormat::Png);
        assert!(matches!(ImageFormat::from_path("x.bmp"), Err(ImageError::UnknownFormat(_))));
        assert!(ImageFormat::from_path("noext").is_err());
    }

    #[test]
    fn test_png_file_round_trip() {
        let path = temp_path("round.png");
        let mut s = Surface::new(4, 3);
        s.draw_rect_filled(1, 1, 2, 1, 0xff336699);
        assert!(s.save_png(&path));

        let back = Surface::load_image(&path).unwrap();
        assert_eq!(back.data(), s.data());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_jpeg_file_and_bytes() {
        let path = temp_path("card.jpg");
        let mut s = Surface::new(8, 8);
        s.clear(0xff000000);
        assert!(s.save_image(&path, 90));

        let back = Surface::load_jpeg(&path).unwrap();
        assert_eq!((back.width(), back.height()), (8, 8));
        let bytes = fs::read(&path).unwrap();
        assert!(Surface::load_jpeg_bytes(&bytes).is_some());
        assert!(Surface::load_jpeg_bytes(&bytes[..10]).is_none());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_tga_from_disk() {
        let path = temp_path("pixel.tga");
        let mut file = vec![0u8; 18];
        file[2] = 2;
        file[12] = 1;
        file[14] = 1;
        file[16] = 24;
        file.extend_from_slice(&[0x01, 0x02, 0x03]);
        fs::write(&path, &file).unwrap();

        let s = Surface::load_tga(&path).unwrap();
        assert_eq!(s.get_pixel(0, 0), Some(0xff030201));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_and_unsupported() {
        assert!(Surface::load_image(temp_path("missing.png")).is_none());
        assert!(Surface::load_tga(temp_path("missing.tga")).is_none());
        assert!(Surface::load_image("picture.gif").is_none());
        assert!(!Surface::new(2, 2).save_image(temp_path("out.tga"), 90));
        assert!(matches!(decode_file(temp_path("missing.png")), Err(ImageError::Io(_))));
    }
}
