//! Surfaces: drawables that hold their own pixel buffer.

use super::blit;
use super::canvas::Canvas;
use super::drawable::{Drawable, DEFAULT_DPI};
use super::pixel::{self, BYTES_PER_PIXEL};
use crate::geometry::Rect;

/// Where a surface's pixels live
enum PixelStorage<'a> {
    /// Allocated and freed by the surface
    Owned(Vec<u8>),
    /// Caller-supplied memory the surface draws into but never frees
    Borrowed(&'a mut [u8]),
}

impl PixelStorage<'_> {
    fn as_slice(&self) -> &[u8] {
        match self {
            Self::Owned(v) => v,
            Self::Borrowed(s) => s,
        }
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        match self {
            Self::Owned(v) => v,
            Self::Borrowed(s) => s,
        }
    }
}

/// A 4-byte-per-pixel, row-major buffer with no row padding.
///
/// `Surface<'static>` owns its pixels. A surface built with
/// [`Surface::from_buffer`] borrows them for `'a`.
pub struct Surface<'a> {
    width: u32,
    height: u32,
    dpi_x: u32,
    dpi_y: u32,
    storage: PixelStorage<'a>,
}

impl Surface<'static> {
    /// Zero-filled (transparent black) surface
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_storage(width, height, PixelStorage::Owned(vec![0; pixel::buffer_len(width, height)]))
    }

    /// Take ownership of an existing pixel vector; `None` if its length is
    /// not `width * height * 4`
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != pixel::buffer_len(width, height) {
            return None;
        }
        Some(Self::with_storage(width, height, PixelStorage::Owned(pixels)))
    }

    /// Deep copy of any surface
    pub fn copy_of(src: &Surface<'_>) -> Self {
        let mut copy = Self::with_storage(src.width, src.height, PixelStorage::Owned(src.data().to_vec()));
        copy.set_dpi(src.dpi_x, src.dpi_y);
        copy
    }
}

impl<'a> Surface<'a> {
    fn with_storage(width: u32, height: u32, storage: PixelStorage<'a>) -> Self {
        Self {
            width,
            height,
            dpi_x: DEFAULT_DPI,
            dpi_y: DEFAULT_DPI,
            storage,
        }
    }

    /// Draw directly into caller-owned memory without copying it
    pub fn from_buffer(width: u32, height: u32, buffer: &'a mut [u8]) -> Option<Self> {
        if buffer.len() != pixel::buffer_len(width, height) {
            return None;
        }
        Some(Self::with_storage(width, height, PixelStorage::Borrowed(buffer)))
    }

    pub fn is_borrowed(&self) -> bool {
        matches!(self.storage, PixelStorage::Borrowed(_))
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        self.storage.as_slice()
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.storage.as_mut_slice()
    }

    #[inline]
    pub fn data_len(&self) -> usize {
        self.data().len()
    }

    /// Bytes per row
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// Byte offset of `(x, y)` in the buffer
    #[inline]
    pub fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }

    pub fn set_dpi(&mut self, dpi_x: u32, dpi_y: u32) {
        self.dpi_x = dpi_x;
        self.dpi_y = dpi_y;
    }

    pub(crate) fn canvas(&mut self) -> Canvas<'_> {
        let (w, h) = (self.width, self.height);
        Canvas::new(self.storage.as_mut_slice(), w, h)
    }

    /// Change size, keeping the overlapping top-left region.
    /// Newly exposed pixels are transparent black. A borrowed buffer is
    /// released and replaced by an owned one.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        let mut resized = vec![0; pixel::buffer_len(width, height)];
        let keep = Rect::sized(self.width.min(width), self.height.min(height));
        if keep.is_valid() {
            blit::blit_into(
                &mut resized,
                width,
                height,
                0,
                0,
                self.data(),
                self.width,
                self.height,
                keep,
                false,
            );
        }
        self.storage = PixelStorage::Owned(resized);
        self.width = width;
        self.height = height;
        true
    }

    /// Rotate by 90 or 270 degrees, swapping width and height.
    ///
    /// Source pixel `(x, y)` lands at `(y, x)` for 90 and at
    /// `(y, width - 1 - x)` for 270. Any other angle except 0 is logged and
    /// leaves the surface unchanged.
    pub fn rotate(&mut self, angle: i32) -> bool {
        match angle {
            0 => return true,
            90 | 270 => {},
            _ => {
                log::error!("rotate: angle {} not supported", angle);
                return false;
            },
        }

        let (w, h) = (self.width as usize, self.height as usize);
        let mut rotated = vec![0u8; self.data_len()];
        let src = self.data();
        for y in 0..h {
            for x in 0..w {
                let (nx, ny) = if angle == 90 { (y, x) } else { (y, w - 1 - x) };
                let s = (y * w + x) * BYTES_PER_PIXEL;
                // Rotated rows are `h` pixels wide
                let d = (ny * h + nx) * BYTES_PER_PIXEL;
                rotated[d..d + BYTES_PER_PIXEL].copy_from_slice(&src[s..s + BYTES_PER_PIXEL]);
            }
        }

        match &mut self.storage {
            PixelStorage::Owned(v) => *v = rotated,
            PixelStorage::Borrowed(s) => s.copy_from_slice(&rotated),
        }
        self.width = h as u32;
        self.height = w as u32;
        true
    }

    /// Box-filter resample by `factor`.
    ///
    /// Each output pixel averages a `round(src/dst)` block per axis. With
    /// `fp` set the averaged colour channels keep only their top two bits.
    /// Returns `None` when the factor would produce an empty surface.
    pub fn scale(&self, factor: f32, fp: bool) -> Option<Surface<'static>> {
        if !factor.is_finite() || factor <= 0.0 {
            log::error!("scale: invalid factor {}", factor);
            return None;
        }
        let width = (self.width as f32 * factor) as u32;
        let height = (self.height as f32 * factor) as u32;
        if width == 0 || height == 0 {
            log::error!(
                "scale: factor {} reduces {}x{} to nothing",
                factor,
                self.width,
                self.height
            );
            return None;
        }

        let step_x = self.width as f32 / width as f32;
        let step_y = self.height as f32 / height as f32;
        let block_w = (step_x.round() as usize).max(1);
        let block_h = (step_y.round() as usize).max(1);
        let block_count = (block_w * block_h) as u32;
        let (src_w, src_h) = (self.width as usize, self.height as usize);
        let src = self.data();

        let mut scaled = Surface::new(width, height);
        scaled.set_dpi(self.dpi_x, self.dpi_y);
        let dest = scaled.data_mut();

        for y in 0..height as usize {
            let block_y = (y as f32 * step_y).floor() as usize;
            for x in 0..width as usize {
                let block_x = (x as f32 * step_x).floor() as usize;
                let mut totals = [0u32; BYTES_PER_PIXEL];
                for by in 0..block_h {
                    let sy = (block_y + by).min(src_h - 1);
                    for bx in 0..block_w {
                        let sx = (block_x + bx).min(src_w - 1);
                        let s = (sy * src_w + sx) * BYTES_PER_PIXEL;
                        for (total, &byte) in totals.iter_mut().zip(&src[s..s + BYTES_PER_PIXEL]) {
                            *total += u32::from(byte);
                        }
                    }
                }

                let d = (y * width as usize + x) * BYTES_PER_PIXEL;
                for (i, total) in totals.iter().enumerate() {
                    let mut avg = (total / block_count) as u8;
                    if fp && i < 3 {
                        avg &= 0xc0;
                    }
                    dest[d + i] = avg;
                }
            }
        }

        Some(scaled)
    }

    /// Scale by whichever factor makes the surface fit inside `width x height`
    pub fn scale_to_fit(&self, width: u32, height: u32, fp: bool) -> Option<Surface<'static>> {
        let zx = width as f32 / self.width as f32;
        let zy = height as f32 / self.height as f32;
        self.scale(zx.min(zy), fp)
    }

    /// Overwrite every pixel's alpha with `round(255 * factor)`
    pub fn set_alpha(&mut self, factor: f32) {
        let alpha = (255.0 * factor.clamp(0.0, 1.0)).round() as u8;
        for px in self.data_mut().chunks_exact_mut(BYTES_PER_PIXEL) {
            px[3] = alpha;
        }
    }

    /// Exchange buffers with another surface of the same byte length
    pub fn swap_data(&mut self, other: &mut Surface<'a>) -> bool {
        if self.data_len() != other.data_len() {
            return false;
        }
        std::mem::swap(&mut self.storage, &mut other.storage);
        true
    }
}

impl Drawable for Surface<'_> {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn dpi(&self) -> (u32, u32) {
        (self.dpi_x, self.dpi_y)
    }

    fn root(&self) -> &dyn Drawable {
        self
    }

    fn drawing_buffer(&self) -> &[u8] {
        self.data()
    }

    fn draw_pixel(&mut self, x: i32, y: i32, c: u32) -> bool {
        self.canvas().draw_pixel(x, y, c)
    }

    fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        if Rect::sized(self.width, self.height).contains(x, y) {
            let i = self.offset(x as u32, y as u32);
            Some(pixel::read_pixel(&self.data()[i..i + BYTES_PER_PIXEL]))
        } else {
            None
        }
    }

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, c: u32) -> bool {
        self.canvas().draw_line(x1, y1, x2, y2, c)
    }

    fn draw_rect_filled(&mut self, x: i32, y: i32, w: u32, h: u32, c: u32) -> bool {
        self.canvas().draw_rect_filled(x, y, w, h, c)
    }

    fn blit_view(
        &mut self,
        x: i32,
        y: i32,
        src: &[u8],
        src_w: u32,
        src_h: u32,
        view: Rect,
        force_alpha: bool,
    ) -> bool {
        let (w, h) = (self.width, self.height);
        blit::blit_into(self.data_mut(), w, h, x, y, src, src_w, src_h, view, force_alpha)
    }
}
