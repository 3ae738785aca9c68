//! Base raster algorithms over a borrowed pixel buffer.
//!
//! A [`Canvas`] owns no memory: surfaces hand it their buffer for the
//! duration of a call. Everything here is clipped to the buffer bounds.

use super::pixel::{self, alpha_of, opaque, BYTES_PER_PIXEL};
use crate::geometry::Rect;

/// Walk the line from `(x0, y0)` to `(x1, y1)` inclusive, visiting only the
/// steps that fall inside `clip`.
///
/// The line steps once per column (or row, when steeper) and rounds the minor
/// coordinate to the nearest pixel. The walk starts at the first major-axis
/// step inside `clip`, so its cost is bounded by the clip size however far
/// off the endpoints lie.
pub(crate) fn walk_line(x0: i32, y0: i32, x1: i32, y1: i32, clip: Rect, mut visit: impl FnMut(i32, i32)) {
    if !clip.is_valid() {
        return;
    }
    let (x0, y0, x1, y1) = (i64::from(x0), i64::from(y0), i64::from(x1), i64::from(y1));
    let (left, right) = (i64::from(clip.x), i64::from(clip.right()) - 1);
    let (top, bottom) = (i64::from(clip.y), i64::from(clip.bottom()) - 1);

    if (x1 - x0).abs() >= (y1 - y0).abs() {
        walk_major(x0, y0, x1, y1, (left, right), |x, y| {
            if (top..=bottom).contains(&y) {
                visit(x as i32, y as i32);
            }
        });
    } else {
        walk_major(y0, x0, y1, x1, (top, bottom), |y, x| {
            if (left..=right).contains(&x) {
                visit(x as i32, y as i32);
            }
        });
    }
}

/// One line walk along its major axis `a`, restricted to `a` within `range`
fn walk_major(a0: i64, b0: i64, a1: i64, b1: i64, range: (i64, i64), mut visit: impl FnMut(i64, i64)) {
    let da = (a1 - a0).abs();
    let db = (b1 - b0).abs();
    let (sa, sb) = ((a1 - a0).signum(), (b1 - b0).signum());

    // Steps `t` along the major axis whose coordinate lies in range
    let (first, last) = if sa >= 0 {
        (range.0 - a0, range.1 - a0)
    } else {
        (a0 - range.1, a0 - range.0)
    };
    let (first, last) = (first.max(0), last.min(da));

    for t in first..=last {
        let b = if da == 0 {
            b0
        } else {
            let num = 2 * i128::from(t) * i128::from(db) + i128::from(da);
            b0 + sb * (num / (2 * i128::from(da))) as i64
        };
        visit(a0 + sa * t, b);
    }
}

/// Largest `q` with `q * q <= v`
pub(crate) fn isqrt(v: i64) -> i64 {
    if v <= 0 {
        return 0;
    }
    let mut q = (v as f64).sqrt() as i64;
    while q * q > v {
        q -= 1;
    }
    while (q + 1) * (q + 1) <= v {
        q += 1;
    }
    q
}

/// Midpoint circle walk: calls `visit(dx, dy)` for every first-octant step,
/// with `dx >= dy >= 0`.
pub(crate) fn walk_circle(radius: i32, mut visit: impl FnMut(i32, i32)) {
    let mut x = i64::from(radius);
    let mut y = 0i64;
    let mut err = 1 - x;

    while x >= y {
        visit(x as i32, y as i32);
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

/// Columns to skip at the start of row `edge` (counted from the nearest
/// top or bottom edge) of a shape with corner radius `r`.
///
/// A pixel `dx` columns into the corner block is kept when it lies strictly
/// inside the quarter circle centred `r` pixels in from the corner.
pub(crate) fn corner_inset(r: i32, edge: i32) -> i32 {
    let r = i64::from(r);
    let t = r - i64::from(edge);
    let s = r * r - t * t;
    if s <= 0 {
        r as i32
    } else {
        (r - isqrt(s - 1)) as i32
    }
}

pub struct Canvas<'a> {
    pixels: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> Canvas<'a> {
    pub fn new(pixels: &'a mut [u8], width: u32, height: u32) -> Self {
        debug_assert_eq!(pixels.len(), pixel::buffer_len(width, height));
        Self {
            pixels,
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::sized(self.width, self.height)
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Byte offset of pixel `(x, y)`; caller guarantees bounds
    #[inline]
    fn pixel_index(&self, x: i32, y: i32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }

    /// Write one pixel with alpha blending.
    ///
    /// Zero alpha is a successful no-op. Coordinates off the buffer return false.
    pub fn draw_pixel(&mut self, x: i32, y: i32, c: u32) -> bool {
        if alpha_of(c) == 0 {
            return true;
        }
        if !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.pixel_index(x, y);
        pixel::plot(&mut self.pixels[idx..idx + BYTES_PER_PIXEL], c);
        true
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x, y);
            Some(pixel::read_pixel(&self.pixels[idx..idx + BYTES_PER_PIXEL]))
        } else {
            None
        }
    }

    /// Horizontal span from `x1` to `x2` inclusive
    fn hline(&mut self, x1: i32, x2: i32, y: i32, c: u32) -> bool {
        if y < 0 || y >= self.height as i32 {
            return false;
        }
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let start = x1.max(0);
        let end = x2.min(self.width as i32 - 1);
        if start > end {
            return false;
        }

        let from = self.pixel_index(start, y);
        let to = self.pixel_index(end, y) + BYTES_PER_PIXEL;
        for px in self.pixels[from..to].chunks_exact_mut(BYTES_PER_PIXEL) {
            pixel::plot(px, c);
        }
        true
    }

    /// Vertical span from `y1` to `y2` inclusive
    fn vline(&mut self, x: i32, y1: i32, y2: i32, c: u32) -> bool {
        if x < 0 || x >= self.width as i32 {
            return false;
        }
        let (y1, y2) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        let start = y1.max(0);
        let end = y2.min(self.height as i32 - 1);
        if start > end {
            return false;
        }

        let stride = self.width as usize * BYTES_PER_PIXEL;
        let mut idx = self.pixel_index(x, start);
        for _ in start..=end {
            pixel::plot(&mut self.pixels[idx..idx + BYTES_PER_PIXEL], c);
            idx += stride;
        }
        true
    }

    /// Line between two inclusive endpoints.
    ///
    /// Axis-aligned lines take a span fast path; everything else walks only
    /// the steps that land on the buffer, so a partly visible line still draws
    /// its visible part. Returns true when any pixel landed.
    pub fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, c: u32) -> bool {
        if alpha_of(c) == 0 {
            return true;
        }
        if x1 == x2 && y1 == y2 {
            return self.draw_pixel(x1, y1, c);
        }
        if y1 == y2 {
            return self.hline(x1, x2, y1, c);
        }
        if x1 == x2 {
            return self.vline(x1, y1, y2, c);
        }

        let bounds = self.bounds();
        let w = self.width as usize;
        let pixels = &mut *self.pixels;
        let mut drawn = false;
        walk_line(x1, y1, x2, y2, bounds, |x, y| {
            let idx = (y as usize * w + x as usize) * BYTES_PER_PIXEL;
            pixel::plot(&mut pixels[idx..idx + BYTES_PER_PIXEL], c);
            drawn = true;
        });
        drawn
    }

    /// Opaque rectangle fill, clipped to the buffer.
    /// Returns false without touching the buffer when nothing survives the clip.
    pub fn draw_rect_filled(&mut self, x: i32, y: i32, w: u32, h: u32, c: u32) -> bool {
        let mut rect = Rect::with_size(x, y, w, h);
        if !rect.clip(&self.bounds()) {
            return false;
        }

        let bytes = opaque(c).to_le_bytes();
        let stride = self.width as usize * BYTES_PER_PIXEL;
        let row_bytes = rect.w as usize * BYTES_PER_PIXEL;
        let mut start = self.pixel_index(rect.x, rect.y);
        for _ in 0..rect.h {
            for px in self.pixels[start..start + row_bytes].chunks_exact_mut(BYTES_PER_PIXEL) {
                px.copy_from_slice(&bytes);
            }
            start += stride;
        }
        true
    }
}
