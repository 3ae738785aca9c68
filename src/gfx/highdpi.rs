//! Supersampled surfaces for high-density displays.
//!
//! A [`HighDPISurface`] is addressed in logical pixels but stores a buffer at
//! twice the linear resolution, so each logical pixel is a 2x2 block of
//! physical pixels. [`HighDPISurface::draw_sub_pixel`] skips the doubling
//! for coverage writes at physical resolution.

use super::blit::clip_blit;
use super::drawable::{Drawable, DEFAULT_DPI};
use super::pixel::{self, alpha_of, BYTES_PER_PIXEL};
use super::surface::Surface;
use crate::geometry::Rect;

/// Physical pixels per logical pixel along each axis
pub const HIGH_DPI_RATIO: i32 = 2;

pub struct HighDPISurface {
    surface: Surface<'static>,
    width: u32,
    height: u32,
}

/// Logical to physical coordinate, saturating at the `i32` range
#[inline]
const fn phys(v: i32) -> i32 {
    v.saturating_mul(HIGH_DPI_RATIO)
}

#[inline]
const fn phys_len(v: u32) -> u32 {
    v.saturating_mul(HIGH_DPI_RATIO as u32)
}

impl HighDPISurface {
    pub fn new(width: u32, height: u32) -> Self {
        let ratio = HIGH_DPI_RATIO as u32;
        let mut surface = Surface::new(width * ratio, height * ratio);
        surface.set_dpi(DEFAULT_DPI * ratio, DEFAULT_DPI * ratio);
        Self {
            surface,
            width,
            height,
        }
    }

    /// The physical buffer
    pub fn surface(&self) -> &Surface<'static> {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface<'static> {
        &mut self.surface
    }

    pub fn into_surface(self) -> Surface<'static> {
        self.surface
    }

    /// Write one physical pixel, in physical coordinates
    pub fn draw_sub_pixel(&mut self, x: i32, y: i32, c: u32) -> bool {
        self.surface.draw_pixel(x, y, c)
    }
}

impl Drawable for HighDPISurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn dpi(&self) -> (u32, u32) {
        self.surface.dpi()
    }

    fn is_high_dpi(&self) -> bool {
        true
    }

    fn root(&self) -> &dyn Drawable {
        self
    }

    fn drawing_buffer(&self) -> &[u8] {
        self.surface.data()
    }

    fn draw_pixel(&mut self, x: i32, y: i32, c: u32) -> bool {
        if alpha_of(c) == 0 {
            return true;
        }
        if !self.bounds().contains(x, y) {
            return false;
        }
        let (px, py) = (phys(x), phys(y));
        for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            self.surface.draw_pixel(px + dx, py + dy, c);
        }
        true
    }

    fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        if !self.bounds().contains(x, y) {
            return None;
        }
        self.surface.get_pixel(phys(x), phys(y))
    }

    /// Axis-aligned lines become two physical lines, one pixel longer at the
    /// far end; any other line is drawn four times at the 2x2 offsets
    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, c: u32) -> bool {
        if alpha_of(c) == 0 {
            return true;
        }
        let s = &mut self.surface;
        if x1 == x2 {
            let (top, bottom) = (phys(y1.min(y2)), phys(y1.max(y2)).saturating_add(1));
            let x = phys(x1);
            let drawn = s.draw_line(x, top, x, bottom, c);
            return s.draw_line(x.saturating_add(1), top, x.saturating_add(1), bottom, c) | drawn;
        }
        if y1 == y2 {
            let (left, right) = (phys(x1.min(x2)), phys(x1.max(x2)).saturating_add(1));
            let y = phys(y1);
            let drawn = s.draw_line(left, y, right, y, c);
            return s.draw_line(left, y.saturating_add(1), right, y.saturating_add(1), c) | drawn;
        }

        let (x1, y1, x2, y2) = (phys(x1), phys(y1), phys(x2), phys(y2));
        let mut drawn = false;
        for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            let (ax, ay) = (x1.saturating_add(dx), y1.saturating_add(dy));
            drawn |= s.draw_line(ax, ay, x2.saturating_add(dx), y2.saturating_add(dy), c);
        }
        drawn
    }

    fn draw_rect_filled(&mut self, x: i32, y: i32, w: u32, h: u32, c: u32) -> bool {
        self.surface.draw_rect_filled(phys(x), phys(y), phys_len(w), phys_len(h), c)
    }

    fn draw_grad(&mut self, x: i32, y: i32, w: u32, h: u32, c1: u32, c2: u32) -> bool {
        self.surface.draw_grad(phys(x), phys(y), phys_len(w), phys_len(h), c1, c2)
    }

    fn draw_circle(&mut self, cx: i32, cy: i32, r: u32, c: u32) -> bool {
        self.surface.draw_circle(phys(cx), phys(cy), phys_len(r), c)
    }

    fn draw_circle_filled(&mut self, cx: i32, cy: i32, r: u32, c: u32) -> bool {
        self.surface.draw_circle_filled(phys(cx), phys(cy), phys_len(r), c)
    }

    /// The source is logical-resolution data: each source pixel becomes a
    /// 2x2 physical block
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
        if src.len() < pixel::buffer_len(src_w, src_h) {
            log::error!("blit: buffer too short for {}x{} source", src_w, src_h);
            return false;
        }
        let Some((draw, view)) = clip_blit(self.width, self.height, x, y, src_w, src_h, view) else {
            return false;
        };

        let phys_w = self.surface.width() as usize;
        let dest = self.surface.data_mut();
        for row in 0..draw.h {
            for col in 0..draw.w {
                let s = ((view.y + row) as usize * src_w as usize + (view.x + col) as usize) * BYTES_PER_PIXEL;
                let c = pixel::read_pixel(&src[s..s + BYTES_PER_PIXEL]);
                let px = phys(draw.x + col) as usize;
                let py = phys(draw.y + row) as usize;
                for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                    let d = ((py + dy) * phys_w + px + dx) * BYTES_PER_PIXEL;
                    let block = &mut dest[d..d + BYTES_PER_PIXEL];
                    if force_alpha {
                        pixel::plot(block, c);
                    } else {
                        pixel::write_pixel(block, c);
                    }
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::SurfaceViewPort;

    const RED: u32 = 0xffff0000;
    const GREEN: u32 = 0xff00ff00;

    fn lit(s: &Surface<'_>) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for y in 0..s.height() as i32 {
            for x in 0..s.width() as i32 {
                if s.get_pixel(x, y) != Some(0) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn test_geometry() {
        let hd = HighDPISurface::new(4, 3);
        assert_eq!((hd.width(), hd.height()), (4, 3));
        assert_eq!((hd.surface().width(), hd.surface().height()), (8, 6));
        assert_eq!(hd.dpi(), (192, 192));
        assert!(hd.is_high_dpi());
        assert_eq!(hd.drawing_buffer().len(), 8 * 6 * 4);
    }

    #[test]
    fn test_pixel_fills_block() {
        let mut hd = HighDPISurface::new(4, 4);
        assert!(hd.draw_pixel(1, 1, RED));
        assert_eq!(lit(hd.surface()), vec![(2, 2), (3, 2), (2, 3), (3, 3)]);
        assert_eq!(hd.get_pixel(1, 1), Some(RED));
        assert!(!hd.draw_pixel(4, 0, RED));
    }

    #[test]
    fn test_sub_pixel_is_physical() {
        let mut hd = HighDPISurface::new(2, 2);
        assert!(hd.draw_sub_pixel(3, 1, GREEN));
        assert_eq!(lit(hd.surface()), vec![(3, 1)]);
    }

    #[test]
    fn test_horizontal_line_doubles() {
        let mut hd = HighDPISurface::new(4, 4);
        assert!(hd.draw_line(2, 0, 1, 0, RED));
        assert_eq!(lit(hd.surface()), vec![(2, 0), (3, 0), (4, 0), (5, 0), (2, 1), (3, 1), (4, 1), (5, 1)]);
    }

    #[test]
    fn test_diagonal_line_thick() {
        let mut hd = HighDPISurface::new(4, 4);
        assert!(hd.draw_line(0, 0, 1, 1, RED));
        let px = lit(hd.surface());
        for p in [(0, 0), (1, 0), (0, 1), (1, 1), (2, 2), (3, 3)] {
            assert!(px.contains(&p), "missing {:?}", p);
        }
    }

    #[test]
    fn test_rect_filled_doubles() {
        let mut hd = HighDPISurface::new(4, 4);
        assert!(hd.draw_rect_filled(1, 0, 1, 2, RED));
        assert_eq!(lit(hd.surface()).len(), 2 * 4);
        assert_eq!(hd.surface().get_pixel(2, 3), Some(RED));
        assert_eq!(hd.surface().get_pixel(4, 0), Some(0));
        assert!(!hd.draw_rect_filled(4, 4, 2, 2, RED));
    }

    #[test]
    fn test_outline_matches_through_viewport() {
        let mut direct = HighDPISurface::new(4, 4);
        assert!(direct.draw_rect(0, 0, 3, 3, RED));

        let mut nested = HighDPISurface::new(4, 4);
        {
            let mut vp = SurfaceViewPort::new(&mut nested, 0, 0, 4, 4);
            assert!(vp.draw_rect(0, 0, 3, 3, RED));
        }
        assert_eq!(direct.surface().data(), nested.surface().data());

        // Eight logical outline pixels, each a full 2x2 block
        let phys = direct.surface();
        assert_eq!(lit(phys).len(), 8 * 4);
        assert_eq!(phys.get_pixel(1, 1), Some(RED));
        assert_eq!(phys.get_pixel(2, 2), Some(0));
        assert_eq!(phys.get_pixel(5, 5), Some(RED));
    }

    #[test]
    fn test_far_coordinates_rejected() {
        let mut hd = HighDPISurface::new(4, 4);
        assert!(!hd.draw_rect_filled(2_000_000_000, 0, 1, 1, RED));
        assert!(!hd.draw_rect_filled(0, -2_000_000_000, 4, 4, RED));
        assert!(!hd.draw_line(i32::MAX, 0, i32::MAX, 3, RED));
        assert!(!hd.draw_line(0, i32::MIN, 3, i32::MIN, RED));
        assert!(!hd.draw_circle(i32::MAX, 0, 5, RED));
        assert!(!hd.draw_grad(0, i32::MAX - 1, 4, 4, RED, GREEN));
        assert!(lit(hd.surface()).is_empty());

        assert!(hd.draw_rect_filled(0, 0, u32::MAX, 1, RED));
        assert_eq!(lit(hd.surface()).len(), 8 * 2);
    }

    #[test]
    fn test_blit_writes_blocks() {
        let mut hd = HighDPISurface::new(3, 3);
        let mut src = Surface::new(2, 1);
        src.draw_pixel(0, 0, RED);
        src.draw_pixel(1, 0, GREEN);
        assert!(hd.blit_surface(2, 1, &src, false));
        // Second source column falls off the logical edge
        let phys = hd.surface();
        for (x, y) in [(4, 2), (5, 2), (4, 3), (5, 3)] {
            assert_eq!(phys.get_pixel(x, y), Some(RED));
        }
        assert_eq!(lit(phys).len(), 4);
    }

    #[test]
    fn test_clear_covers_physical_buffer() {
        let mut hd = HighDPISurface::new(2, 2);
        assert!(hd.clear(GREEN));
        assert_eq!(lit(hd.surface()).len(), 16);
        let s = hd.into_surface();
        assert_eq!(s.get_pixel(3, 3), Some(GREEN));
    }
}
