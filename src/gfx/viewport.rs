//! Viewports: drawables that own no pixels and forward every call to a
//! parent under a fixed translation.

use super::blit::clip_blit;
use super::canvas::walk_line;
use super::drawable::Drawable;
use super::pixel::alpha_of;
use crate::geometry::{Point, Rect};

/// A `width x height` window into `parent`, with its origin at
/// `(offset_x, offset_y)` in the parent's logical space.
///
/// The borrow of `parent` lasts as long as the viewport, so the parent
/// cannot be dropped or drawn on directly while the viewport is alive.
/// Viewports nest: the parent may itself be a viewport.
pub struct SurfaceViewPort<'p> {
    parent: &'p mut dyn Drawable,
    offset_x: i32,
    offset_y: i32,
    width: u32,
    height: u32,
}

impl<'p> SurfaceViewPort<'p> {
    pub fn new(parent: &'p mut dyn Drawable, x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            parent,
            offset_x: x,
            offset_y: y,
            width,
            height,
        }
    }

    /// Viewport covering `rect`; a negative size becomes empty
    pub fn from_rect(parent: &'p mut dyn Drawable, rect: Rect) -> Self {
        Self::new(parent, rect.x, rect.y, rect.w.max(0) as u32, rect.h.max(0) as u32)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn offset(&self) -> Point {
        Point::new(self.offset_x, self.offset_y)
    }

    pub fn parent(&self) -> &dyn Drawable {
        &*self.parent
    }

    #[inline]
    fn to_parent(&self, x: i32, y: i32) -> (i32, i32) {
        (x.saturating_add(self.offset_x), y.saturating_add(self.offset_y))
    }
}

impl Drawable for SurfaceViewPort<'_> {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn dpi(&self) -> (u32, u32) {
        self.parent.dpi()
    }

    fn is_high_dpi(&self) -> bool {
        self.parent.is_high_dpi()
    }

    fn absolute(&self) -> Rect {
        let outer = self.parent.absolute();
        Rect::with_size(
            outer.x.saturating_add(self.offset_x),
            outer.y.saturating_add(self.offset_y),
            self.width,
            self.height,
        )
    }

    fn root(&self) -> &dyn Drawable {
        self.parent.root()
    }

    fn drawing_buffer(&self) -> &[u8] {
        self.parent.drawing_buffer()
    }

    fn draw_pixel(&mut self, x: i32, y: i32, c: u32) -> bool {
        if alpha_of(c) == 0 {
            return true;
        }
        if !self.bounds().contains(x, y) {
            return false;
        }
        let (px, py) = self.to_parent(x, y);
        self.parent.draw_pixel(px, py, c)
    }

    fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        if !self.bounds().contains(x, y) {
            return None;
        }
        let (px, py) = self.to_parent(x, y);
        self.parent.get_pixel(px, py)
    }

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, c: u32) -> bool {
        if alpha_of(c) == 0 {
            return true;
        }
        let bounds = self.bounds();
        let (w, h) = (bounds.w, bounds.h);

        // Axis-aligned spans are clipped here and forwarded whole so the
        // parent keeps its own fast path
        if y1 == y2 {
            let start = x1.min(x2).max(0);
            let end = x1.max(x2).min(w - 1);
            if y1 < 0 || y1 >= h || start > end {
                return false;
            }
            let (ps, py) = self.to_parent(start, y1);
            let (pe, _) = self.to_parent(end, y1);
            return self.parent.draw_line(ps, py, pe, py, c);
        }
        if x1 == x2 {
            let start = y1.min(y2).max(0);
            let end = y1.max(y2).min(h - 1);
            if x1 < 0 || x1 >= w || start > end {
                return false;
            }
            let (px, ps) = self.to_parent(x1, start);
            let (_, pe) = self.to_parent(x1, end);
            return self.parent.draw_line(px, ps, px, pe, c);
        }

        let (ox, oy) = (self.offset_x, self.offset_y);
        let parent = &mut *self.parent;
        let mut drawn = false;
        walk_line(x1, y1, x2, y2, bounds, |x, y| {
            drawn |= parent.draw_pixel(x.saturating_add(ox), y.saturating_add(oy), c);
        });
        drawn
    }

    fn draw_rect_filled(&mut self, x: i32, y: i32, w: u32, h: u32, c: u32) -> bool {
        let mut rect = Rect::with_size(x, y, w, h);
        if !rect.clip(&self.bounds()) {
            return false;
        }
        let (px, py) = self.to_parent(rect.x, rect.y);
        self.parent.draw_rect_filled(px, py, rect.w as u32, rect.h as u32, c)
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
        // Own bounds first; the parent clips again against its own
        let Some((draw, view)) = clip_blit(self.width, self.height, x, y, src_w, src_h, view) else {
            return false;
        };
        let (px, py) = self.to_parent(draw.x, draw.y);
        self.parent.blit_view(px, py, src, src_w, src_h, view, force_alpha)
    }
}
