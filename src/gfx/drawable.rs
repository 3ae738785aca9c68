//! The drawing contract shared by surfaces, viewports and high-DPI surfaces.
//!
//! Colours are packed `0xAARRGGBB` values. Nothing here returns an error:
//! geometry that misses the drawable returns `false` and leaves the pixels
//! alone, zero-alpha writes succeed without touching anything.

use std::ops::Range;

use super::canvas::{corner_inset, isqrt, walk_circle};
use super::pixel::{lerp_colour, opaque};
use super::surface::Surface;
use crate::geometry::Rect;

pub const DEFAULT_DPI: u32 = 96;

/// Clamp a corner radius so it never exceeds half of either side
#[inline]
fn clamp_radius(r: u32, w: u32, h: u32) -> i32 {
    let limit = (i64::from(w) / 2 - 1).min(i64::from(h) / 2 - 1);
    i64::from(r).min(limit).clamp(0, i64::from(i32::MAX)) as i32
}

#[inline]
fn to_i32(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Last column (or row) of a span of `len` starting at `origin`
#[inline]
fn span_end(origin: i32, len: u32) -> i32 {
    to_i32(i64::from(origin) + i64::from(len) - 1)
}

/// Rows of a `h`-row shape at `y` that land inside `0..limit`
fn visible_rows(y: i32, h: u32, limit: u32) -> Range<u32> {
    let first = (-i64::from(y)).max(0);
    let end = i64::from(h).min(i64::from(limit) - i64::from(y));
    if end <= first {
        0..0
    } else {
        first as u32..end as u32
    }
}

pub trait Drawable {
    /// Logical width
    fn width(&self) -> u32;

    /// Logical height
    fn height(&self) -> u32;

    fn dpi(&self) -> (u32, u32) {
        (DEFAULT_DPI, DEFAULT_DPI)
    }

    /// True when the buffer behind this drawable stores 2x2 physical pixels
    /// per logical pixel
    fn is_high_dpi(&self) -> bool {
        false
    }

    fn bounds(&self) -> Rect {
        Rect::sized(self.width(), self.height())
    }

    /// Bounds in the coordinate space of the outermost surface
    fn absolute(&self) -> Rect {
        self.bounds()
    }

    /// The outermost drawable in a viewport chain: the one owning the buffer
    fn root(&self) -> &dyn Drawable;

    /// Raw bytes of the buffer that ultimately receives the pixels
    fn drawing_buffer(&self) -> &[u8];

    fn draw_pixel(&mut self, x: i32, y: i32, c: u32) -> bool;

    /// Raw packed value at `(x, y)`, no blending; `None` off the drawable
    fn get_pixel(&self, x: i32, y: i32) -> Option<u32>;

    /// Opaque rectangle fill clipped to the drawable
    fn draw_rect_filled(&mut self, x: i32, y: i32, w: u32, h: u32, c: u32) -> bool;

    /// Copy or composite the `view` window of a `src_w x src_h` buffer to `(x, y)`
    fn blit_view(
        &mut self,
        x: i32,
        y: i32,
        src: &[u8],
        src_w: u32,
        src_h: u32,
        view: Rect,
        force_alpha: bool,
    ) -> bool;

    /// [`Drawable::draw_pixel`] with an explicit bounds check first
    fn draw_pixel_checked(&mut self, x: i32, y: i32, c: u32) -> bool {
        self.bounds().contains(x, y) && self.draw_pixel(x, y, c)
    }

    /// Line between two inclusive endpoints, clipped to the drawable
    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, c: u32) -> bool;

    /// One-pixel opaque outline
    fn draw_rect(&mut self, x: i32, y: i32, w: u32, h: u32, c: u32) -> bool {
        if w == 0 || h == 0 {
            return false;
        }
        let c = opaque(c);
        let x2 = span_end(x, w);
        let y2 = span_end(y, h);
        let mut drawn = self.draw_line(x, y, x2, y, c);
        drawn |= self.draw_line(x, y2, x2, y2, c);
        drawn |= self.draw_line(x, y, x, y2, c);
        drawn |= self.draw_line(x2, y, x2, y2, c);
        drawn
    }

    /// Vertical gradient from `c1` on the top row toward `c2` on the bottom
    fn draw_grad(&mut self, x: i32, y: i32, w: u32, h: u32, c1: u32, c2: u32) -> bool {
        if w == 0 || h == 0 {
            return false;
        }
        let x2 = span_end(x, w);
        let mut drawn = false;
        for row in visible_rows(y, h, self.height()) {
            let yy = to_i32(i64::from(y) + i64::from(row));
            drawn |= self.draw_line(x, yy, x2, yy, lerp_colour(c1, c2, row, h));
        }
        drawn
    }

    fn clear(&mut self, c: u32) -> bool {
        self.draw_rect_filled(0, 0, self.width(), self.height(), c)
    }

    /// Quarter-circle arc of radius `r` centred on `(cx, cy)`.
    /// `right`/`down` pick the quadrant the arc bulges into.
    fn draw_corner(&mut self, cx: i32, cy: i32, r: u32, right: bool, down: bool, c: u32) -> bool {
        let ri = r.min(i32::MAX as u32) as i32;
        let bx = if right { cx } else { cx.saturating_sub(ri) };
        let by = if down { cy } else { cy.saturating_sub(ri) };
        if !Rect::with_size(bx, by, r.saturating_add(1), r.saturating_add(1)).intersects(&self.bounds()) {
            return false;
        }
        let sx = if right { 1 } else { -1 };
        let sy = if down { 1 } else { -1 };
        let mut drawn = false;
        walk_circle(ri, |dx, dy| {
            drawn |= self.draw_pixel_checked(cx.saturating_add(sx * dx), cy.saturating_add(sy * dy), c);
            if dx != dy {
                drawn |= self.draw_pixel_checked(cx.saturating_add(sx * dy), cy.saturating_add(sy * dx), c);
            }
        });
        drawn
    }

    fn draw_rect_rounded(&mut self, x: i32, y: i32, w: u32, h: u32, r: u32, c: u32) -> bool {
        let r = clamp_radius(r, w, h);
        if r == 0 {
            return self.draw_rect(x, y, w, h, c);
        }
        let c = opaque(c);
        let x2 = span_end(x, w);
        let y2 = span_end(y, h);
        let (xr, yr) = (x.saturating_add(r), y.saturating_add(r));
        let (x2r, y2r) = (x2.saturating_sub(r), y2.saturating_sub(r));

        let mut drawn = self.draw_line(xr, y, x2r, y, c);
        drawn |= self.draw_line(xr, y2, x2r, y2, c);
        drawn |= self.draw_line(x, yr, x, y2r, c);
        drawn |= self.draw_line(x2, yr, x2, y2r, c);

        let ur = r as u32;
        drawn |= self.draw_corner(xr, yr, ur, false, false, c);
        drawn |= self.draw_corner(x2r, yr, ur, true, false, c);
        drawn |= self.draw_corner(xr, y2r, ur, false, true, c);
        drawn |= self.draw_corner(x2r, y2r, ur, true, true, c);
        drawn
    }

    /// Opaque rounded fill, one span per row with the corner rows inset to
    /// the arc
    fn draw_rect_filled_rounded(&mut self, x: i32, y: i32, w: u32, h: u32, r: u32, c: u32) -> bool {
        let r = clamp_radius(r, w, h);
        if r == 0 {
            return self.draw_rect_filled(x, y, w, h, c);
        }
        let c = opaque(c);
        let mut drawn = false;
        for row in visible_rows(y, h, self.height()) {
            let edge = row.min(h - 1 - row);
            let inset = if edge < r as u32 { corner_inset(r, edge as i32) } else { 0 };
            let yy = to_i32(i64::from(y) + i64::from(row));
            drawn |= self.draw_rect_filled(x.saturating_add(inset), yy, w - 2 * inset as u32, 1, c);
        }
        drawn
    }

    /// Gradient fill with rounded corners; corner rows are inset to the arc
    fn draw_grad_rounded(&mut self, x: i32, y: i32, w: u32, h: u32, r: u32, c1: u32, c2: u32) -> bool {
        if w == 0 || h == 0 {
            return false;
        }
        let r = clamp_radius(r, w, h);
        let x2 = span_end(x, w);
        let mut drawn = false;
        for row in visible_rows(y, h, self.height()) {
            let edge = row.min(h - 1 - row);
            let inset = if edge < r as u32 { corner_inset(r, edge as i32) } else { 0 };
            let yy = to_i32(i64::from(y) + i64::from(row));
            let c = lerp_colour(c1, c2, row, h);
            drawn |= self.draw_line(x.saturating_add(inset), yy, x2.saturating_sub(inset), yy, c);
        }
        drawn
    }

    /// Circle outline centred on `(cx, cy)`; every ring pixel is written once
    fn draw_circle(&mut self, cx: i32, cy: i32, r: u32, c: u32) -> bool {
        if r == 0 {
            return self.draw_pixel_checked(cx, cy, c);
        }
        let ri = r.min(i32::MAX as u32 / 2) as i32;
        let side = 2 * ri as u32 + 1;
        let reach = Rect::with_size(cx.saturating_sub(ri), cy.saturating_sub(ri), side, side);
        if !reach.intersects(&self.bounds()) {
            return false;
        }
        let at = |dx: i32, dy: i32| (cx.saturating_add(dx), cy.saturating_add(dy));
        let mut drawn = false;
        walk_circle(ri, |dx, dy| {
            let points = [
                at(dx, dy),
                at(dy, dx),
                at(-dy, dx),
                at(-dx, dy),
                at(-dx, -dy),
                at(-dy, -dx),
                at(dy, -dx),
                at(dx, -dy),
            ];
            // On the axes and the diagonals the octants meet and repeat points
            for (i, &(px, py)) in points.iter().enumerate() {
                if !points[..i].contains(&(px, py)) {
                    drawn |= self.draw_pixel_checked(px, py, c);
                }
            }
        });
        drawn
    }

    /// Filled circle centred on `(cx, cy)`, one horizontal span per row
    fn draw_circle_filled(&mut self, cx: i32, cy: i32, r: u32, c: u32) -> bool {
        let r = i64::from(r.min(i32::MAX as u32));
        let (cx, cy) = (i64::from(cx), i64::from(cy));
        let top = (cy - r).max(0);
        let bottom = (cy + r).min(i64::from(self.height()) - 1);
        let mut drawn = false;
        for y in top..=bottom {
            let dy = y - cy;
            let half = isqrt(r * r - dy * dy);
            drawn |= self.draw_line(to_i32(cx - half), y as i32, to_i32(cx + half), y as i32, c);
        }
        drawn
    }

    /// Blit a whole surface with its top-left corner at `(x, y)`
    fn blit_surface(&mut self, x: i32, y: i32, src: &Surface<'_>, force_alpha: bool) -> bool {
        self.blit_surface_view(x, y, src, src.bounds(), force_alpha)
    }

    fn blit_surface_view(&mut self, x: i32, y: i32, src: &Surface<'_>, view: Rect, force_alpha: bool) -> bool {
        self.blit_view(x, y, src.data(), src.width(), src.height(), view, force_alpha)
    }
}
