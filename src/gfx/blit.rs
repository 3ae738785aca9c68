//! Rectangular copy/composite between pixel buffers.
//!
//! The destination rectangle and the source window are clipped in turn,
//! each time keeping the two congruent, so a window that overhangs the
//! source image or the destination buffer in any direction never reads or
//! writes out of range.

use super::pixel::{self, BYTES_PER_PIXEL};
use crate::geometry::Rect;

/// Clip a blit of the source window `view` (from a `src_w x src_h` buffer)
/// placed at `(x, y)` in a `dest_w x dest_h` destination.
///
/// Returns the surviving destination rectangle and the matching source
/// window, which always have equal size.
pub fn clip_blit(
    dest_w: u32,
    dest_h: u32,
    x: i32,
    y: i32,
    src_w: u32,
    src_h: u32,
    view: Rect,
) -> Option<(Rect, Rect)> {
    let dest_rect = Rect::sized(dest_w, dest_h);
    let src_rect = Rect::sized(src_w, src_h);
    let mut draw = Rect::new(x, y, view.w, view.h);
    let mut view = view;

    // Destination side: whatever is trimmed off the left/top of the target
    // is trimmed off the source window too
    if !draw.clip(&dest_rect) {
        return None;
    }
    view.x = view.x.saturating_add(draw.x.saturating_sub(x));
    view.y = view.y.saturating_add(draw.y.saturating_sub(y));
    view.w = draw.w;
    view.h = draw.h;

    // Source side
    let (vx, vy) = (view.x, view.y);
    if !view.clip(&src_rect) {
        return None;
    }
    draw.x = draw.x.saturating_add(view.x.saturating_sub(vx));
    draw.y = draw.y.saturating_add(view.y.saturating_sub(vy));
    draw.w = view.w;
    draw.h = view.h;

    Some((draw, view))
}

/// Copy the `view` window of `src` into `dest` at `(x, y)`.
///
/// With `force_alpha` unset each row is copied verbatim; with it set every
/// pixel goes through the usual alpha blend. Returns false when nothing
/// survives clipping or `src` is shorter than `src_w x src_h`.
pub fn blit_into(
    dest: &mut [u8],
    dest_w: u32,
    dest_h: u32,
    x: i32,
    y: i32,
    src: &[u8],
    src_w: u32,
    src_h: u32,
    view: Rect,
    force_alpha: bool,
) -> bool {
    if src.len() < pixel::buffer_len(src_w, src_h) || dest.len() < pixel::buffer_len(dest_w, dest_h) {
        log::error!(
            "blit: buffer too short for {}x{} source or {}x{} destination",
            src_w,
            src_h,
            dest_w,
            dest_h
        );
        return false;
    }
    let Some((draw, view)) = clip_blit(dest_w, dest_h, x, y, src_w, src_h, view) else {
        return false;
    };

    let dest_stride = dest_w as usize * BYTES_PER_PIXEL;
    let src_stride = src_w as usize * BYTES_PER_PIXEL;
    let row_bytes = draw.w as usize * BYTES_PER_PIXEL;
    let mut d = draw.y as usize * dest_stride + draw.x as usize * BYTES_PER_PIXEL;
    let mut s = view.y as usize * src_stride + view.x as usize * BYTES_PER_PIXEL;

    for _ in 0..draw.h {
        let dest_row = &mut dest[d..d + row_bytes];
        let src_row = &src[s..s + row_bytes];
        if force_alpha {
            for (dp, sp) in dest_row
                .chunks_exact_mut(BYTES_PER_PIXEL)
                .zip(src_row.chunks_exact(BYTES_PER_PIXEL))
            {
                pixel::plot(dp, pixel::read_pixel(sp));
            }
        } else {
            dest_row.copy_from_slice(src_row);
        }
        d += dest_stride;
        s += src_stride;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: u32 = 0xff000000;
    const GREEN: u32 = 0xff00ff00;

    fn solid(w: u32, h: u32, c: u32) -> Vec<u8> {
        c.to_le_bytes().repeat((w * h) as usize)
    }

    fn pixel_at(buf: &[u8], w: u32, x: u32, y: u32) -> u32 {
        let i = ((y * w + x) * 4) as usize;
        pixel::read_pixel(&buf[i..i + 4])
    }

    #[test]
    fn test_clip_keeps_rects_congruent() {
        let (draw, view) = clip_blit(10, 10, -3, 8, 6, 6, Rect::new(0, 0, 6, 6)).unwrap();
        assert_eq!(draw, Rect::new(0, 8, 3, 2));
        assert_eq!(view, Rect::new(3, 0, 3, 2));
    }

    #[test]
    fn test_clip_view_overhanging_source() {
        // View starts left of the source and runs past its right edge
        let (draw, view) = clip_blit(10, 10, 2, 2, 4, 4, Rect::new(-1, 1, 8, 2)).unwrap();
        assert_eq!(view, Rect::new(0, 1, 4, 2));
        assert_eq!(draw, Rect::new(3, 2, 4, 2));
    }

    #[test]
    fn test_clip_outside_destination() {
        assert!(clip_blit(4, 4, 4, 0, 2, 2, Rect::new(0, 0, 2, 2)).is_none());
        assert!(clip_blit(4, 4, -2, -2, 2, 2, Rect::new(0, 0, 2, 2)).is_none());
        assert!(clip_blit(4, 4, 0, 0, 2, 2, Rect::new(5, 5, 2, 2)).is_none());
    }

    #[test]
    fn test_clip_extreme_positions() {
        let whole = Rect::new(0, 0, 4, 4);
        assert!(clip_blit(8, 8, i32::MAX - 1, 0, 4, 4, whole).is_none());
        assert!(clip_blit(8, 8, 0, i32::MAX, 4, 4, whole).is_none());
        assert!(clip_blit(8, 8, i32::MIN, i32::MIN, 4, 4, whole).is_none());
        assert!(clip_blit(8, 8, 0, 0, 4, 4, Rect::new(i32::MAX - 1, 0, 4, 4)).is_none());
    }

    #[test]
    fn test_corner_overlap_writes_one_pixel() {
        let mut dest = solid(4, 4, BLACK);
        let src = solid(2, 2, GREEN);
        assert!(blit_into(&mut dest, 4, 4, 3, 3, &src, 2, 2, Rect::new(0, 0, 2, 2), false));
        for y in 0..4 {
            for x in 0..4 {
                let expected = if (x, y) == (3, 3) { GREEN } else { BLACK };
                assert_eq!(pixel_at(&dest, 4, x, y), expected, "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_force_alpha_blends() {
        let mut dest = solid(1, 1, BLACK);
        let src = solid(1, 1, 0x80ffffff);
        assert!(blit_into(&mut dest, 1, 1, 0, 0, &src, 1, 1, Rect::new(0, 0, 1, 1), true));
        assert_eq!(pixel_at(&dest, 1, 0, 0), 0xff808080);

        // The raw copy path keeps the source alpha byte as-is
        let mut dest = solid(1, 1, BLACK);
        assert!(blit_into(&mut dest, 1, 1, 0, 0, &src, 1, 1, Rect::new(0, 0, 1, 1), false));
        assert_eq!(pixel_at(&dest, 1, 0, 0), 0x80ffffff);
    }

    #[test]
    fn test_short_source_rejected() {
        let mut dest = solid(2, 2, BLACK);
        let before = dest.clone();
        assert!(!blit_into(&mut dest, 2, 2, 0, 0, &[0u8; 4], 2, 2, Rect::new(0, 0, 2, 2), false));
        assert_eq!(dest, before);
    }
}
