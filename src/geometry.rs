//! Integer geometry primitives used for clipping and placement

use serde::{Deserialize, Serialize};

#[inline]
const fn clamp_len(len: u32) -> i32 {
    if len > i32::MAX as u32 {
        i32::MAX
    } else {
        len as i32
    }
}

/// A point in 2D integer space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

/// Axis-aligned rectangle.
///
/// `w` and `h` are signed so that clip arithmetic can go transiently negative;
/// a rectangle is only meaningful when [`Rect::is_valid`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle anchored at the origin with the given size
    pub const fn sized(w: u32, h: u32) -> Self {
        Self::with_size(0, 0, w, h)
    }

    /// Rectangle from an unsigned size; sizes past `i32::MAX` are clamped
    pub const fn with_size(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self::new(x, y, clamp_len(w), clamp_len(h))
    }

    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.w > 0 && self.h > 0
    }

    /// One past the rightmost column, saturating at `i32::MAX`
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.w)
    }

    /// One past the bottom row, saturating at `i32::MAX`
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h)
    }

    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub const fn translate(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy), self.w, self.h)
    }

    /// Shrink this rectangle to its intersection with `bound`.
    ///
    /// Returns false when the intersection is empty; the rectangle is then
    /// left degenerate and must not be used for drawing.
    pub fn clip(&mut self, bound: &Rect) -> bool {
        let x1 = self.x.max(bound.x);
        let y1 = self.y.max(bound.y);
        let x2 = self.right().min(bound.right());
        let y2 = self.bottom().min(bound.bottom());

        self.x = x1;
        self.y = y1;
        self.w = x2.saturating_sub(x1);
        self.h = y2.saturating_sub(y1);
        self.is_valid()
    }

    /// Non-mutating form of [`Rect::clip`]
    pub fn intersection(&self, bound: &Rect) -> Option<Rect> {
        let mut r = *self;
        if r.clip(bound) {
            Some(r)
        } else {
            None
        }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.is_valid()
            && other.is_valid()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Half-open containment: the right and bottom edges are outside
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub const fn contains_point(&self, p: Point) -> bool {
        self.contains(p.x, p.y)
    }

    /// True when `other` lies entirely within this rectangle
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.is_valid()
            && other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_partial_overlap() {
        let mut r = Rect::new(-2, -2, 4, 4);
        assert!(r.clip(&Rect::sized(4, 4)));
        assert_eq!(r, Rect::new(0, 0, 2, 2));
    }

    #[test]
    fn test_clip_is_idempotent() {
        let bound = Rect::new(1, 1, 10, 6);
        let mut r = Rect::new(-5, 3, 9, 20);
        assert!(r.clip(&bound));
        let first = r;
        assert!(r.clip(&bound));
        assert_eq!(r, first);
    }

    #[test]
    fn test_clip_disjoint_fails() {
        let mut r = Rect::new(10, 10, 5, 5);
        assert!(!r.clip(&Rect::sized(4, 4)));
        assert!(!r.is_valid());
    }

    #[test]
    fn test_clip_touching_edge_is_empty() {
        // Sharing only an edge is not an overlap
        let mut r = Rect::new(4, 0, 2, 2);
        assert!(!r.clip(&Rect::sized(4, 4)));
    }

    #[test]
    fn test_zero_area_never_valid() {
        let mut r = Rect::new(1, 1, 0, 3);
        assert!(!r.clip(&Rect::sized(10, 10)));
        assert!(Rect::sized(10, 10).intersection(&Rect::new(2, 2, 3, 0)).is_none());
    }

    #[test]
    fn test_intersects_and_contains() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(9, 9, 5, 5);
        let c = Rect::new(10, 0, 5, 5);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert!(a.contains(0, 0));
        assert!(a.contains(9, 9));
        assert!(!a.contains(10, 9));
        assert!(a.contains_point(Point::new(5, 5)));
        assert!(a.contains_rect(&Rect::new(2, 2, 8, 8)));
        assert!(!a.contains_rect(&b));
    }

    #[test]
    fn test_translate() {
        let r = Rect::new(1, 2, 3, 4).translate(-1, 5);
        assert_eq!(r, Rect::new(0, 7, 3, 4));
        assert_eq!(r.right(), 3);
        assert_eq!(r.bottom(), 11);
        assert_eq!(r.origin(), Point::new(0, 7));
    }

    #[test]
    fn test_edges_saturate_near_i32_max() {
        let mut r = Rect::new(i32::MAX - 1, i32::MAX - 1, 10, 10);
        assert_eq!(r.right(), i32::MAX);
        assert_eq!(r.bottom(), i32::MAX);
        assert!(!r.contains(0, 0));
        assert!(!Rect::sized(8, 8).intersects(&r));
        assert!(!r.clip(&Rect::sized(8, 8)));

        let mut wide = Rect::new(i32::MIN, 0, i32::MAX, 4);
        assert!(!wide.clip(&Rect::new(i32::MAX - 4, 0, 4, 4)));
    }

    #[test]
    fn test_with_size_clamps_huge_sizes() {
        let r = Rect::with_size(-3, 2, u32::MAX, 5);
        assert_eq!(r.w, i32::MAX);
        assert!(r.is_valid());
        assert_eq!(r.intersection(&Rect::sized(4, 8)), Some(Rect::new(0, 2, 4, 5)));
    }
}
