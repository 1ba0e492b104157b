//! Axis-aligned rectangle in a y-down coordinate space.
//!
//! `top <= bottom` for a non-empty rectangle: `top` is the minimum y and
//! `bottom` the maximum y.

use super::vec2::Vec2;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// A rectangle that any absorbed point replaces entirely.
    pub const fn inverse_max() -> Self {
        Self::new(f32::MAX, f32::MAX, -f32::MAX, -f32::MAX)
    }

    /// Computes the bounds of a set of points.
    ///
    /// Returns [`Rect::inverse_max`] for an empty set.
    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Self {
        let mut rect = Self::inverse_max();
        for p in points {
            rect.absorb_point(p);
        }
        rect
    }

    /// Grows this rectangle to contain `p`.
    pub fn absorb_point(&mut self, p: Vec2) {
        self.left = self.left.min(p.x);
        self.right = self.right.max(p.x);
        self.top = self.top.min(p.y);
        self.bottom = self.bottom.max(p.y);
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// True when the rectangle has no positive area.
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Corners in the winding used for clip hulls:
    /// `(right, top), (right, bottom), (left, bottom), (left, top)`.
    pub fn hull_corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.right, self.top),
            Vec2::new(self.right, self.bottom),
            Vec2::new(self.left, self.bottom),
            Vec2::new(self.left, self.top),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb_from_inverse_max() {
        let r = Rect::from_points([Vec2::new(2.0, -1.0), Vec2::new(-3.0, 4.0)]);
        assert_eq!(r, Rect::new(-3.0, -1.0, 2.0, 4.0));
        assert_eq!(r.width(), 5.0);
        assert_eq!(r.height(), 5.0);
    }

    #[test]
    fn test_empty_point_set_is_degenerate() {
        let r = Rect::from_points(std::iter::empty());
        assert!(r.is_degenerate());
    }

    #[test]
    fn test_zero_width_is_degenerate() {
        assert!(Rect::new(0.0, 0.0, 0.0, 10.0).is_degenerate());
        assert!(!Rect::new(0.0, 0.0, 10.0, 10.0).is_degenerate());
    }
}
