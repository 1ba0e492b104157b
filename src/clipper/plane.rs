//! Clip planes and their signed-distance tests.
//!
//! A plane keeps the side where its signed distance is positive. Two kinds
//! exist:
//!
//! - [`HalfPlane`]: a general 2D line, `normal · p + offset`.
//! - [`Plane1D`]: an axis-aligned line, used for the four edges of a
//!   rectangle so the common scissor case avoids a dot product per test.

use bytemuck::{Pod, Zeroable};

use crate::math::rect::Rect;
use crate::math::vec2::Vec2;
use crate::vertex::ClipVertex;

/// A plane a vertex ring can be clipped against.
pub trait ClipPlane {
    /// Signed distance of `p`; positive is the kept side.
    fn signed_distance(&self, p: Vec2) -> f32;

    /// Parameter along `from -> to` where the edge meets the plane.
    ///
    /// `distance_from` is the cached signed distance of `from`. The result
    /// is not yet clamped.
    fn edge_parameter(&self, from: Vec2, to: Vec2, distance_from: f32) -> f32;

    /// Vertex where the edge `from -> to` crosses this plane.
    ///
    /// The parameter is clamped to `[0, 1]`, and a NaN parameter (from a
    /// zero-length or plane-parallel edge) collapses to `from`.
    #[inline]
    fn intersect<V: ClipVertex>(&self, from: &V, to: &V, distance_from: f32) -> V {
        let t = self.edge_parameter(from.position(), to.position(), distance_from);
        from.interpolate(to, clamp_unit(t))
    }
}

/// Clamp to `[0, 1]`, mapping NaN to 0.
#[inline]
pub(crate) fn clamp_unit(t: f32) -> f32 {
    t.max(0.0).min(1.0)
}

/// A general half-plane packed as a unit normal and an offset.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct HalfPlane {
    pub normal: Vec2,
    pub offset: f32,
}

impl HalfPlane {
    pub const fn new(normal: Vec2, offset: f32) -> Self {
        Self { normal, offset }
    }

    /// The plane through edge `prev -> cur` of a convex ring, with the
    /// ring's interior on the positive side.
    ///
    /// Rings with positive signed area (counter-clockwise with y up) put the
    /// interior on the positive side. A degenerate edge yields a zero normal,
    /// which keeps every point.
    pub fn from_edge(prev: Vec2, cur: Vec2) -> Self {
        let normal = (prev - cur).perpendicular().normalize();
        Self {
            normal,
            offset: (-normal).dot(prev),
        }
    }
}

impl ClipPlane for HalfPlane {
    #[inline]
    fn signed_distance(&self, p: Vec2) -> f32 {
        p.dot(self.normal) + self.offset
    }

    #[inline]
    fn edge_parameter(&self, from: Vec2, to: Vec2, distance_from: f32) -> f32 {
        -distance_from / (to - from).dot(self.normal)
    }
}

/// Coordinate axis of a [`Plane1D`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    #[inline]
    fn component(self, p: Vec2) -> f32 {
        match self {
            Axis::X => p.x,
            Axis::Y => p.y,
        }
    }
}

/// An axis-aligned plane: `(p[axis] - value) * sign`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane1D {
    pub axis: Axis,
    pub value: f32,
    /// `1.0` keeps coordinates above `value`, `-1.0` keeps those below.
    pub sign: f32,
}

impl Plane1D {
    pub const fn new(axis: Axis, value: f32, sign: f32) -> Self {
        Self { axis, value, sign }
    }
}

impl ClipPlane for Plane1D {
    #[inline]
    fn signed_distance(&self, p: Vec2) -> f32 {
        (self.axis.component(p) - self.value) * self.sign
    }

    #[inline]
    fn edge_parameter(&self, from: Vec2, to: Vec2, _distance_from: f32) -> f32 {
        let from_c = self.axis.component(from);
        (self.value - from_c) / (self.axis.component(to) - from_c)
    }
}

/// The four planes of a rectangle, in the order left, bottom, right, top.
///
/// Coordinates are y-down: the kept band is `top <= y <= bottom`.
pub fn rectangle_planes(rect: &Rect) -> [Plane1D; 4] {
    [
        Plane1D::new(Axis::X, rect.left, 1.0),
        Plane1D::new(Axis::Y, rect.bottom, -1.0),
        Plane1D::new(Axis::X, rect.right, -1.0),
        Plane1D::new(Axis::Y, rect.top, 1.0),
    ]
}

/// Write the half-planes of a convex ring into `planes`.
///
/// `planes[i]` is the plane of the edge ending at `points[i]`, so the first
/// plane belongs to the closing edge `points[n - 1] -> points[0]`.
pub fn write_clip_planes(points: &[Vec2], planes: &mut [HalfPlane]) {
    debug_assert_eq!(
        points.len(),
        planes.len(),
        "one clip plane is produced per hull vertex"
    );

    let Some(&last) = points.last() else {
        return;
    };
    let mut prev = last;
    for (plane, &cur) in planes.iter_mut().zip(points) {
        *plane = HalfPlane::from_edge(prev, cur);
        prev = cur;
    }
}

/// Compute the half-planes of a convex ring, one per vertex.
///
/// Use this to clip against a convex region without a
/// [`ClipStack`](crate::ClipStack).
pub fn compute_clip_planes(points: &[Vec2]) -> Vec<HalfPlane> {
    let mut planes = vec![HalfPlane::default(); points.len()];
    write_clip_planes(points, &mut planes);
    planes
}
