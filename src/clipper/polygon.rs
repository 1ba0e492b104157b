//! Sutherland-Hodgman clipping of a single convex vertex ring.
//!
//! # Algorithm Overview
//!
//! Each plane is applied in turn. For one plane, every vertex gets a signed
//! distance and is classified as positive (`d > tolerance`), negative
//! (`d < -tolerance`) or on the plane. A ring with no negative vertex is left
//! untouched, a ring with no positive vertex is discarded, and anything else
//! is walked edge by edge, keeping positive and on-plane vertices and
//! emitting an intersection vertex at each edge that crosses from a positive
//! to a negative vertex (or back).
//!
//! Clipping a convex ring against a convex region adds at most one vertex
//! per plane, so two scratch buffers sized `planes + vertices` are enough to
//! ping-pong between stages.

use std::fmt;

use smallvec::SmallVec;

use super::plane::{rectangle_planes, ClipPlane, HalfPlane};
use crate::math::rect::Rect;
use crate::vertex::ClipVertex;

/// Extra output vertices a rectangle clip can produce.
pub const RECTANGLE_CLIP_VERTEX_COUNT: usize = 4;

/// Rings up to this size classify without a heap allocation.
pub const MAX_STACK_VERTICES: usize = 12;

/// Result of clipping a ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipOutcome {
    /// Every vertex is on the discarded side; nothing remains.
    Outside,
    /// No vertex is on the discarded side; the ring is unchanged.
    #[default]
    Inside,
    /// The ring was cut; the output holds this many vertices.
    Clipped(usize),
}

impl fmt::Display for ClipOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipOutcome::Outside => write!(f, "outside"),
            ClipOutcome::Inside => write!(f, "inside"),
            ClipOutcome::Clipped(n) => write!(f, "clipped ({n} vertices)"),
        }
    }
}

/// Clip `input` against one plane.
///
/// `output` is overwritten only when the result is [`ClipOutcome::Clipped`].
pub fn plane_clip<P, V>(plane: &P, input: &[V], output: &mut Vec<V>, tolerance: f32) -> ClipOutcome
where
    P: ClipPlane,
    V: ClipVertex,
{
    let mut distances: SmallVec<[f32; MAX_STACK_VERTICES]> = SmallVec::with_capacity(input.len());
    let mut positive = 0usize;
    let mut negative = 0usize;
    for v in input {
        let d = plane.signed_distance(v.position());
        positive += (d > tolerance) as usize;
        negative += (d < -tolerance) as usize;
        distances.push(d);
    }

    if negative == 0 {
        return ClipOutcome::Inside;
    }
    if positive == 0 {
        return ClipOutcome::Outside;
    }

    output.clear();
    let last = input.len() - 1;
    let (mut s, mut d_s) = (&input[last], distances[last]);
    for (p, &d_p) in input.iter().zip(distances.iter()) {
        if d_p > tolerance {
            if d_s < -tolerance {
                output.push(plane.intersect(s, p, d_s));
            }
            output.push(*p);
        } else if d_p >= -tolerance {
            // On the plane: keep p, and let s be handled when it is p.
            output.push(*p);
        } else if d_s > tolerance {
            output.push(plane.intersect(p, s, d_p));
        }
        s = p;
        d_s = d_p;
    }

    ClipOutcome::Clipped(output.len())
}

/// Reusable ping-pong buffers for clipping a ring against many planes.
#[derive(Debug, Clone)]
pub struct ConvexClipper<V> {
    front: Vec<V>,
    back: Vec<V>,
}

impl<V: ClipVertex> ConvexClipper<V> {
    pub fn new() -> Self {
        Self {
            front: Vec::new(),
            back: Vec::new(),
        }
    }

    /// Clip `input` against every plane in `planes`.
    ///
    /// With no planes the ring is [`ClipOutcome::Outside`]; an empty ring is
    /// [`ClipOutcome::Inside`]. After [`ClipOutcome::Clipped`], the result is
    /// available from [`ConvexClipper::output`].
    pub fn clip<P: ClipPlane>(&mut self, planes: &[P], input: &[V], tolerance: f32) -> ClipOutcome {
        if planes.is_empty() {
            return ClipOutcome::Outside;
        }
        if input.is_empty() {
            return ClipOutcome::Inside;
        }

        let capacity = planes.len() + input.len();
        self.front.reserve(capacity);
        self.back.reserve(capacity);

        // The latest clipped ring is always in `front`.
        let mut clipped = false;
        let mut result = ClipOutcome::Inside;
        for plane in planes {
            let outcome = if clipped {
                plane_clip(plane, &self.front, &mut self.back, tolerance)
            } else {
                plane_clip(plane, input, &mut self.front, tolerance)
            };

            match outcome {
                ClipOutcome::Outside => return ClipOutcome::Outside,
                ClipOutcome::Inside => {}
                ClipOutcome::Clipped(n) => {
                    if clipped {
                        std::mem::swap(&mut self.front, &mut self.back);
                    }
                    clipped = true;
                    result = ClipOutcome::Clipped(n);
                }
            }
        }

        result
    }

    /// The ring produced by the last [`ClipOutcome::Clipped`] result.
    pub fn output(&self) -> &[V] {
        &self.front
    }
}

impl<V: ClipVertex> Default for ConvexClipper<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Clip a convex ring against a set of half-planes.
///
/// On [`ClipOutcome::Clipped`], `output` is replaced with the clipped ring;
/// otherwise it is left unmodified.
pub fn convex_clip<V: ClipVertex>(
    planes: &[HalfPlane],
    input: &[V],
    output: &mut Vec<V>,
    tolerance: f32,
) -> ClipOutcome {
    let mut clipper = ConvexClipper::new();
    let outcome = clipper.clip(planes, input, tolerance);
    if let ClipOutcome::Clipped(_) = outcome {
        output.clear();
        output.extend_from_slice(clipper.output());
    }
    outcome
}

/// Clip a convex ring against an axis-aligned rectangle.
///
/// Same output contract as [`convex_clip`].
pub fn convex_clip_rect<V: ClipVertex>(
    rect: &Rect,
    input: &[V],
    output: &mut Vec<V>,
    tolerance: f32,
) -> ClipOutcome {
    let mut clipper = ConvexClipper::new();
    let outcome = clipper.clip(&rectangle_planes(rect), input, tolerance);
    if let ClipOutcome::Clipped(_) = outcome {
        output.clear();
        output.extend_from_slice(clipper.output());
    }
    outcome
}
