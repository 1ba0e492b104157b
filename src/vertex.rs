//! Vertex types that can be clipped.
//!
//! Clipping only reads a vertex's 2D position. Every other attribute is
//! produced by [`ClipVertex::interpolate`] when an edge crosses a plane, so
//! each vertex type decides how its attributes blend:
//!
//! - [`Vec2`]: bare positions, linear blend.
//! - [`ShapeVertex`]: positions, texture coordinates and colors, linear blend.
//! - [`UtilityVertex`]: positions plus weighted references to the original
//!   vertices, so a clip can be computed once and re-applied later to fresh
//!   attribute data.

use bytemuck::{Pod, Zeroable};

use crate::color::lerp_color;
use crate::math::vec2::Vec2;

/// A vertex the clipper can classify and split.
pub trait ClipVertex: Copy {
    /// Position used for all plane tests.
    fn position(&self) -> Vec2;

    /// Build the vertex at parameter `t` along the edge `self -> other`.
    ///
    /// `t` is always in `[0, 1]`.
    fn interpolate(&self, other: &Self, t: f32) -> Self;
}

/// A vertex that can be stored in a clipped mesh.
///
/// Mesh rebuilds deduplicate vertices by hashing and comparing their raw
/// bytes, so the type must be plain old data.
pub trait MeshVertex: ClipVertex + Pod {}

impl<T: ClipVertex + Pod> MeshVertex for T {}

impl ClipVertex for Vec2 {
    #[inline]
    fn position(&self) -> Vec2 {
        *self
    }

    #[inline]
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        self.lerp(*other, t)
    }
}

/// The attributed vertex emitted by shape, bitmap and text drawing.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ShapeVertex {
    pub position: Vec2,
    pub texcoord: Vec2,
    /// Packed `0xRRGGBBAA` multiply color.
    pub color_multiply: u32,
    /// Packed `0xRRGGBBAA` additive color.
    pub color_add: u32,
}

impl ShapeVertex {
    pub fn new(position: Vec2, texcoord: Vec2, color_multiply: u32, color_add: u32) -> Self {
        Self {
            position,
            texcoord,
            color_multiply,
            color_add,
        }
    }

    /// A white, untextured vertex at `position`.
    pub fn at(position: Vec2) -> Self {
        Self::new(position, Vec2::ZERO, 0xFFFF_FFFF, 0)
    }
}

impl ClipVertex for ShapeVertex {
    #[inline]
    fn position(&self) -> Vec2 {
        self.position
    }

    fn interpolate(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            texcoord: self.texcoord.lerp(other.texcoord, t),
            color_multiply: lerp_color(self.color_multiply, other.color_multiply, t),
            color_add: lerp_color(self.color_add, other.color_add, t),
        }
    }
}

/// One weighted reference from a [`UtilityVertex`] to an original vertex.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct WeightedRef {
    pub weight: f32,
    pub id: u32,
}

/// Maximum number of originals a clipped vertex can reference.
///
/// Clipping a triangle only ever blends its own three corners.
pub const MAX_UTILITY_REFS: usize = 3;

/// A vertex that records which original vertices it was blended from.
///
/// Instead of final attribute values, a utility vertex carries up to
/// three `(weight, id)` pairs. Clip a utility mesh once, then rebuild any
/// attribute set for the same geometry by evaluating the weights.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct UtilityVertex {
    pub position: Vec2,
    refs: [WeightedRef; MAX_UTILITY_REFS],
    count: u32,
    reserved: u32,
}

impl UtilityVertex {
    /// A vertex referencing only original `id` with full weight.
    pub fn new(position: Vec2, id: u32) -> Self {
        let mut v = Self::default();
        v.reset(position, id);
        v
    }

    /// Reinitialize as an unclipped original.
    pub fn reset(&mut self, position: Vec2, id: u32) {
        self.position = position;
        self.refs = [WeightedRef::default(); MAX_UTILITY_REFS];
        self.refs[0] = WeightedRef { weight: 1.0, id };
        self.count = 1;
        self.reserved = 0;
    }

    /// The active references.
    pub fn refs(&self) -> &[WeightedRef] {
        &self.refs[..self.count as usize]
    }

    /// Compare position and references with an absolute `tolerance`.
    pub fn approx_eq(&self, other: &Self, tolerance: f32) -> bool {
        (self.position.x - other.position.x).abs() <= tolerance
            && (self.position.y - other.position.y).abs() <= tolerance
            && self.count == other.count
            && self.refs().iter().zip(other.refs()).all(|(a, b)| {
                a.id == b.id && (a.weight - b.weight).abs() <= tolerance
            })
    }
}

impl ClipVertex for UtilityVertex {
    #[inline]
    fn position(&self) -> Vec2 {
        self.position
    }

    fn interpolate(&self, other: &Self, t: f32) -> Self {
        let mut out = Self {
            position: self.position.lerp(other.position, t),
            refs: [WeightedRef::default(); MAX_UTILITY_REFS],
            count: self.count,
            reserved: 0,
        };

        let w0 = 1.0 - t;
        for (dst, src) in out.refs.iter_mut().zip(self.refs()) {
            *dst = WeightedRef {
                weight: src.weight * w0,
                id: src.id,
            };
        }

        for src in other.refs() {
            let weight = src.weight * t;
            let len = out.count as usize;
            match out.refs[..len].iter_mut().find(|r| r.id == src.id) {
                Some(existing) => existing.weight += weight,
                None => {
                    debug_assert!(
                        len < MAX_UTILITY_REFS,
                        "utility vertex references more than {MAX_UTILITY_REFS} originals"
                    );
                    if len < MAX_UTILITY_REFS {
                        out.refs[len] = WeightedRef { weight, id: src.id };
                        out.count += 1;
                    }
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_shape_vertex_interpolates_attributes() {
        let a = ShapeVertex::new(Vec2::new(0.0, 0.0), Vec2::new(0.0, 0.0), 0x000000FF, 0);
        let b = ShapeVertex::new(Vec2::new(10.0, 0.0), Vec2::new(1.0, 0.5), 0xFEFEFEFF, 0);
        let m = a.interpolate(&b, 0.5);
        assert_relative_eq!(m.position, Vec2::new(5.0, 0.0));
        assert_relative_eq!(m.texcoord, Vec2::new(0.5, 0.25));
        assert_eq!(m.color_multiply, 0x7F7F7FFF);
        assert_eq!(m.color_add, 0);
    }

    #[test]
    fn test_utility_vertex_merges_references() {
        let a = UtilityVertex::new(Vec2::new(0.0, 0.0), 7);
        let b = UtilityVertex::new(Vec2::new(4.0, 0.0), 9);
        let ab = a.interpolate(&b, 0.25);
        assert_relative_eq!(ab.position, Vec2::new(1.0, 0.0));
        assert_eq!(ab.refs().len(), 2);
        assert_eq!(ab.refs()[0].id, 7);
        assert_relative_eq!(ab.refs()[0].weight, 0.75);
        assert_eq!(ab.refs()[1].id, 9);
        assert_relative_eq!(ab.refs()[1].weight, 0.25);

        // Blending back toward an already-referenced original accumulates.
        let back = ab.interpolate(&a, 0.5);
        assert_eq!(back.refs().len(), 2);
        assert_relative_eq!(back.refs()[0].weight, 0.875);
        assert_relative_eq!(back.refs()[1].weight, 0.125);
    }

    #[test]
    fn test_utility_vertex_three_references() {
        let a = UtilityVertex::new(Vec2::new(0.0, 0.0), 0);
        let b = UtilityVertex::new(Vec2::new(2.0, 0.0), 1);
        let c = UtilityVertex::new(Vec2::new(0.0, 2.0), 2);
        let v = a.interpolate(&b, 0.5).interpolate(&c, 0.5);
        assert_eq!(v.refs().len(), 3);
        let total: f32 = v.refs().iter().map(|r| r.weight).sum();
        assert_relative_eq!(total, 1.0);
    }

    #[test]
    fn test_utility_vertex_approx_eq() {
        let a = UtilityVertex::new(Vec2::new(1.0, 1.0), 3);
        let mut b = a;
        b.position.x += 1e-6;
        assert!(a.approx_eq(&b, 1e-5));
        assert_ne!(a, b);
        assert!(!a.approx_eq(&UtilityVertex::new(Vec2::new(1.0, 1.0), 4), 1e-5));
    }
}
