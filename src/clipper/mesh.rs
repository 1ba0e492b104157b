//! In-place clipping of indexed triangle meshes.
//!
//! # Algorithm Overview
//!
//! The payload is the trailing `index_count` indices and `vertex_count`
//! vertices of a pair of running buffers, so a batcher can clip what it
//! just appended without touching earlier draws. The payload is rewritten
//! in place:
//!
//! - fully clipped: the payload is removed from both buffers,
//! - untouched: both buffers are left exactly as they were,
//! - partially clipped: the payload is replaced by the clipped mesh.
//!
//! Three strategies are picked by the [`TriangleListDescription`] hint:
//!
//! 1. **Convex**: the whole payload is one convex ring. It is clipped once
//!    and re-triangulated as a fan.
//! 2. **Quad list**: every 4 vertices / 6 indices form an independent quad.
//!    Output is staged only from the first quad that changes, so a payload
//!    nothing crosses is never copied.
//! 3. **Not specific**: an arbitrary triangle soup. Each triangle with a
//!    vertex outside any plane is clipped on its own; generated vertices are
//!    deduplicated through [`MeshBuilder`](super::builder::MeshBuilder) and a
//!    final compaction drops vertices no index uses.

use std::fmt;

use log::trace;

use super::cache::MeshClipCache;
use super::plane::{rectangle_planes, Axis, ClipPlane, Plane1D};
use super::polygon::ClipOutcome;
use crate::math::rect::Rect;
use crate::math::vec2::Vec2;
use crate::vertex::{ClipVertex, MeshVertex};

/// Topology hint for a triangle list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriangleListDescription {
    /// The vertices form a single convex ring.
    Convex,
    /// Independent quads, 4 vertices and 6 indices each.
    QuadList,
    /// Glyph quads; clipped like [`TriangleListDescription::QuadList`].
    TextChunk,
    /// Arbitrary triangles.
    #[default]
    NotSpecific,
}

impl fmt::Display for TriangleListDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriangleListDescription::Convex => write!(f, "Convex"),
            TriangleListDescription::QuadList => write!(f, "Quad List"),
            TriangleListDescription::TextChunk => write!(f, "Text Chunk"),
            TriangleListDescription::NotSpecific => write!(f, "Not Specific"),
        }
    }
}

/// The trailing part of an index buffer and a vertex buffer to clip.
///
/// Indices are absolute into `vertices`, and the payload's indices only
/// reference payload vertices.
pub struct MeshPayload<'a, V> {
    pub indices: &'a mut Vec<u16>,
    pub index_count: usize,
    pub vertices: &'a mut Vec<V>,
    pub vertex_count: usize,
}

impl<'a, V: Copy> MeshPayload<'a, V> {
    pub fn new(
        indices: &'a mut Vec<u16>,
        index_count: usize,
        vertices: &'a mut Vec<V>,
        vertex_count: usize,
    ) -> Self {
        debug_assert!(
            index_count <= indices.len(),
            "index count {index_count} exceeds buffer of {}",
            indices.len()
        );
        debug_assert!(
            vertex_count <= vertices.len(),
            "vertex count {vertex_count} exceeds buffer of {}",
            vertices.len()
        );
        Self {
            indices,
            index_count,
            vertices,
            vertex_count,
        }
    }

    /// The entire contents of both buffers.
    pub fn whole(indices: &'a mut Vec<u16>, vertices: &'a mut Vec<V>) -> Self {
        let index_count = indices.len();
        let vertex_count = vertices.len();
        Self::new(indices, index_count, vertices, vertex_count)
    }

    pub fn begin_index(&self) -> usize {
        self.indices.len() - self.index_count
    }

    pub fn begin_vertex(&self) -> usize {
        self.vertices.len() - self.vertex_count
    }

    /// Remove the payload from both buffers.
    fn discard(&mut self) {
        let (begin_i, begin_v) = (self.begin_index(), self.begin_vertex());
        self.indices.truncate(begin_i);
        self.vertices.truncate(begin_v);
    }
}

/// A vertex paired with its index in the source mesh.
///
/// Vertices generated at plane crossings carry `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tracked<V> {
    pub vertex: V,
    pub original: Option<u16>,
}

impl<V: ClipVertex> ClipVertex for Tracked<V> {
    #[inline]
    fn position(&self) -> Vec2 {
        self.vertex.position()
    }

    #[inline]
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        Tracked {
            vertex: self.vertex.interpolate(&other.vertex, t),
            original: None,
        }
    }
}

/// Append fan indices `(base, base + i - 1, base + i)` for a convex ring of
/// `count` vertices.
pub fn append_convex_indices(indices: &mut Vec<u16>, count: usize, base: u16) {
    for i in 2..count as u16 {
        indices.extend_from_slice(&[base, base + i - 1, base + i]);
    }
}

/// Clip the payload against a set of planes.
///
/// An empty plane set leaves the payload untouched.
pub fn mesh_clip<P, V>(
    cache: &mut MeshClipCache<V>,
    planes: &[P],
    description: TriangleListDescription,
    mut payload: MeshPayload<'_, V>,
    tolerance: f32,
) where
    P: ClipPlane,
    V: MeshVertex,
{
    if planes.is_empty() {
        return;
    }

    trace!(
        "mesh clip ({description}): {} planes, {} indices, {} vertices",
        planes.len(),
        payload.index_count,
        payload.vertex_count
    );

    match description {
        TriangleListDescription::Convex => clip_convex(cache, planes, &mut payload, tolerance),
        TriangleListDescription::QuadList | TriangleListDescription::TextChunk
            if payload.vertex_count == 4 =>
        {
            clip_convex(cache, planes, &mut payload, tolerance)
        }
        TriangleListDescription::QuadList | TriangleListDescription::TextChunk => {
            clip_quad_list(cache, planes, &mut payload, tolerance)
        }
        TriangleListDescription::NotSpecific => {
            clip_not_specific(cache, planes, &mut payload, tolerance)
        }
    }
}

/// Clip the payload against an axis-aligned rectangle.
pub fn mesh_clip_rect<V: MeshVertex>(
    cache: &mut MeshClipCache<V>,
    rect: &Rect,
    description: TriangleListDescription,
    payload: MeshPayload<'_, V>,
    tolerance: f32,
) {
    mesh_clip(cache, &rectangle_planes(rect), description, payload, tolerance);
}

/// Clip the payload against a rectangle, using the payload's precomputed
/// `vertex_bounds` to skip planes that cannot cut it.
///
/// A payload entirely beyond any edge is removed without clipping, and one
/// entirely inside is left untouched.
pub fn mesh_clip_rect_bounded<V: MeshVertex>(
    cache: &mut MeshClipCache<V>,
    rect: &Rect,
    description: TriangleListDescription,
    vertex_bounds: &Rect,
    mut payload: MeshPayload<'_, V>,
    tolerance: f32,
) {
    if vertex_bounds.right <= rect.left
        || vertex_bounds.top >= rect.bottom
        || vertex_bounds.left >= rect.right
        || vertex_bounds.bottom <= rect.top
    {
        trace!("mesh clip: payload bounds outside clip rect, discarding");
        payload.discard();
        return;
    }

    let mut planes = [Plane1D::new(Axis::X, 0.0, 0.0); 4];
    let mut count = 0;
    let mut keep = |plane: Plane1D| {
        planes[count] = plane;
        count += 1;
    };
    if vertex_bounds.left < rect.left {
        keep(Plane1D::new(Axis::X, rect.left, 1.0));
    }
    if vertex_bounds.bottom > rect.bottom {
        keep(Plane1D::new(Axis::Y, rect.bottom, -1.0));
    }
    if vertex_bounds.right > rect.right {
        keep(Plane1D::new(Axis::X, rect.right, -1.0));
    }
    if vertex_bounds.top < rect.top {
        keep(Plane1D::new(Axis::Y, rect.top, 1.0));
    }

    mesh_clip(cache, &planes[..count], description, payload, tolerance);
}

// ─────────────────────────────────────────────────────────────────────────────
// Convex
// ─────────────────────────────────────────────────────────────────────────────

fn clip_convex<P: ClipPlane, V: MeshVertex>(
    cache: &mut MeshClipCache<V>,
    planes: &[P],
    payload: &mut MeshPayload<'_, V>,
    tolerance: f32,
) {
    let begin_i = payload.begin_index();
    let begin_v = payload.begin_vertex();

    match cache
        .clipper
        .clip(planes, &payload.vertices[begin_v..], tolerance)
    {
        ClipOutcome::Outside => payload.discard(),
        ClipOutcome::Inside => {}
        ClipOutcome::Clipped(n) => {
            payload.vertices.truncate(begin_v);
            payload.vertices.extend_from_slice(cache.clipper.output());
            payload.indices.truncate(begin_i);
            append_convex_indices(payload.indices, n, begin_v as u16);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Quad list
// ─────────────────────────────────────────────────────────────────────────────

fn clip_quad_list<P: ClipPlane, V: MeshVertex>(
    cache: &mut MeshClipCache<V>,
    planes: &[P],
    payload: &mut MeshPayload<'_, V>,
    tolerance: f32,
) {
    debug_assert_eq!(payload.index_count % 6, 0, "quad list index count must be a multiple of 6");
    debug_assert_eq!(payload.vertex_count % 4, 0, "quad list vertex count must be a multiple of 4");

    let begin_i = payload.begin_index();
    let begin_v = payload.begin_vertex();
    let quads = payload.index_count / 6;

    cache.clip_indices.clear();
    cache.clip_vertices.clear();

    // Where staging started, once a quad has changed.
    let mut clip_start: Option<(usize, usize)> = None;
    let mut total_out = 0usize;
    for quad in 0..quads {
        let i = begin_i + quad * 6;
        let v = begin_v + quad * 4;
        let source = &payload.vertices[v..v + 4];
        let outcome = cache.clipper.clip(planes, source, tolerance);

        if clip_start.is_some() || outcome != ClipOutcome::Inside {
            let emitted = match outcome {
                ClipOutcome::Outside => None,
                ClipOutcome::Inside => Some(source),
                ClipOutcome::Clipped(_) => Some(cache.clipper.output()),
            };
            if let Some(ring) = emitted {
                let base = (total_out + begin_v) as u16;
                cache.clip_vertices.extend_from_slice(ring);
                append_convex_indices(&mut cache.clip_indices, ring.len(), base);
            }
            clip_start.get_or_insert((i, v));
        }

        total_out += match outcome {
            ClipOutcome::Outside => 0,
            ClipOutcome::Inside => 4,
            ClipOutcome::Clipped(n) => n,
        };
    }

    if let Some((clip_i, clip_v)) = clip_start {
        payload.indices.truncate(clip_i);
        payload.indices.extend_from_slice(&cache.clip_indices);
        payload.vertices.truncate(clip_v);
        payload.vertices.extend_from_slice(&cache.clip_vertices);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Triangle soup
// ─────────────────────────────────────────────────────────────────────────────

fn clip_not_specific<P: ClipPlane, V: MeshVertex>(
    cache: &mut MeshClipCache<V>,
    planes: &[P],
    payload: &mut MeshPayload<'_, V>,
    tolerance: f32,
) {
    debug_assert_eq!(
        payload.index_count % 3,
        0,
        "triangle list index count must be a multiple of 3"
    );

    let begin_i = payload.begin_index();
    let begin_v = payload.begin_vertex();
    let end_i = payload.indices.len();

    cache.builder.reset(begin_v as u16, payload.vertex_count);

    // A vertex inside every plane never needs clipping.
    cache.inside.clear();
    cache.inside.extend(payload.vertices[begin_v..].iter().map(|v| {
        let p = v.position();
        planes.iter().all(|plane| plane.signed_distance(p) >= -tolerance)
    }));

    let mut clipping = false;
    for tri in (begin_i..end_i).step_by(3) {
        let corners = [
            payload.indices[tri],
            payload.indices[tri + 1],
            payload.indices[tri + 2],
        ];

        let outcome = if corners
            .iter()
            .all(|&c| cache.inside[c as usize - begin_v])
        {
            ClipOutcome::Inside
        } else {
            cache.triangle.clear();
            cache.triangle.extend(corners.iter().map(|&c| Tracked {
                vertex: payload.vertices[c as usize],
                original: Some(c),
            }));
            cache
                .tracked_clipper
                .clip(planes, &cache.triangle, tolerance)
        };

        // First change: carry everything so far into the builder.
        if outcome != ClipOutcome::Inside && !clipping {
            cache.builder.extend_indices(&payload.indices[begin_i..tri]);
            for &vertex in &payload.vertices[begin_v..] {
                cache.builder.push_original(vertex);
            }
            clipping = true;
        }

        match outcome {
            ClipOutcome::Outside => {}
            ClipOutcome::Inside => {
                if clipping {
                    cache.builder.extend_indices(&corners);
                }
            }
            ClipOutcome::Clipped(n) => {
                let ring = cache.tracked_clipper.output();
                for j in 2..n {
                    for corner in [ring[0], ring[j - 1], ring[j]] {
                        match corner.original {
                            Some(index) => cache.builder.push_index(index),
                            None => cache.builder.merge_vertex(corner.vertex),
                        }
                    }
                }
            }
        }
    }

    if !clipping {
        return;
    }

    // Compact: keep only referenced vertices, in first-use order.
    payload.indices.truncate(begin_i);
    payload.vertices.truncate(begin_v);

    let built = cache.builder.vertices();
    cache.remap.clear();
    cache.remap.resize(built.len(), None);
    let mut next = begin_v as u16;
    for &index in cache.builder.indices() {
        let rel = (index as usize) - begin_v;
        let mapped = match cache.remap[rel] {
            Some(mapped) => mapped,
            None => {
                let mapped = next;
                next += 1;
                cache.remap[rel] = Some(mapped);
                payload.vertices.push(built[rel]);
                mapped
            }
        };
        payload.indices.push(mapped);
    }
}
