//! The clip stack: nested clip regions built from convex hulls.
//!
//! # Algorithm Overview
//!
//! Each frame of the stack is a union of pairwise disjoint convex hulls.
//! A new frame is accumulated with [`ClipStack::add_convex_hull`] and
//! [`ClipStack::add_rectangle`], then committed with [`ClipStack::push`].
//!
//! Every added hull is first intersected with the current top frame, so a
//! frame always describes the region that is visible through every frame
//! below it. Intersecting a hull with a multi-hull frame can produce one
//! output hull per frame hull.
//!
//! A frame that is a single axis-aligned rectangle is stored as its bounds
//! only ("simple") and clips with four axis-aligned planes.
//!
//! # Storage
//!
//! Hull sizes, hull vertices and per-vertex half-planes live in flat arenas
//! shared by all frames. Frames own contiguous, strictly increasing ranges,
//! so [`ClipStack::pop`] is a truncation. Outside of an add/push window the
//! plane arena and the vertex arena have the same length.

use log::{debug, trace};

use crate::clipper::cache::MeshClipCache;
use crate::clipper::mesh::{
    mesh_clip, mesh_clip_rect, mesh_clip_rect_bounded, MeshPayload, TriangleListDescription,
};
use crate::clipper::plane::{rectangle_planes, write_clip_planes, HalfPlane};
use crate::clipper::polygon::{ClipOutcome, ConvexClipper, RECTANGLE_CLIP_VERTEX_COUNT};
use crate::config::ClipConfig;
use crate::math::mat2x3::Mat2x3;
use crate::math::rect::Rect;
use crate::math::vec2::Vec2;
use crate::vertex::{ClipVertex, MeshVertex, ShapeVertex};

/// One frame of a [`ClipStack`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipState {
    /// Bounds of all hull vertices in the frame.
    pub bounds: Rect,
    pub first_vertex: usize,
    pub vertices: usize,
    pub first_hull: usize,
    pub hulls: usize,
    /// The frame is exactly `bounds` and stores no hulls.
    pub simple: bool,
}

impl Default for ClipState {
    fn default() -> Self {
        Self {
            bounds: Rect::inverse_max(),
            first_vertex: 0,
            vertices: 0,
            first_hull: 0,
            hulls: 0,
            simple: false,
        }
    }
}

/// A stack of clip regions applied to meshes of vertex type `V`.
pub struct ClipStack<V = ShapeVertex> {
    config: ClipConfig,
    cache: MeshClipCache<V>,
    pending: ClipState,
    hulls: Vec<usize>,
    planes: Vec<HalfPlane>,
    stack: Vec<ClipState>,
    vertices: Vec<Vec2>,
    hull_clipper: ConvexClipper<Vec2>,
    scratch_points: Vec<Vec2>,
    scratch_indices: Vec<u16>,
    scratch_vertices: Vec<V>,
}

impl ClipStack {
    /// Create an empty stack for [`ShapeVertex`] meshes with default
    /// tolerances.
    pub fn new() -> Self {
        Self::with_config(ClipConfig::default())
    }
}

impl<V: MeshVertex> ClipStack<V> {
    pub fn with_config(config: ClipConfig) -> Self {
        Self {
            config,
            cache: MeshClipCache::new(),
            pending: ClipState::default(),
            hulls: Vec::new(),
            planes: Vec::new(),
            stack: Vec::new(),
            vertices: Vec::new(),
            hull_clipper: ConvexClipper::new(),
            scratch_points: Vec::new(),
            scratch_indices: Vec::new(),
            scratch_vertices: Vec::new(),
        }
    }

    pub fn config(&self) -> &ClipConfig {
        &self.config
    }

    /// Add a convex hull to the pending frame.
    ///
    /// `points` must wind so the interior has positive signed area.
    pub fn add_convex_hull<T: ClipVertex>(&mut self, points: &[T]) {
        self.vertices.extend(points.iter().map(|p| p.position()));
        self.clip_hull(points.len());
    }

    /// Add a convex hull given in local space.
    ///
    /// A reflecting `transform` reverses the winding, so the transformed
    /// points are then inserted in reverse order.
    pub fn add_convex_hull_transformed<T: ClipVertex>(&mut self, transform: &Mat2x3, points: &[T]) {
        let mapped = points
            .iter()
            .map(|p| transform.transform_position(p.position()));
        if transform.determinant_upper_2x2() < 0.0 {
            self.vertices.extend(mapped.rev());
        } else {
            self.vertices.extend(mapped);
        }
        self.clip_hull(points.len());
    }

    /// Add an axis-aligned rectangle to the pending frame.
    pub fn add_rectangle(&mut self, rect: &Rect) {
        self.add_convex_hull(&rect.hull_corners());
    }

    pub fn add_rectangle_transformed(&mut self, transform: &Mat2x3, rect: &Rect) {
        self.add_convex_hull_transformed(transform, &rect.hull_corners());
    }

    /// Commit the pending frame.
    ///
    /// Returns `false` and discards the pending hulls when the frame is
    /// empty or has zero width or height. Every `true` must be matched by a
    /// [`ClipStack::pop`]; a `false` must not be.
    pub fn push(&mut self) -> bool {
        let first = self.pending.first_vertex;
        let count = self.pending.vertices;
        debug_assert_eq!(
            first + count,
            self.vertices.len(),
            "pending vertices must be the tail of the vertex arena"
        );
        debug_assert_eq!(
            self.pending.first_hull + self.pending.hulls,
            self.hulls.len(),
            "pending hulls must be the tail of the hull arena"
        );

        let points = &self.vertices[first..first + count];
        let bounds = Rect::from_points(points.iter().copied());
        let eps = self.config.simple_epsilon;
        let simple = self.pending.hulls == 1
            && count == 4
            && points.iter().all(|p| {
                (about_equal(p.x, bounds.left, eps) || about_equal(p.x, bounds.right, eps))
                    && (about_equal(p.y, bounds.top, eps) || about_equal(p.y, bounds.bottom, eps))
            });
        self.pending.bounds = bounds;
        self.pending.simple = simple;

        if self.pending.hulls == 0 || count == 0 || bounds.is_degenerate() {
            debug!(
                "discarding degenerate clip frame: {} hulls, {} vertices",
                self.pending.hulls, count
            );
            self.hulls.truncate(self.pending.first_hull);
            self.vertices.truncate(first);
            self.reset_pending();
            return false;
        }

        if simple {
            self.hulls.truncate(self.pending.first_hull);
            self.vertices.truncate(first);
            self.pending.first_hull = 0;
            self.pending.hulls = 0;
            self.pending.first_vertex = 0;
            self.pending.vertices = 0;
        } else {
            self.planes.resize(self.vertices.len(), HalfPlane::default());
            let mut v = first;
            for &n in &self.hulls[self.pending.first_hull..] {
                debug_assert!(n > 0, "committed hulls are never empty");
                write_clip_planes(&self.vertices[v..v + n], &mut self.planes[v..v + n]);
                v += n;
            }
            debug_assert_eq!(v, self.vertices.len(), "every pending vertex belongs to a hull");
        }

        debug_assert_eq!(
            self.planes.len(),
            self.vertices.len(),
            "plane and vertex arenas out of sync"
        );

        trace!(
            "push clip frame {}: simple={}, {} hulls, {} vertices, bounds {:?}",
            self.stack.len(),
            simple,
            self.pending.hulls,
            self.pending.vertices,
            bounds
        );
        self.stack.push(self.pending);
        self.reset_pending();
        true
    }

    /// Remove the top frame.
    ///
    /// Must only follow a [`ClipStack::push`] that returned `true`.
    pub fn pop(&mut self) {
        debug_assert!(self.has_clips(), "pop() without a matching push()");
        let Some(top) = self.stack.pop() else {
            return;
        };

        self.hulls.truncate(self.hulls.len() - top.hulls);
        self.planes.truncate(self.planes.len() - top.vertices);
        self.vertices.truncate(self.vertices.len() - top.vertices);
        debug_assert_eq!(
            self.planes.len(),
            self.vertices.len(),
            "plane and vertex arenas out of sync"
        );

        trace!("pop clip frame {}", self.stack.len());
        self.reset_pending();
    }

    /// Drop every frame and any pending hulls.
    pub fn clear(&mut self) {
        self.stack.clear();
        self.hulls.clear();
        self.planes.clear();
        self.vertices.clear();
        self.pending = ClipState::default();
    }

    pub fn has_clips(&self) -> bool {
        !self.stack.is_empty()
    }

    pub fn top_clip(&self) -> Option<&ClipState> {
        self.stack.last()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Hull vertex arena.
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Hull size arena.
    pub fn hulls(&self) -> &[usize] {
        &self.hulls
    }

    /// Half-plane arena, parallel to [`ClipStack::vertices`].
    pub fn planes(&self) -> &[HalfPlane] {
        &self.planes
    }

    /// True when no frame, hull, plane or vertex is stored.
    pub fn is_fully_clear(&self) -> bool {
        self.stack.is_empty()
            && self.hulls.is_empty()
            && self.planes.is_empty()
            && self.vertices.is_empty()
    }

    /// Conservative `(index_count, vertex_count)` after clipping a mesh of
    /// the given size against the top frame.
    ///
    /// An `index_count` of 0 means the vertices form one convex ring.
    pub fn worst_case_clipping_counts(
        &self,
        index_count: usize,
        vertex_count: usize,
    ) -> (usize, usize) {
        let Some(top) = self.top_clip() else {
            return (index_count, vertex_count);
        };

        let convex_hulls = if index_count == 0 { 1 } else { index_count / 3 };

        // Each clip plane adds at most one vertex to a convex ring. A
        // non-simple frame has one plane per stored vertex, across all hulls.
        let planes = if top.simple {
            RECTANGLE_CLIP_VERTEX_COUNT
        } else {
            top.vertices
        };
        let added_vertices = planes * convex_hulls;
        let added_indices = if index_count == 0 { 0 } else { added_vertices * 3 };

        (index_count + added_indices, vertex_count + added_vertices)
    }

    /// Clip the payload against the top frame.
    ///
    /// No-op when the stack is empty or the payload has no indices or no
    /// vertices.
    pub fn mesh_clip(&mut self, description: TriangleListDescription, payload: MeshPayload<'_, V>) {
        let Some(top) = self.stack.last().copied() else {
            return;
        };
        if payload.index_count == 0 || payload.vertex_count == 0 {
            return;
        }

        let tolerance = self.config.tolerance;
        if top.simple {
            mesh_clip_rect(&mut self.cache, &top.bounds, description, payload, tolerance);
        } else if top.hulls == 1 {
            let planes = &self.planes[top.first_vertex..top.first_vertex + top.vertices];
            mesh_clip(&mut self.cache, planes, description, payload, tolerance);
        } else {
            self.mesh_clip_hulls(&top, description, payload);
        }
    }

    /// Like [`ClipStack::mesh_clip`], with the payload's precomputed bounds
    /// used to skip or reject work for a simple top frame.
    pub fn mesh_clip_bounded(
        &mut self,
        description: TriangleListDescription,
        vertex_bounds: &Rect,
        payload: MeshPayload<'_, V>,
    ) {
        let Some(top) = self.stack.last().copied() else {
            return;
        };
        if payload.index_count == 0 || payload.vertex_count == 0 {
            return;
        }

        if top.simple {
            let tolerance = self.config.tolerance;
            mesh_clip_rect_bounded(
                &mut self.cache,
                &top.bounds,
                description,
                vertex_bounds,
                payload,
                tolerance,
            );
        } else {
            self.mesh_clip(description, payload);
        }
    }

    pub(crate) fn pending(&self) -> &ClipState {
        &self.pending
    }

    /// Replace every frame with `state` and the given arenas.
    pub(crate) fn overwrite_with(
        &mut self,
        state: Option<ClipState>,
        hulls: &[usize],
        planes: &[HalfPlane],
        vertices: &[Vec2],
    ) {
        self.stack.clear();
        self.stack.extend(state);
        self.hulls.clear();
        self.hulls.extend_from_slice(hulls);
        self.planes.clear();
        self.planes.extend_from_slice(planes);
        self.vertices.clear();
        self.vertices.extend_from_slice(vertices);
        self.reset_pending();
    }

    /// Clip the payload once per hull of a multi-hull frame and replace it
    /// with the union of the results.
    fn mesh_clip_hulls(
        &mut self,
        top: &ClipState,
        description: TriangleListDescription,
        mut payload: MeshPayload<'_, V>,
    ) {
        let tolerance = self.config.tolerance;
        let begin_i = payload.begin_index();
        let begin_v = payload.begin_vertex();

        self.scratch_indices.clear();
        self.scratch_vertices.clear();

        let mut first_plane = top.first_vertex;
        for &plane_count in &self.hulls[top.first_hull..top.first_hull + top.hulls] {
            let start_v = self.scratch_vertices.len();
            self.scratch_indices.extend(
                payload.indices[begin_i..]
                    .iter()
                    .map(|&i| (i as usize - begin_v + start_v) as u16),
            );
            self.scratch_vertices
                .extend_from_slice(&payload.vertices[begin_v..]);

            mesh_clip(
                &mut self.cache,
                &self.planes[first_plane..first_plane + plane_count],
                description,
                MeshPayload::new(
                    &mut self.scratch_indices,
                    payload.index_count,
                    &mut self.scratch_vertices,
                    payload.vertex_count,
                ),
                tolerance,
            );

            first_plane += plane_count;
        }

        payload.indices.truncate(begin_i);
        payload
            .indices
            .extend(self.scratch_indices.iter().map(|&i| i + begin_v as u16));
        payload.vertices.truncate(begin_v);
        payload.vertices.extend_from_slice(&self.scratch_vertices);

        self.scratch_indices.clear();
        self.scratch_vertices.clear();
    }

    /// Intersect the last `count` vertices (a candidate hull) with the top
    /// frame and record the resulting hulls as pending.
    fn clip_hull(&mut self, count: usize) {
        debug_assert!(count <= self.vertices.len());

        let top = match self.stack.last().copied() {
            Some(top) if count > 0 => top,
            _ => {
                if count > 0 {
                    self.add_pending_hull(count);
                }
                return;
            }
        };

        let begin = self.vertices.len() - count;
        let tolerance = self.config.tolerance;

        if top.simple || top.hulls == 1 {
            let candidate = &self.vertices[begin..];
            let outcome = if top.simple {
                self.hull_clipper
                    .clip(&rectangle_planes(&top.bounds), candidate, tolerance)
            } else {
                let planes = &self.planes[top.first_vertex..top.first_vertex + top.vertices];
                self.hull_clipper.clip(planes, candidate, tolerance)
            };

            match outcome {
                ClipOutcome::Outside => {
                    debug!("hull of {count} vertices fully clipped by top frame");
                    self.vertices.truncate(begin);
                }
                ClipOutcome::Inside => self.add_pending_hull(count),
                ClipOutcome::Clipped(n) => {
                    self.vertices.truncate(begin);
                    self.vertices.extend_from_slice(self.hull_clipper.output());
                    self.add_pending_hull(n);
                }
            }
            return;
        }

        self.scratch_points.clear();
        self.scratch_points
            .extend_from_slice(&self.vertices[begin..]);
        self.vertices.truncate(begin);

        let mut first_plane = top.first_vertex;
        let mut produced = false;
        for hull in top.first_hull..top.first_hull + top.hulls {
            let plane_count = self.hulls[hull];
            let planes = &self.planes[first_plane..first_plane + plane_count];
            match self
                .hull_clipper
                .clip(planes, &self.scratch_points, tolerance)
            {
                ClipOutcome::Outside => {}
                ClipOutcome::Inside => {
                    // Frame hulls are disjoint: no other hull can overlap.
                    self.vertices.extend_from_slice(&self.scratch_points);
                    self.add_pending_hull(count);
                    return;
                }
                ClipOutcome::Clipped(n) => {
                    self.vertices.extend_from_slice(self.hull_clipper.output());
                    self.add_pending_hull(n);
                    produced = true;
                }
            }
            first_plane += plane_count;
        }

        if !produced {
            debug!("hull of {count} vertices fully clipped by top frame");
        }
    }

    fn add_pending_hull(&mut self, count: usize) {
        self.pending.hulls += 1;
        self.pending.vertices += count;
        self.hulls.push(count);
    }

    fn reset_pending(&mut self) {
        self.pending = ClipState {
            first_hull: self.hulls.len(),
            first_vertex: self.vertices.len(),
            ..ClipState::default()
        };
    }
}

impl<V: MeshVertex> Default for ClipStack<V> {
    fn default() -> Self {
        Self::with_config(ClipConfig::default())
    }
}

fn about_equal(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() <= epsilon
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn diamond() -> [Vec2; 4] {
        [
            Vec2::new(0.0, -3.0),
            Vec2::new(3.0, 0.0),
            Vec2::new(0.0, 3.0),
            Vec2::new(-3.0, 0.0),
        ]
    }

    fn clipped_square() -> [Vec2; 8] {
        [
            Vec2::new(-1.0, -2.0),
            Vec2::new(1.0, -2.0),
            Vec2::new(2.0, -1.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(-1.0, 2.0),
            Vec2::new(-2.0, 1.0),
            Vec2::new(-2.0, -1.0),
        ]
    }

    fn square_mesh() -> (Vec<u16>, Vec<Vec2>) {
        (
            vec![0, 1, 2, 0, 2, 3],
            vec![
                Vec2::new(2.0, -2.0),
                Vec2::new(2.0, 2.0),
                Vec2::new(-2.0, 2.0),
                Vec2::new(-2.0, -2.0),
            ],
        )
    }

    fn assert_vertices_eq(actual: &[Vec2], expected: &[Vec2]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert_relative_eq!(*a, *e, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_simple_rectangle_frame() {
        let mut stack = ClipStack::new();
        stack.add_rectangle(&Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(stack.push());

        let top = stack.top_clip().unwrap();
        assert!(top.simple);
        assert_eq!(top.bounds, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!((top.hulls, top.vertices), (0, 0));
        assert!(stack.hulls().is_empty());
        assert!(stack.planes().is_empty());
        assert!(stack.vertices().is_empty());

        stack.pop();
        assert!(stack.is_fully_clear());
    }

    #[test]
    fn test_zero_width_rectangle_is_rejected() {
        let mut stack = ClipStack::new();
        stack.add_rectangle(&Rect::new(0.0, 0.0, 0.0, 10.0));
        assert!(!stack.push());
        assert!(!stack.has_clips());
        assert!(stack.is_fully_clear());
    }

    #[test]
    fn test_push_without_hulls_is_rejected() {
        let mut stack = ClipStack::new();
        assert!(!stack.push());
        assert!(stack.is_fully_clear());
    }

    #[test]
    fn test_repeated_rejections_leave_stack_usable() {
        let mut stack = ClipStack::new();
        for _ in 0..3 {
            stack.add_rectangle(&Rect::new(5.0, 5.0, 5.0, 5.0));
            assert!(!stack.push());
        }
        stack.add_rectangle(&Rect::new(0.0, 0.0, 1.0, 1.0));
        assert!(stack.push());
        assert_eq!(stack.depth(), 1);
        stack.pop();
        assert!(stack.is_fully_clear());
    }

    #[test]
    fn test_diamond_frame() {
        let mut stack = ClipStack::new();
        stack.add_convex_hull(&diamond());
        assert!(stack.push());

        let top = *stack.top_clip().unwrap();
        assert!(!top.simple);
        assert_eq!(top.bounds, Rect::new(-3.0, -3.0, 3.0, 3.0));
        assert_eq!((top.hulls, top.vertices), (1, 4));
        assert_eq!(stack.hulls(), &[4]);
        assert_eq!(stack.planes().len(), stack.vertices().len());
        for plane in stack.planes() {
            assert!(crate::clipper::ClipPlane::signed_distance(plane, Vec2::ZERO) > 0.0);
        }
    }

    #[test]
    fn test_push_pop_is_reversible() {
        let mut stack = ClipStack::new();
        stack.add_convex_hull(&diamond());
        assert!(stack.push());
        let before = (
            stack.hulls().len(),
            stack.planes().len(),
            stack.vertices().len(),
        );

        stack.add_convex_hull(&[Vec2::new(0.0, 0.0), Vec2::new(0.0, 1.0), Vec2::new(-1.0, 0.5)]);
        assert!(stack.push());
        stack.pop();

        let after = (
            stack.hulls().len(),
            stack.planes().len(),
            stack.vertices().len(),
        );
        assert_eq!(before, after);
        stack.pop();
        assert!(stack.is_fully_clear());
    }

    #[test]
    fn test_mesh_clip_against_diamond() {
        let mut stack = ClipStack::<Vec2>::default();
        stack.add_convex_hull(&diamond());
        assert!(stack.push());

        let (mut indices, mut vertices) = square_mesh();
        stack.mesh_clip(
            TriangleListDescription::Convex,
            MeshPayload::whole(&mut indices, &mut vertices),
        );
        assert_vertices_eq(&vertices, &clipped_square());
        assert_eq!(indices.len(), 18);
    }

    #[test]
    fn test_mirrored_hull_keeps_winding() {
        let mut stack = ClipStack::<Vec2>::default();
        stack.add_convex_hull_transformed(&Mat2x3::scaling(-1.0, 1.0), &diamond());
        assert!(stack.push());
        assert_eq!(stack.vertices()[0], Vec2::new(3.0, 0.0));

        let (mut indices, mut vertices) = square_mesh();
        stack.mesh_clip(
            TriangleListDescription::Convex,
            MeshPayload::whole(&mut indices, &mut vertices),
        );
        assert_vertices_eq(&vertices, &clipped_square());
    }

    #[test]
    fn test_transformed_rectangle_is_simple() {
        let mut stack = ClipStack::new();
        stack.add_rectangle_transformed(
            &Mat2x3::translation(10.0, 20.0),
            &Rect::new(0.0, 0.0, 5.0, 5.0),
        );
        assert!(stack.push());
        let top = stack.top_clip().unwrap();
        assert!(top.simple);
        assert_eq!(top.bounds, Rect::new(10.0, 20.0, 15.0, 25.0));
    }

    #[test]
    fn test_simple_frame_mesh_clip() {
        let mut stack = ClipStack::<Vec2>::default();
        stack.add_rectangle(&Rect::new(0.0, 0.0, 1.0, 1.0));
        assert!(stack.push());

        let mut indices = vec![0, 1, 2, 0, 2, 3];
        let mut vertices = vec![
            Vec2::new(5.0, -5.0),
            Vec2::new(5.0, 5.0),
            Vec2::new(-5.0, 5.0),
            Vec2::new(-5.0, -5.0),
        ];
        stack.mesh_clip(
            TriangleListDescription::QuadList,
            MeshPayload::whole(&mut indices, &mut vertices),
        );
        assert_vertices_eq(
            &vertices,
            &[
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(0.0, 0.0),
            ],
        );
        assert_eq!(indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_nested_hull_is_clipped_to_top_frame() {
        let mut stack = ClipStack::new();
        stack.add_rectangle(&Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(stack.push());
        stack.add_rectangle(&Rect::new(5.0, 5.0, 15.0, 15.0));
        assert!(stack.push());

        let top = stack.top_clip().unwrap();
        assert!(top.simple);
        assert_eq!(top.bounds, Rect::new(5.0, 5.0, 10.0, 10.0));
        assert!(stack.vertices().is_empty());
    }

    #[test]
    fn test_hull_outside_top_frame_is_dropped() {
        let mut stack = ClipStack::new();
        stack.add_rectangle(&Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(stack.push());
        stack.add_rectangle(&Rect::new(20.0, 20.0, 30.0, 30.0));
        assert!(!stack.push());
        assert_eq!(stack.depth(), 1);
        stack.pop();
        assert!(stack.is_fully_clear());
    }

    fn two_hull_stack() -> ClipStack<Vec2> {
        let mut stack = ClipStack::default();
        stack.add_rectangle(&Rect::new(0.0, 0.0, 10.0, 10.0));
        stack.add_rectangle(&Rect::new(20.0, 0.0, 30.0, 10.0));
        assert!(stack.push());
        stack
    }

    #[test]
    fn test_two_hull_frame() {
        let stack = two_hull_stack();
        let top = stack.top_clip().unwrap();
        assert!(!top.simple);
        assert_eq!((top.hulls, top.vertices), (2, 8));
        assert_eq!(top.bounds, Rect::new(0.0, 0.0, 30.0, 10.0));
        assert_eq!(stack.planes().len(), 8);
    }

    #[test]
    fn test_hull_split_by_multi_hull_frame() {
        let mut stack = two_hull_stack();
        stack.add_rectangle(&Rect::new(5.0, 0.0, 25.0, 10.0));
        assert!(stack.push());

        let top = *stack.top_clip().unwrap();
        assert_eq!((top.hulls, top.vertices), (2, 8));
        assert_eq!(top.bounds, Rect::new(5.0, 0.0, 25.0, 10.0));
        assert_eq!(&stack.hulls()[top.first_hull..], &[4, 4]);
        assert_vertices_eq(
            &stack.vertices()[top.first_vertex..],
            &[
                Vec2::new(10.0, 0.0),
                Vec2::new(10.0, 10.0),
                Vec2::new(5.0, 10.0),
                Vec2::new(5.0, 0.0),
                Vec2::new(20.0, 0.0),
                Vec2::new(25.0, 0.0),
                Vec2::new(25.0, 10.0),
                Vec2::new(20.0, 10.0),
            ],
        );
    }

    #[test]
    fn test_hull_inside_one_frame_hull_stops_early() {
        let mut stack = two_hull_stack();
        stack.add_rectangle(&Rect::new(2.0, 2.0, 8.0, 8.0));
        assert!(stack.push());
        let top = stack.top_clip().unwrap();
        assert!(top.simple);
        assert_eq!(top.bounds, Rect::new(2.0, 2.0, 8.0, 8.0));
    }

    #[test]
    fn test_mesh_clip_multi_hull_union() {
        let mut stack = two_hull_stack();
        let mut indices = vec![0, 1, 2, 0, 2, 3];
        let mut vertices = vec![
            Vec2::new(-5.0, 2.0),
            Vec2::new(35.0, 2.0),
            Vec2::new(35.0, 8.0),
            Vec2::new(-5.0, 8.0),
        ];
        stack.mesh_clip(
            TriangleListDescription::Convex,
            MeshPayload::whole(&mut indices, &mut vertices),
        );
        assert_eq!(indices, vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);
        assert_vertices_eq(
            &vertices,
            &[
                Vec2::new(0.0, 2.0),
                Vec2::new(10.0, 2.0),
                Vec2::new(10.0, 8.0),
                Vec2::new(0.0, 8.0),
                Vec2::new(20.0, 2.0),
                Vec2::new(30.0, 2.0),
                Vec2::new(30.0, 8.0),
                Vec2::new(20.0, 8.0),
            ],
        );
    }

    #[test]
    fn test_mesh_clip_multi_hull_keeps_prefix() {
        let mut stack = two_hull_stack();
        let mut indices = vec![0u16, 1, 2];
        let mut vertices = vec![Vec2::new(1.0, 1.0); 3];
        indices.extend_from_slice(&[3, 4, 5, 3, 5, 6]);
        vertices.extend_from_slice(&[
            Vec2::new(-5.0, 2.0),
            Vec2::new(35.0, 2.0),
            Vec2::new(35.0, 8.0),
            Vec2::new(-5.0, 8.0),
        ]);
        stack.mesh_clip(
            TriangleListDescription::Convex,
            MeshPayload::new(&mut indices, 6, &mut vertices, 4),
        );
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5, 3, 5, 6, 7, 8, 9, 7, 9, 10]);
        assert_eq!(vertices.len(), 11);
    }

    #[test]
    fn test_mesh_clip_without_frames_is_noop() {
        let mut stack = ClipStack::<Vec2>::default();
        let (mut indices, mut vertices) = square_mesh();
        stack.mesh_clip(
            TriangleListDescription::NotSpecific,
            MeshPayload::whole(&mut indices, &mut vertices),
        );
        assert_eq!((indices, vertices), square_mesh());
    }

    #[test]
    fn test_mesh_clip_bounded_rejects_by_bounds() {
        let mut stack = ClipStack::new();
        stack.add_rectangle(&Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(stack.push());

        let mut indices = vec![0, 1, 2];
        let mut vertices = vec![
            ShapeVertex::at(Vec2::new(20.0, 0.0)),
            ShapeVertex::at(Vec2::new(30.0, 0.0)),
            ShapeVertex::at(Vec2::new(20.0, 5.0)),
        ];
        stack.mesh_clip_bounded(
            TriangleListDescription::NotSpecific,
            &Rect::new(20.0, 0.0, 30.0, 5.0),
            MeshPayload::whole(&mut indices, &mut vertices),
        );
        assert!(indices.is_empty());
        assert!(vertices.is_empty());
    }

    #[test]
    fn test_worst_case_counts() {
        let mut stack = ClipStack::new();
        assert_eq!(stack.worst_case_clipping_counts(6, 4), (6, 4));

        stack.add_rectangle(&Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(stack.push());
        assert_eq!(stack.worst_case_clipping_counts(6, 4), (30, 12));
        assert_eq!(stack.worst_case_clipping_counts(0, 4), (0, 8));
        stack.pop();

        stack.add_convex_hull(&diamond());
        assert!(stack.push());
        assert_eq!(stack.worst_case_clipping_counts(3, 3), (15, 7));
        stack.pop();

        let stack = two_hull_stack();
        assert_eq!(stack.worst_case_clipping_counts(3, 3), (27, 11));
    }

    #[test]
    fn test_clear() {
        let mut stack = two_hull_stack();
        stack.add_convex_hull(&diamond());
        stack.clear();
        assert!(stack.is_fully_clear());
        assert_eq!(stack.pending(), &ClipState::default());
    }

    #[test]
    fn test_hull_between_frame_hulls_is_dropped() {
        let mut stack = two_hull_stack();
        stack.add_rectangle(&Rect::new(12.0, 2.0, 18.0, 8.0));
        assert_eq!(stack.pending().hulls, 0);
        assert!(!stack.push());

        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.hulls(), &[4, 4]);
        assert_eq!(stack.vertices().len(), 8);
        assert_eq!(stack.planes().len(), 8);
    }

    #[test]
    fn test_repeated_vertex_on_bounds_is_simple() {
        let mut stack = ClipStack::new();
        stack.add_convex_hull(&[
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(0.0, 10.0),
        ]);
        assert!(stack.push());

        let top = stack.top_clip().unwrap();
        assert!(top.simple);
        assert_eq!(top.bounds, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(stack.vertices().is_empty());
        assert!(stack.hulls().is_empty());
    }

    #[test]
    fn test_mesh_clip_multi_hull_quad_list() {
        let mut stack = two_hull_stack();
        let mut indices = vec![0u16, 0, 0];
        let mut vertices = vec![Vec2::new(1.0, 1.0)];
        indices.extend_from_slice(&[1, 2, 3, 1, 3, 4, 5, 6, 7, 5, 7, 8]);
        vertices.extend_from_slice(&[
            // Inside the left hull only.
            Vec2::new(2.0, 2.0),
            Vec2::new(8.0, 2.0),
            Vec2::new(8.0, 8.0),
            Vec2::new(2.0, 8.0),
            // Crosses both hulls.
            Vec2::new(5.0, 2.0),
            Vec2::new(25.0, 2.0),
            Vec2::new(25.0, 8.0),
            Vec2::new(5.0, 8.0),
        ]);
        stack.mesh_clip(
            TriangleListDescription::QuadList,
            MeshPayload::new(&mut indices, 12, &mut vertices, 8),
        );

        assert_eq!(
            indices,
            vec![0, 0, 0, 1, 2, 3, 1, 3, 4, 5, 6, 7, 5, 7, 8, 9, 10, 11, 9, 11, 12]
        );
        assert_vertices_eq(
            &vertices,
            &[
                Vec2::new(1.0, 1.0),
                Vec2::new(2.0, 2.0),
                Vec2::new(8.0, 2.0),
                Vec2::new(8.0, 8.0),
                Vec2::new(2.0, 8.0),
                Vec2::new(5.0, 2.0),
                Vec2::new(10.0, 2.0),
                Vec2::new(10.0, 8.0),
                Vec2::new(5.0, 8.0),
                Vec2::new(20.0, 2.0),
                Vec2::new(25.0, 2.0),
                Vec2::new(25.0, 8.0),
                Vec2::new(20.0, 8.0),
            ],
        );
    }

    #[test]
    fn test_mesh_clip_multi_hull_not_specific() {
        let mut stack = two_hull_stack();
        let mut indices = vec![0u16, 0, 0];
        let mut vertices = vec![Vec2::new(1.0, 1.0)];
        indices.extend_from_slice(&[1, 2, 3, 1, 3, 4]);
        vertices.extend_from_slice(&[
            Vec2::new(5.0, 2.0),
            Vec2::new(25.0, 2.0),
            Vec2::new(25.0, 8.0),
            Vec2::new(5.0, 8.0),
        ]);
        stack.mesh_clip(
            TriangleListDescription::NotSpecific,
            MeshPayload::new(&mut indices, 6, &mut vertices, 4),
        );

        assert_eq!(&indices[..3], &[0, 0, 0]);
        assert_eq!(vertices[0], Vec2::new(1.0, 1.0));
        assert_eq!((indices.len() - 3) % 3, 0);

        let mut area = 0.0;
        for tri in indices[3..].chunks(3) {
            assert!(tri.iter().all(|&i| i >= 1 && (i as usize) < vertices.len()));
            let [a, b, c] = [0, 1, 2].map(|k| vertices[tri[k] as usize]);
            let ab = b - a;
            let ac = c - a;
            area += 0.5 * (ab.x * ac.y - ab.y * ac.x).abs();
        }
        // (10 - 5) * 6 from the left hull plus (25 - 20) * 6 from the right.
        assert_relative_eq!(area, 60.0, epsilon = 1e-3);

        for v in &vertices[1..] {
            assert!(
                (5.0 - 1e-4..=10.0 + 1e-4).contains(&v.x)
                    || (20.0 - 1e-4..=25.0 + 1e-4).contains(&v.x),
                "{v:?} lies outside both hulls"
            );
        }
    }
}
