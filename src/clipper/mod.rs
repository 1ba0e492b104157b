//! Polygon and mesh clipping against convex regions.
//!
//! - [`plane`]: half-planes, axis-aligned planes and plane construction.
//! - [`polygon`]: Sutherland-Hodgman clipping of a single convex ring.
//! - [`mesh`]: in-place clipping of indexed triangle meshes.
//! - [`builder`]: vertex deduplication used when rebuilding meshes.

pub mod builder;
pub mod cache;
pub mod mesh;
pub mod plane;
pub mod polygon;

pub use cache::MeshClipCache;
pub use mesh::{
    mesh_clip, mesh_clip_rect, mesh_clip_rect_bounded, MeshPayload, TriangleListDescription,
};
pub use plane::{compute_clip_planes, rectangle_planes, Axis, ClipPlane, HalfPlane, Plane1D};
pub use polygon::{
    convex_clip, convex_clip_rect, plane_clip, ClipOutcome, ConvexClipper,
    RECTANGLE_CLIP_VERTEX_COUNT,
};
