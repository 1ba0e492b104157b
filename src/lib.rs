//! A 2D clip and mask engine for batched vector rendering.
//!
//! Draw calls are clipped on the CPU against a stack of nested clip regions,
//! each a union of convex hulls, before they reach the GPU.
//!
//! # Quick Start
//!
//! ```
//! use falcon_clip::prelude::*;
//!
//! let mut stack = ClipStack::<Vec2>::default();
//! stack.add_rectangle(&Rect::new(0.0, 0.0, 10.0, 10.0));
//! assert!(stack.push());
//!
//! let mut indices = vec![0, 1, 2, 0, 2, 3];
//! let mut vertices = vec![
//!     Vec2::new(5.0, -5.0),
//!     Vec2::new(15.0, -5.0),
//!     Vec2::new(15.0, 5.0),
//!     Vec2::new(5.0, 5.0),
//! ];
//! stack.mesh_clip(
//!     TriangleListDescription::Convex,
//!     MeshPayload::whole(&mut indices, &mut vertices),
//! );
//! assert_eq!(vertices.len(), 4);
//!
//! stack.pop();
//! ```

// Public API - exposed to library consumers
pub mod capture;
pub mod clipper;
pub mod color;
pub mod config;
pub mod math;
pub mod stack;
pub mod vertex;

// Re-export commonly needed types at crate root for convenience
pub use capture::ClipCapture;
pub use clipper::{
    mesh_clip, mesh_clip_rect, mesh_clip_rect_bounded, ClipOutcome, MeshClipCache, MeshPayload,
    TriangleListDescription,
};
pub use config::{ClipConfig, ConfigError, ABOUT_EQUAL_POSITION};
pub use stack::{ClipStack, ClipState};
pub use vertex::{ClipVertex, MeshVertex, ShapeVertex, UtilityVertex};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use falcon_clip::prelude::*;
/// ```
pub mod prelude {
    // Stack
    pub use crate::capture::ClipCapture;
    pub use crate::stack::{ClipStack, ClipState};

    // Mesh clipping
    pub use crate::clipper::{MeshPayload, TriangleListDescription};

    // Configuration
    pub use crate::config::ClipConfig;

    // Math
    pub use crate::math::mat2x3::Mat2x3;
    pub use crate::math::rect::Rect;
    pub use crate::math::vec2::Vec2;

    // Vertices
    pub use crate::vertex::{ClipVertex, ShapeVertex, UtilityVertex};
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::clipper::builder::MeshBuilder;
    pub use crate::clipper::{
        compute_clip_planes, convex_clip, rectangle_planes, ConvexClipper, HalfPlane,
    };
}
