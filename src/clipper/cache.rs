//! Scratch state reused across mesh clip calls.

use super::builder::MeshBuilder;
use super::mesh::Tracked;
use super::polygon::ConvexClipper;
use crate::vertex::MeshVertex;

/// Reusable buffers for [`mesh_clip`](super::mesh::mesh_clip) and friends.
///
/// Keep one per vertex type alive across draws; every clip call resets the
/// parts it uses, so nothing leaks from one call into the next.
pub struct MeshClipCache<V> {
    pub(crate) clipper: ConvexClipper<V>,
    pub(crate) tracked_clipper: ConvexClipper<Tracked<V>>,
    pub(crate) triangle: Vec<Tracked<V>>,
    pub(crate) inside: Vec<bool>,
    pub(crate) remap: Vec<Option<u16>>,
    pub(crate) clip_indices: Vec<u16>,
    pub(crate) clip_vertices: Vec<V>,
    pub(crate) builder: MeshBuilder<V>,
}

impl<V: MeshVertex> MeshClipCache<V> {
    pub fn new() -> Self {
        Self {
            clipper: ConvexClipper::new(),
            tracked_clipper: ConvexClipper::new(),
            triangle: Vec::with_capacity(3),
            inside: Vec::new(),
            remap: Vec::new(),
            clip_indices: Vec::new(),
            clip_vertices: Vec::new(),
            builder: MeshBuilder::new(),
        }
    }
}

impl<V: MeshVertex> Default for MeshClipCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
