//! Snapshots of the top frame of a [`ClipStack`].

use log::warn;

use crate::clipper::plane::HalfPlane;
use crate::math::vec2::Vec2;
use crate::stack::{ClipStack, ClipState};
use crate::vertex::MeshVertex;

/// A standalone copy of a stack's top frame.
///
/// The captured frame is rebased so its ranges start at zero, which lets it
/// be replayed into any stack with [`ClipCapture::overwrite`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipCapture {
    state: Option<ClipState>,
    hulls: Vec<usize>,
    planes: Vec<HalfPlane>,
    vertices: Vec<Vec2>,
}

impl ClipCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the capture with the top frame of `stack`.
    ///
    /// An empty stack captures "no clip".
    pub fn capture<V: MeshVertex>(&mut self, stack: &ClipStack<V>) {
        self.hulls.clear();
        self.planes.clear();
        self.vertices.clear();

        let Some(top) = stack.top_clip() else {
            self.state = None;
            return;
        };

        if top.hulls > 0 {
            self.hulls
                .extend_from_slice(&stack.hulls()[top.first_hull..top.first_hull + top.hulls]);
        }
        if top.vertices > 0 {
            let range = top.first_vertex..top.first_vertex + top.vertices;
            self.planes.extend_from_slice(&stack.planes()[range.clone()]);
            self.vertices.extend_from_slice(&stack.vertices()[range]);
        }

        self.state = Some(ClipState {
            first_hull: 0,
            first_vertex: 0,
            ..*top
        });
    }

    /// Replace every frame of `stack` with the captured frame.
    ///
    /// A capture of an empty stack clears `stack`.
    pub fn overwrite<V: MeshVertex>(&self, stack: &mut ClipStack<V>) {
        if stack.pending().hulls > 0 {
            warn!(
                "overwriting clip stack with {} pending hulls; they are discarded",
                stack.pending().hulls
            );
        }

        match self.state {
            None => stack.clear(),
            Some(state) => {
                stack.overwrite_with(Some(state), &self.hulls, &self.planes, &self.vertices)
            }
        }
    }

    pub fn state(&self) -> Option<&ClipState> {
        self.state.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_none()
    }

    pub fn hulls(&self) -> &[usize] {
        &self.hulls
    }

    pub fn planes(&self) -> &[HalfPlane] {
        &self.planes
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }
}
