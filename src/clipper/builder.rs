//! Vertex-deduplicating mesh builder.
//!
//! Used while rebuilding a triangle soup after clipping: every emitted
//! vertex is hashed by its raw bytes, and a bit-identical vertex already in
//! the mesh is reused instead of appended.
//!
//! The lookup is an open-addressing table with linear probing and a
//! power-of-two capacity. It always keeps at least one empty slot, so a
//! probe for a missing vertex terminates.

use std::hash::Hasher;

use rustc_hash::FxHasher;

use crate::vertex::MeshVertex;

#[derive(Clone, Copy, Debug)]
struct LookupEntry {
    hash: u64,
    /// Position in `MeshBuilder::vertices`.
    index: u16,
}

pub struct MeshBuilder<V> {
    lookup: Vec<Option<LookupEntry>>,
    scratch: Vec<Option<LookupEntry>>,
    indices: Vec<u16>,
    vertices: Vec<V>,
    base: u16,
}

impl<V: MeshVertex> MeshBuilder<V> {
    pub fn new() -> Self {
        Self {
            lookup: Vec::new(),
            scratch: Vec::new(),
            indices: Vec::new(),
            vertices: Vec::new(),
            base: 0,
        }
    }

    /// Start a new mesh whose indices are offset by `base`.
    ///
    /// Allocations are kept; the lookup is sized for at least
    /// `expected_vertices`.
    pub fn reset(&mut self, base: u16, expected_vertices: usize) {
        self.lookup.clear();
        self.grow(expected_vertices);
        self.scratch.clear();
        self.indices.clear();
        self.vertices.clear();
        self.vertices.reserve(expected_vertices);
        self.base = base;
    }

    /// Append the index of `vertex`, inserting it if no bit-identical vertex
    /// exists yet.
    pub fn merge_vertex(&mut self, vertex: V) {
        let hash = hash_vertex(&vertex);
        let local = self.resolve(vertex, hash);
        self.indices.push(local + self.base);
    }

    /// Append a vertex at the next position unconditionally.
    ///
    /// Used to carry over the vertices of the mesh being rebuilt so their
    /// existing indices stay valid. The vertex is registered for
    /// deduplication unless an identical one is already registered.
    pub fn push_original(&mut self, vertex: V) {
        self.reserve_one();
        let hash = hash_vertex(&vertex);
        let local = self.next_local();
        if let Err(slot) = self.probe(&vertex, hash) {
            self.lookup[slot] = Some(LookupEntry { hash, index: local });
        }
        self.vertices.push(vertex);
    }

    /// Append an index that already refers into this mesh.
    pub fn push_index(&mut self, index: u16) {
        self.indices.push(index);
    }

    pub fn extend_indices(&mut self, indices: &[u16]) {
        self.indices.extend_from_slice(indices);
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    pub fn base(&self) -> u16 {
        self.base
    }

    /// Returns the local position of `vertex`, inserting it if needed.
    fn resolve(&mut self, vertex: V, hash: u64) -> u16 {
        self.reserve_one();
        match self.probe(&vertex, hash) {
            Ok(index) => index,
            Err(slot) => {
                let index = self.next_local();
                self.vertices.push(vertex);
                self.lookup[slot] = Some(LookupEntry { hash, index });
                index
            }
        }
    }

    /// `Ok(local index)` for a registered equal vertex, otherwise
    /// `Err(empty slot)` where it would be inserted.
    fn probe(&self, vertex: &V, hash: u64) -> Result<u16, usize> {
        let mask = self.lookup.len() - 1;
        let mut slot = hash as usize & mask;
        loop {
            match self.lookup[slot] {
                None => return Err(slot),
                Some(entry) => {
                    if entry.hash == hash
                        && bytemuck::bytes_of(&self.vertices[entry.index as usize])
                            == bytemuck::bytes_of(vertex)
                    {
                        return Ok(entry.index);
                    }
                }
            }
            slot = (slot + 1) & mask;
        }
    }

    /// Keep room for one more entry plus an empty slot.
    fn reserve_one(&mut self) {
        if self.vertices.len() + 1 >= self.lookup.len() {
            self.grow(self.lookup.len() + 1);
        }
    }

    fn next_local(&self) -> u16 {
        debug_assert!(
            self.vertices.len() + self.base as usize <= u16::MAX as usize,
            "mesh builder exceeded 16-bit index range"
        );
        self.vertices.len() as u16
    }

    /// Grow the lookup to at least `capacity` slots, rounded up to a power
    /// of two, and rehash. No-op when already large enough.
    fn grow(&mut self, capacity: usize) {
        let capacity = capacity.max(1).next_power_of_two();
        if capacity <= self.lookup.len() {
            return;
        }

        self.scratch.clear();
        self.scratch.resize(capacity, None);
        let mask = capacity - 1;
        for entry in self.lookup.iter().flatten() {
            let mut slot = entry.hash as usize & mask;
            while self.scratch[slot].is_some() {
                slot = (slot + 1) & mask;
            }
            self.scratch[slot] = Some(*entry);
        }

        std::mem::swap(&mut self.lookup, &mut self.scratch);
    }
}

impl<V: MeshVertex> Default for MeshBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

fn hash_vertex<V: MeshVertex>(vertex: &V) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(bytemuck::bytes_of(vertex));
    hasher.finish()
}
