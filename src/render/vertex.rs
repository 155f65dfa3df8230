use crate::foundation::error::{CinematicError, CinematicResult};
use crate::render::adapter::ScreenVertex;

/// Scratch stream of screen vertices reused across draws.
///
/// The buffer never grows past its capacity; [`VertexBuffer::fill`] fails with
/// [`CinematicError::VertexCapacity`] instead.
#[derive(Clone, Debug)]
pub struct VertexBuffer {
    vertices: Vec<ScreenVertex>,
    capacity: usize,
}

impl VertexBuffer {
    /// Buffer holding at most `capacity` vertices.
    pub fn new(capacity: usize) -> Self {
        Self {
            vertices: Vec::new(),
            capacity,
        }
    }

    /// Maximum number of vertices.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Vertices written by the last fill.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Return `true` when nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Replace the contents with `vertices`.
    pub fn fill(
        &mut self,
        vertices: impl ExactSizeIterator<Item = ScreenVertex>,
    ) -> CinematicResult<()> {
        let needed = vertices.len();
        if needed > self.capacity {
            return Err(CinematicError::VertexCapacity {
                needed,
                capacity: self.capacity,
            });
        }
        self.vertices.clear();
        self.vertices.extend(vertices);
        Ok(())
    }

    /// Written vertices.
    pub fn as_slice(&self) -> &[ScreenVertex] {
        &self.vertices
    }

    /// Written vertices, mutably (UV rewrites between material groups).
    pub fn as_mut_slice(&mut self) -> &mut [ScreenVertex] {
        &mut self.vertices
    }

    /// Drop the written vertices, keeping the allocation.
    pub fn clear(&mut self) {
        self.vertices.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/vertex.rs"]
mod tests;
