//! The seam between mesh generation and whatever stores or renders meshes.

use crate::MeshChunk;

/// Opaque reference to a chunk handed to a [`MeshSink`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(pub u32);

/// Receives finished chunks. Sinks know nothing about spatial placement;
/// callers file the returned handle wherever it belongs.
pub trait MeshSink {
    fn store(&mut self, chunk: MeshChunk) -> MeshHandle;
}

/// Keeps every chunk in memory, in the order stored.
#[derive(Debug, Default)]
pub struct MemorySink {
    chunks: Vec<MeshChunk>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: MeshHandle) -> Option<&MeshChunk> {
        self.chunks.get(handle.0 as usize)
    }

    pub fn chunks(&self) -> &[MeshChunk] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.chunks.iter().map(|c| c.vertices.len()).sum()
    }
}

impl MeshSink for MemorySink {
    fn store(&mut self, chunk: MeshChunk) -> MeshHandle {
        let handle = MeshHandle(self.chunks.len() as u32);
        self.chunks.push(chunk);
        handle
    }
}

impl<S: MeshSink + ?Sized> MeshSink for &mut S {
    fn store(&mut self, chunk: MeshChunk) -> MeshHandle {
        (**self).store(chunk)
    }
}
