//! Chunked mesh builder.
//!
//! Accepts primitives vertex by vertex and cuts the output into chunks of at
//! most `max_vertices` vertices. A primitive that crosses a chunk boundary is
//! split so that the union of the pieces draws exactly the original triangles
//! or segments, with the same winding; vertices shared across the cut are
//! copied bit for bit.

use causeway_materials::MaterialId;
use thiserror::Error;

use crate::{MeshChunk, MeshVertex, PrimitiveKind};

/// Smallest vertex ceiling the builder accepts. Below this a split strip
/// could not make progress in the fresh chunk.
pub const MIN_VERTEX_CEILING: usize = 8;

/// Errors from misuse of the builder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    #[error("vertex ceiling {requested} is below the minimum of {MIN_VERTEX_CEILING}")]
    CeilingTooLow { requested: usize },

    #[error("vertex pushed outside begin_primitive/end_primitive")]
    NoOpenPrimitive,

    #[error("begin_primitive called while a primitive is open")]
    PrimitiveAlreadyOpen,
}

/// Builds [`MeshChunk`]s of one primitive kind and material.
#[derive(Debug)]
pub struct ChunkedMeshBuilder {
    kind: PrimitiveKind,
    material: MaterialId,
    max_vertices: usize,
    finished: Vec<MeshChunk>,
    current: MeshChunk,
    /// Index in `current.vertices` where the open primitive starts.
    primitive_start: usize,
    open: bool,
    dropped_primitives: usize,
}

impl ChunkedMeshBuilder {
    pub fn new(
        kind: PrimitiveKind,
        material: MaterialId,
        max_vertices: usize,
    ) -> Result<Self, MeshError> {
        if max_vertices < MIN_VERTEX_CEILING {
            return Err(MeshError::CeilingTooLow {
                requested: max_vertices,
            });
        }
        Ok(Self {
            kind,
            material,
            max_vertices,
            finished: Vec::new(),
            current: MeshChunk::new(kind, material),
            primitive_start: 0,
            open: false,
            dropped_primitives: 0,
        })
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    pub fn begin_primitive(&mut self) -> Result<(), MeshError> {
        if self.open {
            return Err(MeshError::PrimitiveAlreadyOpen);
        }
        self.open = true;
        self.primitive_start = self.current.vertices.len();
        Ok(())
    }

    pub fn push_vertex(&mut self, vertex: MeshVertex) -> Result<(), MeshError> {
        if !self.open {
            return Err(MeshError::NoOpenPrimitive);
        }
        if self.current.vertices.len() >= self.max_vertices {
            self.split();
        }
        self.current.vertices.push(vertex);
        Ok(())
    }

    /// Close the open primitive. Fragments too short to draw anything are
    /// discarded; this includes the tail left in a fresh chunk when a split
    /// primitive ends right after its carried vertices.
    pub fn end_primitive(&mut self) -> Result<(), MeshError> {
        if !self.open {
            return Err(MeshError::NoOpenPrimitive);
        }
        self.open = false;
        let len = self.current.vertices.len() - self.primitive_start;
        if len >= self.kind.min_vertices() {
            self.current.primitive_lengths.push(len as u32);
        } else {
            self.current.vertices.truncate(self.primitive_start);
            if len > 0 {
                self.dropped_primitives += 1;
            }
        }
        Ok(())
    }

    /// Add a whole primitive.
    pub fn add_primitive<I>(&mut self, vertices: I) -> Result<(), MeshError>
    where
        I: IntoIterator<Item = MeshVertex>,
    {
        self.begin_primitive()?;
        for v in vertices {
            self.push_vertex(v)?;
        }
        self.end_primitive()
    }

    /// Primitives discarded because they had too few vertices.
    pub fn dropped_primitives(&self) -> usize {
        self.dropped_primitives
    }

    /// Close the current chunk and return all chunks in order. An open
    /// primitive is closed first.
    pub fn finish(mut self) -> Vec<MeshChunk> {
        if self.open {
            // Cannot fail: the primitive is open.
            let _ = self.end_primitive();
        }
        if !self.current.is_empty() {
            self.finished.push(self.current);
        }
        self.finished
    }

    /// The current chunk is full while a primitive is open: close it and
    /// start a new chunk holding whatever the open primitive carries over.
    fn split(&mut self) {
        let start = self.primitive_start;
        let n = self.current.vertices.len() - start;

        // (vertices kept in the closing chunk, vertices starting the new one)
        let (keep, carry): (usize, Vec<MeshVertex>) = {
            let prim = &self.current.vertices[start..];
            match self.kind {
                _ if n == 0 => (0, Vec::new()),
                PrimitiveKind::LineStrip if n >= 2 => (n, vec![prim[n - 1]]),
                PrimitiveKind::TriangleStrip => {
                    // Keep an even count so the new strip starts on the same
                    // winding parity; the odd vertex moves over.
                    let relocate = n % 2;
                    let keep = n - relocate;
                    if keep >= 4 {
                        let mut carry = prim[keep - 2..keep].to_vec();
                        carry.extend_from_slice(&prim[keep..]);
                        (keep, carry)
                    } else {
                        (0, prim.to_vec())
                    }
                }
                PrimitiveKind::TriangleFan if n >= 3 => (n, vec![prim[0], prim[n - 1]]),
                PrimitiveKind::Triangles => {
                    let keep = n - n % 3;
                    (keep, prim[keep..].to_vec())
                }
                PrimitiveKind::Lines => {
                    let keep = n - n % 2;
                    (keep, prim[keep..].to_vec())
                }
                _ => (0, prim.to_vec()),
            }
        };

        self.current.vertices.truncate(start + keep);
        if keep > 0 {
            self.current.primitive_lengths.push(keep as u32);
        }

        let full = std::mem::replace(&mut self.current, MeshChunk::new(self.kind, self.material));
        if !full.is_empty() {
            self.finished.push(full);
        }
        self.current.vertices = carry;
        self.primitive_start = 0;
    }
}
