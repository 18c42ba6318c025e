//! Mesh chunks: bounded vertex buffers holding whole primitives of one kind.

use causeway_materials::MaterialId;
use causeway_math::Aabb;

use crate::MeshVertex;

/// How the vertices of a primitive are connected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    TriangleStrip,
    TriangleFan,
    LineStrip,
    /// Independent triangles, three vertices each.
    Triangles,
    /// Independent segments, two vertices each.
    Lines,
}

impl PrimitiveKind {
    /// Fewest vertices that form one complete primitive.
    pub fn min_vertices(self) -> usize {
        match self {
            PrimitiveKind::TriangleStrip
            | PrimitiveKind::TriangleFan
            | PrimitiveKind::Triangles => 3,
            PrimitiveKind::LineStrip | PrimitiveKind::Lines => 2,
        }
    }

    pub fn is_lines(self) -> bool {
        matches!(self, PrimitiveKind::LineStrip | PrimitiveKind::Lines)
    }
}

/// A finished piece of mesh: vertices, the length of each primitive in order,
/// and the material it is drawn with.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshChunk {
    pub kind: PrimitiveKind,
    pub material: MaterialId,
    pub vertices: Vec<MeshVertex>,
    pub primitive_lengths: Vec<u32>,
}

impl MeshChunk {
    pub fn new(kind: PrimitiveKind, material: MaterialId) -> Self {
        Self {
            kind,
            material,
            vertices: Vec::new(),
            primitive_lengths: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn primitive_count(&self) -> usize {
        self.primitive_lengths.len()
    }

    /// World-space bounds of the vertices, `None` for an empty chunk.
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.vertices.iter().map(MeshVertex::position))
    }

    /// Vertices of each primitive in order.
    pub fn primitives(&self) -> impl Iterator<Item = &[MeshVertex]> + '_ {
        let mut offset = 0usize;
        self.primitive_lengths.iter().map(move |&len| {
            let start = offset;
            offset += len as usize;
            &self.vertices[start..offset]
        })
    }

    /// Triangle-list indices with consistent winding. Empty for line kinds.
    pub fn triangle_indices(&self) -> Vec<u32> {
        let mut out = Vec::new();
        let mut offset = 0u32;
        for &len in &self.primitive_lengths {
            match self.kind {
                PrimitiveKind::TriangleStrip => {
                    for i in 0..len.saturating_sub(2) {
                        let (a, b, c) = (offset + i, offset + i + 1, offset + i + 2);
                        if i % 2 == 0 {
                            out.extend_from_slice(&[a, b, c]);
                        } else {
                            out.extend_from_slice(&[b, a, c]);
                        }
                    }
                }
                PrimitiveKind::TriangleFan => {
                    for i in 1..len.saturating_sub(1) {
                        out.extend_from_slice(&[offset, offset + i, offset + i + 1]);
                    }
                }
                PrimitiveKind::Triangles => {
                    out.extend(offset..offset + len - len % 3);
                }
                PrimitiveKind::LineStrip | PrimitiveKind::Lines => {}
            }
            offset += len;
        }
        out
    }

    /// Segment-list indices. Empty for triangle kinds.
    pub fn line_indices(&self) -> Vec<u32> {
        let mut out = Vec::new();
        let mut offset = 0u32;
        for &len in &self.primitive_lengths {
            match self.kind {
                PrimitiveKind::LineStrip => {
                    for i in 0..len.saturating_sub(1) {
                        out.extend_from_slice(&[offset + i, offset + i + 1]);
                    }
                }
                PrimitiveKind::Lines => out.extend(offset..offset + len - len % 2),
                _ => {}
            }
            offset += len;
        }
        out
    }
}
