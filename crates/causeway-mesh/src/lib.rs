//! Mesh output for generated networks: the vertex format, primitive kinds,
//! size-bounded chunks, the chunked builder and the sink seam.

mod builder;
mod chunk;
mod sink;
mod vertex;

pub use builder::{ChunkedMeshBuilder, MIN_VERTEX_CEILING, MeshError};
pub use chunk::{MeshChunk, PrimitiveKind};
pub use sink::{MemorySink, MeshHandle, MeshSink};
pub use vertex::MeshVertex;
