//! Scene generation: drives the road and utility generators over whole
//! networks, stores meshes through a sink and buckets everything into a LOD
//! grid.

mod generator;
mod parallel;
mod scene;

pub use generator::{GenerateError, Generator, GeneratorParams, PrepareReport};
pub use scene::{GeneratedScene, GenerationStats, StructureRef};
