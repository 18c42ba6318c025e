//! Terrain access for the generators: the height-query seam, concrete height
//! fields (flat, gridded, fBm noise), and draping of networks onto them.

mod drape;
mod error;
mod grid;
mod noise_terrain;
mod query;

pub use drape::{DrapeReport, drape_network, drape_poles};
pub use error::TerrainError;
pub use grid::GridHeightField;
pub use noise_terrain::{NoiseTerrain, NoiseTerrainParams};
pub use query::{FlatTerrain, HeightQuery};
