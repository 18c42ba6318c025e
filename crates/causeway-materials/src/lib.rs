//! Material system for generated network geometry: material identifiers, the
//! registry the renderer creates materials from, and the road texture atlas.

mod atlas;
mod material;

pub use atlas::{
    AtlasBuilder, AtlasError, AtlasManifest, ROAD_TEXTURE_WIDTH, RegionEntry, TextureAtlas,
    TextureRole, UvRect, VirtualTexture, WIRE_MATERIAL,
};
pub use material::{MaterialDef, MaterialError, MaterialId, MaterialRegistry};
