//! Road texture atlas: named sub-rectangles ("virtual textures") of shared
//! material textures, one per [`TextureRole`].
//!
//! Most paved strips share one 2048-pixel wide road texture laid out in
//! vertical bands; unpaved surfaces and junction caps use whole textures of
//! their own.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::material::{MaterialDef, MaterialError, MaterialId, MaterialRegistry};

/// Width in pixels of the shared road texture.
pub const ROAD_TEXTURE_WIDTH: f32 = 2048.0;

/// Name of the untextured material power-line wires are drawn with.
pub const WIRE_MATERIAL: &str = "wire";

// ---------------------------------------------------------------------------
// AtlasError
// ---------------------------------------------------------------------------

/// Errors returned during atlas construction.
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("failed to read atlas manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse atlas manifest: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("material error: {0}")]
    Material(#[from] MaterialError),

    /// A region names a material that was never registered.
    #[error("region {role:?} refers to unknown material {material:?}")]
    UnknownMaterial { role: TextureRole, material: String },

    /// Every role needs a region before the atlas can be built.
    #[error("no region assigned to {0:?}")]
    MissingRole(TextureRole),
}

// ---------------------------------------------------------------------------
// TextureRole
// ---------------------------------------------------------------------------

/// What a region of the atlas is used for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureRole {
    Margin,
    Sidewalk,
    OneLane,
    TwoLaneOneWay,
    TwoLaneTwoWay,
    ThreeLaneOneWay,
    ThreeLaneTwoWay,
    FourLaneOneWay,
    FourLaneTwoWay,
    Rail,
    FourWheelDrive,
    Trail,
    Gravel,
    Stone,
    Pavement,
}

impl TextureRole {
    pub const COUNT: usize = 15;

    pub const ALL: [TextureRole; Self::COUNT] = [
        TextureRole::Margin,
        TextureRole::Sidewalk,
        TextureRole::OneLane,
        TextureRole::TwoLaneOneWay,
        TextureRole::TwoLaneTwoWay,
        TextureRole::ThreeLaneOneWay,
        TextureRole::ThreeLaneTwoWay,
        TextureRole::FourLaneOneWay,
        TextureRole::FourLaneTwoWay,
        TextureRole::Rail,
        TextureRole::FourWheelDrive,
        TextureRole::Trail,
        TextureRole::Gravel,
        TextureRole::Stone,
        TextureRole::Pavement,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

// ---------------------------------------------------------------------------
// UvRect / VirtualTexture
// ---------------------------------------------------------------------------

/// Sub-rectangle of a texture in normalized coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UvRect {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl UvRect {
    /// The whole texture.
    pub const FULL: UvRect = UvRect {
        left: 0.0,
        right: 1.0,
        bottom: 0.0,
        top: 1.0,
    };

    /// Full-height band between two pixel columns of the road texture.
    pub fn road_band(left_px: f32, right_px: f32) -> Self {
        Self {
            left: left_px / ROAD_TEXTURE_WIDTH,
            right: right_px / ROAD_TEXTURE_WIDTH,
            bottom: 0.0,
            top: 1.0,
        }
    }
}

/// A region of one material's texture treated as if it were a texture of its own.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VirtualTexture {
    pub material: MaterialId,
    pub rect: UvRect,
}

impl VirtualTexture {
    /// Map a logical coordinate into the region.
    ///
    /// `u` in `[0, 1]` spans the band across; `v` is passed through the
    /// vertical scale unclamped so that textures repeat along a road.
    pub fn adapt(&self, u: f32, v: f32) -> Vec2 {
        Vec2::new(
            self.rect.left + u * (self.rect.right - self.rect.left),
            self.rect.bottom + v * (self.rect.top - self.rect.bottom),
        )
    }
}

// ---------------------------------------------------------------------------
// TextureAtlas
// ---------------------------------------------------------------------------

/// Immutable set of materials plus one virtual texture per role.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureAtlas {
    registry: MaterialRegistry,
    regions: [VirtualTexture; TextureRole::COUNT],
}

impl TextureAtlas {
    /// The stock layout: a 2048-pixel road texture carrying the lane, margin,
    /// sidewalk, rail and stone bands, plus whole textures for 4WD tracks,
    /// trails, gravel and junction pavement.
    pub fn standard() -> Self {
        let registry = MaterialRegistry::from_defs(vec![
            MaterialDef::new("roads", "roadset_2k.jpg"),
            transparent("4wd", "road_4wd2.png"),
            transparent("trail", "trail2.png"),
            transparent("gravel", "gravel1.png"),
            MaterialDef::new("pavement", "pavement_256.jpg"),
            MaterialDef::new(WIRE_MATERIAL, ""),
        ]);
        let roads = MaterialId(0);
        let whole = |material: u16| VirtualTexture {
            material: MaterialId(material),
            rect: UvRect::FULL,
        };
        let band = |left: f32, right: f32| VirtualTexture {
            material: roads,
            rect: UvRect::road_band(left, right),
        };

        let regions = TextureRole::ALL.map(|role| match role {
            TextureRole::Margin => band(960.0, 992.0),
            TextureRole::Sidewalk => band(512.0, 640.0),
            TextureRole::OneLane => band(451.0, 511.0),
            TextureRole::TwoLaneOneWay => band(4.0, 124.0),
            TextureRole::TwoLaneTwoWay => band(640.0, 768.0),
            TextureRole::ThreeLaneOneWay => band(2.0, 190.0),
            TextureRole::ThreeLaneTwoWay => band(768.0, 896.0),
            TextureRole::FourLaneOneWay => band(0.0, 256.0),
            TextureRole::FourLaneTwoWay => band(256.0, 512.0),
            TextureRole::Rail => band(992.0, 1248.0),
            TextureRole::Stone => band(1248.0, 1440.0),
            TextureRole::FourWheelDrive => whole(1),
            TextureRole::Trail => whole(2),
            TextureRole::Gravel => whole(3),
            TextureRole::Pavement => whole(4),
        });

        Self { registry, regions }
    }

    /// Load an atlas from a RON manifest file.
    pub fn from_ron(path: &Path) -> Result<Self, AtlasError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Parse an atlas from a RON manifest string.
    pub fn from_ron_str(ron_str: &str) -> Result<Self, AtlasError> {
        let manifest: AtlasManifest = ron::from_str(ron_str)?;
        let mut builder = AtlasBuilder::new();
        for def in manifest.materials {
            builder.add_material(def)?;
        }
        for entry in manifest.regions {
            builder.set_region_by_name(entry.role, &entry.material, entry.rect)?;
        }
        builder.build()
    }

    pub fn region(&self, role: TextureRole) -> &VirtualTexture {
        &self.regions[role.index()]
    }

    pub fn materials(&self) -> &MaterialRegistry {
        &self.registry
    }

    pub fn material_for(&self, role: TextureRole) -> MaterialId {
        self.region(role).material
    }

    /// Material for catenary wires, if the atlas defines one.
    pub fn wire_material(&self) -> Option<MaterialId> {
        self.registry.lookup_by_name(WIRE_MATERIAL)
    }
}

fn transparent(name: &str, texture: &str) -> MaterialDef {
    MaterialDef {
        transparent: true,
        ..MaterialDef::new(name, texture)
    }
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

/// RON representation of an atlas.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AtlasManifest {
    pub materials: Vec<MaterialDef>,
    pub regions: Vec<RegionEntry>,
}

/// One role's region, naming its material.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegionEntry {
    pub role: TextureRole,
    pub material: String,
    pub rect: UvRect,
}

// ---------------------------------------------------------------------------
// AtlasBuilder
// ---------------------------------------------------------------------------

/// Accumulates materials and regions into a [`TextureAtlas`].
#[derive(Debug, Default)]
pub struct AtlasBuilder {
    registry: MaterialRegistry,
    regions: [Option<VirtualTexture>; TextureRole::COUNT],
}

impl AtlasBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_material(&mut self, def: MaterialDef) -> Result<MaterialId, AtlasError> {
        Ok(self.registry.register(def)?)
    }

    /// Assign a region; a later assignment for the same role replaces it.
    pub fn set_region(&mut self, role: TextureRole, material: MaterialId, rect: UvRect) {
        self.regions[role.index()] = Some(VirtualTexture { material, rect });
    }

    pub fn set_region_by_name(
        &mut self,
        role: TextureRole,
        material: &str,
        rect: UvRect,
    ) -> Result<(), AtlasError> {
        let id = self
            .registry
            .lookup_by_name(material)
            .ok_or_else(|| AtlasError::UnknownMaterial {
                role,
                material: material.to_string(),
            })?;
        self.set_region(role, id, rect);
        Ok(())
    }

    /// Finish the atlas. Fails if any role has no region.
    pub fn build(self) -> Result<TextureAtlas, AtlasError> {
        let mut regions = [VirtualTexture {
            material: MaterialId(0),
            rect: UvRect::FULL,
        }; TextureRole::COUNT];
        for role in TextureRole::ALL {
            regions[role.index()] =
                self.regions[role.index()].ok_or(AtlasError::MissingRole(role))?;
        }
        Ok(TextureAtlas {
            registry: self.registry,
            regions,
        })
    }
}
