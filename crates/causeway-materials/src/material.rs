//! Core material types: [`MaterialId`], [`MaterialDef`], and [`MaterialRegistry`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// MaterialId
// ---------------------------------------------------------------------------

/// Index of a material in a [`MaterialRegistry`], attached to every mesh chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialId(pub u16);

// ---------------------------------------------------------------------------
// MaterialError
// ---------------------------------------------------------------------------

/// Errors returned when registering materials.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaterialError {
    /// The material name must not be empty.
    #[error("material name must not be empty")]
    EmptyName,

    /// Two materials share a name.
    #[error("duplicate material name: {0}")]
    DuplicateName(String),

    /// More materials than a `MaterialId` can address.
    #[error("material registry is full")]
    RegistryFull,
}

// ---------------------------------------------------------------------------
// MaterialDef
// ---------------------------------------------------------------------------

/// A material the renderer must create for generated geometry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialDef {
    /// Unique name, e.g. `"roads"` or `"gravel"`.
    pub name: String,
    /// Texture file the renderer binds, relative to its data path.
    pub texture: String,
    /// Whether the texture carries an alpha channel that must be blended.
    #[serde(default)]
    pub transparent: bool,
}

impl MaterialDef {
    pub fn new(name: impl Into<String>, texture: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            texture: texture.into(),
            transparent: false,
        }
    }
}

// ---------------------------------------------------------------------------
// MaterialRegistry
// ---------------------------------------------------------------------------

/// Ordered list of materials; a material's id is its position.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialRegistry {
    materials: Vec<MaterialDef>,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry from a list already known to have unique, non-empty names.
    pub(crate) fn from_defs(materials: Vec<MaterialDef>) -> Self {
        Self { materials }
    }

    /// Register a material and return its id.
    ///
    /// # Errors
    ///
    /// Rejects empty and duplicate names.
    pub fn register(&mut self, def: MaterialDef) -> Result<MaterialId, MaterialError> {
        if def.name.is_empty() {
            return Err(MaterialError::EmptyName);
        }
        if self.lookup_by_name(&def.name).is_some() {
            return Err(MaterialError::DuplicateName(def.name));
        }
        let id = u16::try_from(self.materials.len()).map_err(|_| MaterialError::RegistryFull)?;
        self.materials.push(def);
        Ok(MaterialId(id))
    }

    pub fn get(&self, id: MaterialId) -> Option<&MaterialDef> {
        self.materials.get(id.0 as usize)
    }

    pub fn lookup_by_name(&self, name: &str) -> Option<MaterialId> {
        self.materials
            .iter()
            .position(|m| m.name == name)
            .map(|i| MaterialId(i as u16))
    }

    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, &MaterialDef)> + '_ {
        self.materials
            .iter()
            .enumerate()
            .map(|(i, m)| (MaterialId(i as u16), m))
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
