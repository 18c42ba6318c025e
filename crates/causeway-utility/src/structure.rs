//! Utility structures: prefab definitions with their wire attachment points,
//! the lookup seam generation goes through, and tag-based prefab inference.

use std::path::Path;
use std::str::FromStr;

use causeway_network::{Pole, UtilityNetwork};
use glam::Vec3;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const LATTICE_TOWER: &str = "Lattice Tower";
pub const LATTICE_DEADEND: &str = "Lattice Deadend";
pub const H_FRAME_TANGENT: &str = "H-Frame Tangent";
pub const H_FRAME_HOLD_DOWN: &str = "H-Frame Hold Down";
pub const DEFAULT_STRUCTURE: &str = "Steel Poles Tangent";

#[derive(Debug, Error)]
pub enum StructureError {
    #[error("failed to read structure manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse structure manifest: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("malformed wire_info {0:?}: expected six comma-separated numbers")]
    WireInfo(String),
}

/// Where one conductor attaches to a structure, relative to its base and
/// before the pole's azimuth is applied.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireAttachment {
    /// Used when the wire leaves this structure toward the next pole.
    pub outgoing: Vec3,
    /// Used when the wire arrives from the previous pole.
    pub incoming: Vec3,
}

/// Parses the `"x, y, z, x, y, z"` form used in content catalogues.
impl FromStr for WireAttachment {
    type Err = StructureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values: Vec<f32> = s
            .split(',')
            .map(|v| v.trim().parse::<f32>())
            .collect::<Result<_, _>>()
            .map_err(|_| StructureError::WireInfo(s.to_string()))?;
        let [a, b, c, d, e, f] = values[..] else {
            return Err(StructureError::WireInfo(s.to_string()));
        };
        Ok(Self {
            outgoing: Vec3::new(a, b, c),
            incoming: Vec3::new(d, e, f),
        })
    }
}

/// A tower or pole model plus its conductors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructurePrefab {
    pub name: String,
    /// Model the renderer instantiates, relative to its content path.
    pub model: String,
    #[serde(default)]
    pub wires: Vec<WireAttachment>,
}

/// Resolves prefab names. Shared across generation threads.
pub trait StructureLibrary: Sync {
    fn lookup(&self, name: &str) -> Option<&StructurePrefab>;
}

impl<T: StructureLibrary + ?Sized> StructureLibrary for &T {
    fn lookup(&self, name: &str) -> Option<&StructurePrefab> {
        (**self).lookup(name)
    }
}

/// In-memory [`StructureLibrary`], loadable from a RON list of prefabs.
#[derive(Clone, Debug, Default)]
pub struct StructureSet {
    prefabs: HashMap<String, StructurePrefab>,
}

impl StructureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a prefab, replacing any previous one of the same name.
    pub fn insert(&mut self, prefab: StructurePrefab) {
        self.prefabs.insert(prefab.name.clone(), prefab);
    }

    pub fn len(&self) -> usize {
        self.prefabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefabs.is_empty()
    }

    pub fn from_ron(path: &Path) -> Result<Self, StructureError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    pub fn from_ron_str(ron_str: &str) -> Result<Self, StructureError> {
        let prefabs: Vec<StructurePrefab> = ron::from_str(ron_str)?;
        let mut set = Self::new();
        for prefab in prefabs {
            set.insert(prefab);
        }
        Ok(set)
    }
}

impl StructureLibrary for StructureSet {
    fn lookup(&self, name: &str) -> Option<&StructurePrefab> {
        self.prefabs.get(name)
    }
}

/// Prefab name for a pole from its tags.
///
/// `design=barrel` selects a lattice tower and `design=h-frame` (or
/// `h-frame_one-level`) an H-frame; `tower:type=termination` turns either into
/// its dead-end variant. Without a matching design the pole keeps its current
/// structure, or gets [`DEFAULT_STRUCTURE`] if it has none.
pub fn infer_structure(pole: &Pole) -> String {
    let mut name = match pole.tag("design") {
        Some("barrel") => LATTICE_TOWER.to_string(),
        Some("h-frame" | "h-frame_one-level") => H_FRAME_TANGENT.to_string(),
        _ => pole.structure.clone(),
    };
    if pole.tag("tower:type") == Some("termination") {
        if name == LATTICE_TOWER {
            name = LATTICE_DEADEND.to_string();
        } else if name == H_FRAME_TANGENT {
            name = H_FRAME_HOLD_DOWN.to_string();
        }
    }
    if name.is_empty() {
        name = DEFAULT_STRUCTURE.to_string();
    }
    name
}

/// Apply [`infer_structure`] to every pole. Returns how many changed.
pub fn infer_structures(network: &mut UtilityNetwork) -> usize {
    let mut changed = 0;
    for (_, pole) in network.poles_mut() {
        let name = infer_structure(pole);
        if name != pole.structure {
            pole.structure = name;
            changed += 1;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn pole_with(tags: &[(&str, &str)]) -> Pole {
        let mut net = UtilityNetwork::new();
        let id = net.add_pole(Vec2::ZERO, "");
        let pole = net.pole_mut(id).unwrap();
        pole.tags = tags.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        pole.clone()
    }

    #[test]
    fn test_tag_rules() {
        assert_eq!(infer_structure(&pole_with(&[("design", "barrel")])), LATTICE_TOWER);
        assert_eq!(
            infer_structure(&pole_with(&[("design", "h-frame_one-level")])),
            H_FRAME_TANGENT
        );
        assert_eq!(
            infer_structure(&pole_with(&[("tower:type", "termination"), ("design", "barrel")])),
            LATTICE_DEADEND,
            "termination applies regardless of tag order"
        );
        assert_eq!(
            infer_structure(&pole_with(&[("design", "h-frame"), ("tower:type", "termination")])),
            H_FRAME_HOLD_DOWN
        );
        assert_eq!(infer_structure(&pole_with(&[("design", "portal")])), DEFAULT_STRUCTURE);
    }

    #[test]
    fn test_explicit_structure_survives_without_design_tag() {
        let mut net = UtilityNetwork::new();
        net.add_pole(Vec2::ZERO, "Wooden Pole");
        net.add_pole(Vec2::X, "");
        assert_eq!(infer_structures(&mut net), 1);
        let names: Vec<&str> = net.poles().map(|(_, p)| p.structure.as_str()).collect();
        assert_eq!(names, vec!["Wooden Pole", DEFAULT_STRUCTURE]);
    }

    #[test]
    fn test_wire_info_parsing() {
        let w: WireAttachment = "1.5, 20, 0, -1.5, 20, 0.25".parse().unwrap();
        assert_eq!(w.outgoing, Vec3::new(1.5, 20.0, 0.0));
        assert_eq!(w.incoming, Vec3::new(-1.5, 20.0, 0.25));
        assert!("1, 2, 3".parse::<WireAttachment>().is_err());
        assert!("a, b, c, d, e, f".parse::<WireAttachment>().is_err());
    }

    #[test]
    fn test_structure_set_from_ron_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("structures.ron");
        std::fs::write(
            &path,
            r#"[
                (name: "Steel Poles Tangent", model: "steel.osg", wires: [
                    (outgoing: (2.0, 18.0, 0.0), incoming: (2.0, 18.0, 0.0)),
                ]),
                (name: "Lattice Tower", model: "lattice.osg"),
            ]"#,
        )
        .unwrap();
        let set = StructureSet::from_ron(&path).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.lookup(DEFAULT_STRUCTURE).unwrap().wires.len(), 1);
        assert!(set.lookup(LATTICE_TOWER).unwrap().wires.is_empty());
        assert!(set.lookup("Missing").is_none());
    }
}
