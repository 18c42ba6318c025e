//! Power-line generation: pole headings, structure selection, catenary wires
//! and pole placements.

mod azimuth;
mod catenary;
mod structure;
mod wires;

pub use azimuth::{compute_all_azimuths, compute_pole_azimuths};
pub use catenary::{CatenaryParams, catenary_points};
pub use structure::{
    DEFAULT_STRUCTURE, H_FRAME_HOLD_DOWN, H_FRAME_TANGENT, LATTICE_DEADEND, LATTICE_TOWER,
    StructureError, StructureLibrary, StructurePrefab, StructureSet, WireAttachment,
    infer_structure, infer_structures,
};
pub use wires::{LineWires, PolePlacement, build_line_wires, pole_placements, span_wires};
