//! Pole placements and the wires strung along each line.

use causeway_materials::MaterialId;
use causeway_mesh::{ChunkedMeshBuilder, MeshChunk, MeshError, MeshVertex, PrimitiveKind};
use causeway_network::{LineId, Pole, PoleId, UtilityNetwork};
use causeway_terrain::HeightQuery;
use glam::{Quat, Vec3};
use tracing::warn;

use crate::{CatenaryParams, StructureLibrary, StructurePrefab, catenary_points};

/// A structure to instantiate at a pole.
#[derive(Clone, Debug, PartialEq)]
pub struct PolePlacement {
    pub pole: PoleId,
    pub structure: String,
    pub model: String,
    pub position: Vec3,
    /// Rotation about the vertical axis, radians.
    pub yaw: f32,
}

/// Placements for every pole whose structure resolves. Poles with an unknown
/// structure are skipped with a warning; the second value counts them.
pub fn pole_placements<L>(network: &UtilityNetwork, library: &L) -> (Vec<PolePlacement>, usize)
where
    L: StructureLibrary + ?Sized,
{
    let mut placements = Vec::with_capacity(network.num_poles());
    let mut missing = 0;
    for (id, pole) in network.poles() {
        match library.lookup(&pole.structure) {
            Some(prefab) => placements.push(PolePlacement {
                pole: id,
                structure: prefab.name.clone(),
                model: prefab.model.clone(),
                position: pole.world,
                yaw: pole.azimuth.unwrap_or(0.0),
            }),
            None => {
                warn!(
                    pole = id.0,
                    structure = %pole.structure,
                    "unknown pole structure, pole skipped"
                );
                missing += 1;
            }
        }
    }
    (placements, missing)
}

/// World position of a pole's attachment point `offset`, turned by its azimuth.
fn attachment(pole: &Pole, offset: Vec3) -> Vec3 {
    pole.world + Quat::from_rotation_y(pole.azimuth.unwrap_or(0.0)) * offset
}

/// The wires of one span, one polyline per conductor. Only conductors present
/// on both structures are strung.
pub fn span_wires<T>(
    from: (&Pole, &StructurePrefab),
    to: (&Pole, &StructurePrefab),
    params: &CatenaryParams,
    terrain: &T,
) -> Vec<Vec<Vec3>>
where
    T: HeightQuery + ?Sized,
{
    from.1
        .wires
        .iter()
        .zip(&to.1.wires)
        .map(|(a, b)| {
            catenary_points(
                attachment(from.0, a.outgoing),
                attachment(to.0, b.incoming),
                params,
                terrain,
            )
        })
        .collect()
}

/// Wire geometry of one line.
#[derive(Clone, Debug, Default)]
pub struct LineWires {
    pub line: Option<LineId>,
    pub chunks: Vec<MeshChunk>,
    pub spans: usize,
    /// Spans left unstrung because a pole or its structure was missing.
    pub skipped_spans: usize,
}

/// String every span of `line` and pack the wires into line-strip chunks.
pub fn build_line_wires<L, T>(
    network: &UtilityNetwork,
    line: LineId,
    library: &L,
    terrain: &T,
    params: &CatenaryParams,
    material: MaterialId,
    max_vertices: usize,
) -> Result<LineWires, MeshError>
where
    L: StructureLibrary + ?Sized,
    T: HeightQuery + ?Sized,
{
    let mut out = LineWires {
        line: Some(line),
        ..LineWires::default()
    };
    let Some(l) = network.line(line) else {
        return Ok(out);
    };
    let resolve = |id: PoleId| {
        let pole = network.pole(id)?;
        let prefab = library.lookup(&pole.structure)?;
        Some((pole, prefab))
    };

    let mut builder = ChunkedMeshBuilder::new(PrimitiveKind::LineStrip, material, max_vertices)?;
    for (a, b) in l.spans() {
        let (Some(from), Some(to)) = (resolve(a), resolve(b)) else {
            warn!(line = line.0, from = a.0, to = b.0, "span has an unresolved pole, not strung");
            out.skipped_spans += 1;
            continue;
        };
        for wire in span_wires(from, to, params, terrain) {
            builder.add_primitive(wire.into_iter().map(MeshVertex::at))?;
        }
        out.spans += 1;
    }
    out.chunks = builder.finish();
    Ok(out)
}
