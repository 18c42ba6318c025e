//! Batch generation of a whole scene from road and utility networks.
//!
//! Junctions, link surfaces and power lines are each computed in parallel
//! over an immutable borrow of the networks; signs follow last. Chunks are
//! handed to the sink and bucketed on the calling thread in network order, so
//! the output is deterministic.

use causeway_lod::BucketGrid;
use causeway_materials::TextureAtlas;
use causeway_math::Rect;
use causeway_mesh::{MIN_VERTEX_CEILING, MeshChunk, MeshError, MeshHandle, MeshSink};
use causeway_network::{LineId, LinkId, NodeId, RoadNetwork, UtilityNetwork};
use causeway_roads::{
    CrossSectionParams, Junction, JunctionKind, JunctionParams, LinkFilter, LinkMesh, build_info,
    build_link_mesh, junction_cap_mesh, sign_placements, solve_junction,
};
use causeway_terrain::{DrapeReport, HeightQuery, drape_network, drape_poles};
use causeway_utility::{
    CatenaryParams, LineWires, StructureLibrary, build_line_wires, compute_all_azimuths,
    infer_structures, pole_placements,
};
use glam::Vec2;
use hashbrown::HashMap;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::parallel::map_ordered;
use crate::{GeneratedScene, GenerationStats, StructureRef};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("mesh building failed: {0}")]
    Mesh(#[from] MeshError),
}

/// Every tuning value of a generation pass.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorParams {
    pub junction: JunctionParams,
    pub cross_section: CrossSectionParams,
    pub catenary: CatenaryParams,
    pub filter: LinkFilter,
    /// Cells per side of the bucket grid.
    pub grid_resolution: usize,
    /// Far end of every cell's visible range, metres.
    pub lod_distance: f32,
    pub build_signs: bool,
    /// Altitude for points the terrain does not cover.
    pub fallback_altitude: f32,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            junction: JunctionParams::default(),
            cross_section: CrossSectionParams::default(),
            catenary: CatenaryParams::default(),
            filter: LinkFilter::default(),
            grid_resolution: 16,
            lod_distance: 2000.0,
            build_signs: true,
            fallback_altitude: 0.0,
        }
    }
}

/// Totals from [`Generator::prepare`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrepareReport {
    pub roads: DrapeReport,
    pub poles: DrapeReport,
    pub structures_inferred: usize,
    pub azimuths_computed: usize,
}

pub struct Generator {
    params: GeneratorParams,
    atlas: TextureAtlas,
}

impl Generator {
    /// Fails when the chunk vertex ceiling is too low for any primitive.
    pub fn new(params: GeneratorParams, atlas: TextureAtlas) -> Result<Self, GenerateError> {
        let requested = params.cross_section.max_vertices;
        if requested < MIN_VERTEX_CEILING {
            return Err(MeshError::CeilingTooLow { requested }.into());
        }
        Ok(Self { params, atlas })
    }

    pub fn params(&self) -> &GeneratorParams {
        &self.params
    }

    pub fn atlas(&self) -> &TextureAtlas {
        &self.atlas
    }

    /// Drape both networks onto `terrain`, pick pole structures from tags and
    /// fill in missing pole headings.
    pub fn prepare<T>(
        &self,
        roads: &mut RoadNetwork,
        utility: &mut UtilityNetwork,
        terrain: &T,
    ) -> PrepareReport
    where
        T: HeightQuery + ?Sized,
    {
        let report = PrepareReport {
            roads: drape_network(roads, terrain, self.params.fallback_altitude),
            poles: drape_poles(utility, terrain, self.params.fallback_altitude),
            structures_inferred: infer_structures(utility),
            azimuths_computed: compute_all_azimuths(utility),
        };
        debug!(?report, "networks prepared");
        report
    }

    /// [`Generator::generate_with_progress`] without a progress observer.
    pub fn generate<S, T, L>(
        &self,
        roads: &RoadNetwork,
        utility: &UtilityNetwork,
        terrain: &T,
        library: &L,
        sink: &mut S,
    ) -> Result<GeneratedScene, GenerateError>
    where
        S: MeshSink,
        T: HeightQuery + ?Sized,
        L: StructureLibrary + ?Sized,
    {
        self.generate_with_progress(roads, utility, terrain, library, sink, |_| {})
    }

    /// Build every junction cap, link surface, wire, pole and sign. `progress`
    /// receives advisory percentages from 0 to 100.
    pub fn generate_with_progress<S, T, L, P>(
        &self,
        roads: &RoadNetwork,
        utility: &UtilityNetwork,
        terrain: &T,
        library: &L,
        sink: &mut S,
        mut progress: P,
    ) -> Result<GeneratedScene, GenerateError>
    where
        S: MeshSink,
        T: HeightQuery + ?Sized,
        L: StructureLibrary + ?Sized,
        P: FnMut(u8),
    {
        progress(0);
        let params = &self.params;
        let mut stats = GenerationStats::default();
        let mut grid = BucketGrid::new(
            scene_extent(roads, utility),
            params.grid_resolution,
            params.lod_distance,
        );

        // Junctions and their caps.
        let node_ids: Vec<NodeId> = roads.nodes().map(|(id, _)| id).collect();
        type Solved = (Junction, Result<Vec<MeshChunk>, MeshError>);
        let solved: Vec<Option<Solved>> = map_ordered(&node_ids, |id| {
            let junction = solve_junction(roads, *id, &params.junction)?;
            let cap = junction_cap_mesh(
                &junction,
                roads,
                &self.atlas,
                params.cross_section.ground_offset,
                params.cross_section.max_vertices,
            );
            Some((junction, cap))
        });
        let mut junctions = Vec::with_capacity(solved.len());
        for (junction, cap) in solved.into_iter().flatten() {
            stats.nodes += 1;
            stats.fallback_directions += junction.fallback_directions;
            stats.parallel_pairs += junction.parallel_pairs;
            match junction.kind {
                JunctionKind::Orphan => {
                    warn!(node = junction.node.0, "orphan node, nothing built");
                    stats.orphan_nodes += 1;
                }
                JunctionKind::Intersection => stats.intersections += 1,
                JunctionKind::Endpoint | JunctionKind::Through => {}
            }
            store_chunks(cap?, sink, &mut grid, &mut stats);
            junctions.push(junction);
        }
        let junction_index: HashMap<NodeId, usize> =
            junctions.iter().enumerate().map(|(i, j)| (j.node, i)).collect();
        progress(25);

        // Link surfaces.
        let mut link_ids = Vec::with_capacity(roads.num_links());
        for (id, link) in roads.links() {
            if params.filter.includes(&link.attrs) {
                link_ids.push(id);
            } else {
                stats.links_filtered += 1;
            }
        }
        type Built = (LinkId, usize, Result<LinkMesh, MeshError>);
        let built: Vec<Option<Built>> = map_ordered(&link_ids, |id| {
            let link = roads.link(*id)?;
            let start = &junctions[*junction_index.get(&link.start())?];
            let end = &junctions[*junction_index.get(&link.end())?];
            let info = build_info(*id, link, start, end);
            let mesh = build_link_mesh(&info, &link.attrs, &self.atlas, &params.cross_section);
            Some((*id, info.fallbacks, mesh))
        });
        let mut lanes = HashMap::with_capacity(built.len());
        for (id, fallbacks, mesh) in built.into_iter().flatten() {
            let mesh = mesh?;
            stats.links_built += 1;
            stats.fallback_frames += fallbacks;
            stats.dropped_primitives += mesh.dropped;
            store_chunks(mesh.chunks, sink, &mut grid, &mut stats);
            lanes.insert(id, mesh.lanes);
        }
        progress(60);

        // Power lines.
        let (poles, missing) = pole_placements(utility, library);
        stats.poles_placed = poles.len();
        stats.poles_missing = missing;
        for placement in &poles {
            grid.insert_structure(placement.position, StructureRef::Pole(placement.pole));
        }
        match self.atlas.wire_material() {
            Some(material) => {
                let line_ids: Vec<LineId> = utility.lines().map(|(id, _)| id).collect();
                let wires: Vec<Result<LineWires, MeshError>> = map_ordered(&line_ids, |id| {
                    build_line_wires(
                        utility,
                        *id,
                        library,
                        terrain,
                        &params.catenary,
                        material,
                        params.cross_section.max_vertices,
                    )
                });
                for line in wires {
                    let line = line?;
                    stats.spans += line.spans;
                    stats.spans_skipped += line.skipped_spans;
                    store_chunks(line.chunks, sink, &mut grid, &mut stats);
                }
            }
            None if utility.num_lines() > 0 => warn!("atlas has no wire material, wires not built"),
            None => {}
        }
        progress(85);

        // Signs, only when every kind placed has a prefab.
        let mut signs = Vec::new();
        if params.build_signs {
            let placements = sign_placements(roads);
            let kinds_resolve = placements
                .iter()
                .all(|s| library.lookup(s.kind.prefab_name()).is_some());
            if kinds_resolve {
                signs = placements;
            } else {
                warn!(count = placements.len(), "sign prefabs missing, signs not placed");
            }
        }
        for (i, sign) in signs.iter().enumerate() {
            grid.insert_structure(sign.position, StructureRef::Sign(i));
        }
        stats.signs = signs.len();
        stats.clamped = grid.clamped_count();
        progress(100);

        info!(
            nodes = stats.nodes,
            links = stats.links_built,
            chunks = stats.chunks,
            vertices = stats.vertices,
            poles = stats.poles_placed,
            spans = stats.spans,
            signs = stats.signs,
            "scene generated"
        );

        Ok(GeneratedScene {
            grid,
            junctions,
            poles,
            signs,
            stats,
            junction_index,
            lanes,
        })
    }
}

/// Hand chunks to the sink and file their handles by bounds.
fn store_chunks<S: MeshSink>(
    chunks: Vec<MeshChunk>,
    sink: &mut S,
    grid: &mut BucketGrid<MeshHandle, StructureRef>,
    stats: &mut GenerationStats,
) {
    for chunk in chunks {
        let Some(bounds) = chunk.bounds() else {
            continue;
        };
        stats.chunks += 1;
        stats.vertices += chunk.vertices.len();
        let handle = sink.store(chunk);
        grid.insert_mesh(&bounds, handle);
    }
}

/// Planar extent of both networks; a unit square at the origin when empty.
fn scene_extent(roads: &RoadNetwork, utility: &UtilityNetwork) -> Rect {
    let mut extent = roads.extent();
    for (_, pole) in utility.poles() {
        match extent.as_mut() {
            Some(rect) => rect.grow_to_contain(pole.position),
            None => extent = Some(Rect::new(pole.position, pole.position)),
        }
    }
    extent.unwrap_or_else(|| Rect::new(Vec2::ZERO, Vec2::ONE))
}
