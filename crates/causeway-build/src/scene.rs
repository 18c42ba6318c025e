//! The result of a generation pass.

use causeway_lod::BucketGrid;
use causeway_mesh::MeshHandle;
use causeway_network::{LinkId, NodeId, PoleId};
use causeway_roads::{Junction, SignPlacement};
use causeway_utility::PolePlacement;
use glam::Vec3;
use hashbrown::HashMap;

/// A structure filed into the bucket grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StructureRef {
    Pole(PoleId),
    /// Index into [`GeneratedScene::signs`].
    Sign(usize),
}

/// Counters for one generation pass. Data-quality problems are counted here
/// and logged, never fatal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationStats {
    pub nodes: usize,
    pub orphan_nodes: usize,
    pub intersections: usize,
    /// Link ends whose direction could not be determined.
    pub fallback_directions: usize,
    /// Junction neighbour pairs solved with the parallel fallback.
    pub parallel_pairs: usize,
    pub links_built: usize,
    pub links_filtered: usize,
    /// Section points whose frame had to be guessed.
    pub fallback_frames: usize,
    pub dropped_primitives: usize,
    pub chunks: usize,
    pub vertices: usize,
    pub poles_placed: usize,
    pub poles_missing: usize,
    pub spans: usize,
    pub spans_skipped: usize,
    pub signs: usize,
    /// Chunks or structures that fell outside the bucket grid.
    pub clamped: usize,
}

/// Everything [`crate::Generator::generate`] produces. Mesh data itself lives
/// in the caller's sink; the grid holds its handles.
#[derive(Debug)]
pub struct GeneratedScene {
    pub grid: BucketGrid<MeshHandle, StructureRef>,
    pub junctions: Vec<Junction>,
    pub poles: Vec<PolePlacement>,
    pub signs: Vec<SignPlacement>,
    pub stats: GenerationStats,
    pub(crate) junction_index: HashMap<NodeId, usize>,
    pub(crate) lanes: HashMap<LinkId, Vec<Vec<Vec3>>>,
}

impl GeneratedScene {
    pub fn junction(&self, node: NodeId) -> Option<&Junction> {
        self.junction_index.get(&node).map(|i| &self.junctions[*i])
    }

    /// Lane centerlines of a built link, left to right.
    pub fn lane_centerlines(&self, link: LinkId) -> Option<&[Vec<Vec3>]> {
        self.lanes.get(&link).map(Vec::as_slice)
    }
}
