//! Spatial bucketing of generated content into an N×N grid of LOD cells.

use causeway_math::{Aabb, Rect, planar_to_world, world_to_planar};
use glam::{Vec2, Vec3};
use tracing::warn;

/// Fraction of the extent added on each side so content on the edge lands
/// comfortably inside the outer cells.
const EDGE_PADDING: f32 = 1.0 / 20.0;

/// Distance band in which a cell is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LodRange {
    pub near: f32,
    pub far: f32,
}

impl LodRange {
    pub fn new(near: f32, far: f32) -> Self {
        Self { near, far }
    }

    pub fn contains(&self, distance: f32) -> bool {
        distance >= self.near && distance < self.far
    }
}

/// One grid cell: its LOD switch and everything bucketed into it.
#[derive(Clone, Debug)]
pub struct BucketCell<H, P> {
    center: Vec2,
    range: LodRange,
    bounds: Aabb,
    meshes: Vec<H>,
    structures: Vec<P>,
}

impl<H, P> BucketCell<H, P> {
    /// LOD centre: the planar cell centre at the mid-height of the content,
    /// or at altitude zero while the cell is empty.
    pub fn center(&self) -> Vec3 {
        let altitude = if self.bounds.is_empty() {
            0.0
        } else {
            self.bounds.center().y
        };
        planar_to_world(self.center, altitude)
    }

    pub fn range(&self) -> LodRange {
        self.range
    }

    /// Union of the bounds of everything placed in the cell.
    pub fn bounds(&self) -> Option<Aabb> {
        (!self.bounds.is_empty()).then_some(self.bounds)
    }

    pub fn meshes(&self) -> &[H] {
        &self.meshes
    }

    pub fn structures(&self) -> &[P] {
        &self.structures
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty() && self.structures.is_empty()
    }

    /// Whether the cell should be drawn from `eye`.
    pub fn visible_from(&self, eye: Vec3) -> bool {
        self.range.contains(self.center().distance(eye))
    }
}

/// N×N grid of [`BucketCell`]s covering the network extent.
///
/// `H` is the mesh sink's handle type and `P` the structure placement type.
#[derive(Clone, Debug)]
pub struct BucketGrid<H, P> {
    origin: Vec2,
    cell_size: Vec2,
    resolution: usize,
    cells: Vec<BucketCell<H, P>>,
    clamped: usize,
}

impl<H, P> BucketGrid<H, P> {
    /// Build an empty grid over `extent`, padded by a twentieth on each side.
    /// Every cell starts visible from `0` to `lod_distance`.
    pub fn new(extent: Rect, resolution: usize, lod_distance: f32) -> Self {
        let resolution = resolution.max(1);
        let pad = extent.size() * EDGE_PADDING;
        let min = extent.min - pad;
        // A degenerate extent still needs a non-zero cell size.
        let range = (extent.size() + pad * 2.0).max(Vec2::ONE);
        let cell_size = range / resolution as f32;

        let mut cells = Vec::with_capacity(resolution * resolution);
        for row in 0..resolution {
            for col in 0..resolution {
                cells.push(BucketCell {
                    center: min + (Vec2::new(col as f32, row as f32) + 0.5) * cell_size,
                    range: LodRange::new(0.0, lod_distance),
                    bounds: Aabb::empty(),
                    meshes: Vec::new(),
                    structures: Vec::new(),
                });
            }
        }

        Self {
            origin: min,
            cell_size,
            resolution,
            cells,
            clamped: 0,
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn cell_size(&self) -> Vec2 {
        self.cell_size
    }

    /// Cell `(col, row)` containing planar point `p`, plus whether the point
    /// lay outside the grid and had to be clamped in.
    pub fn cell_coords(&self, p: Vec2) -> ((usize, usize), bool) {
        let g = ((p - self.origin) / self.cell_size).floor();
        let max = (self.resolution - 1) as f32;
        let clamped = g.x < 0.0 || g.y < 0.0 || g.x > max || g.y > max || !g.is_finite();
        let g = if g.is_finite() { g.clamp(Vec2::ZERO, Vec2::splat(max)) } else { Vec2::ZERO };
        ((g.x as usize, g.y as usize), clamped)
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<&BucketCell<H, P>> {
        if col >= self.resolution || row >= self.resolution {
            return None;
        }
        self.cells.get(row * self.resolution + col)
    }

    pub fn cells(&self) -> impl Iterator<Item = &BucketCell<H, P>> + '_ {
        self.cells.iter()
    }

    /// Cells that are non-empty and in LOD range of `eye`.
    pub fn visible_cells(&self, eye: Vec3) -> impl Iterator<Item = &BucketCell<H, P>> + '_ {
        self.cells
            .iter()
            .filter(move |c| !c.is_empty() && c.visible_from(eye))
    }

    /// File a mesh handle by the centre of its bounds. Returns the cell.
    pub fn insert_mesh(&mut self, bounds: &Aabb, handle: H) -> (usize, usize) {
        let cell = self.locate(bounds.center());
        let c = &mut self.cells[cell.1 * self.resolution + cell.0];
        c.bounds = c.bounds.union(bounds);
        c.meshes.push(handle);
        cell
    }

    /// File a structure placement by its world position. Returns the cell.
    pub fn insert_structure(&mut self, position: Vec3, placement: P) -> (usize, usize) {
        let cell = self.locate(position);
        let c = &mut self.cells[cell.1 * self.resolution + cell.0];
        c.bounds.grow_to_contain(position);
        c.structures.push(placement);
        cell
    }

    /// Change the far LOD distance of every cell.
    pub fn set_lod_distance(&mut self, distance: f32) {
        for cell in &mut self.cells {
            cell.range.far = distance;
        }
    }

    /// Items that fell outside the grid and were clamped into an edge cell.
    pub fn clamped_count(&self) -> usize {
        self.clamped
    }

    pub fn mesh_count(&self) -> usize {
        self.cells.iter().map(|c| c.meshes.len()).sum()
    }

    pub fn structure_count(&self) -> usize {
        self.cells.iter().map(|c| c.structures.len()).sum()
    }

    fn locate(&mut self, world: Vec3) -> (usize, usize) {
        let p = world_to_planar(world);
        let (cell, clamped) = self.cell_coords(p);
        if clamped {
            self.clamped += 1;
            warn!(
                x = p.x,
                y = p.y,
                col = cell.0,
                row = cell.1,
                "content outside bucket grid, clamped"
            );
        }
        cell
    }
}
