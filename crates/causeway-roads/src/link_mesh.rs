//! Link surface meshes: strips swept along a link's [`BuildInfo`], grouped by
//! material into size-bounded triangle-strip chunks.

use causeway_materials::{MaterialId, TextureAtlas};
use causeway_mesh::{ChunkedMeshBuilder, MeshChunk, MeshError, MeshVertex, PrimitiveKind};
use causeway_network::LinkAttributes;
use glam::{Vec2, Vec3};

use crate::cross_section::{BuildInfo, Strip, StripNormal, UvScales, lane_centerlines, strip_layout};
use crate::texture_role_for;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrossSectionParams {
    /// Lift of every road surface above the draped centerline.
    pub ground_offset: f32,
    pub uv: UvScales,
    /// Vertex ceiling per output chunk.
    pub max_vertices: usize,
}

impl Default for CrossSectionParams {
    fn default() -> Self {
        Self {
            ground_offset: 0.1,
            uv: UvScales::default(),
            max_vertices: 10_000,
        }
    }
}

/// Everything generated for one link.
#[derive(Clone, Debug, Default)]
pub struct LinkMesh {
    pub chunks: Vec<MeshChunk>,
    /// One polyline per lane, left to right.
    pub lanes: Vec<Vec<Vec3>>,
    /// Strip primitives discarded for having too few points.
    pub dropped: usize,
}

/// Sweep the cross-section of `attrs` along `info`.
pub fn build_link_mesh(
    info: &BuildInfo,
    attrs: &LinkAttributes,
    atlas: &TextureAtlas,
    params: &CrossSectionParams,
) -> Result<LinkMesh, MeshError> {
    let strips = strip_layout(attrs, texture_role_for(attrs), params.uv);

    // Few materials per link: a linear scan beats hashing here.
    let mut builders: Vec<(MaterialId, ChunkedMeshBuilder)> = Vec::new();
    for strip in &strips {
        let region = atlas.region(strip.role);
        let index = match builders.iter().position(|(m, _)| *m == region.material) {
            Some(i) => i,
            None => {
                let builder = ChunkedMeshBuilder::new(
                    PrimitiveKind::TriangleStrip,
                    region.material,
                    params.max_vertices,
                )?;
                builders.push((region.material, builder));
                builders.len() - 1
            }
        };
        let builder = &mut builders[index].1;
        builder.begin_primitive()?;
        for point in &info.points {
            let [left, right] =
                strip_vertices(strip, point, params.ground_offset, |u, v| region.adapt(u, v));
            builder.push_vertex(left)?;
            builder.push_vertex(right)?;
        }
        builder.end_primitive()?;
    }

    let mut mesh = LinkMesh {
        lanes: lane_centerlines(info, attrs, params.ground_offset),
        ..LinkMesh::default()
    };
    for (_, builder) in builders {
        mesh.dropped += builder.dropped_primitives();
        mesh.chunks.extend(builder.finish());
    }
    Ok(mesh)
}

/// Left and right vertex of `strip` at one section point.
fn strip_vertices(
    strip: &Strip,
    point: &crate::SectionPoint,
    ground_offset: f32,
    adapt: impl Fn(f32, f32) -> Vec2,
) -> [MeshVertex; 2] {
    let normal = match strip.normal {
        StripNormal::Up => Vec3::Y,
        StripNormal::Right => point.cross.normalize_or_zero(),
        StripNormal::Left => -point.cross.normalize_or_zero(),
    };
    let v = point.length * strip.uv_scale;
    [
        MeshVertex::new(
            point.at(strip.left, strip.left_height + ground_offset),
            normal,
            adapt(strip.u_left, v),
        ),
        MeshVertex::new(
            point.at(strip.right, strip.right_height + ground_offset),
            normal,
            adapt(strip.u_right, v),
        ),
    ]
}
