//! Junction caps: the polygon left between the links of an intersection,
//! filled as a triangle fan.

use causeway_materials::TextureAtlas;
use causeway_math::planar_to_world;
use causeway_mesh::{ChunkedMeshBuilder, MeshChunk, MeshError, MeshVertex, PrimitiveKind};
use causeway_network::RoadNetwork;
use glam::{Vec2, Vec3};

use crate::{Junction, JunctionKind, node_role_for};

/// Fan over the intersection polygon, or no chunks for nodes of valence
/// below three.
pub fn junction_cap_mesh(
    junction: &Junction,
    network: &RoadNetwork,
    atlas: &TextureAtlas,
    ground_offset: f32,
    max_vertices: usize,
) -> Result<Vec<MeshChunk>, MeshError> {
    if junction.kind != JunctionKind::Intersection {
        return Ok(Vec::new());
    }

    let role = node_role_for(
        junction
            .slots
            .iter()
            .filter_map(|s| network.link(s.link))
            .map(|l| &l.attrs),
    );
    let region = atlas.region(role);
    let height = junction.altitude + ground_offset;
    let vertex = |p: Vec2, u: f32, v: f32| {
        MeshVertex::new(planar_to_world(p, height), Vec3::Y, region.adapt(u, v))
    };

    // Ring alternates right and left vertex of each slot.
    let ring: Vec<MeshVertex> = junction
        .polygon()
        .into_iter()
        .enumerate()
        .map(|(i, p)| if i % 2 == 0 { vertex(p, 1.0, 1.0) } else { vertex(p, 0.0, 1.0) })
        .collect();

    let mut builder =
        ChunkedMeshBuilder::new(PrimitiveKind::TriangleFan, region.material, max_vertices)?;
    builder.add_primitive(
        std::iter::once(vertex(junction.center, 0.5, 0.5))
            .chain(ring.iter().copied())
            .chain(ring.first().copied()),
    )?;
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{JunctionParams, solve_junction};
    use causeway_materials::TextureRole;
    use causeway_network::{LinkAttributes, SurfaceType};

    fn star(surfaces: &[SurfaceType]) -> (RoadNetwork, Junction) {
        let mut net = RoadNetwork::new();
        let center = net.add_node(Vec2::ZERO);
        for (i, surface) in surfaces.iter().enumerate() {
            let angle = i as f32 * std::f32::consts::TAU / surfaces.len() as f32;
            let far = Vec2::from_angle(angle) * 50.0;
            let n = net.add_node(far);
            let attrs = LinkAttributes {
                surface: *surface,
                ..LinkAttributes::default()
            };
            net.add_link(center, n, vec![Vec2::ZERO, far], attrs).unwrap();
        }
        let junction = solve_junction(&net, center, &JunctionParams::default()).unwrap();
        (net, junction)
    }

    #[test]
    fn test_four_way_cap_is_closed_fan_facing_up() {
        let (net, junction) = star(&[SurfaceType::Paved; 4]);
        let atlas = TextureAtlas::standard();
        let chunks = junction_cap_mesh(&junction, &net, &atlas, 0.1, 64).unwrap();
        assert_eq!(chunks.len(), 1);
        let chunk = &chunks[0];
        assert_eq!(chunk.kind, PrimitiveKind::TriangleFan);
        assert_eq!(chunk.material, atlas.material_for(TextureRole::Pavement));
        // Centre, eight ring vertices, closing vertex.
        assert_eq!(chunk.vertices.len(), 10);
        assert_eq!(chunk.vertices[1], chunk.vertices[9], "fan closes on its first ring vertex");
        let idx = chunk.triangle_indices();
        for tri in idx.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|k| chunk.vertices[tri[k] as usize].position());
            assert!((b - a).cross(c - a).y >= 0.0, "cap triangle {tri:?} faces down");
        }
        assert!((chunk.vertices[0].position().y - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_cap_material_follows_special_surface() {
        let (net, junction) = star(&[SurfaceType::Paved, SurfaceType::Gravel, SurfaceType::Paved]);
        let atlas = TextureAtlas::standard();
        let chunks = junction_cap_mesh(&junction, &net, &atlas, 0.0, 64).unwrap();
        assert_eq!(chunks[0].material, atlas.material_for(TextureRole::Gravel));
    }

    #[test]
    fn test_no_cap_below_valence_three() {
        let (net, junction) = star(&[SurfaceType::Paved, SurfaceType::Paved]);
        let chunks =
            junction_cap_mesh(&junction, &net, &TextureAtlas::standard(), 0.0, 64).unwrap();
        assert!(chunks.is_empty(), "through nodes get no cap");
    }
}
