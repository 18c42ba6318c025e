//! A jittered street grid and a power line across it, for exercising the
//! generator without external data.

use causeway_network::{
    HalfWidths, IntersectionControl, LinkAttributes, NetworkError, NodeId, RoadNetwork, SurfaceType,
    UtilityNetwork,
};
use causeway_utility::{
    DEFAULT_STRUCTURE, H_FRAME_HOLD_DOWN, H_FRAME_TANGENT, LATTICE_DEADEND, LATTICE_TOWER,
    StructurePrefab, StructureSet, WireAttachment,
};
use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

/// Spacing between poles along the line.
const POLE_SPACING: f32 = 60.0;

/// Build a `blocks × blocks` street grid centred on the origin.
///
/// Every third street is an avenue with sidewalks, parking and traffic
/// lights; side streets are stop-controlled where they meet an avenue, and
/// the outer ring is gravel.
pub fn street_grid(blocks: u32, block_size: f32, seed: u64) -> Result<RoadNetwork, NetworkError> {
    let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
    let n = blocks as usize + 1;
    let half = blocks as f32 * block_size * 0.5;
    let jitter = block_size * 0.08;

    let mut roads = RoadNetwork::new();
    let mut grid: Vec<NodeId> = Vec::with_capacity(n * n);
    for row in 0..n {
        for col in 0..n {
            let edge = row == 0 || col == 0 || row + 1 == n || col + 1 == n;
            let offset = if edge {
                Vec2::ZERO
            } else {
                Vec2::new(rng.gen_range(-jitter..=jitter), rng.gen_range(-jitter..=jitter))
            };
            let p = Vec2::new(col as f32 * block_size - half, row as f32 * block_size - half)
                + offset;
            grid.push(roads.add_node(p));
        }
    }

    let is_avenue = |i: usize| i % 3 == 0 && i != 0 && i + 1 != n;
    let on_ring = |i: usize| i == 0 || i + 1 == n;

    // Links along each row run east; links along each column run north.
    // `street` indexes the line a link lies on, `cross` the streets it spans.
    for street in 0..n {
        for cross in 0..n - 1 {
            let runs = [
                (grid[street * n + cross], grid[street * n + cross + 1]),
                (grid[cross * n + street], grid[(cross + 1) * n + street]),
            ];
            for (here, next) in runs {
                let attrs = if on_ring(street) {
                    ring_road()
                } else if is_avenue(street) {
                    avenue()
                } else {
                    side_street(is_avenue(cross), is_avenue(cross + 1))
                };
                let (a, b) = (position(&roads, here), position(&roads, next));
                let bend =
                    (b - a).perp().normalize_or_zero() * rng.gen_range(-jitter..=jitter) * 0.5;
                roads.add_link(here, next, vec![a, (a + b) * 0.5 + bend, b], attrs)?;
            }
        }
    }

    // A stray survey point with no links, as real data tends to have.
    roads.add_node(Vec2::new(half + block_size, half + block_size));
    Ok(roads)
}

fn position(roads: &RoadNetwork, id: NodeId) -> Vec2 {
    roads.node(id).map(|n| n.position).unwrap_or_default()
}

fn avenue() -> LinkAttributes {
    let mut attrs = LinkAttributes {
        lanes: 4,
        control: [IntersectionControl::TrafficLight; 2],
        ..LinkAttributes::default()
    };
    attrs.flags.sidewalk_left = true;
    attrs.flags.sidewalk_right = true;
    attrs.flags.parking_left = true;
    attrs.flags.parking_right = true;
    attrs
}

fn side_street(stop_at_start: bool, stop_at_end: bool) -> LinkAttributes {
    let control = |stop| {
        if stop {
            IntersectionControl::StopSign
        } else {
            IntersectionControl::Uncontrolled
        }
    };
    let mut attrs = LinkAttributes {
        control: [control(stop_at_start), control(stop_at_end)],
        ..LinkAttributes::default()
    };
    attrs.flags.sidewalk_right = true;
    attrs
}

fn ring_road() -> LinkAttributes {
    LinkAttributes {
        surface: SurfaceType::Gravel,
        lanes: 1,
        lane_width: 4.0,
        half_widths: Some(HalfWidths::new(2.0, 2.0)),
        ..LinkAttributes::default()
    }
}

/// A straight transmission line running diagonally across the grid. Poles are
/// tagged the way survey data tags them; structures are left to inference.
pub fn power_line(blocks: u32, block_size: f32) -> Result<UtilityNetwork, NetworkError> {
    let half = blocks as f32 * block_size * 0.5;
    let from = Vec2::new(-half, -half * 0.5);
    let to = Vec2::new(half, half * 0.5);
    let count = ((to - from).length() / POLE_SPACING).ceil().max(1.0) as usize + 1;

    let mut utility = UtilityNetwork::new();
    let mut poles = Vec::with_capacity(count);
    for i in 0..count {
        let t = i as f32 / (count - 1) as f32;
        let id = utility.add_pole(from.lerp(to, t), "");
        if let Some(pole) = utility.pole_mut(id) {
            let design = if i % 2 == 0 { "barrel" } else { "h-frame" };
            pole.tags.push(("design".to_string(), design.to_string()));
            if i == 0 || i + 1 == count {
                pole.tags.push(("tower:type".to_string(), "termination".to_string()));
            }
        }
        poles.push(id);
    }
    utility.add_line(poles)?;
    Ok(utility)
}

/// Prefabs for every structure the synthetic scene can ask for.
pub fn structure_set() -> StructureSet {
    let three_phase = |arm: f32, height: f32| {
        [-arm, 0.0, arm]
            .into_iter()
            .map(|x| WireAttachment {
                outgoing: Vec3::new(x, height, 0.0),
                incoming: Vec3::new(x, height, 0.0),
            })
            .collect::<Vec<_>>()
    };
    let prefab = |name: &str, model: &str, wires: Vec<WireAttachment>| StructurePrefab {
        name: name.to_string(),
        model: model.to_string(),
        wires,
    };

    let mut set = StructureSet::new();
    set.insert(prefab(LATTICE_TOWER, "structures/lattice_tower.obj", three_phase(6.0, 30.0)));
    set.insert(prefab(LATTICE_DEADEND, "structures/lattice_deadend.obj", three_phase(7.0, 28.0)));
    set.insert(prefab(H_FRAME_TANGENT, "structures/h_frame.obj", three_phase(4.0, 18.0)));
    set.insert(prefab(
        H_FRAME_HOLD_DOWN,
        "structures/h_frame_hold_down.obj",
        three_phase(4.0, 17.0),
    ));
    set.insert(prefab(DEFAULT_STRUCTURE, "structures/steel_pole.obj", three_phase(2.0, 14.0)));
    set.insert(prefab("American Stopsign", "signs/stop.obj", Vec::new()));
    set.insert(prefab("Stoplight (right)", "signs/stoplight.obj", Vec::new()));
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use causeway_utility::{StructureLibrary, infer_structures};

    #[test]
    fn test_grid_counts() {
        let roads = street_grid(3, 100.0, 1).unwrap();
        // 16 grid nodes plus the stray one; 2 * 3 * 4 links.
        assert_eq!(roads.num_nodes(), 17);
        assert_eq!(roads.num_links(), 24);
    }

    #[test]
    fn test_grid_is_deterministic() {
        let a = street_grid(4, 80.0, 7).unwrap();
        let b = street_grid(4, 80.0, 7).unwrap();
        let pa: Vec<Vec2> = a.nodes().map(|(_, n)| n.position).collect();
        let pb: Vec<Vec2> = b.nodes().map(|(_, n)| n.position).collect();
        assert_eq!(pa, pb, "same seed must give the same grid");
    }

    #[test]
    fn test_ring_is_gravel() {
        let roads = street_grid(3, 100.0, 1).unwrap();
        let gravel = roads
            .links()
            .filter(|(_, l)| l.attrs.surface == SurfaceType::Gravel)
            .count();
        assert_eq!(gravel, 12, "outer ring of a 3x3 grid has 12 links");
    }

    #[test]
    fn test_power_line_structures_resolve() {
        let mut utility = power_line(4, 100.0).unwrap();
        assert_eq!(utility.num_lines(), 1);
        assert!(utility.num_poles() >= 3, "got {} poles", utility.num_poles());
        infer_structures(&mut utility);
        let set = structure_set();
        for (id, pole) in utility.poles() {
            assert!(
                set.lookup(&pole.structure).is_some(),
                "{id:?} has unknown structure {:?}",
                pole.structure
            );
        }
        let first = utility.poles().next().map(|(_, p)| p.structure.clone());
        assert_eq!(first.as_deref(), Some(LATTICE_DEADEND));
    }
}
