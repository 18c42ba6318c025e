//! Intersection solver.
//!
//! For every node, works out where each incident link's surface stops so that
//! neighbouring links meet without overlap, and the polygon left between them.
//! All geometry is planar; each slot's `left`/`right` are given in the
//! outgoing frame, looking from the node along the link.

use causeway_math::{intersect_edges, left_normal, planar_angle, right_normal};
use causeway_network::{HalfWidths, LinkEnd, LinkId, NodeId, RoadNetwork};
use glam::Vec2;
use tracing::{debug, warn};

/// Tuning for the general (valence ≥ 3) solver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JunctionParams {
    /// Pairs of link directions whose cross product is below this are
    /// treated as parallel.
    pub parallel_epsilon: f32,
    /// Setback used for parallel pairs, in metres.
    pub parallel_fallback: f32,
    /// Largest solved setback, as a multiple of the wider arm's total width.
    /// Longer setbacks (and any longer than the link itself) are replaced by
    /// `parallel_fallback`.
    pub max_setback_factor: f32,
}

impl Default for JunctionParams {
    fn default() -> Self {
        Self {
            parallel_epsilon: 0.01,
            parallel_fallback: 1.0,
            max_setback_factor: 4.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JunctionKind {
    /// No links: nothing to build.
    Orphan,
    /// A dead end.
    Endpoint,
    /// Two links continuing through each other.
    Through,
    /// Three or more links; gets a cap polygon.
    Intersection,
}

/// Where one link end meets the junction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JunctionSlot {
    pub link: LinkId,
    pub end: LinkEnd,
    /// Left edge vertex, outgoing frame.
    pub left: Vec2,
    /// Right edge vertex, outgoing frame.
    pub right: Vec2,
    /// Setback from the node centre along the link.
    pub distance: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Junction {
    pub node: NodeId,
    pub kind: JunctionKind,
    /// Planar node position.
    pub center: Vec2,
    /// Draped node altitude.
    pub altitude: f32,
    /// One slot per incidence. For intersections these are sorted
    /// counter-clockwise by link direction; otherwise in incidence order.
    pub slots: Vec<JunctionSlot>,
    /// Link ends whose direction could not be determined.
    pub fallback_directions: usize,
    /// Neighbour pairs that were solved with the parallel fallback.
    pub parallel_pairs: usize,
}

impl Junction {
    /// Edge vertices for a link end in the link's own direction frame:
    /// `(left, right)` as seen walking from start to end.
    pub fn vertices_for_link(&self, link: LinkId, end: LinkEnd) -> Option<(Vec2, Vec2)> {
        let slot = self.slots.iter().find(|s| s.link == link && s.end == end)?;
        Some(match end {
            LinkEnd::Start => (slot.left, slot.right),
            LinkEnd::End => (slot.right, slot.left),
        })
    }

    pub fn slot(&self, link: LinkId, end: LinkEnd) -> Option<&JunctionSlot> {
        self.slots.iter().find(|s| s.link == link && s.end == end)
    }

    /// Ordered vertex ring: empty for an orphan, the two edge points for
    /// valence 1 or 2, and `right, left` per slot counter-clockwise for an
    /// intersection.
    pub fn polygon(&self) -> Vec<Vec2> {
        match self.kind {
            JunctionKind::Orphan => Vec::new(),
            JunctionKind::Endpoint | JunctionKind::Through => self
                .slots
                .first()
                .map(|s| vec![s.left, s.right])
                .unwrap_or_default(),
            JunctionKind::Intersection => {
                self.slots.iter().flat_map(|s| [s.right, s.left]).collect()
            }
        }
    }
}

/// A link end leaving the node.
struct Arm {
    link: LinkId,
    end: LinkEnd,
    dir: Vec2,
    widths: HalfWidths,
    /// Planar length of the link.
    length: f32,
}

/// Solve the junction at `node`. `None` if the node does not exist.
pub fn solve_junction(
    network: &RoadNetwork,
    node: NodeId,
    params: &JunctionParams,
) -> Option<Junction> {
    let n = network.node(node)?;
    let center = n.position;
    let mut junction = Junction {
        node,
        kind: JunctionKind::Orphan,
        center,
        altitude: n.world.y,
        slots: Vec::new(),
        fallback_directions: 0,
        parallel_pairs: 0,
    };

    let mut arms = Vec::with_capacity(n.valence());
    for inc in n.incidences() {
        let Some(link) = network.link(inc.link) else {
            continue;
        };
        let dir = link.outgoing_direction(inc.end).unwrap_or_else(|| {
            warn!(node = node.0, link = inc.link.0, "link has no extent at node, assuming east");
            junction.fallback_directions += 1;
            Vec2::X
        });
        arms.push(Arm {
            link: inc.link,
            end: inc.end,
            dir,
            widths: link.attrs.effective_half_widths().outgoing(inc.end),
            length: link.planar_length(),
        });
    }

    match arms.len() {
        0 => {
            debug!(node = node.0, "orphan node");
        }
        1 => {
            let a = &arms[0];
            junction.kind = JunctionKind::Endpoint;
            junction.slots.push(JunctionSlot {
                link: a.link,
                end: a.end,
                left: center + left_normal(a.dir) * a.widths.left,
                right: center + right_normal(a.dir) * a.widths.right,
                distance: 0.0,
            });
        }
        2 => {
            junction.kind = JunctionKind::Through;
            junction.slots = solve_through(center, &arms[0], &arms[1]);
        }
        _ => {
            junction.kind = JunctionKind::Intersection;
            let (slots, parallel) = solve_intersection(center, arms, params);
            junction.slots = slots;
            junction.parallel_pairs = parallel;
        }
    }
    Some(junction)
}

/// Two links: a single cut perpendicular to the through direction, shared by
/// both links so their surfaces join seamlessly.
fn solve_through(center: Vec2, a0: &Arm, a1: &Arm) -> Vec<JunctionSlot> {
    // Travelling from link 0 into link 1.
    let through = (a1.dir - a0.dir).try_normalize().unwrap_or_else(|| left_normal(a0.dir));
    let w_left = (a1.widths.left + a0.widths.right) * 0.5;
    let w_right = (a1.widths.right + a0.widths.left) * 0.5;
    let on_left = center + left_normal(through) * w_left;
    let on_right = center + right_normal(through) * w_right;

    vec![
        JunctionSlot {
            link: a0.link,
            end: a0.end,
            left: on_right,
            right: on_left,
            distance: 0.0,
        },
        JunctionSlot {
            link: a1.link,
            end: a1.end,
            left: on_left,
            right: on_right,
            distance: 0.0,
        },
    ]
}

/// Three or more links: each link is set back far enough that its edges
/// clear both angular neighbours.
fn solve_intersection(
    center: Vec2,
    mut arms: Vec<Arm>,
    params: &JunctionParams,
) -> (Vec<JunctionSlot>, usize) {
    arms.sort_by(|a, b| planar_angle(a.dir).total_cmp(&planar_angle(b.dir)));
    let n = arms.len();
    let mut distance = vec![0.0f32; n];
    let mut parallel = 0;

    for i in 0..n {
        let j = (i + 1) % n;
        let (a, b) = (&arms[i], &arms[j]);
        // Left edge of a faces its counter-clockwise neighbour's right edge.
        let p1 = center + left_normal(a.dir) * a.widths.left;
        let p2 = center + right_normal(b.dir) * b.widths.right;
        let limit = params.max_setback_factor * a.widths.total().max(b.widths.total());
        let hit = intersect_edges(p1, a.dir, p2, b.dir, params.parallel_epsilon).filter(|hit| {
            hit.along_first <= limit.min(a.length) && hit.along_second <= limit.min(b.length)
        });
        let (da, db) = match hit {
            Some(hit) => (hit.along_first, hit.along_second),
            None => {
                parallel += 1;
                (params.parallel_fallback, params.parallel_fallback)
            }
        };
        distance[i] = distance[i].max(da);
        distance[j] = distance[j].max(db);
    }

    let slots = arms
        .iter()
        .zip(distance)
        .map(|(arm, d)| {
            let along = arm.dir * d;
            JunctionSlot {
                link: arm.link,
                end: arm.end,
                left: center + left_normal(arm.dir) * arm.widths.left + along,
                right: center + right_normal(arm.dir) * arm.widths.right + along,
                distance: d,
            }
        })
        .collect();
    (slots, parallel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use causeway_network::LinkAttributes;

    const EPS: f32 = 1e-4;

    fn attrs(left: f32, right: f32) -> LinkAttributes {
        LinkAttributes {
            half_widths: Some(HalfWidths::new(left, right)),
            ..LinkAttributes::default()
        }
    }

    /// Star of links leaving a centre node at the origin, one per direction.
    fn star(dirs: &[Vec2], width: f32) -> (RoadNetwork, NodeId, Vec<LinkId>) {
        let mut net = RoadNetwork::new();
        let c = net.add_node(Vec2::ZERO);
        let links = dirs
            .iter()
            .map(|d| {
                let far = *d * 50.0;
                let n = net.add_node(far);
                net.add_link(c, n, vec![Vec2::ZERO, far], attrs(width, width)).unwrap()
            })
            .collect();
        (net, c, links)
    }

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < EPS
    }

    #[test]
    fn test_orphan() {
        let mut net = RoadNetwork::new();
        let n = net.add_node(Vec2::ONE);
        let j = solve_junction(&net, n, &JunctionParams::default()).unwrap();
        assert_eq!(j.kind, JunctionKind::Orphan);
        assert!(j.polygon().is_empty());
        assert!(solve_junction(&net, NodeId(99), &JunctionParams::default()).is_none());
    }

    #[test]
    fn test_valence_one_symmetric() {
        let mut net = RoadNetwork::new();
        let a = net.add_node(Vec2::ZERO);
        let b = net.add_node(Vec2::new(0.0, 30.0));
        let l = net
            .add_link(a, b, vec![Vec2::ZERO, Vec2::new(0.0, 30.0)], attrs(3.0, 3.0))
            .unwrap();

        let j = solve_junction(&net, a, &JunctionParams::default()).unwrap();
        assert_eq!(j.kind, JunctionKind::Endpoint);
        let (left, right) = j.vertices_for_link(l, LinkEnd::Start).unwrap();
        assert!(close(left, Vec2::new(-3.0, 0.0)), "left {left}");
        assert!(close(right, Vec2::new(3.0, 0.0)), "right {right}");
        assert!((left.length() - right.length()).abs() < EPS, "symmetric about the node");
        assert!(left.dot(Vec2::Y).abs() < EPS, "perpendicular to the link");
        assert_eq!(j.polygon().len(), 2);
    }

    #[test]
    fn test_valence_one_at_link_end_uses_own_frame() {
        let mut net = RoadNetwork::new();
        let a = net.add_node(Vec2::ZERO);
        let b = net.add_node(Vec2::new(10.0, 0.0));
        let l = net
            .add_link(a, b, vec![Vec2::ZERO, Vec2::new(10.0, 0.0)], attrs(1.0, 4.0))
            .unwrap();

        let j = solve_junction(&net, b, &JunctionParams::default()).unwrap();
        // Link heads east; its left (north) edge is 1 m out, right (south) 4 m.
        let (left, right) = j.vertices_for_link(l, LinkEnd::End).unwrap();
        assert!(close(left, Vec2::new(10.0, 1.0)), "left {left}");
        assert!(close(right, Vec2::new(10.0, -4.0)), "right {right}");
    }

    #[test]
    fn test_valence_two_bisector_and_continuity() {
        let mut net = RoadNetwork::new();
        let a = net.add_node(Vec2::new(-10.0, 0.0));
        let m = net.add_node(Vec2::ZERO);
        let b = net.add_node(Vec2::new(0.0, 10.0));
        let l0 = net
            .add_link(a, m, vec![Vec2::new(-10.0, 0.0), Vec2::ZERO], attrs(2.0, 2.0))
            .unwrap();
        let l1 = net
            .add_link(m, b, vec![Vec2::ZERO, Vec2::new(0.0, 10.0)], attrs(2.0, 2.0))
            .unwrap();

        let j = solve_junction(&net, m, &JunctionParams::default()).unwrap();
        assert_eq!(j.kind, JunctionKind::Through);
        assert_eq!(j.polygon().len(), 2);

        // Arriving eastbound on l0 and leaving northbound on l1.
        let (in_left, in_right) = j.vertices_for_link(l0, LinkEnd::End).unwrap();
        let (out_left, out_right) = j.vertices_for_link(l1, LinkEnd::Start).unwrap();
        assert_eq!(in_left, out_left, "left edges meet");
        assert_eq!(in_right, out_right, "right edges meet");

        // The cut lies on the bisector of the turn.
        let bisector = Vec2::new(-1.0, 1.0).normalize();
        assert!(in_left.normalize().dot(bisector) > 0.999, "left {in_left}");
        assert!((in_left.length() - 2.0).abs() < EPS);

        // Without l0 the node is a dead end of l1, at plain half widths.
        net.remove_link(l0).unwrap();
        let j = solve_junction(&net, m, &JunctionParams::default()).unwrap();
        assert_eq!(j.kind, JunctionKind::Endpoint);
        let (left, right) = j.vertices_for_link(l1, LinkEnd::Start).unwrap();
        assert!(close(left, Vec2::new(-2.0, 0.0)), "left {left}");
        assert!(close(right, Vec2::new(2.0, 0.0)), "right {right}");
    }

    #[test]
    fn test_valence_two_averages_facing_widths() {
        let mut net = RoadNetwork::new();
        let a = net.add_node(Vec2::new(-10.0, 0.0));
        let m = net.add_node(Vec2::ZERO);
        let b = net.add_node(Vec2::new(10.0, 0.0));
        let l0 = net
            .add_link(a, m, vec![Vec2::new(-10.0, 0.0), Vec2::ZERO], attrs(2.0, 4.0))
            .unwrap();
        net.add_link(m, b, vec![Vec2::ZERO, Vec2::new(10.0, 0.0)], attrs(4.0, 6.0)).unwrap();

        let j = solve_junction(&net, m, &JunctionParams::default()).unwrap();
        let (left, right) = j.vertices_for_link(l0, LinkEnd::End).unwrap();
        assert!(close(left, Vec2::new(0.0, 3.0)), "left {left}");
        assert!(close(right, Vec2::new(0.0, -5.0)), "right {right}");
    }

    #[test]
    fn test_four_way_square() {
        let w = 5.0;
        let (net, c, links) = star(&[Vec2::X, Vec2::Y, -Vec2::X, -Vec2::Y], w);
        let j = solve_junction(&net, c, &JunctionParams::default()).unwrap();
        assert_eq!(j.kind, JunctionKind::Intersection);

        let poly = j.polygon();
        assert_eq!(poly.len(), 8, "2 vertices per link");
        for corner in [Vec2::new(w, w), Vec2::new(-w, w), Vec2::new(-w, -w), Vec2::new(w, -w)] {
            let hits = poly.iter().filter(|p| close(**p, corner)).count();
            assert_eq!(hits, 2, "corner {corner} shared by two links");
        }
        for l in links {
            let slot = j.slot(l, LinkEnd::Start).unwrap();
            assert!((slot.distance - w).abs() < EPS);
        }
    }

    #[test]
    fn test_intersection_slots_sorted_counter_clockwise() {
        let (net, c, links) = star(&[-Vec2::Y, Vec2::X, Vec2::Y], 3.0);
        let j = solve_junction(&net, c, &JunctionParams::default()).unwrap();
        let order: Vec<LinkId> = j.slots.iter().map(|s| s.link).collect();
        assert_eq!(order, vec![links[1], links[2], links[0]]);
    }

    #[test]
    fn test_t_junction_uses_fallback_for_opposite_links() {
        let (net, c, links) = star(&[Vec2::X, Vec2::Y, -Vec2::X], 4.0);
        let params = JunctionParams::default();
        let j = solve_junction(&net, c, &params).unwrap();
        assert_eq!(j.parallel_pairs, 1, "east and west are collinear");

        let stem = j.slot(links[1], LinkEnd::Start).unwrap();
        assert!((stem.distance - 4.0).abs() < EPS);
        let east = j.slot(links[0], LinkEnd::Start).unwrap();
        assert!((east.distance - 4.0).abs() < EPS, "east clears the stem");
    }

    #[test]
    fn test_near_parallel_distances_bounded() {
        let a = Vec2::new(1.0, 0.0);
        let b = Vec2::new(1.0, 0.002).normalize();
        let (net, c, links) = star(&[a, b, -Vec2::Y], 3.0);
        let params = JunctionParams::default();
        let j = solve_junction(&net, c, &params).unwrap();
        assert!(j.parallel_pairs >= 1);
        for l in links {
            let s = j.slot(l, LinkEnd::Start).unwrap();
            assert!(s.distance.is_finite() && s.distance >= 0.0);
            assert!(s.distance <= 10.0, "setback {} should stay small", s.distance);
        }
    }

    #[test]
    fn test_nearly_parallel_above_epsilon_is_capped() {
        // 0.012 rad apart: just over the parallel threshold, so the edges do
        // intersect, but hundreds of metres out on 50 m links.
        let b = Vec2::from_angle(0.012);
        let (net, c, links) = star(&[Vec2::X, b, -Vec2::Y], 3.0);
        let params = JunctionParams::default();
        assert!(Vec2::X.perp_dot(b).abs() > params.parallel_epsilon);

        let j = solve_junction(&net, c, &params).unwrap();
        assert_eq!(j.parallel_pairs, 1, "the narrow pair falls back");
        for l in &links {
            let s = j.slot(*l, LinkEnd::Start).unwrap();
            assert!(s.distance <= 50.0, "setback {} overruns the link", s.distance);
        }
        let east = j.slot(links[0], LinkEnd::Start).unwrap();
        assert!((east.distance - 3.0).abs() < EPS, "east still clears the south arm");
        let narrow = j.slot(links[1], LinkEnd::Start).unwrap();
        assert!((narrow.distance - params.parallel_fallback).abs() < EPS);
    }

    #[test]
    fn test_setback_limited_by_link_length() {
        // A 20 degree wedge on short links: the solved setback of about 11 m
        // is within the width limit but longer than the 10 m links.
        let mut net = RoadNetwork::new();
        let c = net.add_node(Vec2::ZERO);
        let mut links = Vec::new();
        for d in [Vec2::X, Vec2::from_angle(20f32.to_radians()), -Vec2::Y] {
            let far = d * 10.0;
            let n = net.add_node(far);
            links.push(net.add_link(c, n, vec![Vec2::ZERO, far], attrs(2.0, 2.0)).unwrap());
        }
        let j = solve_junction(&net, c, &JunctionParams::default()).unwrap();
        assert_eq!(j.parallel_pairs, 1);
        for l in links {
            let s = j.slot(l, LinkEnd::Start).unwrap();
            assert!(s.distance <= 10.0, "setback {} overruns the link", s.distance);
        }
    }

    #[test]
    fn test_distances_never_negative() {
        let (net, c, _) = star(
            &[Vec2::X, Vec2::new(1.0, 1.0).normalize(), Vec2::new(1.0, -1.0).normalize()],
            2.0,
        );
        let j = solve_junction(&net, c, &JunctionParams::default()).unwrap();
        assert!(j.slots.iter().all(|s| s.distance >= 0.0));
    }

    #[test]
    fn test_coincident_link_falls_back() {
        let mut net = RoadNetwork::new();
        let a = net.add_node(Vec2::ZERO);
        let b = net.add_node(Vec2::ZERO);
        net.add_link(a, b, vec![Vec2::ZERO, Vec2::ZERO], attrs(1.0, 1.0)).unwrap();
        let j = solve_junction(&net, a, &JunctionParams::default()).unwrap();
        assert_eq!(j.fallback_directions, 1);
        assert_eq!(j.slots.len(), 1);
    }
}
