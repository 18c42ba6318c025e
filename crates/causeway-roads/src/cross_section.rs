//! Cross-sections: the lateral frame at each centerline point and the strips
//! (sidewalk, curb, parking, margin, lanes) laid across it.

use causeway_materials::TextureRole;
use causeway_math::{corner_side_vector, planar_offset_to_world, planar_to_world, right_normal};
use causeway_network::{Link, LinkAttributes, LinkEnd, LinkId};
use glam::{Vec2, Vec3};
use tracing::warn;

use crate::Junction;

/// Portion of the sidewalk texture band used for the walking surface; the
/// rest is the curb face.
pub const SIDEWALK_TOP_U: f32 = 0.93;

/// Lateral frame at one centerline point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionPoint {
    /// World position of lateral offset zero.
    pub origin: Vec3,
    /// Horizontal world offset per metre of lateral offset, pointing right.
    /// Longer than one at corners so strips keep their width.
    pub cross: Vec3,
    /// Ground-projected distance from the link start.
    pub length: f32,
}

impl SectionPoint {
    /// World position `offset` metres right of the centre (negative is left),
    /// raised by `height`.
    pub fn at(&self, offset: f32, height: f32) -> Vec3 {
        self.origin + self.cross * offset + Vec3::Y * height
    }
}

/// Per-link build information.
#[derive(Clone, Debug, PartialEq)]
pub struct BuildInfo {
    pub link: LinkId,
    pub points: Vec<SectionPoint>,
    /// Points whose frame had to be guessed.
    pub fallbacks: usize,
}

/// Compute the lateral frame at every centerline point.
///
/// Interior points bisect the turn. The two end points are placed exactly on
/// the edge vertices the junction solver chose, so the link surface meets the
/// junction without gaps.
pub fn build_info(id: LinkId, link: &Link, start: &Junction, end: &Junction) -> BuildInfo {
    let pts = link.centerline();
    let n = pts.len();
    let altitude = |i: usize| link.world.get(i).map_or(0.0, |p| p.y);
    let widths = link.attrs.effective_half_widths();
    let mut fallbacks = 0;

    let mut lengths = Vec::with_capacity(n);
    let mut total = 0.0;
    for i in 0..n {
        if i > 0 {
            total += pts[i - 1].distance(pts[i]);
        }
        lengths.push(total);
    }

    // Right-pointing frame for interior points, remembered so a run of
    // repeated points reuses the last good frame.
    let mut last_right = link
        .outgoing_direction(LinkEnd::Start)
        .map_or(Vec2::new(0.0, -1.0), right_normal);
    let mut points = Vec::with_capacity(n);
    for i in 0..n {
        let (origin2, cross2) = if i == 0 || i == n - 1 {
            let (junction, end_kind) = if i == 0 {
                (start, LinkEnd::Start)
            } else {
                (end, LinkEnd::End)
            };
            match junction.vertices_for_link(id, end_kind) {
                Some((l, r)) => match endpoint_frame(l, r, widths.left, widths.right) {
                    Some(frame) => frame,
                    None => {
                        warn!(link = id.0, "link has zero width, using perpendicular frame");
                        fallbacks += 1;
                        (pts[i], last_right)
                    }
                },
                None => {
                    warn!(link = id.0, node = junction.node.0, "junction has no slot for link end");
                    fallbacks += 1;
                    (pts[i], last_right)
                }
            }
        } else {
            match corner_side_vector(pts[i] - pts[i - 1], pts[i + 1] - pts[i]) {
                Some(sv) => {
                    last_right = sv.right;
                    (pts[i], sv.cross())
                }
                None => {
                    fallbacks += 1;
                    (pts[i], last_right)
                }
            }
        };
        points.push(SectionPoint {
            origin: planar_to_world(origin2, altitude(i)),
            cross: planar_offset_to_world(cross2),
            length: lengths[i],
        });
    }

    BuildInfo {
        link: id,
        points,
        fallbacks,
    }
}

/// Origin and cross vector that put offset `-left_width` on `l` and
/// `+right_width` on `r`. `None` when the link has no width.
fn endpoint_frame(l: Vec2, r: Vec2, left_width: f32, right_width: f32) -> Option<(Vec2, Vec2)> {
    let total = left_width + right_width;
    if total.abs() < 1e-6 {
        return None;
    }
    let across = r - l;
    Some((l + across * (left_width / total), across / total))
}

/// Which way a strip's surface faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StripNormal {
    Up,
    Left,
    Right,
}

/// One band of the cross-section.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Strip {
    pub role: TextureRole,
    /// Lateral offset of the left edge (negative is left of centre).
    pub left: f32,
    pub right: f32,
    pub left_height: f32,
    pub right_height: f32,
    pub u_left: f32,
    pub u_right: f32,
    /// Texture repeats per metre along the link.
    pub uv_scale: f32,
    pub normal: StripNormal,
}

/// UV scales for the two texture families.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UvScales {
    pub road: f32,
    pub sidewalk: f32,
}

impl Default for UvScales {
    fn default() -> Self {
        Self {
            road: 0.08,
            sidewalk: 1.0,
        }
    }
}

/// Strips from left to right for a link's attributes.
pub fn strip_layout(
    attrs: &LinkAttributes,
    lane_role: TextureRole,
    scales: UvScales,
) -> Vec<Strip> {
    let half = attrs.lane_surface_width() * 0.5;
    let margin = if attrs.has_margin() { attrs.margin_width } else { 0.0 };
    let parking_left = if attrs.flags.parking_left { attrs.parking_width } else { 0.0 };
    let parking_right = if attrs.flags.parking_right { attrs.parking_width } else { 0.0 };
    let curb = attrs.curb_height;
    let walk = attrs.sidewalk_width;
    let (road_uv, walk_uv) = (scales.road, scales.sidewalk);

    let flat = |role, left: f32, right: f32, u_left, u_right, uv_scale| Strip {
        role,
        left,
        right,
        left_height: 0.0,
        right_height: 0.0,
        u_left,
        u_right,
        uv_scale,
        normal: StripNormal::Up,
    };

    let mut strips = Vec::with_capacity(9);
    let curb_left = -(half + margin + parking_left);
    if attrs.flags.sidewalk_left && walk > 0.0 {
        strips.push(Strip {
            left_height: curb,
            right_height: curb,
            ..flat(TextureRole::Sidewalk, curb_left - walk, curb_left, 0.0, SIDEWALK_TOP_U, walk_uv)
        });
        if curb > 0.0 {
            strips.push(Strip {
                left_height: curb,
                right_height: 0.0,
                normal: StripNormal::Right,
                ..flat(TextureRole::Sidewalk, curb_left, curb_left, SIDEWALK_TOP_U, 1.0, walk_uv)
            });
        }
    }
    if parking_left > 0.0 {
        let outer = curb_left + parking_left;
        strips.push(flat(TextureRole::OneLane, curb_left, outer, 0.0, 1.0, road_uv));
    }
    if margin > 0.0 {
        strips.push(flat(TextureRole::Margin, -half - margin, -half, 0.0, 1.0, road_uv));
    }
    if half > 0.0 {
        strips.push(flat(lane_role, -half, half, 0.0, 1.0, road_uv));
    }
    if margin > 0.0 {
        strips.push(flat(TextureRole::Margin, half, half + margin, 1.0, 0.0, road_uv));
    }
    let curb_right = half + margin + parking_right;
    if parking_right > 0.0 {
        let outer = curb_right - parking_right;
        strips.push(flat(TextureRole::OneLane, outer, curb_right, 1.0, 0.0, road_uv));
    }
    if attrs.flags.sidewalk_right && walk > 0.0 {
        if curb > 0.0 {
            strips.push(Strip {
                left_height: 0.0,
                right_height: curb,
                normal: StripNormal::Left,
                ..flat(TextureRole::Sidewalk, curb_right, curb_right, 1.0, SIDEWALK_TOP_U, walk_uv)
            });
        }
        strips.push(Strip {
            left_height: curb,
            right_height: curb,
            ..flat(
                TextureRole::Sidewalk,
                curb_right,
                curb_right + walk,
                SIDEWALK_TOP_U,
                0.0,
                walk_uv,
            )
        });
    }
    strips
}

/// Centerline of each lane, following the widened cross vectors.
pub fn lane_centerlines(info: &BuildInfo, attrs: &LinkAttributes, height: f32) -> Vec<Vec<Vec3>> {
    let lanes = attrs.lanes as usize;
    (0..lanes)
        .map(|i| {
            let offset = (i as f32 - (lanes as f32 - 1.0) * 0.5) * attrs.lane_width;
            info.points.iter().map(|p| p.at(offset, height)).collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{JunctionParams, solve_junction};
    use causeway_network::{HalfWidths, LinkFlags, RoadNetwork};

    fn build(centerline: Vec<Vec2>, attrs: LinkAttributes) -> (RoadNetwork, BuildInfo) {
        let mut net = RoadNetwork::new();
        let first = centerline[0];
        let last = centerline[centerline.len() - 1];
        let a = net.add_node(first);
        let b = net.add_node(last);
        let id = net.add_link(a, b, centerline, attrs).unwrap();
        let params = JunctionParams::default();
        let ja = solve_junction(&net, a, &params).unwrap();
        let jb = solve_junction(&net, b, &params).unwrap();
        let info = build_info(id, net.link(id).unwrap(), &ja, &jb);
        (net, info)
    }

    fn widths(left: f32, right: f32) -> LinkAttributes {
        LinkAttributes {
            half_widths: Some(HalfWidths::new(left, right)),
            ..LinkAttributes::default()
        }
    }

    #[test]
    fn test_straight_link_frames() {
        let points = vec![Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(20.0, 0.0)];
        let (_, info) = build(points, widths(3.0, 3.0));
        assert_eq!(info.points.len(), 3);
        for p in &info.points {
            // Heading east, right is south, which is +z in world space.
            assert!((p.cross - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-5, "cross {}", p.cross);
        }
        assert_eq!(info.points[2].length, 20.0);
        assert_eq!(info.fallbacks, 0);
    }

    #[test]
    fn test_endpoints_land_on_junction_vertices_asymmetric() {
        let (_, info) = build(vec![Vec2::ZERO, Vec2::new(10.0, 0.0)], widths(1.0, 4.0));
        let start = info.points[0];
        // Offset -1 reaches the left (north) vertex, +4 the right (south).
        assert!((start.at(-1.0, 0.0) - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
        assert!((start.at(4.0, 0.0) - Vec3::new(0.0, 0.0, 4.0)).length() < 1e-5);
        assert!(start.origin.length() < 1e-5, "centre stays on the node");
    }

    #[test]
    fn test_corner_is_widened() {
        let (_, info) = build(
            vec![Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)],
            widths(2.0, 2.0),
        );
        let corner = info.points[1];
        assert!((corner.cross.length() - std::f32::consts::SQRT_2).abs() < 1e-4);
        assert!((info.points[2].length - 20.0).abs() < 1e-5);
    }

    #[test]
    fn test_layout_full_cross_section_order() {
        let attrs = LinkAttributes {
            flags: LinkFlags {
                sidewalk_left: true,
                sidewalk_right: true,
                parking_left: true,
                parking_right: true,
                margin: true,
                ..LinkFlags::default()
            },
            ..LinkAttributes::default()
        };
        let strips = strip_layout(&attrs, TextureRole::TwoLaneTwoWay, UvScales::default());
        let roles: Vec<TextureRole> = strips.iter().map(|s| s.role).collect();
        assert_eq!(
            roles,
            vec![
                TextureRole::Sidewalk,
                TextureRole::Sidewalk,
                TextureRole::OneLane,
                TextureRole::Margin,
                TextureRole::TwoLaneTwoWay,
                TextureRole::Margin,
                TextureRole::OneLane,
                TextureRole::Sidewalk,
                TextureRole::Sidewalk,
            ]
        );
        for pair in strips.windows(2) {
            assert!((pair[0].right - pair[1].left).abs() < 1e-5, "strips must abut: {pair:?}");
        }
        let outer = strips[0].left;
        let hw = attrs.estimate_half_widths();
        assert!((outer + hw.left).abs() < 1e-5, "layout spans the estimated width");
        assert_eq!(strips[1].normal, StripNormal::Right);
        assert_eq!(strips[7].normal, StripNormal::Left);
        assert_eq!(strips[0].uv_scale, 1.0);
        assert_eq!(strips[4].uv_scale, 0.08);
    }

    #[test]
    fn test_layout_plain_road_is_one_strip() {
        let attrs = LinkAttributes::default();
        let strips = strip_layout(&attrs, TextureRole::TwoLaneTwoWay, UvScales::default());
        assert_eq!(strips.len(), 1);
        assert!((strips[0].left + 3.3).abs() < 1e-5);
    }

    #[test]
    fn test_lane_centerlines_offsets() {
        let attrs = LinkAttributes {
            lanes: 3,
            ..widths(4.95, 4.95)
        };
        let (_, info) = build(vec![Vec2::ZERO, Vec2::new(10.0, 0.0)], attrs.clone());
        let lanes = lane_centerlines(&info, &attrs, 0.0);
        assert_eq!(lanes.len(), 3);
        // Left lane is 3.3 m north (-z), middle on the centre line.
        assert!((lanes[0][0].z + 3.3).abs() < 1e-4, "{:?}", lanes[0][0]);
        assert!(lanes[1][1].z.abs() < 1e-5);
        assert!((lanes[2][1].z - 3.3).abs() < 1e-4);
    }
}
