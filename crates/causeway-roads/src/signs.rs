//! Stop signs and traffic lights at controlled link ends.

use std::f32::consts::FRAC_PI_2;

use causeway_math::{left_normal, planar_angle, planar_to_world};
use causeway_network::{IntersectionControl, LinkEnd, LinkId, NodeId, RoadNetwork};
use glam::Vec3;
use tracing::debug;

/// Distance from the node centre along the link, in metres.
const SIGN_SETBACK: f32 = 6.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignKind {
    StopSign,
    TrafficLight,
}

impl SignKind {
    /// Name of the structure prefab drawn for this sign.
    pub fn prefab_name(self) -> &'static str {
        match self {
            SignKind::StopSign => "American Stopsign",
            SignKind::TrafficLight => "Stoplight (right)",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SignPlacement {
    pub kind: SignKind,
    pub node: NodeId,
    pub link: LinkId,
    pub position: Vec3,
    /// Rotation about the vertical axis, radians.
    pub yaw: f32,
}

/// One placement per controlled link end, on the right of traffic arriving at
/// the node. Stop signs stand back along the link, lights stand across the
/// junction.
pub fn sign_placements(network: &RoadNetwork) -> Vec<SignPlacement> {
    let mut out = Vec::new();
    for (link_id, link) in network.links() {
        for end in [LinkEnd::Start, LinkEnd::End] {
            let kind = match link.attrs.control_at(end) {
                IntersectionControl::Uncontrolled => continue,
                IntersectionControl::StopSign => SignKind::StopSign,
                IntersectionControl::TrafficLight => SignKind::TrafficLight,
            };
            let node_id = link.node_at(end);
            let (Some(node), Some(unit)) = (network.node(node_id), link.outgoing_direction(end))
            else {
                debug!(link = link_id.0, node = node_id.0, "no direction for sign, skipped");
                continue;
            };
            let side = link.attrs.effective_half_widths().outgoing(end).left;
            let along = match kind {
                SignKind::StopSign => SIGN_SETBACK,
                SignKind::TrafficLight => -SIGN_SETBACK,
            };
            let p = node.position + unit * along + left_normal(unit) * side;
            out.push(SignPlacement {
                kind,
                node: node_id,
                link: link_id,
                position: planar_to_world(p, node.world.y),
                yaw: planar_angle(unit) + FRAC_PI_2,
            });
        }
    }
    out
}
