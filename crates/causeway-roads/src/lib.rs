//! Road surface generation: junction solving, cross-section sweeping, junction
//! caps, lane centerlines and traffic control signs.

mod along;
mod appearance;
mod cap;
mod cross_section;
mod junction;
mod link_mesh;
mod signs;

pub use along::{find_point_along, ground_length};
pub use appearance::{LinkFilter, node_role_for, texture_role_for};
pub use cap::junction_cap_mesh;
pub use cross_section::{
    BuildInfo, SIDEWALK_TOP_U, SectionPoint, Strip, StripNormal, UvScales, build_info,
    lane_centerlines, strip_layout,
};
pub use junction::{Junction, JunctionKind, JunctionParams, JunctionSlot, solve_junction};
pub use link_mesh::{CrossSectionParams, LinkMesh, build_link_mesh};
pub use signs::{SignKind, SignPlacement, sign_placements};
