//! Planar and world-space geometry shared by the Causeway generators: frame
//! conversion, 2D edge intersection, corner side vectors, and bounding boxes.

mod aabb;
mod planar;
mod rect;

pub use aabb::Aabb;
pub use planar::{
    EdgeHit, SideVector, corner_side_vector, ground_distance, intersect_edges, left_normal,
    planar_angle, planar_direction, planar_offset_to_world, planar_to_world, right_normal,
    world_to_planar,
};
pub use rect::Rect;
