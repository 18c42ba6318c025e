//! Distance queries along a draped centerline, measured on the ground plane.

use causeway_math::ground_distance;
use glam::Vec3;

/// Ground-projected length of a polyline.
pub fn ground_length(points: &[Vec3]) -> f32 {
    points.windows(2).map(|w| ground_distance(w[0], w[1])).sum()
}

/// Point `distance` metres along `points`, measured on the ground plane.
/// Clamps to the first point for non-positive distances and to the last point
/// past the end. Altitude is interpolated within the segment.
pub fn find_point_along(points: &[Vec3], distance: f32) -> Option<Vec3> {
    let first = *points.first()?;
    if distance <= 0.0 {
        return Some(first);
    }
    let mut remaining = distance;
    for w in points.windows(2) {
        let len = ground_distance(w[0], w[1]);
        if remaining <= len {
            let t = if len > 0.0 { remaining / len } else { 0.0 };
            return Some(w[0].lerp(w[1], t));
        }
        remaining -= len;
    }
    points.last().copied()
}
