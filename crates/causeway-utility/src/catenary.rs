//! Sagging wire curves between two attachment points.
//!
//! The curve is the parabolic approximation of a catenary: with horizontal
//! distance `d` from the start, `y(d) = d / (2F) * (d - 2c)` where `F` is the
//! catenary factor and `c = xz/2 - rise * F / xz` places the lowest point so
//! that the curve passes through both ends.

use causeway_math::world_to_planar;
use causeway_terrain::HeightQuery;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatenaryParams {
    /// Larger values give tauter wires.
    pub factor: f32,
    /// Segments per span; a span has `segments + 1` points.
    pub segments: u32,
    /// Minimum height of the wire above the terrain.
    pub clearance: f32,
}

impl Default for CatenaryParams {
    fn default() -> Self {
        Self {
            factor: 1400.0,
            segments: 160,
            clearance: 0.5,
        }
    }
}

/// Points of the wire from `start` to `end`, both included exactly.
///
/// Interior points are lifted to `clearance` above the terrain wherever the
/// terrain answers. A span with no horizontal extent is a straight segment.
pub fn catenary_points<T>(start: Vec3, end: Vec3, params: &CatenaryParams, terrain: &T) -> Vec<Vec3>
where
    T: HeightQuery + ?Sized,
{
    let segments = params.segments.max(1);
    let diff = end - start;
    let xz = Vec2::new(diff.x, diff.z).length();
    let mut points = Vec::with_capacity(segments as usize + 1);
    points.push(start);

    if xz < 1e-4 || params.factor <= 0.0 {
        for i in 1..segments {
            points.push(start.lerp(end, i as f32 / segments as f32));
        }
        points.push(end);
        return points;
    }

    let factor = f64::from(params.factor);
    let c = f64::from(xz) / 2.0 - f64::from(diff.y) * factor / f64::from(xz);
    for i in 1..segments {
        let t = i as f32 / segments as f32;
        let d = f64::from(xz * t);
        let y = d / (2.0 * factor) * (d - 2.0 * c);
        let mut p = Vec3::new(start.x + diff.x * t, start.y + y as f32, start.z + diff.z * t);
        if let Some(ground) = terrain.find_altitude(world_to_planar(p)) {
            p.y = p.y.max(ground + params.clearance);
        }
        points.push(p);
    }
    points.push(end);
    points
}
