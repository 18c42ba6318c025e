//! Planar frame helpers.
//!
//! The planar frame is `(easting, northing)`; world space is Y-up with
//! `world = (easting, altitude, -northing)`. Angles run counter-clockwise.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

/// Cosine threshold above which a corner is treated as collinear and
/// receives no widening.
const COLLINEAR_DOT: f32 = 0.97;

/// Lift a planar point into world space at the given altitude.
#[inline]
pub fn planar_to_world(p: Vec2, altitude: f32) -> Vec3 {
    Vec3::new(p.x, altitude, -p.y)
}

/// Project a world point onto the planar frame, discarding altitude.
#[inline]
pub fn world_to_planar(p: Vec3) -> Vec2 {
    Vec2::new(p.x, -p.z)
}

/// Lift a planar offset (a direction, not a point) into world space with no
/// vertical component.
#[inline]
pub fn planar_offset_to_world(v: Vec2) -> Vec3 {
    Vec3::new(v.x, 0.0, -v.y)
}

#[inline]
pub fn left_normal(d: Vec2) -> Vec2 {
    Vec2::new(-d.y, d.x)
}

#[inline]
pub fn right_normal(d: Vec2) -> Vec2 {
    Vec2::new(d.y, -d.x)
}

/// Counter-clockwise angle of `d` from the +easting axis, in `[0, TAU)`.
pub fn planar_angle(d: Vec2) -> f32 {
    let a = d.y.atan2(d.x);
    if a < 0.0 { a + TAU } else { a }
}

/// Unit direction from `from` to `to`, or `None` if the points coincide.
pub fn planar_direction(from: Vec2, to: Vec2) -> Option<Vec2> {
    (to - from).try_normalize()
}

/// Horizontal (ground-projected) distance between two world points.
pub fn ground_distance(a: Vec3, b: Vec3) -> f32 {
    world_to_planar(a).distance(world_to_planar(b))
}

/// Parameters of the crossing point of two parametric lines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeHit {
    /// Distance along the first line, in units of its direction vector.
    pub along_first: f32,
    /// Distance along the second line, in units of its direction vector.
    pub along_second: f32,
}

/// Intersect `p1 + d1·a` with `p2 + d2·b`.
///
/// Returns `None` when `|cross(d1, d2)| < epsilon`.
pub fn intersect_edges(p1: Vec2, d1: Vec2, p2: Vec2, d2: Vec2, epsilon: f32) -> Option<EdgeHit> {
    let denom = d1.perp_dot(d2);
    if denom.abs() < epsilon {
        return None;
    }
    let d = p1 - p2;
    Some(EdgeHit {
        along_first: d2.perp_dot(d) / denom,
        along_second: d1.perp_dot(d) / denom,
    })
}

/// Lateral vector at a polyline corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SideVector {
    /// Unit vector pointing to the right of the travel direction.
    pub right: Vec2,
    /// Scale applied to lateral offsets so that parallel strips keep their
    /// width through the turn.
    pub widening: f32,
}

impl SideVector {
    /// The lateral offset per unit of strip width.
    #[inline]
    pub fn cross(&self) -> Vec2 {
        self.right * self.widening
    }
}

/// Side vector at a corner joining the `incoming` and `outgoing` directions.
///
/// Either direction may be zero (a repeated point), in which case the other
/// one is used alone. Returns `None` only when both are zero.
pub fn corner_side_vector(incoming: Vec2, outgoing: Vec2) -> Option<SideVector> {
    let v0 = incoming.normalize_or_zero();
    let v1 = outgoing.normalize_or_zero();
    match (v0 == Vec2::ZERO, v1 == Vec2::ZERO) {
        (true, true) => return None,
        (true, false) => return Some(straight(v1)),
        (false, true) => return Some(straight(v0)),
        (false, false) => {}
    }

    // Hairpin: the bisector vanishes, fall back to the incoming side.
    let Some(bisector) = (v0 + v1).try_normalize() else {
        return Some(straight(v0));
    };

    let dot = v0.dot(-v1);
    let widening = if dot.abs() >= COLLINEAR_DOT {
        1.0
    } else {
        let half = dot.clamp(-1.0, 1.0).acos() * 0.5;
        1.0 / half.sin()
    };
    Some(SideVector {
        right: right_normal(bisector),
        widening,
    })
}

fn straight(d: Vec2) -> SideVector {
    SideVector {
        right: right_normal(d),
        widening: 1.0,
    }
}
