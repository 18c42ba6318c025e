//! Draping: lifting planar network geometry onto the terrain surface.

use causeway_math::planar_to_world;
use causeway_network::{RoadNetwork, UtilityNetwork};
use glam::{Vec2, Vec3};
use tracing::{debug, warn};

use crate::HeightQuery;

/// Outcome of a draping pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrapeReport {
    /// Points lifted onto the terrain.
    pub points: usize,
    /// Points the terrain could not answer for; they sit at the fallback altitude.
    pub missed: usize,
    /// Links whose half widths were estimated from their cross-section.
    pub inferred_widths: usize,
}

impl DrapeReport {
    fn record(&mut self, altitude: Option<f32>) {
        self.points += 1;
        if altitude.is_none() {
            self.missed += 1;
        }
    }
}

fn drape_point<T: HeightQuery + ?Sized>(
    terrain: &T,
    p: Vec2,
    fallback_altitude: f32,
    report: &mut DrapeReport,
) -> Vec3 {
    let altitude = terrain.find_altitude(p);
    report.record(altitude);
    planar_to_world(p, altitude.unwrap_or(fallback_altitude))
}

/// Set world positions for every node and centerline point.
///
/// Links without declared half widths get them estimated here, so later
/// stages always see concrete widths.
pub fn drape_network<T: HeightQuery + ?Sized>(
    network: &mut RoadNetwork,
    terrain: &T,
    fallback_altitude: f32,
) -> DrapeReport {
    let mut report = DrapeReport::default();

    for (_, node) in network.nodes_mut() {
        node.world = drape_point(terrain, node.position, fallback_altitude, &mut report);
    }

    for (_, link) in network.links_mut() {
        let world = link
            .centerline()
            .iter()
            .map(|p| drape_point(terrain, *p, fallback_altitude, &mut report))
            .collect();
        link.world = world;

        if link.attrs.half_widths.is_none() {
            link.attrs.half_widths = Some(link.attrs.estimate_half_widths());
            report.inferred_widths += 1;
        }
    }

    if report.missed > 0 {
        warn!(
            missed = report.missed,
            points = report.points,
            fallback_altitude,
            "network points outside terrain"
        );
    }
    debug!(points = report.points, inferred_widths = report.inferred_widths, "draped road network");
    report
}

/// Set the world position of every pole base.
pub fn drape_poles<T: HeightQuery + ?Sized>(
    utility: &mut UtilityNetwork,
    terrain: &T,
    fallback_altitude: f32,
) -> DrapeReport {
    let mut report = DrapeReport::default();
    for (_, pole) in utility.poles_mut() {
        pole.world = drape_point(terrain, pole.position, fallback_altitude, &mut report);
    }
    if report.missed > 0 {
        warn!(missed = report.missed, poles = report.points, "poles outside terrain");
    }
    report
}
