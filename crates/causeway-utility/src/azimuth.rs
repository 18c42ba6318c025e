//! Pole headings derived from the line geometry.

use causeway_math::{planar_angle, planar_direction};
use causeway_network::{LineId, UtilityNetwork};
use glam::Vec2;

/// Fill in the azimuth of every pole on `line` that has none: the bisector of
/// the directions from the previous pole and to the next one, or the single
/// available direction at the ends. Returns how many poles were updated.
pub fn compute_pole_azimuths(network: &mut UtilityNetwork, line: LineId) -> usize {
    let Some(line) = network.line(line) else {
        return 0;
    };
    let ids = line.poles.clone();
    if ids.len() < 2 {
        return 0;
    }
    let positions: Vec<Option<Vec2>> = ids
        .iter()
        .map(|id| network.pole(*id).map(|p| p.position))
        .collect();

    let mut updated = 0;
    for (i, id) in ids.iter().enumerate() {
        let Some(curr) = positions[i] else {
            continue;
        };
        let back = i
            .checked_sub(1)
            .and_then(|j| positions[j])
            .and_then(|prev| planar_direction(prev, curr));
        let ahead = positions
            .get(i + 1)
            .copied()
            .flatten()
            .and_then(|next| planar_direction(curr, next));
        let heading = match (back, ahead) {
            (Some(b), Some(a)) => (a + b).try_normalize().unwrap_or(a),
            (Some(d), None) | (None, Some(d)) => d,
            (None, None) => continue,
        };
        if let Some(pole) = network.pole_mut(*id) {
            if pole.azimuth.is_none() {
                pole.azimuth = Some(planar_angle(heading));
                updated += 1;
            }
        }
    }
    updated
}

/// [`compute_pole_azimuths`] over every line.
pub fn compute_all_azimuths(network: &mut UtilityNetwork) -> usize {
    let lines: Vec<LineId> = network.lines().map(|(id, _)| id).collect();
    lines.into_iter().map(|id| compute_pole_azimuths(network, id)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    #[test]
    fn test_bisects_interior_and_follows_ends() {
        let mut net = UtilityNetwork::new();
        let a = net.add_pole(Vec2::ZERO, "");
        let b = net.add_pole(Vec2::new(100.0, 0.0), "");
        let c = net.add_pole(Vec2::new(100.0, 100.0), "");
        let line = net.add_line(vec![a, b, c]).unwrap();
        assert_eq!(compute_pole_azimuths(&mut net, line), 3);
        let az = |id| net.pole(id).unwrap().azimuth.unwrap();
        assert!(az(a).abs() < 1e-6, "first pole faces the second");
        assert!((az(b) - FRAC_PI_4).abs() < 1e-6, "corner pole bisects, got {}", az(b));
        assert!((az(c) - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_preset_azimuth_is_kept() {
        let mut net = UtilityNetwork::new();
        let a = net.add_pole(Vec2::ZERO, "");
        let b = net.add_pole(Vec2::new(0.0, 10.0), "");
        net.pole_mut(a).unwrap().azimuth = Some(1.0);
        net.add_line(vec![a, b]).unwrap();
        assert_eq!(compute_all_azimuths(&mut net), 1);
        assert_eq!(net.pole(a).unwrap().azimuth, Some(1.0));
    }

    #[test]
    fn test_hairpin_falls_back_to_ahead_direction() {
        let mut net = UtilityNetwork::new();
        let a = net.add_pole(Vec2::ZERO, "");
        let b = net.add_pole(Vec2::new(10.0, 0.0), "");
        let c = net.add_pole(Vec2::ZERO, "");
        let line = net.add_line(vec![a, b, c]).unwrap();
        compute_pole_azimuths(&mut net, line);
        let az = net.pole(b).unwrap().azimuth.unwrap();
        assert!((az.abs() - std::f32::consts::PI).abs() < 1e-5, "reversal heads back, got {az}");
    }
}
