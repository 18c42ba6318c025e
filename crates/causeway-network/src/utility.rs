//! Utility poles and the lines strung between them.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::NetworkError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PoleId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineId(pub u32);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pole {
    pub position: Vec2,
    /// Draped world position of the pole base.
    pub world: Vec3,
    /// Planar heading in radians. Unset azimuths are derived from the line.
    pub azimuth: Option<f32>,
    /// Structure prefab name. Empty means "infer from tags".
    pub structure: String,
    pub tags: Vec<(String, String)>,
    line: Option<LineId>,
}

impl Pole {
    /// Value of the first tag named `key`.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn line(&self) -> Option<LineId> {
        self.line
    }
}

/// An ordered run of poles carrying the same wires.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub poles: Vec<PoleId>,
}

impl Line {
    /// Consecutive pole pairs. A line with fewer than two poles has none.
    pub fn spans(&self) -> impl Iterator<Item = (PoleId, PoleId)> + '_ {
        self.poles.windows(2).map(|w| (w[0], w[1]))
    }
}

#[derive(Clone, Debug, Default)]
pub struct UtilityNetwork {
    poles: Vec<Pole>,
    lines: Vec<Line>,
}

impl UtilityNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_pole(&mut self, position: Vec2, structure: impl Into<String>) -> PoleId {
        let id = PoleId(self.poles.len() as u32);
        self.poles.push(Pole {
            position,
            world: causeway_math::planar_to_world(position, 0.0),
            azimuth: None,
            structure: structure.into(),
            tags: Vec::new(),
            line: None,
        });
        id
    }

    pub fn pole(&self, id: PoleId) -> Option<&Pole> {
        self.poles.get(id.0 as usize)
    }

    pub fn pole_mut(&mut self, id: PoleId) -> Option<&mut Pole> {
        self.poles.get_mut(id.0 as usize)
    }

    /// String a line through existing poles. Each pole may belong to one line.
    pub fn add_line(&mut self, poles: Vec<PoleId>) -> Result<LineId, NetworkError> {
        for (i, &id) in poles.iter().enumerate() {
            let pole = self.pole(id).ok_or(NetworkError::UnknownPole(id))?;
            if pole.line.is_some() || poles[..i].contains(&id) {
                return Err(NetworkError::PoleAlreadyOnLine(id));
            }
        }

        let line_id = LineId(self.lines.len() as u32);
        for &id in &poles {
            if let Some(pole) = self.pole_mut(id) {
                pole.line = Some(line_id);
            }
        }
        self.lines.push(Line { poles });
        Ok(line_id)
    }

    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.get(id.0 as usize)
    }

    pub fn lines(&self) -> impl Iterator<Item = (LineId, &Line)> + '_ {
        self.lines
            .iter()
            .enumerate()
            .map(|(i, l)| (LineId(i as u32), l))
    }

    pub fn poles(&self) -> impl Iterator<Item = (PoleId, &Pole)> + '_ {
        self.poles
            .iter()
            .enumerate()
            .map(|(i, p)| (PoleId(i as u32), p))
    }

    pub fn poles_mut(&mut self) -> impl Iterator<Item = (PoleId, &mut Pole)> + '_ {
        self.poles
            .iter_mut()
            .enumerate()
            .map(|(i, p)| (PoleId(i as u32), p))
    }

    pub fn num_poles(&self) -> usize {
        self.poles.len()
    }

    pub fn num_lines(&self) -> usize {
        self.lines.len()
    }

    /// Nearest pole to `p` no further than `max_distance`.
    pub fn find_closest_pole(&self, p: Vec2, max_distance: f32) -> Option<PoleId> {
        self.poles()
            .map(|(id, pole)| (id, pole.position.distance(p)))
            .filter(|(_, d)| *d <= max_distance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }
}
