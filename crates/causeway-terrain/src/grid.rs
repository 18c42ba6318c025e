use glam::Vec2;

use crate::{HeightQuery, TerrainError};

/// Regular grid of altitude samples with bilinear interpolation.
///
/// Sample `(col, row)` sits at `origin + (col, row) * spacing`; rows run
/// northwards. Queries outside the sampled area return `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct GridHeightField {
    origin: Vec2,
    spacing: f32,
    cols: usize,
    rows: usize,
    heights: Vec<f32>,
}

impl GridHeightField {
    pub fn new(
        origin: Vec2,
        spacing: f32,
        cols: usize,
        rows: usize,
        heights: Vec<f32>,
    ) -> Result<Self, TerrainError> {
        if cols < 2 || rows < 2 {
            return Err(TerrainError::GridTooSmall { cols, rows });
        }
        if spacing.is_nan() || spacing <= 0.0 {
            return Err(TerrainError::InvalidSpacing(spacing));
        }
        if heights.len() != cols * rows {
            return Err(TerrainError::SampleCountMismatch {
                expected: cols * rows,
                actual: heights.len(),
            });
        }
        Ok(Self {
            origin,
            spacing,
            cols,
            rows,
            heights,
        })
    }

    /// Build a grid by evaluating `f` at every sample position.
    pub fn from_fn(
        origin: Vec2,
        spacing: f32,
        cols: usize,
        rows: usize,
        mut f: impl FnMut(Vec2) -> f32,
    ) -> Result<Self, TerrainError> {
        let mut heights = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                heights.push(f(origin + Vec2::new(col as f32, row as f32) * spacing));
            }
        }
        Self::new(origin, spacing, cols, rows, heights)
    }

    pub fn sample(&self, col: usize, row: usize) -> f32 {
        self.heights[row * self.cols + col]
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }
}

impl HeightQuery for GridHeightField {
    fn find_altitude(&self, p: Vec2) -> Option<f32> {
        let g = (p - self.origin) / self.spacing;
        let max_col = (self.cols - 1) as f32;
        let max_row = (self.rows - 1) as f32;
        if !(0.0..=max_col).contains(&g.x) || !(0.0..=max_row).contains(&g.y) {
            return None;
        }

        // Clamp the cell so the far edge interpolates within the last cell.
        let c0 = (g.x.floor() as usize).min(self.cols - 2);
        let r0 = (g.y.floor() as usize).min(self.rows - 2);
        let fx = g.x - c0 as f32;
        let fy = g.y - r0 as f32;

        let h00 = self.sample(c0, r0);
        let h10 = self.sample(c0 + 1, r0);
        let h01 = self.sample(c0, r0 + 1);
        let h11 = self.sample(c0 + 1, r0 + 1);
        let south = h00 + (h10 - h00) * fx;
        let north = h01 + (h11 - h01) * fx;
        Some(south + (north - south) * fy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> GridHeightField {
        // Height = easting, 11x11 samples over 100 m.
        GridHeightField::from_fn(Vec2::ZERO, 10.0, 11, 11, |p| p.x).unwrap()
    }

    #[test]
    fn test_bilinear_reproduces_plane() {
        let grid = ramp();
        let h = grid.find_altitude(Vec2::new(37.5, 62.0)).unwrap();
        assert!((h - 37.5).abs() < 1e-4, "plane should interpolate exactly, got {h}");
    }

    #[test]
    fn test_edges_inclusive_outside_none() {
        let grid = ramp();
        assert_eq!(grid.find_altitude(Vec2::new(100.0, 100.0)), Some(100.0));
        assert_eq!(grid.find_altitude(Vec2::ZERO), Some(0.0));
        assert!(grid.find_altitude(Vec2::new(100.1, 50.0)).is_none());
        assert!(grid.find_altitude(Vec2::new(50.0, -0.1)).is_none());
    }

    #[test]
    fn test_bilinear_cell_center() {
        let grid =
            GridHeightField::new(Vec2::ZERO, 1.0, 2, 2, vec![0.0, 1.0, 2.0, 5.0]).unwrap();
        let h = grid.find_altitude(Vec2::splat(0.5)).unwrap();
        assert!((h - 2.0).abs() < 1e-6, "average of corners, got {h}");
    }

    #[test]
    fn test_new_validates() {
        assert_eq!(
            GridHeightField::new(Vec2::ZERO, 1.0, 2, 2, vec![0.0; 3]).unwrap_err(),
            TerrainError::SampleCountMismatch { expected: 4, actual: 3 }
        );
        assert_eq!(
            GridHeightField::new(Vec2::ZERO, 1.0, 1, 5, vec![0.0; 5]).unwrap_err(),
            TerrainError::GridTooSmall { cols: 1, rows: 5 }
        );
        assert!(matches!(
            GridHeightField::new(Vec2::ZERO, 0.0, 2, 2, vec![0.0; 4]),
            Err(TerrainError::InvalidSpacing(_))
        ));
    }
}
