use glam::Vec2;

/// Answers terrain altitude at a planar position.
///
/// `None` means the position lies outside the terrain. Implementations are
/// shared across generation threads, hence `Sync`.
pub trait HeightQuery: Sync {
    fn find_altitude(&self, p: Vec2) -> Option<f32>;
}

impl<T: HeightQuery + ?Sized> HeightQuery for &T {
    fn find_altitude(&self, p: Vec2) -> Option<f32> {
        (**self).find_altitude(p)
    }
}

impl<T: HeightQuery + ?Sized> HeightQuery for Box<T> {
    fn find_altitude(&self, p: Vec2) -> Option<f32> {
        (**self).find_altitude(p)
    }
}

/// Infinite plane at a constant altitude.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlatTerrain {
    pub altitude: f32,
}

impl FlatTerrain {
    pub fn new(altitude: f32) -> Self {
        Self { altitude }
    }
}

impl HeightQuery for FlatTerrain {
    fn find_altitude(&self, _p: Vec2) -> Option<f32> {
        Some(self.altitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_answers_everywhere() {
        let t = FlatTerrain::new(7.5);
        assert_eq!(t.find_altitude(Vec2::new(-1e6, 1e6)), Some(7.5));
        let boxed: Box<dyn HeightQuery + Send> = Box::new(t);
        assert_eq!(boxed.find_altitude(Vec2::ZERO), Some(7.5));
    }
}
