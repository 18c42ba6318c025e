//! Interleaved vertex format shared by every generated mesh.

use glam::{Vec2, Vec3};

/// A single vertex in world space.
///
/// Layout (32 bytes total): position `[f32; 3]`, normal `[f32; 3]`,
/// texture coordinate `[f32; 2]`. Wire meshes leave normal and uv zeroed.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(MeshVertex, [u8; 32]);

impl MeshVertex {
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            uv: uv.to_array(),
        }
    }

    /// A position-only vertex, as used for wires.
    pub fn at(position: Vec3) -> Self {
        Self {
            position: position.to_array(),
            ..Self::default()
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }

    pub fn uv(&self) -> Vec2 {
        Vec2::from_array(self.uv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_casts_to_bytes() {
        let verts = [
            MeshVertex::new(Vec3::new(1.0, 2.0, 3.0), Vec3::Y, Vec2::new(0.5, 4.0)),
            MeshVertex::at(Vec3::ONE),
        ];
        let bytes: &[u8] = bytemuck::cast_slice(&verts);
        assert_eq!(bytes.len(), 64, "two 32-byte vertices");
        let floats: &[f32] = bytemuck::cast_slice(&verts);
        assert_eq!(&floats[..8], &[1.0, 2.0, 3.0, 0.0, 1.0, 0.0, 0.5, 4.0]);
    }

    #[test]
    fn test_accessors_round_trip() {
        let v = MeshVertex::new(Vec3::new(-1.0, 0.5, 9.0), Vec3::X, Vec2::new(0.25, 0.75));
        assert_eq!(v.position(), Vec3::new(-1.0, 0.5, 9.0));
        assert_eq!(v.normal(), Vec3::X);
        assert_eq!(v.uv(), Vec2::new(0.25, 0.75));
        assert_eq!(MeshVertex::at(Vec3::ONE).normal(), Vec3::ZERO);
    }
}
