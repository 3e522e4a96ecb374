//! Mesh geometry and material

use crate::core::types::Vec3;
use crate::math::Aabb;

/// Indexed triangle geometry
#[derive(Clone, Debug)]
pub struct Geometry {
    /// Used as the navigation slug and label text of the owning mesh
    pub name: String,
    pub positions: Vec<Vec3>,
    /// Triangle list; three indices per triangle
    pub indices: Vec<u32>,
    /// Local-space bounds, absent until computed or when there are no vertices
    pub bounding_box: Option<Aabb>,
}

impl Geometry {
    /// Create geometry and compute its bounding box
    pub fn new(name: impl Into<String>, positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let mut geometry = Self {
            name: name.into(),
            positions,
            indices,
            bounding_box: None,
        };
        geometry.compute_bounding_box();
        geometry
    }

    /// Axis-aligned box centered on the origin
    pub fn cuboid(name: impl Into<String>, size: Vec3) -> Self {
        let h = size * 0.5;
        let positions = vec![
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, -h.z),
            Vec3::new(h.x, h.y, -h.z),
            Vec3::new(-h.x, h.y, -h.z),
            Vec3::new(-h.x, -h.y, h.z),
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(h.x, h.y, h.z),
            Vec3::new(-h.x, h.y, h.z),
        ];
        #[rustfmt::skip]
        let indices = vec![
            0, 2, 1, 0, 3, 2, // -z
            4, 5, 6, 4, 6, 7, // +z
            0, 1, 5, 0, 5, 4, // -y
            3, 7, 6, 3, 6, 2, // +y
            0, 4, 7, 0, 7, 3, // -x
            1, 2, 6, 1, 6, 5, // +x
        ];
        Self::new(name, positions, indices)
    }

    /// Horizontal plane in XZ centered on the origin
    pub fn plane(name: impl Into<String>, width: f32, depth: f32) -> Self {
        let (hw, hd) = (width * 0.5, depth * 0.5);
        let positions = vec![
            Vec3::new(-hw, 0.0, -hd),
            Vec3::new(hw, 0.0, -hd),
            Vec3::new(hw, 0.0, hd),
            Vec3::new(-hw, 0.0, hd),
        ];
        Self::new(name, positions, vec![0, 2, 1, 0, 3, 2])
    }

    /// Recompute the bounding box from the vertex positions
    pub fn compute_bounding_box(&mut self) {
        self.bounding_box = Aabb::from_points(&self.positions);
    }

    /// Iterate triangles as vertex triples, skipping out-of-range indices
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(|tri| {
            let a = *self.positions.get(tri[0] as usize)?;
            let b = *self.positions.get(tri[1] as usize)?;
            let c = *self.positions.get(tri[2] as usize)?;
            Some([a, b, c])
        })
    }
}

/// Flat-colored material
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Linear RGB
    pub color: [f32; 3],
    pub opacity: f32,
    /// Drawn blended, after opaque meshes
    pub transparent: bool,
}

impl Material {
    pub fn new(color: [f32; 3]) -> Self {
        Self {
            color,
            opacity: 1.0,
            transparent: false,
        }
    }

    /// Transparent material starting fully see-through, as used by
    /// hover-highlighted section volumes
    pub fn hidden_overlay(color: [f32; 3]) -> Self {
        Self {
            color,
            opacity: 0.0,
            transparent: true,
        }
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new([1.0, 1.0, 1.0])
    }
}

/// Renderable geometry/material pair
#[derive(Clone, Debug)]
pub struct Mesh {
    pub geometry: Geometry,
    pub material: Material,
}

impl Mesh {
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self { geometry, material }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_bounds_and_triangles() {
        let g = Geometry::cuboid("room1", Vec3::new(2.0, 4.0, 6.0));
        let bb = g.bounding_box.unwrap();
        assert_eq!(bb.min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(bb.max, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(g.triangles().count(), 12);
    }

    #[test]
    fn test_empty_geometry_has_no_bounds() {
        let g = Geometry::new("empty", Vec::new(), Vec::new());
        assert!(g.bounding_box.is_none());
    }

    #[test]
    fn test_triangles_skip_bad_indices() {
        let g = Geometry::new("bad", vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 2, 0, 1, 9]);
        assert_eq!(g.triangles().count(), 1);
    }

    #[test]
    fn test_set_opacity_clamps() {
        let mut m = Material::hidden_overlay([1.0, 0.0, 0.0]);
        m.set_opacity(0.4);
        assert_eq!(m.opacity, 0.4);
        m.set_opacity(3.0);
        assert_eq!(m.opacity, 1.0);
        assert!(m.transparent);
    }
}
