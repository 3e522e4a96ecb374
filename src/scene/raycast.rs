//! Ray casting against scene meshes

use std::cmp::Ordering;

use glam::Vec3;

use crate::math::Ray;

use super::graph::SceneGraph;
use super::node::SceneNodeId;

/// A ray hit on a mesh, in world space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    pub node: SceneNodeId,
    pub distance: f32,
    pub point: Vec3,
}

/// Casts rays into a restricted set of scene nodes
#[derive(Clone, Copy, Debug)]
pub struct Raycaster {
    pub ray: Ray,
    /// Hits closer than this are ignored
    pub near: f32,
    /// Hits farther than this are ignored
    pub far: f32,
}

impl Raycaster {
    pub fn new(ray: Ray) -> Self {
        Self {
            ray,
            near: 0.0,
            far: f32::INFINITY,
        }
    }

    /// Intersect the listed nodes (not their children), nearest first.
    /// World matrices must be current.
    pub fn intersect_objects(&self, scene: &SceneGraph, objects: &[SceneNodeId]) -> Vec<Intersection> {
        let mut hits: Vec<Intersection> = objects
            .iter()
            .filter_map(|&id| self.intersect_object(scene, id))
            .collect();
        hits.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
        hits
    }

    /// Nearest hit on a single node's mesh
    pub fn intersect_object(&self, scene: &SceneGraph, id: SceneNodeId) -> Option<Intersection> {
        let node = scene.get(id)?;
        let mesh = node.mesh.as_ref()?;
        let world = node.world_transform;

        // Broad phase against the world-space bounds, when known
        if let Some(bounds) = mesh.geometry.bounding_box {
            self.ray.intersects_aabb(&bounds.transformed(&world))?;
        }

        let local_ray = self.ray.transform(&world.inverse());
        let mut best: Option<Intersection> = None;
        for [a, b, c] in mesh.geometry.triangles() {
            let Some(t) = local_ray.intersects_triangle(a, b, c) else {
                continue;
            };
            let point = world.transform_point3(local_ray.at(t));
            let distance = (point - self.ray.origin).length();
            if distance < self.near || distance > self.far {
                continue;
            }
            if best.is_none_or(|hit| distance < hit.distance) {
                best = Some(Intersection { node: id, distance, point });
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::geometry::{Geometry, Material, Mesh};
    use crate::scene::node::Object3D;

    fn cube(scene: &mut SceneGraph, name: &str, position: Vec3) -> SceneNodeId {
        let mesh = Mesh::new(Geometry::cuboid(name, Vec3::ONE), Material::default());
        scene.add(Object3D::mesh(mesh).with_position(position))
    }

    #[test]
    fn test_nearest_first() {
        let mut scene = SceneGraph::new();
        let far = cube(&mut scene, "far", Vec3::new(0.0, 0.0, -10.0));
        let near = cube(&mut scene, "near", Vec3::new(0.0, 0.0, -3.0));
        scene.update_matrix_world();

        let caster = Raycaster::new(Ray::new(Vec3::ZERO, -Vec3::Z));
        let hits = caster.intersect_objects(&scene, &[far, near]);

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].node, near);
        assert!((hits[0].distance - 2.5).abs() < 1e-4);
        assert_eq!(hits[1].node, far);
    }

    #[test]
    fn test_only_listed_objects_are_tested() {
        let mut scene = SceneGraph::new();
        let hidden_from_pick = cube(&mut scene, "a", Vec3::new(0.0, 0.0, -3.0));
        let listed = cube(&mut scene, "b", Vec3::new(0.0, 0.0, -6.0));
        scene.update_matrix_world();

        let caster = Raycaster::new(Ray::new(Vec3::ZERO, -Vec3::Z));
        let hits = caster.intersect_objects(&scene, &[listed]);
        assert_eq!(hits.len(), 1);
        assert_ne!(hits[0].node, hidden_from_pick);
    }

    #[test]
    fn test_respects_world_scale() {
        let mut scene = SceneGraph::new();
        let mut object = Object3D::mesh(Mesh::new(Geometry::cuboid("big", Vec3::ONE), Material::default()));
        object.transform.position = Vec3::new(0.0, 0.0, -10.0);
        object.transform.scale = Vec3::splat(4.0);
        let id = scene.add(object);
        scene.update_matrix_world();

        let caster = Raycaster::new(Ray::new(Vec3::ZERO, -Vec3::Z));
        let hit = caster.intersect_object(&scene, id).unwrap();
        assert!((hit.distance - 8.0).abs() < 1e-3);
        assert!((hit.point - Vec3::new(0.0, 0.0, -8.0)).length() < 1e-3);
    }

    #[test]
    fn test_miss_and_groups() {
        let mut scene = SceneGraph::new();
        let id = cube(&mut scene, "a", Vec3::new(5.0, 0.0, -3.0));
        let group = scene.add(Object3D::group("g"));
        scene.update_matrix_world();

        let caster = Raycaster::new(Ray::new(Vec3::ZERO, -Vec3::Z));
        assert!(caster.intersect_objects(&scene, &[id, group]).is_empty());
    }

    #[test]
    fn test_far_limit() {
        let mut scene = SceneGraph::new();
        let id = cube(&mut scene, "a", Vec3::new(0.0, 0.0, -30.0));
        scene.update_matrix_world();

        let mut caster = Raycaster::new(Ray::new(Vec3::ZERO, -Vec3::Z));
        caster.far = 10.0;
        assert!(caster.intersect_object(&scene, id).is_none());
    }
}
