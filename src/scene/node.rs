//! Scene graph node types

use glam::{Mat4, Quat, Vec3};

use super::geometry::Mesh;

/// Unique identifier for a scene graph node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneNodeId(pub u64);

/// Local transform relative to the parent node.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl LocalTransform {
    /// Identity transform (no translation, rotation, or scaling).
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a translation-only transform.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Convert to a 4x4 matrix.
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Description of an object to insert into the scene.
#[derive(Clone, Debug, Default)]
pub struct Object3D {
    pub name: String,
    /// Stable identifier; a random v4 uuid is assigned when absent
    pub uuid: Option<String>,
    pub transform: LocalTransform,
    pub mesh: Option<Mesh>,
}

impl Object3D {
    /// A grouping object with no geometry.
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// A mesh object named after its geometry.
    pub fn mesh(mesh: Mesh) -> Self {
        Self {
            name: mesh.geometry.name.clone(),
            mesh: Some(mesh),
            ..Default::default()
        }
    }

    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }
}

/// A single node in the scene graph.
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub id: SceneNodeId,
    pub uuid: String,
    pub name: String,
    pub parent: Option<SceneNodeId>,
    pub children: Vec<SceneNodeId>,
    pub local_transform: LocalTransform,
    /// Cached world transform (recomputed by `update_matrix_world`).
    pub world_transform: Mat4,
    pub visible: bool,
    pub mesh: Option<Mesh>,
    /// Free-form record attached by behavior scripts.
    pub parameters: Option<serde_json::Value>,
}

impl SceneNode {
    /// Create a new scene node from an object description.
    pub fn new(id: SceneNodeId, object: Object3D) -> Self {
        Self {
            id,
            uuid: object.uuid.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: object.name,
            parent: None,
            children: Vec::new(),
            local_transform: object.transform,
            world_transform: Mat4::IDENTITY,
            visible: true,
            mesh: object.mesh,
            parameters: None,
        }
    }

    /// Name of the mesh geometry, if this node is a mesh.
    pub fn geometry_name(&self) -> Option<&str> {
        self.mesh.as_ref().map(|m| m.geometry.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::geometry::{Geometry, Material};

    #[test]
    fn test_local_transform_identity() {
        let t = LocalTransform::identity();
        assert_eq!(t.to_mat4(), Mat4::IDENTITY);
    }

    #[test]
    fn test_local_transform_to_mat4_with_scale() {
        let t = LocalTransform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::IDENTITY,
            scale: Vec3::splat(2.0),
        };
        let (scale, _, translation) = t.to_mat4().to_scale_rotation_translation();
        assert!((scale - Vec3::splat(2.0)).length() < 1e-5);
        assert!((translation - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-5);
    }

    #[test]
    fn test_node_gets_random_uuid_unless_given() {
        let a = SceneNode::new(SceneNodeId(1), Object3D::group("a"));
        let b = SceneNode::new(SceneNodeId(2), Object3D::group("b"));
        assert_ne!(a.uuid, b.uuid);
        assert!(uuid::Uuid::parse_str(&a.uuid).is_ok());

        let c = SceneNode::new(SceneNodeId(3), Object3D::group("c").with_uuid("fixed"));
        assert_eq!(c.uuid, "fixed");
    }

    #[test]
    fn test_mesh_object_takes_geometry_name() {
        let mesh = Mesh::new(Geometry::cuboid("room1", Vec3::ONE), Material::default());
        let node = SceneNode::new(SceneNodeId(1), Object3D::mesh(mesh));
        assert_eq!(node.name, "room1");
        assert_eq!(node.geometry_name(), Some("room1"));
        assert!(node.parameters.is_none());
    }
}
