//! Scene graph, meshes and picking

pub mod geometry;
pub mod graph;
pub mod node;
pub mod raycast;

pub use geometry::{Geometry, Material, Mesh};
pub use graph::SceneGraph;
pub use node::{LocalTransform, Object3D, SceneNode, SceneNodeId};
pub use raycast::{Intersection, Raycaster};
