//! Scene graph: CPU-side hierarchy of nodes.
//!
//! Nodes own an optional mesh and a local transform. `update_matrix_world`
//! walks the tree from the root and caches each node's world matrix, which
//! picking and rendering read afterwards.

use std::collections::HashMap;

use glam::Mat4;

use super::node::{LocalTransform, Object3D, SceneNode, SceneNodeId};

/// CPU-side scene graph.
pub struct SceneGraph {
    nodes: HashMap<SceneNodeId, SceneNode>,
    root: SceneNodeId,
    next_id: u64,
}

impl SceneGraph {
    /// Create a new scene graph with a root group node.
    pub fn new() -> Self {
        let root_id = SceneNodeId(0);
        let root_node = SceneNode::new(root_id, Object3D::group("scene"));

        let mut nodes = HashMap::new();
        nodes.insert(root_id, root_node);

        Self {
            nodes,
            root: root_id,
            next_id: 1,
        }
    }

    /// Get the root node ID.
    pub fn root(&self) -> SceneNodeId {
        self.root
    }

    /// Allocate a fresh node ID.
    fn alloc_id(&mut self) -> SceneNodeId {
        let id = SceneNodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add an object directly under the root.
    pub fn add(&mut self, object: Object3D) -> SceneNodeId {
        self.add_child(self.root, object)
    }

    /// Add an object under `parent`. Returns the new node's ID.
    pub fn add_child(&mut self, parent: SceneNodeId, object: Object3D) -> SceneNodeId {
        let id = self.alloc_id();
        let mut node = SceneNode::new(id, object);
        node.parent = Some(parent);

        log::trace!("Scene: added '{}' ({})", node.name, node.uuid);
        self.nodes.insert(id, node);

        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }

        id
    }

    /// Remove a node and its entire subtree. Cannot remove the root.
    pub fn remove(&mut self, id: SceneNodeId) {
        if id == self.root {
            return;
        }

        // Collect subtree IDs (BFS)
        let mut to_remove = vec![id];
        let mut i = 0;
        while i < to_remove.len() {
            let current = to_remove[i];
            if let Some(node) = self.nodes.get(&current) {
                to_remove.extend_from_slice(&node.children);
            }
            i += 1;
        }

        if let Some(parent_id) = self.nodes.get(&id).and_then(|n| n.parent) {
            if let Some(parent) = self.nodes.get_mut(&parent_id) {
                parent.children.retain(|c| *c != id);
            }
        }

        for nid in to_remove {
            self.nodes.remove(&nid);
        }
    }

    /// Set the local transform of a node.
    pub fn set_transform(&mut self, id: SceneNodeId, transform: LocalTransform) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.local_transform = transform;
        }
    }

    /// Get an immutable reference to a node.
    pub fn get(&self, id: SceneNodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Get a mutable reference to a node.
    pub fn get_mut(&mut self, id: SceneNodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    /// Find a node by its uuid.
    pub fn find_by_uuid(&self, uuid: &str) -> Option<SceneNodeId> {
        self.nodes.values().find(|n| n.uuid == uuid).map(|n| n.id)
    }

    /// Iterate over the children of a node.
    pub fn children(&self, id: SceneNodeId) -> impl Iterator<Item = SceneNodeId> + '_ {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .copied()
    }

    /// Total number of nodes in the graph, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Propagate world transforms from the root downward.
    pub fn update_matrix_world(&mut self) {
        self.propagate_transforms(self.root, Mat4::IDENTITY);
    }

    /// Visible nodes in depth-first order, skipping hidden subtrees.
    pub fn visible_nodes(&self) -> Vec<&SceneNode> {
        let mut out = Vec::new();
        self.collect_visible(self.root, &mut out);
        out
    }

    fn propagate_transforms(&mut self, node_id: SceneNodeId, parent_world: Mat4) {
        let (local_mat, children) = {
            let node = match self.nodes.get(&node_id) {
                Some(n) => n,
                None => return,
            };
            (node.local_transform.to_mat4(), node.children.clone())
        };

        let world = parent_world * local_mat;

        if let Some(node) = self.nodes.get_mut(&node_id) {
            node.world_transform = world;
        }

        for child_id in children {
            self.propagate_transforms(child_id, world);
        }
    }

    fn collect_visible<'a>(&'a self, node_id: SceneNodeId, out: &mut Vec<&'a SceneNode>) {
        let node = match self.nodes.get(&node_id) {
            Some(n) => n,
            None => return,
        };

        if !node.visible {
            return;
        }

        out.push(node);
        for &child_id in &node.children {
            self.collect_visible(child_id, out);
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_new_scene_graph() {
        let graph = SceneGraph::new();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.get(graph.root()).unwrap().name, "scene");
    }

    #[test]
    fn test_add_child() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let child = graph.add(Object3D::group("rooms"));

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.get(child).unwrap().parent, Some(root));
        assert!(graph.children(root).any(|c| c == child));
    }

    #[test]
    fn test_find_by_uuid() {
        let mut graph = SceneGraph::new();
        let id = graph.add(Object3D::group("a").with_uuid("uuid-a"));
        assert_eq!(graph.find_by_uuid("uuid-a"), Some(id));
        assert_eq!(graph.find_by_uuid("missing"), None);
    }

    #[test]
    fn test_remove_subtree() {
        let mut graph = SceneGraph::new();
        let a = graph.add(Object3D::group("a"));
        let b = graph.add_child(a, Object3D::group("b"));
        let c = graph.add(Object3D::group("c"));

        graph.remove(a);

        assert!(graph.get(a).is_none());
        assert!(graph.get(b).is_none());
        assert!(graph.get(c).is_some());
        assert_eq!(graph.children(graph.root()).collect::<Vec<_>>(), vec![c]);

        graph.remove(graph.root());
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_update_matrix_world_composes_parents() {
        let mut graph = SceneGraph::new();
        let parent = graph.add(Object3D::group("parent").with_position(Vec3::new(10.0, 0.0, 0.0)));
        let child = graph.add_child(
            parent,
            Object3D::group("child").with_position(Vec3::new(0.0, 5.0, 0.0)),
        );

        graph.update_matrix_world();

        let world = graph.get(child).unwrap().world_transform;
        let origin = world.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(10.0, 5.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_visible_nodes_skip_hidden_subtrees() {
        let mut graph = SceneGraph::new();
        let a = graph.add(Object3D::group("a"));
        graph.add_child(a, Object3D::group("a_child"));
        graph.add(Object3D::group("b"));
        graph.get_mut(a).unwrap().visible = false;

        let names: Vec<&str> = graph.visible_nodes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["scene", "b"]);
    }
}
