//! Renderer seam and a headless implementation

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::camera::Camera;
use crate::core::types::Result;
use crate::scene::{SceneGraph, SceneNodeId};

/// Draws a scene from a camera into an output surface
pub trait Renderer {
    fn set_pixel_ratio(&mut self, ratio: f64);

    fn pixel_ratio(&self) -> f64;

    /// Set the output size in canvas pixels
    fn set_size(&mut self, width: u32, height: u32);

    /// Output size in canvas pixels
    fn size(&self) -> (u32, u32);

    /// Clear the frame buffer before the next draw
    fn clear(&mut self);

    /// Submit every visible mesh for drawing
    fn render(&mut self, scene: &SceneGraph, camera: &Camera) -> Result<()>;
}

/// One mesh as it was submitted
#[derive(Clone, Debug, PartialEq)]
pub struct DrawRecord {
    pub node: SceneNodeId,
    pub opacity: f32,
}

/// One submitted frame
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedFrame {
    pub size: (u32, u32),
    pub cleared: bool,
    pub aspect: f32,
    pub draws: Vec<DrawRecord>,
}

/// Renderer without a GPU. Frames are recorded into a shared log.
#[derive(Debug)]
pub struct HeadlessRenderer {
    pixel_ratio: f64,
    size: (u32, u32),
    pending_clear: bool,
    frames: Rc<RefCell<Vec<RenderedFrame>>>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self {
            pixel_ratio: 1.0,
            size: (0, 0),
            pending_clear: false,
            frames: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Handle on the frame log that stays valid after the renderer is boxed
    pub fn frames(&self) -> Rc<RefCell<Vec<RenderedFrame>>> {
        self.frames.clone()
    }
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HeadlessRenderer {
    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.pixel_ratio = ratio;
    }

    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn clear(&mut self) {
        self.pending_clear = true;
    }

    fn render(&mut self, scene: &SceneGraph, camera: &Camera) -> Result<()> {
        let draws = scene
            .visible_nodes()
            .into_iter()
            .filter_map(|node| {
                let mesh = node.mesh.as_ref()?;
                Some(DrawRecord { node: node.id, opacity: mesh.material.opacity })
            })
            .collect();

        self.frames.borrow_mut().push(RenderedFrame {
            size: self.size,
            cleared: std::mem::take(&mut self.pending_clear),
            aspect: camera.aspect,
            draws,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Geometry, Material, Mesh, Object3D};
    use glam::Vec3;

    #[test]
    fn test_records_meshes_only() {
        let mut scene = SceneGraph::new();
        let group = scene.add(Object3D::group("group"));
        let mesh = scene.add_child(
            group,
            Object3D::mesh(Mesh::new(Geometry::cuboid("room1", Vec3::ONE), Material::new([1.0, 0.0, 0.0]))),
        );

        let mut renderer = HeadlessRenderer::new();
        let frames = renderer.frames();
        renderer.set_size(320, 200);
        renderer.clear();
        renderer.render(&scene, &Camera::default()).unwrap();
        renderer.render(&scene, &Camera::default()).unwrap();

        let frames = frames.borrow();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].size, (320, 200));
        assert!(frames[0].cleared);
        assert!(!frames[1].cleared);
        assert_eq!(frames[0].draws, vec![DrawRecord { node: mesh, opacity: 1.0 }]);
    }
}
