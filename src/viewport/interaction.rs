//! Hover highlighting and click-to-navigate

use glam::{Vec2, Vec3};

use crate::animation::fly_to_clip;
use crate::core::error::Error;
use crate::core::input::PointerInput;
use crate::core::types::Result;
use crate::scene::{Intersection, Raycaster, SceneNodeId};

use super::Viewport;

impl Viewport {
    /// Client coordinates to canvas box coordinates in `[0, 1]`
    fn pointer_position(&self, p: &PointerInput) -> Vec2 {
        let (x, y) = self.canvas.bounding_rect().normalize(p.client_x, p.client_y);
        Vec2::new(x, y)
    }

    /// Nearest interactable under a canvas box position
    pub fn pick(&mut self, position: Vec2) -> Option<Intersection> {
        self.scene.update_matrix_world();
        let ndc = Vec2::new(position.x * 2.0 - 1.0, 1.0 - position.y * 2.0);
        let raycaster = Raycaster::new(self.camera.ray_from_ndc(ndc));
        raycaster
            .intersect_objects(&self.scene, &self.interactables)
            .into_iter()
            .next()
    }

    pub(super) fn on_pointer_move(&mut self, p: &PointerInput) -> Result<()> {
        let position = self.pointer_position(p);
        self.pointer.position = position;
        self.pointer.tracked = true;

        let offset = self.config.highlight.label_offset;
        self.label.move_to(
            position.x * (self.width as f32 + offset),
            position.y * (self.height as f32 + offset),
        );

        self.update_hover()
    }

    /// Re-pick under the last known pointer position. Keeps the hover cache
    /// in step with the pointer ray after the camera or the scene moved.
    pub(super) fn refresh_hover(&mut self) -> Result<()> {
        if !self.pointer.tracked {
            return Ok(());
        }
        self.update_hover()
    }

    fn update_hover(&mut self) -> Result<()> {
        match self.pick(self.pointer.position) {
            Some(hit) => {
                if self.pointer.hovered == Some(hit.node) {
                    return Ok(());
                }
                let centre = self.bounds_centre(hit.node)?;
                if self.pointer.hovered.is_some() {
                    self.set_enabled(false);
                }
                self.pointer.hovered = Some(hit.node);
                self.pointer.action_centre = centre;
                self.set_enabled(true);
            }
            None => {
                if self.pointer.hovered.is_some() {
                    self.set_enabled(false);
                    self.pointer.hovered = None;
                }
            }
        }
        Ok(())
    }

    pub(super) fn on_pointer_down(&mut self, p: &PointerInput) {
        self.pointer.down = self.pointer_position(p);
        self.pointer.armed = true;
    }

    /// A release at exactly the press position over a hovered object flies
    /// the camera there and navigates once the flight ends.
    pub(super) fn on_pointer_up(&mut self, p: &PointerInput) -> Result<()> {
        if !std::mem::take(&mut self.pointer.armed) {
            return Ok(());
        }
        self.pointer.up = self.pointer_position(p);

        if self.pointer.down != self.pointer.up {
            return Ok(());
        }
        let Some(hovered) = self.pointer.hovered else {
            return Ok(());
        };
        let Some(base_url) = self.config.base_url.as_deref() else {
            return Ok(());
        };

        let name = self
            .scene
            .get(hovered)
            .and_then(|node| node.geometry_name())
            .ok_or_else(|| Error::ObjectNotFound(format!("hovered node {:?}", hovered)))?;
        let href = format!("{base_url}{name}");

        let clip = fly_to_clip(&self.camera, self.pointer.action_centre, &self.config.fly_to);
        if self.fly_to.start(&mut self.mixer, clip, Some(href.clone())).is_some() {
            log::debug!("Viewport: flying to {:?} for {}", self.pointer.action_centre, href);
        }
        Ok(())
    }

    /// Show or hide the highlight of the hovered object
    pub(super) fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.label.hide();
        }

        let highlight = &self.config.highlight;
        let Some(mesh) = self
            .pointer
            .hovered
            .and_then(|id| self.scene.get_mut(id))
            .and_then(|node| node.mesh.as_mut())
        else {
            self.label.visible = enabled;
            return;
        };

        if enabled {
            let name = &mesh.geometry.name;
            let text = if *name == highlight.floor_name {
                name.clone()
            } else {
                format!("section {name}")
            };
            self.label.show(text);
            mesh.material.set_opacity(highlight.opacity);
        } else {
            mesh.material.set_opacity(0.0);
        }
    }

    /// World-space centre of a node's geometry bounds
    fn bounds_centre(&self, id: SceneNodeId) -> Result<Vec3> {
        let node = self
            .scene
            .get(id)
            .ok_or_else(|| Error::ObjectNotFound(format!("{:?}", id)))?;
        let bounds = node
            .mesh
            .as_ref()
            .and_then(|mesh| mesh.geometry.bounding_box)
            .ok_or_else(|| Error::MissingBoundingBox(node.name.clone()))?;
        Ok(node.world_transform.transform_point3(bounds.center()))
    }
}
