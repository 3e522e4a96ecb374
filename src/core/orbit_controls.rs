//! Orbit-style camera controls

use std::f32::consts::PI;

use winit::event::MouseButton;

use crate::core::camera::Camera;
use crate::core::config::ControlsConfig;
use crate::core::input::InputEvent;
use crate::core::types::Vec3;

/// Keeps the polar angle off the poles so look-at stays well defined
const POLAR_EPSILON: f32 = 1e-4;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Drag {
    Rotate { x: f32, y: f32 },
    Pan { x: f32, y: f32 },
}

/// Orbits the camera around a target point with drag-to-rotate and wheel zoom
pub struct OrbitControls {
    /// Point the camera orbits around
    pub target: Vec3,
    pub min_distance: f32,
    pub max_distance: f32,
    pub zoom_speed: f32,
    pub rotate_speed: f32,
    pub enable_pan: bool,
    pub auto_rotate: bool,
    /// 1.0 = one orbit per minute
    pub auto_rotate_speed: f32,
    /// Input is ignored while false
    pub enabled: bool,
    drag: Option<Drag>,
}

impl OrbitControls {
    /// Create controls from configuration, orbiting the origin
    pub fn new(config: &ControlsConfig) -> Self {
        Self {
            target: Vec3::ZERO,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            zoom_speed: config.zoom_speed,
            rotate_speed: config.rotate_speed,
            enable_pan: config.enable_pan,
            auto_rotate: config.auto_rotate,
            auto_rotate_speed: config.auto_rotate_speed,
            enabled: true,
            drag: None,
        }
    }

    /// Feed an input event; returns true when the camera moved
    pub fn handle_input(&mut self, camera: &mut Camera, event: &InputEvent, view_height: f32) -> bool {
        if !self.enabled {
            return false;
        }
        let view_height = view_height.max(1.0);

        match event {
            InputEvent::MouseDown(p) => {
                self.drag = match p.button {
                    Some(MouseButton::Left) => Some(Drag::Rotate { x: p.client_x, y: p.client_y }),
                    Some(MouseButton::Right) if self.enable_pan => {
                        Some(Drag::Pan { x: p.client_x, y: p.client_y })
                    }
                    _ => None,
                };
                false
            }
            InputEvent::MouseUp(_) => {
                self.drag = None;
                false
            }
            InputEvent::MouseMove(p) => match self.drag {
                Some(Drag::Rotate { x, y }) => {
                    let dx = p.client_x - x;
                    let dy = p.client_y - y;
                    self.drag = Some(Drag::Rotate { x: p.client_x, y: p.client_y });
                    let d_theta = -2.0 * PI * dx / view_height * self.rotate_speed;
                    let d_phi = -2.0 * PI * dy / view_height * self.rotate_speed;
                    self.apply(camera, d_theta, d_phi, 1.0);
                    true
                }
                Some(Drag::Pan { x, y }) => {
                    let dx = p.client_x - x;
                    let dy = p.client_y - y;
                    self.drag = Some(Drag::Pan { x: p.client_x, y: p.client_y });
                    self.pan(camera, dx, dy, view_height);
                    true
                }
                None => false,
            },
            InputEvent::Wheel { delta_y } => {
                if *delta_y == 0.0 {
                    return false;
                }
                let step = 0.95_f32.powf(self.zoom_speed);
                let scale = if *delta_y > 0.0 { 1.0 / step } else { step };
                self.apply(camera, 0.0, 0.0, scale);
                true
            }
            _ => false,
        }
    }

    /// Advance auto-rotation by `dt` seconds
    pub fn update(&mut self, camera: &mut Camera, dt: f32) {
        if self.enabled && self.auto_rotate {
            let angle = 2.0 * PI / 60.0 * self.auto_rotate_speed * dt;
            self.apply(camera, -angle, 0.0, 1.0);
        }
    }

    /// Distance between camera and target
    pub fn distance(&self, camera: &Camera) -> f32 {
        (camera.position - self.target).length()
    }

    /// Re-centre the orbit in front of the camera so the next update
    /// continues from the current pose. The radius stays within the limits.
    pub fn sync_to_camera(&mut self, camera: &Camera) {
        let radius = self.distance(camera).clamp(self.min_distance, self.max_distance);
        self.target = camera.position + camera.forward() * radius;
    }

    fn apply(&self, camera: &mut Camera, d_theta: f32, d_phi: f32, scale: f32) {
        let offset = camera.position - self.target;
        let radius = offset.length();
        let (theta, phi) = if radius > 0.0 {
            (offset.x.atan2(offset.z), (offset.y / radius).clamp(-1.0, 1.0).acos())
        } else {
            (0.0, PI / 2.0)
        };

        let theta = theta + d_theta;
        let phi = (phi + d_phi).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        let radius = (radius * scale).clamp(self.min_distance, self.max_distance);

        let sin_phi = phi.sin();
        let offset = Vec3::new(
            radius * sin_phi * theta.sin(),
            radius * phi.cos(),
            radius * sin_phi * theta.cos(),
        );
        camera.position = self.target + offset;
        camera.look_at(self.target);
    }

    fn pan(&mut self, camera: &mut Camera, dx: f32, dy: f32, view_height: f32) {
        let distance = self.distance(camera);
        let world_per_pixel = 2.0 * distance * (camera.fov_y / 2.0).tan() / view_height;
        let right = camera.rotation * Vec3::X;
        let up = camera.rotation * Vec3::Y;
        let shift = (-dx * right + dy * up) * world_per_pixel;
        self.target += shift;
        camera.position += shift;
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(&ControlsConfig::default())
    }
}
