//! Perspective camera

use crate::core::types::{Mat3, Mat4, Quat, Vec2, Vec3};
use crate::math::Ray;

/// Perspective camera with position, orientation, and projection parameters
#[derive(Clone, Debug)]
pub struct Camera {
    /// World position
    pub position: Vec3,
    /// Orientation as quaternion
    pub rotation: Quat,
    /// World up used by look-at
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    /// Near clip plane
    pub near: f32,
    /// Far clip plane
    pub far: f32,
    /// Cached projection, refreshed by `update_projection_matrix`
    projection: Mat4,
}

impl Camera {
    /// Create a new camera
    pub fn new(position: Vec3, fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position,
            rotation: Quat::IDENTITY,
            up: Vec3::Y,
            fov_y: fov_y_degrees.to_radians(),
            aspect,
            near,
            far,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    /// Get view matrix (world to camera space)
    pub fn view_matrix(&self) -> Mat4 {
        let rotation_matrix = Mat4::from_quat(self.rotation.conjugate());
        let translation_matrix = Mat4::from_translation(-self.position);
        rotation_matrix * translation_matrix
    }

    /// Recompute the cached projection from fov/aspect/near/far
    pub fn update_projection_matrix(&mut self) {
        self.projection = Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far);
    }

    /// Get projection matrix (camera to clip space)
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// Get combined view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }

    /// Get forward direction (negative Z in camera space)
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Update aspect ratio (call on resize)
    pub fn set_aspect(&mut self, width: f32, height: f32) {
        self.aspect = width / height;
    }

    /// Orient the camera towards `target`
    pub fn look_at(&mut self, target: Vec3) {
        self.rotation = look_at_rotation(self.position, target, self.up);
    }

    /// Ray from the camera through a point in normalized device coordinates
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection().inverse();
        let far_point = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 0.5));
        let direction = (far_point - self.position)
            .try_normalize()
            .unwrap_or_else(|| self.forward());
        Ray::new(self.position, direction)
    }
}

/// Orientation of an object at `eye` whose -Z axis points at `target`
pub fn look_at_rotation(eye: Vec3, target: Vec3, up: Vec3) -> Quat {
    let mut z = eye - target;
    if z.length_squared() == 0.0 {
        z = Vec3::Z;
    }
    let z = z.normalize();

    let mut x = up.cross(z);
    if x.length_squared() == 0.0 {
        // up and view direction are parallel, nudge z off the axis
        let nudged = if up.z.abs() == 1.0 {
            Vec3::new(z.x + 1e-4, z.y, z.z)
        } else {
            Vec3::new(z.x, z.y, z.z + 1e-4)
        };
        x = up.cross(nudged.normalize());
    }
    let x = x.normalize();
    let y = z.cross(x);

    Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize()
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 3.2, 13.0), 53.0, 16.0 / 9.0, 0.1, 5000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_looks_down_negative_z() {
        let camera = Camera::default();
        let forward = camera.forward();
        assert!((forward.z - (-1.0)).abs() < 0.001);
    }

    #[test]
    fn test_view_matrix_translation() {
        let mut camera = Camera::default();
        camera.position = Vec3::new(10.0, 0.0, 0.0);

        let view = camera.view_matrix();
        let origin_in_camera = view.transform_point3(Vec3::ZERO);
        assert!((origin_in_camera.x - (-10.0)).abs() < 0.001);
    }

    #[test]
    fn test_projection_follows_aspect_after_update() {
        let mut camera = Camera::default();
        camera.set_aspect(800.0, 400.0);
        camera.update_projection_matrix();
        assert_eq!(camera.aspect, 2.0);
        assert_eq!(
            camera.projection_matrix(),
            Mat4::perspective_rh(camera.fov_y, 2.0, camera.near, camera.far)
        );
    }

    #[test]
    fn test_look_at_points_forward_at_target() {
        let mut camera = Camera::default();
        camera.position = Vec3::new(5.0, 5.0, 5.0);
        camera.look_at(Vec3::ZERO);

        let expected = (Vec3::ZERO - camera.position).normalize();
        assert!((camera.forward() - expected).length() < 1e-4);
    }

    #[test]
    fn test_look_at_straight_down_is_finite() {
        let q = look_at_rotation(Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO, Vec3::Y);
        assert!(q.is_finite());
        let forward = q * -Vec3::Z;
        assert!((forward - -Vec3::Y).length() < 1e-2);
    }

    #[test]
    fn test_center_ray_matches_forward() {
        let camera = Camera::default();
        let ray = camera.ray_from_ndc(Vec2::ZERO);
        assert_eq!(ray.origin, camera.position);
        assert!((ray.direction - camera.forward()).length() < 1e-4);
    }
}
