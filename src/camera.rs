use crate::Ray;
use glam::{vec3, Quat, Vec3};

const WORLD_UP: [f32; 3] = [0.0, 1.0, 0.0];

/// Whether a view direction spans a camera basis, i.e. is neither zero nor
/// parallel to the world up axis
pub fn has_basis(direction: Vec3) -> bool {
    direction.length() > 0.0
        && direction.normalize().cross(Vec3::from(WORLD_UP)).length() > 1e-6
}

/// Camera pose as edited by the user between render passes
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub position: Vec3,
    /// View direction, normalized when the basis is built
    pub direction: Vec3,
    /// Rotation around the view direction, in degrees
    pub roll: f32,
    /// Field of view, in degrees
    pub fov: f32,
}

impl Camera {
    pub fn new(position: Vec3, direction: Vec3, roll: f32, fov: f32) -> Self {
        Self {
            position,
            direction,
            roll,
            fov,
        }
    }

    /// Builds the per-pass basis used to generate primary rays for an image
    /// of `width` by `height` pixels.
    pub fn basis(&self, width: usize, height: usize) -> CameraBasis {
        let forward = self.direction.normalize();
        let right = forward.cross(Vec3::from(WORLD_UP)).normalize();
        let up = right.cross(forward).normalize();

        let roll = Quat::from_axis_angle(forward, self.roll.to_radians());
        let right = roll * right;
        let up = roll * up;

        let aspect = width as f32 / height as f32;
        let scale = f32::tan(self.fov.to_radians() / 2.0);

        CameraBasis {
            origin: self.position,
            forward,
            right,
            up,
            width: width as f32,
            height: height as f32,
            aspect,
            scale,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::zero(), vec3(0.0, 0.0, -1.0), 0.0, 90.0)
    }
}

/// Orthonormal camera frame plus the image-plane scale factors
#[derive(Clone, Copy, Debug)]
pub struct CameraBasis {
    pub origin: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    width: f32,
    height: f32,
    aspect: f32,
    scale: f32,
}

impl CameraBasis {
    /// The primary ray through the center of pixel (x, y)
    pub fn ray(&self, x: usize, y: usize) -> Ray {
        let px = (2.0 * (x as f32 + 0.5) / self.width - 1.0) * self.aspect * self.scale;
        let py = (2.0 * (y as f32 + 0.5) / self.height - 1.0) * self.scale;

        Ray::new(self.origin, self.forward + px * self.right + py * self.up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn default_basis_is_right_handed_looking_down_z() {
        let basis = Camera::default().basis(100, 100);

        assert!(close(basis.forward, vec3(0.0, 0.0, -1.0)));
        assert!(close(basis.right, vec3(1.0, 0.0, 0.0)));
        assert!(close(basis.up, vec3(0.0, 1.0, 0.0)));
    }

    #[test]
    fn roll_rotates_right_and_up() {
        let camera = Camera::new(Vec3::zero(), vec3(0.0, 0.0, -2.0), 90.0, 90.0);
        let basis = camera.basis(100, 100);

        assert!(basis.right.dot(basis.forward).abs() < 1e-5);
        assert!(basis.up.dot(basis.forward).abs() < 1e-5);
        assert!(basis.right.dot(basis.up).abs() < 1e-5);
        assert!(
            close(basis.right, vec3(0.0, 1.0, 0.0)) || close(basis.right, vec3(0.0, -1.0, 0.0))
        );
    }

    #[test]
    fn directions_along_world_up_have_no_basis() {
        assert!(has_basis(vec3(0.0, 0.0, -1.0)));
        assert!(has_basis(vec3(0.1, 1.0, 0.0)));
        assert!(!has_basis(vec3(0.0, 1.0, 0.0)));
        assert!(!has_basis(vec3(0.0, -3.0, 0.0)));
        assert!(!has_basis(Vec3::zero()));
    }

    #[test]
    fn center_pixel_looks_forward() {
        // Odd size so pixel (1, 1) sits exactly on the optical axis
        let ray = Camera::default().basis(3, 3).ray(1, 1);

        assert!(close(ray.origin, Vec3::zero()));
        assert!(close(ray.direction, vec3(0.0, 0.0, -1.0)));
    }

    #[test]
    fn corner_pixels_follow_fov_and_aspect() {
        // 90 degree fov: tan(45) = 1, so the image plane spans [-aspect, aspect] x [-1, 1]
        let basis = Camera::default().basis(4, 2);
        let ray = basis.ray(0, 0);

        let px = (2.0 * 0.5 / 4.0 - 1.0) * 2.0;
        let py = 2.0 * 0.5 / 2.0 - 1.0;
        let expected = vec3(px, py, -1.0).normalize();

        assert!(close(ray.direction, expected));
    }

    #[test]
    fn camera_position_is_ray_origin() {
        let camera = Camera::new(vec3(1.0, 2.0, 3.0), vec3(0.0, 0.0, -1.0), 0.0, 60.0);
        let ray = camera.basis(10, 10).ray(7, 2);

        assert!(close(ray.origin, vec3(1.0, 2.0, 3.0)));
        assert!((ray.direction.length() - 1.0).abs() < 1e-5);
    }
}
