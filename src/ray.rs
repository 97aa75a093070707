use glam::Vec3;

/// The ray data type
///
/// The direction is normalized on construction, every distance `t` along the
/// ray is therefore a world space distance.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn point_at_parameter(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }
}

/// The result of a successful ray/primitive intersection.
#[derive(Clone, Copy, Debug)]
pub struct Hit {
    /// Distance along the ray direction
    pub t: f32,
    /// Unit surface normal at the hit point
    pub normal: Vec3,
}
