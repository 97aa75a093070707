use crate::{Hit, Intersect, Ray};
use glam::Vec3;

#[derive(Clone, Debug)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

impl Intersect for Sphere {
    fn intersection(&self, ray: Ray, t_min: f32) -> Option<Hit> {
        let oc = ray.origin - self.center;
        let a = ray.direction.dot(ray.direction);
        let b = oc.dot(ray.direction);
        let c = oc.dot(oc) - self.radius * self.radius;
        let discriminant = b * b - a * c;

        if discriminant < 0.0 {
            return None;
        }

        let root = f32::sqrt(discriminant);
        let t_1 = (-b - root) / a;
        let t_2 = (-b + root) / a;

        // Prefer the near root, fall back to the far one when we start inside
        let t = if t_1 >= 0.0 { t_1 } else { t_2 };

        // A near root inside the epsilon shell drops the sphere entirely
        if t < 0.0 || t <= t_min {
            return None;
        }

        let point = ray.point_at_parameter(t);

        Some(Hit {
            t,
            normal: (point - self.center).normalize(),
        })
    }
}
