use crate::{primitives::Instance, Hit, Intersect, Ray};
use glam::Vec3;

/// A single point light
#[derive(Clone, Copy, Debug)]
pub struct Light {
    pub position: Vec3,
    pub color: Vec3,
}

impl Light {
    pub fn new(position: Vec3, color: Vec3) -> Self {
        Self { position, color }
    }
}

/// The static geometry of a scene, scanned linearly in insertion order.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    instances: Vec<Instance>,
}

impl Scene {
    pub fn new(instances: Vec<Instance>) -> Self {
        Self { instances }
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Finds the closest instance hit by the ray with `t > epsilon`.
    /// On an exact tie the instance that comes first wins.
    pub fn intersection(&self, ray: Ray, epsilon: f32) -> Option<(&Instance, Hit)> {
        let mut closest: Option<(&Instance, Hit)> = None;

        for instance in &self.instances {
            if let Some(hit) = instance.intersection(ray, epsilon) {
                if closest.map_or(true, |(_, c)| hit.t < c.t) {
                    closest = Some((instance, hit));
                }
            }
        }

        closest
    }

    /// Whether anything blocks the ray in `(epsilon, max_distance]`
    pub fn occluded(&self, ray: Ray, epsilon: f32, max_distance: f32) -> bool {
        self.instances
            .iter()
            .any(|instance| instance.has_intersection(ray, epsilon, max_distance))
    }
}
