//! This module is full of primitives that all impl Intersect

mod instance;
mod sphere;
mod wall;

pub use instance::*;
pub use sphere::*;
pub use wall::*;

use crate::ray::{Hit, Ray};

/// Computes whether a ray intersects a primitive
pub trait Intersect: Send + Sync {
    /// Computes the nearest intersection in front of `t_min` along the ray.
    /// A primitive never reports a hit with `t <= t_min`.
    fn intersection(&self, ray: Ray, t_min: f32) -> Option<Hit>;

    /// Computes whether there is an intersection with `t_min < t <= t_max`.
    fn has_intersection(&self, ray: Ray, t_min: f32, t_max: f32) -> bool {
        self.intersection(ray, t_min)
            .map_or(false, |hit| hit.t <= t_max)
    }
}

/// The closed set of geometric shapes a scene can be built from
#[derive(Clone, Debug)]
pub enum Shape {
    Sphere(Sphere),
    Wall(Wall),
}

impl From<Sphere> for Shape {
    fn from(sphere: Sphere) -> Self {
        Shape::Sphere(sphere)
    }
}

impl From<Wall> for Shape {
    fn from(wall: Wall) -> Self {
        Shape::Wall(wall)
    }
}

impl Intersect for Shape {
    fn intersection(&self, ray: Ray, t_min: f32) -> Option<Hit> {
        match self {
            Shape::Sphere(sphere) => sphere.intersection(ray, t_min),
            Shape::Wall(wall) => wall.intersection(ray, t_min),
        }
    }
}
