use crate::{Hit, Intersect, Ray};
use glam::Vec3;

/// Rays closer than this to parallel with the wall never hit it
const PARALLEL_THRESHOLD: f32 = 1e-6;

/// A bounded rectangle of a plane, centered on `point`
#[derive(Clone, Debug)]
pub struct Wall {
    point: Vec3,
    normal: Vec3,
    right: Vec3,
    width: f32,
    height: f32,
}

impl Wall {
    /// `right` is made orthogonal to `normal`, both end up unit length.
    pub fn new(point: Vec3, normal: Vec3, right: Vec3, width: f32, height: f32) -> Self {
        let normal = normal.normalize();
        let right = (right - right.dot(normal) * normal).normalize();

        Self {
            point,
            normal,
            right,
            width,
            height,
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.normal.cross(self.right)
    }

    /// Coordinates of a point on the plane in the (right, up) basis
    pub fn local(&self, point: Vec3) -> (f32, f32) {
        let offset = point - self.point;
        (offset.dot(self.right), offset.dot(self.up()))
    }
}

impl Intersect for Wall {
    fn intersection(&self, ray: Ray, t_min: f32) -> Option<Hit> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() <= PARALLEL_THRESHOLD {
            return None;
        }

        let t = (self.point - ray.origin).dot(self.normal) / denom;
        if t <= t_min {
            return None;
        }

        let (x, y) = self.local(ray.point_at_parameter(t));
        let half_width = self.width / 2.0;
        let half_height = self.height / 2.0;

        if x.abs() <= half_width && y.abs() <= half_height {
            Some(Hit {
                t,
                normal: self.normal,
            })
        } else {
            None
        }
    }
}
