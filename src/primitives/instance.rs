use crate::{material::Material, primitives::Shape, Hit, Intersect, Ray};

/// A shape placed in the scene together with its surface properties
#[derive(Clone, Debug)]
pub struct Instance {
    pub shape: Shape,
    pub material: Material,
}

impl Instance {
    pub fn new(shape: impl Into<Shape>, material: Material) -> Self {
        Self {
            shape: shape.into(),
            material,
        }
    }
}

impl Intersect for Instance {
    fn intersection(&self, ray: Ray, t_min: f32) -> Option<Hit> {
        self.shape.intersection(ray, t_min)
    }
}
