use glam::Vec3;

// Reflect vector v around normal n
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Flat surface properties shared by every primitive.
#[derive(Clone, Copy, Debug)]
pub struct Material {
    /// Diffuse color, each channel in [0, 1]
    pub color: Vec3,
    /// Fraction of the mirror reflection added on top of direct light
    pub reflectivity: f32,
}

impl Material {
    pub fn new(color: Vec3, reflectivity: f32) -> Self {
        Self {
            color,
            reflectivity,
        }
    }

    pub fn is_reflective(&self) -> bool {
        self.reflectivity > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec3;

    #[test]
    fn reflect_flips_the_normal_component() {
        let r = reflect(vec3(1.0, -1.0, 0.0), vec3(0.0, 1.0, 0.0));
        assert!((r - vec3(1.0, 1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn zero_reflectivity_is_not_reflective() {
        assert!(!Material::new(Vec3::one(), 0.0).is_reflective());
        assert!(Material::new(Vec3::one(), 0.1).is_reflective());
    }
}
