//! Recursive Whitted-style shading: nearest hit, hard shadows, Phong
//! highlights and a bounded chain of mirror reflections.

use crate::{material::reflect, scene::Light, scene::Scene, Ray};
use glam::Vec3;

/// Phong exponent of the specular highlight
const SHININESS: f32 = 32.0;

/// Knobs for the recursion and the self-intersection guard
#[derive(Clone, Copy, Debug)]
pub struct TraceSettings {
    /// Reflection bounces allowed after the primary ray
    pub max_depth: u32,
    /// Minimum hit distance, also used to offset secondary ray origins
    pub epsilon: f32,
}

impl Default for TraceSettings {
    fn default() -> Self {
        Self {
            max_depth: 3,
            epsilon: 0.001,
        }
    }
}

/// How a single shading evaluation ended
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
    /// Recursion limit reached before testing any geometry
    Exhausted,
    /// Nothing was hit, background color
    Miss,
    /// Something was hit but the light is blocked
    Shadowed,
    /// Something was hit and the light reaches it
    Lit,
}

/// The direct part of one shading evaluation, before reflections are added
#[derive(Clone, Copy, Debug)]
pub struct Shade {
    pub outcome: Outcome,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl Shade {
    fn background(outcome: Outcome) -> Self {
        Self {
            outcome,
            diffuse: Vec3::zero(),
            specular: Vec3::zero(),
        }
    }
}

/// Evaluates the color seen along rays through a scene lit by one light.
///
/// Holds only shared references, so one tracer can be used from any number
/// of threads for the duration of a render pass.
#[derive(Clone, Copy, Debug)]
pub struct Tracer<'a> {
    scene: &'a Scene,
    light: &'a Light,
    settings: TraceSettings,
}

impl<'a> Tracer<'a> {
    pub fn new(scene: &'a Scene, light: &'a Light, settings: TraceSettings) -> Self {
        Self {
            scene,
            light,
            settings,
        }
    }

    /// Computes the color along `ray`. `evaluations` is incremented once per
    /// shading evaluation that tests geometry, the primary one included.
    pub fn trace(&self, ray: Ray, depth: u32, evaluations: &mut u32) -> Vec3 {
        if depth > self.settings.max_depth {
            return Vec3::zero();
        }

        *evaluations += 1;

        let (instance, hit) = match self.scene.intersection(ray, self.settings.epsilon) {
            Some(found) => found,
            None => return Vec3::zero(),
        };

        let point = ray.point_at_parameter(hit.t);
        let shade = self.direct(ray, point, hit.normal, instance.material.color);
        let mut color = shade.diffuse + shade.specular;

        let material = instance.material;
        if material.is_reflective() {
            let reflected = Ray::new(
                point + hit.normal * self.settings.epsilon,
                reflect(ray.direction, hit.normal),
            );
            color += material.reflectivity * self.trace(reflected, depth + 1, evaluations);
        }

        color
    }

    /// Direct lighting only, with the outcome exposed so callers can tell a
    /// miss from a fully shadowed hit.
    pub fn shade(&self, ray: Ray, depth: u32) -> Shade {
        if depth > self.settings.max_depth {
            return Shade::background(Outcome::Exhausted);
        }

        match self.scene.intersection(ray, self.settings.epsilon) {
            Some((instance, hit)) => {
                let point = ray.point_at_parameter(hit.t);
                self.direct(ray, point, hit.normal, instance.material.color)
            }
            None => Shade::background(Outcome::Miss),
        }
    }

    fn direct(&self, ray: Ray, point: Vec3, normal: Vec3, albedo: Vec3) -> Shade {
        let to_light = self.light.position - point;
        let distance = to_light.length();
        let light_dir = to_light.normalize();

        let shadow_ray = Ray::new(point + normal * self.settings.epsilon, light_dir);
        if self
            .scene
            .occluded(shadow_ray, self.settings.epsilon, distance)
        {
            return Shade::background(Outcome::Shadowed);
        }

        let diffuse = f32::max(normal.dot(light_dir), 0.0) * albedo * self.light.color;

        let view_dir = (-ray.direction).normalize();
        let reflect_dir = reflect(-light_dir, normal);
        let spec = f32::max(view_dir.dot(reflect_dir), 0.0).powf(SHININESS);
        let specular = spec * self.light.color;

        Shade {
            outcome: Outcome::Lit,
            diffuse,
            specular,
        }
    }
}
