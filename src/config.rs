//! TOML scene and renderer configuration.
//!
//! Every field has a default, an empty file renders the stock room with two
//! spheres.

use crate::{
    camera::{has_basis, Camera},
    material::Material,
    primitives::{Instance, Sphere, Wall},
    scene::{Light, Scene},
    tracer::TraceSettings,
};
use anyhow::{bail, ensure, Context};
use glam::Vec3;
use log::info;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Anything deeper than this is almost certainly a typo
const MAX_DEPTH_LIMIT: u32 = 64;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub width: u32,
    pub height: u32,
    /// Worker count per pass, 0 uses the hardware concurrency
    pub threads: usize,
    pub max_depth: u32,
    pub epsilon: f32,
    pub output: PathBuf,
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub objects: Vec<ObjectConfig>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub direction: [f32; 3],
    pub roll: f32,
    pub fov: f32,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ObjectConfig {
    Sphere {
        center: [f32; 3],
        radius: f32,
        color: [f32; 3],
        #[serde(default)]
        reflectivity: f32,
    },
    Wall {
        point: [f32; 3],
        normal: [f32; 3],
        right: [f32; 3],
        width: f32,
        height: f32,
        color: [f32; 3],
        #[serde(default)]
        reflectivity: f32,
    },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            threads: 0,
            max_depth: 3,
            epsilon: 0.001,
            output: PathBuf::from("output.png"),
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            objects: default_objects(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            direction: [0.0, 0.0, -1.0],
            roll: 0.0,
            fov: 90.0,
        }
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: [5.0, 1.0, 0.0],
            color: [1.0, 1.0, 1.0],
        }
    }
}

// Two spheres standing in the corner of a room
fn default_objects() -> Vec<ObjectConfig> {
    let sphere = |center, color| ObjectConfig::Sphere {
        center,
        radius: 1.0,
        color,
        reflectivity: 0.2,
    };
    let wall = |point, normal, right, color, reflectivity| ObjectConfig::Wall {
        point,
        normal,
        right,
        width: 20.0,
        height: 20.0,
        color,
        reflectivity,
    };

    vec![
        sphere([-1.0, -1.0, -4.0], [1.0, 0.0, 0.0]),
        sphere([1.0, -1.0, -4.0], [0.0, 0.0, 1.0]),
        // Floor
        wall([0.0, -2.0, -3.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.5, 0.3, 0.1], 0.1),
        // Left
        wall([-2.0, 0.0, -3.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0, 1.0], 0.01),
        // Back
        wall([0.0, 0.0, -5.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [1.0, 1.0, 1.0], 0.01),
    ]
}

fn check_color(what: &str, color: [f32; 3]) -> anyhow::Result<()> {
    ensure!(
        color.iter().all(|c| (0.0..=1.0).contains(c)),
        "{} color {:?} must be within [0, 1]",
        what,
        color
    );
    Ok(())
}

fn check_vector(what: &str, v: [f32; 3]) -> anyhow::Result<()> {
    ensure!(
        Vec3::from(v).length() > 0.0,
        "{} must not be a zero vector",
        what
    );
    Ok(())
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config = Self::parse(&text).with_context(|| format!("Invalid config {:?}", path))?;

        info!(
            "Loaded config {:?}: {}x{}, {} objects",
            path,
            config.width,
            config.height,
            config.objects.len()
        );
        Ok(config)
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the renderer would silently misbehave on
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.epsilon > 0.0, "epsilon must be positive, got {}", self.epsilon);
        ensure!(
            self.max_depth <= MAX_DEPTH_LIMIT,
            "max_depth {} exceeds {}",
            self.max_depth,
            MAX_DEPTH_LIMIT
        );
        ensure!(
            self.camera.fov > 0.0 && self.camera.fov < 180.0,
            "camera fov {} must be within (0, 180)",
            self.camera.fov
        );
        ensure!(
            has_basis(Vec3::from(self.camera.direction)),
            "camera direction {:?} must be non-zero and not parallel to the up axis",
            self.camera.direction
        );
        check_color("light", self.light.color)?;

        for (i, object) in self.objects.iter().enumerate() {
            let what = format!("object {}", i);
            match object {
                ObjectConfig::Sphere {
                    radius,
                    color,
                    reflectivity,
                    ..
                } => {
                    ensure!(*radius > 0.0, "{}: radius must be positive", what);
                    check_color(&what, *color)?;
                    check_reflectivity(&what, *reflectivity)?;
                }
                ObjectConfig::Wall {
                    normal,
                    right,
                    width,
                    height,
                    color,
                    reflectivity,
                    ..
                } => {
                    ensure!(
                        *width > 0.0 && *height > 0.0,
                        "{}: width and height must be positive",
                        what
                    );
                    check_vector(&format!("{} normal", what), *normal)?;
                    let n = Vec3::from(*normal).normalize();
                    let r = Vec3::from(*right);
                    if (r - r.dot(n) * n).length() <= f32::EPSILON {
                        bail!("{}: right must not be parallel to the normal", what);
                    }
                    check_color(&what, *color)?;
                    check_reflectivity(&what, *reflectivity)?;
                }
            }
        }

        Ok(())
    }

    pub fn scene(&self) -> Scene {
        Scene::new(self.objects.iter().map(ObjectConfig::instance).collect())
    }

    pub fn light(&self) -> Light {
        Light::new(
            Vec3::from(self.light.position),
            Vec3::from(self.light.color),
        )
    }

    pub fn camera(&self) -> Camera {
        Camera::new(
            Vec3::from(self.camera.position),
            Vec3::from(self.camera.direction),
            self.camera.roll,
            self.camera.fov,
        )
    }

    pub fn settings(&self) -> TraceSettings {
        TraceSettings {
            max_depth: self.max_depth,
            epsilon: self.epsilon,
        }
    }
}

fn check_reflectivity(what: &str, reflectivity: f32) -> anyhow::Result<()> {
    ensure!(
        (0.0..=1.0).contains(&reflectivity),
        "{}: reflectivity {} must be within [0, 1]",
        what,
        reflectivity
    );
    Ok(())
}

impl ObjectConfig {
    pub fn instance(&self) -> Instance {
        match *self {
            ObjectConfig::Sphere {
                center,
                radius,
                color,
                reflectivity,
            } => Instance::new(
                Sphere::new(Vec3::from(center), radius),
                Material::new(Vec3::from(color), reflectivity),
            ),
            ObjectConfig::Wall {
                point,
                normal,
                right,
                width,
                height,
                color,
                reflectivity,
            } => Instance::new(
                Wall::new(
                    Vec3::from(point),
                    Vec3::from(normal),
                    Vec3::from(right),
                    width,
                    height,
                ),
                Material::new(Vec3::from(color), reflectivity),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_the_default_room() {
        let config = Config::parse("").unwrap();

        assert_eq!(config.width, 1200);
        assert_eq!(config.height, 800);
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.objects.len(), 5);
        assert_eq!(config.scene().len(), 5);
        assert_eq!(config.light().position, Vec3::from([5.0, 1.0, 0.0]));
        assert_eq!(config.camera().fov, 90.0);
    }

    #[test]
    fn parses_objects_and_overrides() {
        let text = r#"
            width = 320
            height = 200
            threads = 2
            epsilon = 0.01

            [camera]
            position = [0.0, 1.0, 2.0]
            fov = 60.0

            [[objects]]
            kind = "sphere"
            center = [0.0, 0.0, -4.0]
            radius = 1.5
            color = [1.0, 0.0, 0.0]
            reflectivity = 0.5

            [[objects]]
            kind = "wall"
            point = [0.0, -2.0, 0.0]
            normal = [0.0, 1.0, 0.0]
            right = [1.0, 0.0, 0.0]
            width = 10.0
            height = 10.0
            color = [0.5, 0.5, 0.5]
        "#;
        let config = Config::parse(text).unwrap();

        assert_eq!(config.width, 320);
        assert_eq!(config.threads, 2);
        assert_eq!(config.settings().epsilon, 0.01);
        assert_eq!(config.camera.direction, [0.0, 0.0, -1.0]);
        assert_eq!(config.camera().position, Vec3::from([0.0, 1.0, 2.0]));

        let scene = config.scene();
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.instances()[0].material.reflectivity, 0.5);
        assert_eq!(scene.instances()[1].material.reflectivity, 0.0);
    }

    #[test]
    fn rejects_bad_values() {
        let bad = [
            "epsilon = 0.0",
            "max_depth = 1000",
            "[camera]\nfov = 180.0",
            "[camera]\ndirection = [0.0, 1.0, 0.0]",
            "[camera]\ndirection = [0.0, -2.0, 0.0]",
            "[camera]\ndirection = [0.0, 0.0, 0.0]",
            "[light]\ncolor = [2.0, 1.0, 1.0]",
            concat!(
                "[[objects]]\n",
                "kind = \"sphere\"\n",
                "center = [0.0, 0.0, 0.0]\n",
                "radius = -1.0\n",
                "color = [1.0, 1.0, 1.0]",
            ),
            concat!(
                "[[objects]]\n",
                "kind = \"sphere\"\n",
                "center = [0.0, 0.0, 0.0]\n",
                "radius = 1.0\n",
                "color = [1.0, 1.0, 1.0]\n",
                "reflectivity = 1.5",
            ),
            concat!(
                "[[objects]]\n",
                "kind = \"wall\"\n",
                "point = [0.0, 0.0, 0.0]\n",
                "normal = [0.0, 1.0, 0.0]\n",
                "right = [0.0, 2.0, 0.0]\n",
                "width = 1.0\n",
                "height = 1.0\n",
                "color = [1.0, 1.0, 1.0]",
            ),
            concat!(
                "[[objects]]\n",
                "kind = \"wall\"\n",
                "point = [0.0, 0.0, 0.0]\n",
                "normal = [0.0, 1.0, 0.0]\n",
                "right = [1.0, 0.0, 0.0]\n",
                "width = 0.0\n",
                "height = 1.0\n",
                "color = [1.0, 1.0, 1.0]",
            ),
            "[[objects]]\nkind = \"cube\"",
        ];

        for text in &bad {
            assert!(Config::parse(text).is_err(), "accepted {:?}", text);
        }
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Config::load(Path::new("/definitely/not/here.toml")).is_err());
    }
}
