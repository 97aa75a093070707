use crate::{
    camera::{has_basis, Camera},
    scene::Light,
};
use glam::{vec3, Vec3};

pub const POSITION_RANGE: (f32, f32) = (-10.0, 10.0);
pub const DIRECTION_RANGE: (f32, f32) = (-1.0, 1.0);
pub const ROLL_RANGE: (f32, f32) = (-180.0, 180.0);
pub const FOV_RANGE: (f32, f32) = (10.0, 120.0);
pub const COLOR_RANGE: (f32, f32) = (0.0, 1.0);

/// An edit to the camera or light, applied between render passes
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    MoveCamera(Vec3),
    TurnCamera(Vec3),
    Roll(f32),
    Zoom(f32),
    MoveLight(Vec3),
    TintLight(Vec3),
}

fn clamp(value: f32, (min, max): (f32, f32)) -> f32 {
    value.max(min).min(max)
}

fn clamp_vec(v: Vec3, range: (f32, f32)) -> Vec3 {
    vec3(clamp(v.x, range), clamp(v.y, range), clamp(v.z, range))
}

impl Action {
    /// Applies the action, keeping every value inside its slider range
    pub fn apply(self, camera: &mut Camera, light: &mut Light) {
        match self {
            Action::MoveCamera(delta) => {
                camera.position = clamp_vec(camera.position + delta, POSITION_RANGE);
            }
            Action::TurnCamera(delta) => {
                let direction = clamp_vec(camera.direction + delta, DIRECTION_RANGE);
                // Keep the old direction when the new one has no basis
                if has_basis(direction) {
                    camera.direction = direction;
                }
            }
            Action::Roll(delta) => camera.roll = clamp(camera.roll + delta, ROLL_RANGE),
            Action::Zoom(delta) => camera.fov = clamp(camera.fov + delta, FOV_RANGE),
            Action::MoveLight(delta) => {
                light.position = clamp_vec(light.position + delta, POSITION_RANGE);
            }
            Action::TintLight(delta) => {
                light.color = clamp_vec(light.color + delta, COLOR_RANGE);
            }
        }
    }
}
