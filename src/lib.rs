//! A small Whitted-style ray tracer.
//!
//! Spheres and bounded walls are shaded with Phong lighting, hard shadows and
//! a bounded chain of mirror reflections. Frames are rendered in parallel row
//! bands into a byte packed RGB buffer.

pub mod camera;
pub mod cli;
pub mod config;
pub mod controls;
pub mod framebuffer;
pub mod logger;
pub mod material;
pub mod primitives;
pub mod ray;
pub mod render;
pub mod scene;
pub mod tracer;

pub use primitives::Intersect;
pub use ray::{Hit, Ray};
