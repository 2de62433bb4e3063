#[allow(clippy::module_inception)]
pub mod camera;
pub mod look_controller;

pub use camera::{Camera, CameraUniform, OPENGL_TO_WGPU_MATRIX};
pub use look_controller::LookController;
