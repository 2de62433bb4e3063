// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! The [`Renderer`] trait is the seam between the interaction loop and the
//! GPU; [`WgpuRenderer`] is the window-backed implementation.

pub mod render_engine;
pub mod texture_resource;

pub use render_engine::WgpuRenderer;
pub use texture_resource::TextureResource;

use crate::gfx::camera::Camera;
use crate::gfx::scene::Scene;
use crate::interaction::Controller;

/// Draws the scene as seen from the camera
pub trait Renderer {
    /// Issues one frame. Surface failures are logged, not returned.
    fn render(&mut self, scene: &Scene, camera: &Camera, controller: &Controller);

    /// Zero sizes are ignored
    fn resize(&mut self, width: u32, height: u32);
}
