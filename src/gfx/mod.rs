//! # Graphics Module
//!
//! Everything the room needs to be drawn and picked:
//!
//! - **Camera** ([`camera`]) - Head pose and projection with right-drag look
//! - **Geometry** ([`geometry`]) - Box, sphere, ring and beam meshes
//! - **Picking** ([`picking`]) - Rays and axis-aligned bounding boxes
//! - **Rendering** ([`rendering`]) - The [`Renderer`] trait and the wgpu implementation
//! - **Scene** ([`scene`]) - Objects, material slots and the room offset
//! - **Transform** ([`transform`]) - Position, rotation and scale of an object
//!
//! [`Renderer`]: rendering::Renderer

pub mod camera;
pub mod geometry;
pub mod picking;
pub mod rendering;
pub mod scene;
pub mod transform;

pub use camera::Camera;
pub use rendering::{Renderer, WgpuRenderer};
pub use scene::Scene;
pub use transform::Transform;
