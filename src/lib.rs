// src/lib.rs
//! Keepsake
//!
//! A small immersive photo room built on wgpu and winit: a composed scene of
//! draggable photo and video panels, an ambient sound emitter and decorative
//! models, driven by a single controller that highlights, grabs and releases
//! panels. A static host serves the built page.

pub mod app;
pub mod assets;
pub mod audio;
pub mod composer;
pub mod config;
pub mod driver;
pub mod error;
pub mod gfx;
pub mod interaction;
pub mod prelude;
#[cfg(feature = "server")]
pub mod server;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::KeepsakeApp;
pub use config::AppConfig;
pub use driver::RenderDriver;
pub use error::{KeepsakeError, Result};
