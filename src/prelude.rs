//! # Keepsake Prelude
//!
//! Commonly used types in one import:
//!
//! ```no_run
//! use keepsake::prelude::*;
//!
//! let config = AppConfig::default();
//! let (scene, _loader, composition) = keepsake::app::build_room(&config);
//! assert_eq!(composition.panels.len(), scene.len() - 1);
//! ```

pub use crate::app::KeepsakeApp;
pub use crate::assets::{AssetLoader, FrameSequence, ImageData, VideoRegistry, VideoSource};
pub use crate::composer::{compose_scene, ContentRef, PanelPlacement, SceneLayout};
pub use crate::config::AppConfig;
pub use crate::driver::RenderDriver;
pub use crate::error::{KeepsakeError, Result};
pub use crate::gfx::camera::Camera;
pub use crate::gfx::rendering::{Renderer, WgpuRenderer};
pub use crate::gfx::scene::{ObjectId, ObjectKind, Scene, SceneObject};
pub use crate::gfx::transform::Transform;
pub use crate::interaction::{
    Controller, ControllerEvent, FrameContext, Gamepad, InteractionLoop, InteractionPhase,
    TargetRayMode, VirtualGamepad,
};

pub use cgmath::{InnerSpace, Quaternion, Vector3, Zero};
