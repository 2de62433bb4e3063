//! # Scene Model
//!
//! The room and everything placed in it.
//!
//! ## Key Components
//!
//! - [`Scene`] - the room group: objects plus the locomotion offset
//! - [`SceneObject`] - a panel, model or sound emitter with transform,
//!   bounds and material slots
//! - [`MaterialSlot`] - base color, emissive and optional texture or video
//! - [`Skybox`] - cube-map background faces and their load state
//! - [`Vertex3D`] - GPU vertex format
//!
//! Objects are inserted once at composition time and never removed, so an
//! [`ObjectId`] stays valid for the whole run.

pub mod material;
pub mod object;
pub mod scene;
pub mod skybox;
pub mod vertex;

pub use material::{
    hex_to_rgb, MaterialSlot, Surface, TextureState, VideoHandle, COLOR_DEFAULT,
    COLOR_EMISSIVE_NONE, COLOR_HIGHLIGHT,
};
pub use object::{Geometry, ObjectId, ObjectKind, SceneObject, SoundSettings, DEFAULT_GRAB_SCALE};
pub use scene::Scene;
pub use skybox::{Skybox, SkyboxState, SKYBOX_FACE_COUNT};
pub use vertex::Vertex3D;
