//! Cube-map background around the room
//!
//! Six face images load like any panel texture. The renderer only switches
//! from its clear color once every face has arrived at one square size.

use std::sync::Arc;

use super::material::TextureState;
use crate::assets::{ImageData, TextureId};

/// Number of cube faces, in +X, -X, +Y, -Y, +Z, -Z order
pub const SKYBOX_FACE_COUNT: usize = 6;

/// Where the background stands
#[derive(Debug, Clone)]
pub enum SkyboxState {
    /// At least one face is still decoding
    Loading,
    /// Every face decoded with the same square size
    Ready(Vec<Arc<ImageData>>),
    /// The cube can never be built; the clear color stays
    Unavailable(&'static str),
}

#[derive(Debug, Clone)]
pub struct Skybox {
    faces: [TextureState; SKYBOX_FACE_COUNT],
}

impl Skybox {
    /// Background waiting on the given face loads
    pub fn pending(ids: [TextureId; SKYBOX_FACE_COUNT]) -> Self {
        Self {
            faces: ids.map(TextureState::Pending),
        }
    }

    pub fn faces(&self) -> &[TextureState; SKYBOX_FACE_COUNT] {
        &self.faces
    }

    /// Applies a finished load to the face waiting for `id`
    pub(crate) fn resolve_texture(&mut self, id: TextureId, image: Option<Arc<ImageData>>) -> bool {
        let Some(face) = self
            .faces
            .iter_mut()
            .find(|face| matches!(face, TextureState::Pending(_)) && face.id() == id)
        else {
            return false;
        };
        *face = match image {
            Some(image) => TextureState::Ready(id, image),
            None => TextureState::Failed(id),
        };
        true
    }

    pub fn state(&self) -> SkyboxState {
        let mut ready = Vec::with_capacity(SKYBOX_FACE_COUNT);
        for face in &self.faces {
            match face {
                TextureState::Ready(_, image) => ready.push(image.clone()),
                TextureState::Failed(_) => return SkyboxState::Unavailable("a face failed to load"),
                TextureState::Pending(_) => return SkyboxState::Loading,
            }
        }

        let (width, height) = (ready[0].width, ready[0].height);
        if width != height || width == 0 {
            return SkyboxState::Unavailable("faces are not square");
        }
        if ready.iter().any(|image| (image.width, image.height) != (width, height)) {
            return SkyboxState::Unavailable("faces differ in size");
        }
        SkyboxState::Ready(ready)
    }
}
