//! Material slots for scene objects
//!
//! Each object carries an ordered list of slots. Box panels use six slots in
//! face order (+X, -X, +Y, -Y, +Z, -Z); everything else uses one.

use std::fmt;
use std::sync::Arc;

use crate::assets::{ImageData, TextureId, VideoSource};

/// Neutral gray used for untextured faces and failed loads
pub const COLOR_DEFAULT: u32 = 0x808080;
/// Emissive color applied while an object is hover-highlighted
pub const COLOR_HIGHLIGHT: u32 = 0x0000ff;
/// Emissive color of an object that is not highlighted
pub const COLOR_EMISSIVE_NONE: u32 = 0x000000;

/// Converts a `0xRRGGBB` color into linear `[r, g, b]` components
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Load state of an image texture
#[derive(Debug, Clone)]
pub enum TextureState {
    /// Decode in flight
    Pending(TextureId),
    Ready(TextureId, Arc<ImageData>),
    /// Load failed; the slot keeps its base color for good
    Failed(TextureId),
}

impl TextureState {
    pub fn id(&self) -> TextureId {
        match self {
            TextureState::Pending(id) | TextureState::Ready(id, _) | TextureState::Failed(id) => *id,
        }
    }
}

/// Handle to a registered live video source
#[derive(Clone)]
pub struct VideoHandle(pub Arc<dyn VideoSource>);

impl fmt::Debug for VideoHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VideoHandle").field(&self.0.name()).finish()
    }
}

/// What a slot shows on top of its base color
#[derive(Debug, Clone)]
pub enum Surface {
    Color,
    Texture(TextureState),
    Video(VideoHandle),
}

/// One material slot: base color, emissive, and an optional texture
#[derive(Debug, Clone)]
pub struct MaterialSlot {
    pub color: [f32; 3],
    pub emissive: [f32; 3],
    pub surface: Surface,
}

impl MaterialSlot {
    /// Neutral gray face
    pub fn neutral() -> Self {
        Self::colored(COLOR_DEFAULT)
    }

    pub fn colored(hex: u32) -> Self {
        Self {
            color: hex_to_rgb(hex),
            emissive: hex_to_rgb(COLOR_EMISSIVE_NONE),
            surface: Surface::Color,
        }
    }

    /// White base so the texture shows unchanged once it arrives.
    /// Until then the slot falls back to the neutral color.
    pub fn textured(id: TextureId) -> Self {
        Self {
            surface: Surface::Texture(TextureState::Pending(id)),
            ..Self::neutral()
        }
    }

    pub fn video(handle: VideoHandle) -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            surface: Surface::Video(handle),
            ..Self::neutral()
        }
    }

    /// Base color to draw with, taking the texture state into account
    pub fn effective_color(&self) -> [f32; 3] {
        match &self.surface {
            Surface::Texture(TextureState::Ready(..)) => [1.0, 1.0, 1.0],
            _ => self.color,
        }
    }

    /// Applies a finished load to this slot if it is waiting for `id`
    pub(crate) fn resolve_texture(&mut self, id: TextureId, image: Option<Arc<ImageData>>) -> bool {
        match &self.surface {
            Surface::Texture(TextureState::Pending(pending)) if *pending == id => {
                self.surface = Surface::Texture(match image {
                    Some(image) => TextureState::Ready(id, image),
                    None => TextureState::Failed(id),
                });
                true
            }
            _ => false,
        }
    }
}
