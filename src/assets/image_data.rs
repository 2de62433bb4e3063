//! Decoded RGBA images for texture upload

use std::path::Path;

use image::imageops::FilterType;

use crate::error::Result;

/// Largest texture edge the loader keeps; larger photos are scaled down
pub const MAX_TEXTURE_DIMENSION: u32 = 4096;

/// RGBA8 pixels ready for GPU upload
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl ImageData {
    /// Decodes an image file, scaling it to fit [`MAX_TEXTURE_DIMENSION`]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading image from {:?}", path);

        let image = image::open(path)?;
        let image = if image.width() > MAX_TEXTURE_DIMENSION || image.height() > MAX_TEXTURE_DIMENSION {
            image.resize(MAX_TEXTURE_DIMENSION, MAX_TEXTURE_DIMENSION, FilterType::Triangle)
        } else {
            image
        };

        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::info!("Loaded image {}x{} from {:?}", width, height, path);

        Ok(Self {
            data: rgba.into_raw(),
            width,
            height,
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            data: rgba.into_raw(),
            width,
            height,
        })
    }

    /// Solid fill, used for defaults and tests
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = (width * height) as usize;
        Self {
            data: color.repeat(pixel_count),
            width,
            height,
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}
