//! Live video sources
//!
//! Panels whose content names a video pull frames from a registered
//! [`VideoSource`] every time they are drawn. The renderer re-uploads only
//! when the frame index changes.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use super::ImageData;
use crate::error::Result;
use crate::gfx::scene::VideoHandle;

/// One decoded frame of a video source
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Monotonic frame counter
    pub index: u64,
    pub image: Arc<ImageData>,
}

/// A named source of video frames
pub trait VideoSource: Send + Sync {
    fn name(&self) -> &str;

    /// Frame to show right now, if any
    fn current_frame(&self) -> Option<VideoFrame>;
}

/// Looping sequence of still frames played at a fixed rate
pub struct FrameSequence {
    name: String,
    frames: Vec<Arc<ImageData>>,
    fps: f32,
    started: Instant,
}

impl FrameSequence {
    pub fn new(name: &str, frames: Vec<ImageData>, fps: f32) -> Self {
        Self {
            name: name.to_string(),
            frames: frames.into_iter().map(Arc::new).collect(),
            fps: fps.max(0.0),
            started: Instant::now(),
        }
    }

    /// Loads every PNG or JPEG in `dir`, ordered by file name
    pub fn from_dir<P: AsRef<Path>>(name: &str, dir: P, fps: f32) -> Result<Self> {
        let mut paths: Vec<_> = fs::read_dir(dir.as_ref())?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg"))
            })
            .collect();
        paths.sort();

        let frames = paths
            .iter()
            .map(ImageData::from_file)
            .collect::<Result<Vec<_>>>()?;

        log::info!("Video {}: {} frames at {} fps", name, frames.len(), fps);
        Ok(Self::new(name, frames, fps))
    }

    /// Frame shown `seconds` after the sequence started
    pub fn frame_at(&self, seconds: f32) -> Option<VideoFrame> {
        if self.frames.is_empty() {
            return None;
        }
        let index = (seconds.max(0.0) * self.fps) as u64;
        let slot = (index % self.frames.len() as u64) as usize;
        Some(VideoFrame {
            index,
            image: self.frames[slot].clone(),
        })
    }
}

impl VideoSource for FrameSequence {
    fn name(&self) -> &str {
        &self.name
    }

    fn current_frame(&self) -> Option<VideoFrame> {
        self.frame_at(self.started.elapsed().as_secs_f32())
    }
}

/// Video sources by name
#[derive(Default, Clone)]
pub struct VideoRegistry {
    sources: HashMap<String, Arc<dyn VideoSource>>,
}

impl VideoRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, source: Arc<dyn VideoSource>) {
        self.sources.insert(source.name().to_string(), source);
    }

    pub fn handle(&self, name: &str) -> Option<VideoHandle> {
        self.sources.get(name).cloned().map(VideoHandle)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
