//! Error types for the keepsake library
//!
//! Runtime asset failures never reach the user; they surface here only so the
//! loader can log them before leaving the affected object in its default look.

use thiserror::Error;

/// Result type used across the library
pub type Result<T> = std::result::Result<T, KeepsakeError>;

/// Errors raised by the library
#[derive(Error, Debug)]
pub enum KeepsakeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Model load error: {0}")]
    Model(#[from] tobj::LoadError),

    #[error("Model {0} contains no geometry")]
    EmptyModel(String),

    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("Surface error: {0}")]
    Surface(String),

    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Audio error: {0}")]
    Audio(String),
}
