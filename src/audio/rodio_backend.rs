//! Rodio playback for the ambient track

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use super::AudioBackend;
use crate::error::{KeepsakeError, Result};

/// Single-sink rodio backend
pub struct RodioAmbience {
    // Output stops when the stream is dropped
    _output_stream: OutputStream,
    stream_handle: OutputStreamHandle,
    sink: Option<Sink>,
}

impl RodioAmbience {
    /// Opens the default output device
    pub fn new() -> Result<Self> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| KeepsakeError::Audio(format!("Failed to create audio output: {}", e)))?;
        log::info!("Rodio audio output opened");
        Ok(Self {
            _output_stream: stream,
            stream_handle,
            sink: None,
        })
    }
}

impl AudioBackend for RodioAmbience {
    fn play(&mut self, path: &Path, looping: bool) -> Result<()> {
        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| KeepsakeError::Audio(format!("Failed to create sink: {}", e)))?;
        let file = File::open(path)?;
        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| KeepsakeError::Audio(format!("Failed to decode {}: {}", path.display(), e)))?;

        if looping {
            sink.append(source.repeat_infinite());
        } else {
            sink.append(source);
        }

        if let Some(previous) = self.sink.replace(sink) {
            previous.stop();
        }
        Ok(())
    }

    fn set_gain(&mut self, gain: f32) {
        if let Some(sink) = &self.sink {
            sink.set_volume(gain.clamp(0.0, 1.0));
        }
    }
}
