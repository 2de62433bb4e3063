//! Positional ambient audio
//!
//! The room has a single emitter sphere that plays a looped track. Playback
//! goes through an [`AudioBackend`]; this module only decides how loud the
//! track should be for the current listener position, using the inverse
//! distance model:
//!
//! ```text
//! gain = ref / (ref + rolloff * (max(d, ref) - ref))
//! ```

#[cfg(feature = "audio")]
pub mod rodio_backend;

#[cfg(feature = "audio")]
pub use rodio_backend::RodioAmbience;

use std::path::Path;

use cgmath::{InnerSpace, Vector3, Vector4};

use crate::error::{KeepsakeError, Result};
use crate::gfx::scene::{ObjectId, ObjectKind, Scene, SoundSettings};

/// Playback device for the ambient track
pub trait AudioBackend {
    /// Starts playing the file at `path`
    fn play(&mut self, path: &Path, looping: bool) -> Result<()>;

    /// Sets the output gain, 0.0 to 1.0
    fn set_gain(&mut self, gain: f32);
}

/// Gain of a source `distance` metres away under the inverse distance model
pub fn inverse_distance_gain(distance: f32, ref_distance: f32, rolloff_factor: f32) -> f32 {
    if ref_distance <= 0.0 {
        return 1.0;
    }
    let distance = distance.max(ref_distance);
    ref_distance / (ref_distance + rolloff_factor * (distance - ref_distance))
}

/// Drives a backend from the position of the scene's sound emitter
pub struct PositionalAudio {
    emitter: ObjectId,
    settings: SoundSettings,
    backend: Box<dyn AudioBackend>,
    gain: f32,
}

impl PositionalAudio {
    /// Starts the emitter's track. `root` is the directory asset paths are
    /// relative to.
    pub fn start(
        mut backend: Box<dyn AudioBackend>,
        scene: &Scene,
        emitter: ObjectId,
        root: &Path,
    ) -> Result<Self> {
        let settings = match scene.get(emitter).map(|object| &object.kind) {
            Some(ObjectKind::SoundEmitter(settings)) => settings.clone(),
            _ => {
                return Err(KeepsakeError::Audio(format!(
                    "object {} is not a sound emitter",
                    emitter.0
                )))
            }
        };

        let path = root.join(settings.source.trim_start_matches("./"));
        backend.play(&path, settings.looping)?;
        log::info!("Playing {} from emitter {}", path.display(), emitter.0);

        Ok(Self {
            emitter,
            settings,
            backend,
            gain: 1.0,
        })
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Recomputes the gain for a listener at `listener` (world space) and
    /// hands it to the backend. The emitter moves with the room offset.
    pub fn update_listener(&mut self, scene: &Scene, listener: Vector3<f32>) -> f32 {
        let Some(object) = scene.get(self.emitter) else {
            return self.gain;
        };
        let origin = scene.world_matrix(object) * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let distance = (origin.truncate() - listener).magnitude();

        let gain = inverse_distance_gain(
            distance,
            self.settings.ref_distance,
            self.settings.rolloff_factor,
        );
        if (gain - self.gain).abs() > f32::EPSILON {
            self.gain = gain;
            self.backend.set_gain(gain);
        }
        self.gain
    }
}
