//! # Asset Loading
//!
//! Images and models are decoded on worker threads. Each worker sends one
//! [`AssetEvent`] back over a `futures` channel; the frame thread applies the
//! events between frames with [`AssetLoader::drain`], so the scene is never
//! touched from another thread.
//!
//! A failed load is logged at `warn` and leaves the affected slot in its
//! neutral color. A load that never finishes leaves it neutral as well.

pub mod image_data;
pub mod obj;
pub mod video;

pub use image_data::{ImageData, MAX_TEXTURE_DIMENSION};
pub use obj::{load_obj, LoadedModel};
pub use video::{FrameSequence, VideoFrame, VideoRegistry, VideoSource};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures::{FutureExt, StreamExt};

use crate::composer::ModelPlacement;
use crate::error::Result;
use crate::gfx::scene::{Scene, SceneObject};

/// Identity of one texture load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u64);

/// A finished background load
#[derive(Debug)]
pub enum AssetEvent {
    Texture {
        id: TextureId,
        path: PathBuf,
        result: Result<ImageData>,
    },
    Model {
        placement: ModelPlacement,
        result: Result<LoadedModel>,
    },
}

/// Starts background loads and applies their results to the scene
pub struct AssetLoader {
    root: PathBuf,
    sender: UnboundedSender<AssetEvent>,
    receiver: UnboundedReceiver<AssetEvent>,
    next_texture: u64,
    in_flight: usize,
}

impl AssetLoader {
    /// Loader resolving relative asset paths against `root`
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            root: root.into(),
            sender,
            receiver,
            next_texture: 0,
            in_flight: 0,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a content path such as `./content/j/j1.jpeg` under the asset root
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches("./"))
    }

    /// Loads still running or waiting to be drained
    pub fn pending(&self) -> usize {
        self.in_flight
    }

    /// Starts decoding an image and returns the id its slots wait on
    pub fn load_texture(&mut self, path: &str) -> TextureId {
        let id = TextureId(self.next_texture);
        self.next_texture += 1;

        let path = self.resolve(path);
        let worker_path = path.clone();
        self.spawn(
            format!("texture-{}", id.0),
            move || AssetEvent::Texture {
                id,
                result: ImageData::from_file(&worker_path),
                path: worker_path,
            },
            AssetEvent::Texture {
                id,
                path,
                result: Err(thread_error()),
            },
        );
        id
    }

    /// Starts loading a model; it joins the room when the load completes
    pub fn load_model(&mut self, placement: ModelPlacement) {
        let path = self.resolve(&placement.path);
        let worker_placement = placement.clone();
        self.spawn(
            format!("model-{}", placement.name),
            move || AssetEvent::Model {
                result: load_obj(&path),
                placement: worker_placement,
            },
            AssetEvent::Model {
                placement,
                result: Err(thread_error()),
            },
        );
    }

    fn spawn<F>(&mut self, name: String, job: F, on_spawn_error: AssetEvent)
    where
        F: FnOnce() -> AssetEvent + Send + 'static,
    {
        let sender = self.sender.clone();
        self.in_flight += 1;
        let spawned = thread::Builder::new().name(name.clone()).spawn(move || {
            // The receiver only goes away with the loader
            let _ = sender.unbounded_send(job());
        });

        if let Err(err) = spawned {
            log::warn!("Could not start loader thread {}: {}", name, err);
            let _ = self.sender.unbounded_send(on_spawn_error);
        }
    }

    /// Applies every finished load without blocking. Returns how many were applied.
    pub fn drain(&mut self, scene: &mut Scene) -> usize {
        let mut applied = 0;
        while let Some(Some(event)) = self.receiver.next().now_or_never() {
            self.apply(event, scene);
            applied += 1;
        }
        applied
    }

    /// Blocks until every started load has been applied
    pub fn finish(&mut self, scene: &mut Scene) {
        while self.in_flight > 0 {
            match futures::executor::block_on(self.receiver.next()) {
                Some(event) => self.apply(event, scene),
                None => break,
            }
        }
    }

    fn apply(&mut self, event: AssetEvent, scene: &mut Scene) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match event {
            AssetEvent::Texture { id, path, result } => {
                let image = match result {
                    Ok(image) => Some(Arc::new(image)),
                    Err(err) => {
                        log::warn!("Texture {:?} failed to load: {}", path, err);
                        None
                    }
                };
                let slots = scene.resolve_texture(id, image);
                log::debug!("Texture {:?} applied to {} slots", path, slots);
            }
            AssetEvent::Model { placement, result } => match result {
                Ok(model) => {
                    let object = SceneObject::model(
                        &placement.name,
                        placement.transform(),
                        Arc::new(model.geometry),
                        model.color,
                    );
                    scene.insert(object);
                }
                Err(err) => {
                    log::warn!("Model {} failed to load: {}", placement.name, err);
                }
            },
        }
    }
}

fn thread_error() -> crate::error::KeepsakeError {
    std::io::Error::other("loader thread could not be started").into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::{MaterialSlot, Surface, TextureState};
    use crate::gfx::transform::Transform;
    use cgmath::Vector3;
    use image::{Rgba, RgbaImage};
    use std::fs;

    fn temp_root(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("keepsake-assets-{}-{}", tag, std::process::id()));
        fs::create_dir_all(dir.join("content")).expect("temp dir");
        dir
    }

    fn panel_with(scene: &mut Scene, slot: MaterialSlot) -> crate::gfx::scene::ObjectId {
        let mut slots = vec![MaterialSlot::neutral(); 6];
        slots[4] = slot;
        scene.insert(SceneObject::panel(
            "panel",
            Transform::default(),
            Vector3::new(1.0, 1.0, 0.02),
            slots,
        ))
    }

    #[test]
    fn test_resolve_strips_dot_slash() {
        let loader = AssetLoader::new("dist");
        assert_eq!(
            loader.resolve("./content/j/j1.jpeg"),
            PathBuf::from("dist/content/j/j1.jpeg")
        );
    }

    #[test]
    fn test_texture_load_reaches_slot() {
        let root = temp_root("ok");
        RgbaImage::from_pixel(2, 2, Rgba([0, 0, 255, 255]))
            .save(root.join("content/ok.png"))
            .expect("write png");

        let mut scene = Scene::new();
        let mut loader = AssetLoader::new(&root);
        let id = loader.load_texture("./content/ok.png");
        let panel = panel_with(&mut scene, MaterialSlot::textured(id));

        loader.finish(&mut scene);

        assert_eq!(loader.pending(), 0);
        let slot = &scene.get(panel).expect("panel").materials[4];
        assert!(matches!(slot.surface, Surface::Texture(TextureState::Ready(..))));
    }

    #[test]
    fn test_failed_texture_leaves_slot_neutral() {
        let root = temp_root("fail");
        let mut scene = Scene::new();
        let mut loader = AssetLoader::new(&root);
        let id = loader.load_texture("./content/missing.jpeg");
        let panel = panel_with(&mut scene, MaterialSlot::textured(id));

        loader.finish(&mut scene);

        let slot = &scene.get(panel).expect("panel").materials[4];
        assert!(matches!(slot.surface, Surface::Texture(TextureState::Failed(_))));
        assert_eq!(slot.effective_color(), MaterialSlot::neutral().color);
    }

    #[test]
    fn test_model_joins_room_on_completion() {
        let root = temp_root("model");
        fs::create_dir_all(root.join("models")).expect("models dir");
        fs::write(
            root.join("models/dog.obj"),
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
        )
        .expect("write obj");

        let mut scene = Scene::new();
        let mut loader = AssetLoader::new(&root);
        loader.load_model(ModelPlacement {
            name: "dog".into(),
            path: "models/dog.obj".into(),
            position: [4.0, 0.25, 5.0],
            rotation_y: 0.0,
            scale: 0.0005,
        });
        assert!(scene.is_empty());

        loader.finish(&mut scene);

        let dog = scene.find("dog").expect("dog placed");
        assert!(!dog.is_draggable);
        assert_eq!(dog.transform.position, Vector3::new(4.0, 0.25, 5.0));
    }

    #[test]
    fn test_drain_without_loads_is_noop() {
        let mut scene = Scene::new();
        let mut loader = AssetLoader::new("dist");
        assert_eq!(loader.drain(&mut scene), 0);
    }
}
