use std::sync::Arc;

use cgmath::{Matrix4, Vector3, Zero};

use super::object::{ObjectId, SceneObject};
use super::skybox::Skybox;
use crate::assets::{ImageData, TextureId};

/// The room: every object lives in one group whose world position is the
/// accumulated locomotion offset.
#[derive(Debug, Clone)]
pub struct Scene {
    objects: Vec<SceneObject>,
    /// World position of the room group
    pub room_position: Vector3<f32>,
    /// Cube-map drawn behind the room; the clear color shows without one
    pub background: Option<Skybox>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            room_position: Vector3::zero(),
            background: None,
        }
    }

    /// Adds an object to the room and returns its id
    pub fn insert(&mut self, mut object: SceneObject) -> ObjectId {
        let id = ObjectId(self.objects.len());
        object.assign_id(id);
        log::debug!("Scene: added {} as {:?}", object.name, id);
        self.objects.push(object);
        id
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.0)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(id.0)
    }

    /// First object with the given name
    pub fn find(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|object| object.name == name)
    }

    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn room_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.room_position)
    }

    /// Room matrix composed with the object's local transform
    pub fn world_matrix(&self, object: &SceneObject) -> Matrix4<f32> {
        self.room_matrix() * object.transform.matrix()
    }

    /// Recomputes the world box of every object that carries one
    pub fn refresh_bounding_boxes(&mut self) {
        let room = self.room_matrix();
        for object in &mut self.objects {
            if object.bounding_box.is_some() {
                let world = room * object.transform.matrix();
                object.bounding_box = Some(object.local_bounds().transform(&world));
            }
        }
    }

    /// Applies a finished texture load to every slot and background face
    /// waiting on `id`. Returns the number of slots and faces that changed.
    pub fn resolve_texture(&mut self, id: TextureId, image: Option<Arc<ImageData>>) -> usize {
        let mut resolved = 0;
        if let Some(background) = self.background.as_mut() {
            if background.resolve_texture(id, image.clone()) {
                resolved += 1;
            }
        }
        for object in &mut self.objects {
            for slot in &mut object.materials {
                if slot.resolve_texture(id, image.clone()) {
                    resolved += 1;
                }
            }
        }
        resolved
    }
}
