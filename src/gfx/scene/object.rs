use std::sync::Arc;

use cgmath::Vector3;

use super::material::{hex_to_rgb, MaterialSlot, COLOR_EMISSIVE_NONE, COLOR_HIGHLIGHT};
use crate::gfx::{geometry::GeometryData, picking::Aabb, transform::Transform};

/// Uniform scale applied while grabbing an object that has no grab scale
pub const DEFAULT_GRAB_SCALE: f32 = 0.25;

/// Stable identity of a scene object, assigned in insertion order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub usize);

/// Positional audio settings of a sound emitter
#[derive(Debug, Clone, PartialEq)]
pub struct SoundSettings {
    pub source: String,
    pub ref_distance: f32,
    pub rolloff_factor: f32,
    pub looping: bool,
}

/// What kind of thing an object is
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    /// Photo or video panel on a wall
    Panel,
    /// Model loaded from disk (room shell, decorations)
    Model,
    /// Small marker sphere that plays the ambient track
    SoundEmitter(SoundSettings),
}

/// Shape drawn for an object
#[derive(Debug, Clone)]
pub enum Geometry {
    /// Box with the given full extents, centered at the origin
    Box { size: Vector3<f32> },
    Sphere { radius: f32 },
    Mesh(Arc<GeometryData>),
}

impl Geometry {
    /// Local-space bounds
    pub fn bounds(&self) -> Aabb {
        match self {
            Geometry::Box { size } => Aabb::centered(*size),
            Geometry::Sphere { radius } => Aabb::centered(Vector3::new(2.0, 2.0, 2.0) * *radius),
            Geometry::Mesh(data) => Aabb::from_points(&data.vertices),
        }
    }
}

/// A positioned, rotated and scaled element of the room
#[derive(Debug, Clone)]
pub struct SceneObject {
    id: ObjectId,
    pub name: String,
    pub kind: ObjectKind,
    pub transform: Transform,
    /// Transform recorded at composition, restored on release
    pub initial_transform: Transform,
    pub geometry: Geometry,
    local_bounds: Aabb,
    /// World-space box, refreshed every frame for objects that carry one
    pub bounding_box: Option<Aabb>,
    pub is_draggable: bool,
    pub grab_scale: Option<f32>,
    pub materials: Vec<MaterialSlot>,
    material_revision: u64,
}

impl SceneObject {
    fn new(name: &str, kind: ObjectKind, transform: Transform, geometry: Geometry) -> Self {
        let local_bounds = geometry.bounds();
        Self {
            id: ObjectId(usize::MAX),
            name: name.to_string(),
            kind,
            transform,
            initial_transform: transform,
            geometry,
            local_bounds,
            bounding_box: None,
            is_draggable: false,
            grab_scale: None,
            materials: Vec::new(),
            material_revision: 0,
        }
    }

    /// Draggable box panel with a bounding box and grab scale `0.5 / size.x`
    pub fn panel(
        name: &str,
        transform: Transform,
        size: Vector3<f32>,
        materials: Vec<MaterialSlot>,
    ) -> Self {
        let mut object = Self::new(name, ObjectKind::Panel, transform, Geometry::Box { size });
        object.bounding_box = Some(object.local_bounds.transform(&transform.matrix()));
        object.is_draggable = true;
        object.grab_scale = (size.x != 0.0).then(|| 0.5 / size.x);
        object.materials = materials;
        object
    }

    pub fn model(name: &str, transform: Transform, mesh: Arc<GeometryData>, color: [f32; 3]) -> Self {
        let mut object = Self::new(name, ObjectKind::Model, transform, Geometry::Mesh(mesh));
        let mut slot = MaterialSlot::neutral();
        slot.color = color;
        object.materials = vec![slot];
        object
    }

    pub fn sound_emitter(
        name: &str,
        position: Vector3<f32>,
        radius: f32,
        color: u32,
        sound: SoundSettings,
    ) -> Self {
        let transform = Transform {
            position,
            ..Default::default()
        };
        let mut object = Self::new(
            name,
            ObjectKind::SoundEmitter(sound),
            transform,
            Geometry::Sphere { radius },
        );
        object.materials = vec![MaterialSlot::colored(color)];
        object
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: ObjectId) {
        self.id = id;
    }

    pub fn local_bounds(&self) -> Aabb {
        self.local_bounds
    }

    /// Grab scale, or [`DEFAULT_GRAB_SCALE`] when unset
    pub fn effective_grab_scale(&self) -> f32 {
        self.grab_scale.unwrap_or(DEFAULT_GRAB_SCALE)
    }

    /// Sets the emissive color on every slot and bumps the material revision
    pub fn set_emissive(&mut self, hex: u32) {
        let rgb = hex_to_rgb(hex);
        for slot in &mut self.materials {
            slot.emissive = rgb;
        }
        self.material_revision += 1;
    }

    pub fn highlight(&mut self) {
        self.set_emissive(COLOR_HIGHLIGHT);
    }

    pub fn clear_highlight(&mut self) {
        self.set_emissive(COLOR_EMISSIVE_NONE);
    }

    pub fn is_highlighted(&self) -> bool {
        let highlight = hex_to_rgb(COLOR_HIGHLIGHT);
        !self.materials.is_empty() && self.materials.iter().all(|slot| slot.emissive == highlight)
    }

    /// Number of emissive writes so far
    pub fn material_revision(&self) -> u64 {
        self.material_revision
    }

    /// Restores the composition-time transform
    pub fn reset_transform(&mut self) {
        self.transform = self.initial_transform;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots() -> Vec<MaterialSlot> {
        vec![MaterialSlot::neutral(); 6]
    }

    #[test]
    fn test_panel_defaults() {
        let panel = SceneObject::panel(
            "j1",
            Transform::default(),
            Vector3::new(2.5, 2.5, 0.02),
            slots(),
        );
        assert!(panel.is_draggable);
        assert_eq!(panel.grab_scale, Some(0.2));
        assert!(panel.bounding_box.is_some());
        assert_eq!(panel.local_bounds().max, Vector3::new(1.25, 1.25, 0.01));
    }

    #[test]
    fn test_grab_scale_defaults_when_unset() {
        let mut panel = SceneObject::panel("j1", Transform::default(), Vector3::new(1.0, 1.0, 0.02), slots());
        panel.grab_scale = None;
        assert_eq!(panel.effective_grab_scale(), DEFAULT_GRAB_SCALE);
    }

    #[test]
    fn test_highlight_sets_every_slot() {
        let mut panel = SceneObject::panel("j1", Transform::default(), Vector3::new(1.0, 1.0, 0.02), slots());
        panel.highlight();
        assert!(panel.is_highlighted());
        assert!(panel.materials.iter().all(|s| s.emissive == [0.0, 0.0, 1.0]));

        panel.clear_highlight();
        assert!(!panel.is_highlighted());
        assert_eq!(panel.material_revision(), 2);
    }

    #[test]
    fn test_emitter_is_not_draggable() {
        let emitter = SceneObject::sound_emitter(
            "music",
            Vector3::new(3.8, 0.3, 5.4),
            0.05,
            0xff2200,
            SoundSettings {
                source: "finale.mp3".into(),
                ref_distance: 5.0,
                rolloff_factor: 2.0,
                looping: true,
            },
        );
        assert!(!emitter.is_draggable);
        assert!(emitter.bounding_box.is_none());
    }
}
