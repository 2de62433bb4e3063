//! # Scene Composer
//!
//! Builds the room once at startup from a [`SceneLayout`]: one draggable box
//! panel per placement, the sound emitter sphere, and background loads for
//! the models, panel images and skybox faces.
//!
//! Panel faces use six material slots in box-face order. Slots 0 to 3 are
//! neutral gray, slot 4 (+Z) shows the content and slot 5 (-Z) shows the
//! alternate, or neutral gray when there is none.

pub mod layout;

pub use layout::{ContentRef, ModelPlacement, PanelPlacement, SceneLayout, SoundPlacement};

use cgmath::Vector3;

use crate::assets::{AssetLoader, VideoRegistry};
use crate::gfx::geometry::BOX_FACE_COUNT;
use crate::gfx::scene::{MaterialSlot, ObjectId, Scene, SceneObject, Skybox, SoundSettings};

/// Slot showing the panel content
pub const FRONT_SLOT: usize = 4;
/// Slot showing the alternate content
pub const BACK_SLOT: usize = 5;

/// Name given to the sound emitter object
pub const SOUND_EMITTER_NAME: &str = "music";

/// Objects placed synchronously by [`compose_scene`]
#[derive(Debug, Clone, Default)]
pub struct Composition {
    pub panels: Vec<ObjectId>,
    pub sound_emitter: Option<ObjectId>,
}

/// Places everything in `layout` into `scene`. Models join the room later,
/// when the loader delivers them.
pub fn compose_scene(
    layout: &SceneLayout,
    scene: &mut Scene,
    loader: &mut AssetLoader,
    videos: &VideoRegistry,
) -> Composition {
    let panels = layout
        .panels
        .iter()
        .map(|placement| add_panel(placement, scene, loader, videos))
        .collect();

    let sound_emitter = layout
        .sound
        .as_ref()
        .map(|sound| scene.insert(sound_emitter(sound)));

    for model in &layout.models {
        loader.load_model(model.clone());
    }

    if let Some(faces) = &layout.skybox {
        let ids = faces.each_ref().map(|face| loader.load_texture(face));
        scene.background = Some(Skybox::pending(ids));
    }

    let composition = Composition {
        panels,
        sound_emitter,
    };
    log::info!(
        "Composed room: {} panels, {} models loading",
        composition.panels.len(),
        layout.models.len()
    );
    composition
}

/// Inserts one panel
pub fn add_panel(
    placement: &PanelPlacement,
    scene: &mut Scene,
    loader: &mut AssetLoader,
    videos: &VideoRegistry,
) -> ObjectId {
    let mut slots = vec![MaterialSlot::neutral(); BOX_FACE_COUNT];
    slots[FRONT_SLOT] = content_material(&placement.content, loader, videos);
    if let Some(alternate) = &placement.alternate {
        slots[BACK_SLOT] = content_material(alternate, loader, videos);
    }

    scene.insert(SceneObject::panel(
        placement.content.as_str(),
        placement.transform(),
        Vector3::from(placement.size),
        slots,
    ))
}

fn content_material(
    content: &ContentRef,
    loader: &mut AssetLoader,
    videos: &VideoRegistry,
) -> MaterialSlot {
    match content {
        ContentRef::Image(path) => MaterialSlot::textured(loader.load_texture(path)),
        ContentRef::Video(name) => match videos.handle(name) {
            Some(handle) => MaterialSlot::video(handle),
            None => {
                log::warn!("No video source named {}, using neutral material", name);
                MaterialSlot::neutral()
            }
        },
    }
}

fn sound_emitter(sound: &SoundPlacement) -> SceneObject {
    SceneObject::sound_emitter(
        SOUND_EMITTER_NAME,
        Vector3::from(sound.position),
        sound.radius,
        sound.color,
        SoundSettings {
            source: sound.path.clone(),
            ref_distance: sound.ref_distance,
            rolloff_factor: sound.rolloff_factor,
            looping: sound.looping,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{FrameSequence, ImageData};
    use crate::gfx::scene::{
        hex_to_rgb, ObjectKind, SkyboxState, Surface, TextureState, COLOR_DEFAULT,
    };
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn compose(layout: &SceneLayout, videos: &VideoRegistry) -> (Scene, AssetLoader, Composition) {
        let mut scene = Scene::new();
        let mut loader = AssetLoader::new("does-not-exist");
        let composition = compose_scene(layout, &mut scene, &mut loader, videos);
        (scene, loader, composition)
    }

    #[test]
    fn test_default_room_places_panels_and_emitter() {
        let (scene, loader, composition) = compose(&SceneLayout::default(), &VideoRegistry::new());

        assert_eq!(composition.panels.len(), 26);
        assert!(composition.sound_emitter.is_some());
        // 21 front images + 6 alternates + 2 models + 6 skybox faces
        assert_eq!(loader.pending(), 35);
        assert!(scene.background.is_some());

        let emitter = scene.find(SOUND_EMITTER_NAME).expect("emitter");
        match &emitter.kind {
            ObjectKind::SoundEmitter(sound) => {
                assert_eq!(sound.ref_distance, 5.0);
                assert_eq!(sound.rolloff_factor, 2.0);
                assert!(sound.looping);
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_panel_slots_and_grab_scale() {
        let placement = PanelPlacement {
            content: "./content/j/j5.jpeg".into(),
            position: [4.49, 1.5, 0.5],
            rotation: [0.0, -std::f32::consts::FRAC_PI_2, 0.0],
            size: [2.5, 2.5, 0.02],
            alternate: None,
        };
        let layout = SceneLayout {
            panels: vec![placement],
            models: Vec::new(),
            sound: None,
            skybox: None,
        };
        let (scene, _loader, composition) = compose(&layout, &VideoRegistry::new());
        let panel = scene.get(composition.panels[0]).expect("panel");

        assert!(panel.is_draggable);
        assert!(panel.bounding_box.is_some());
        assert_relative_eq!(panel.effective_grab_scale(), 0.2);
        assert_eq!(panel.initial_transform, panel.transform);

        for (index, slot) in panel.materials.iter().enumerate() {
            if index == FRONT_SLOT {
                assert!(matches!(slot.surface, Surface::Texture(TextureState::Pending(_))));
            } else {
                assert!(matches!(slot.surface, Surface::Color));
                assert_eq!(slot.color, hex_to_rgb(COLOR_DEFAULT));
            }
        }
    }

    #[test]
    fn test_unregistered_video_falls_back_to_neutral() {
        let layout = SceneLayout {
            panels: vec![PanelPlacement {
                content: "jv1".into(),
                position: [0.0, 0.0, 0.0],
                rotation: [0.0, 0.0, 0.0],
                size: [1.0, 1.0, 0.02],
                alternate: Some("jv2".into()),
            }],
            models: Vec::new(),
            sound: None,
            skybox: None,
        };

        let mut videos = VideoRegistry::new();
        videos.register(Arc::new(FrameSequence::new(
            "jv2",
            vec![ImageData::solid_color(1, 1, [0, 0, 0, 255])],
            1.0,
        )));

        let (scene, loader, composition) = compose(&layout, &videos);
        let panel = scene.get(composition.panels[0]).expect("panel");

        assert!(matches!(panel.materials[FRONT_SLOT].surface, Surface::Color));
        assert!(matches!(panel.materials[BACK_SLOT].surface, Surface::Video(_)));
        assert_eq!(loader.pending(), 0);
    }

    #[test]
    fn test_failed_images_leave_panels_usable() {
        let (mut scene, mut loader, composition) =
            compose(&SceneLayout::default(), &VideoRegistry::new());
        loader.finish(&mut scene);

        // Missing models never join the room
        assert_eq!(scene.len(), 27);
        let background = scene.background.as_ref().map(|b| b.state());
        assert!(matches!(background, Some(SkyboxState::Unavailable(_))));
        let panel = scene.get(composition.panels[1]).expect("panel");
        assert!(panel.is_draggable);
        assert!(matches!(
            panel.materials[FRONT_SLOT].surface,
            Surface::Texture(TextureState::Failed(_))
        ));
    }

    #[test]
    fn test_skybox_faces_load_into_background() {
        let root = std::env::temp_dir().join(format!("keepsake-skybox-{}", std::process::id()));
        std::fs::create_dir_all(&root).expect("temp dir");
        let names = ["px", "nx", "py", "ny", "pz", "nz"];
        for name in names {
            image::RgbaImage::from_pixel(4, 4, image::Rgba([20, 90, 30, 255]))
                .save(root.join(format!("{name}.png")))
                .expect("face image");
        }
        let layout = SceneLayout {
            panels: Vec::new(),
            models: Vec::new(),
            sound: None,
            skybox: Some(names.map(|name| format!("{name}.png"))),
        };

        let mut scene = Scene::new();
        let mut loader = AssetLoader::new(root.clone());
        compose_scene(&layout, &mut scene, &mut loader, &VideoRegistry::new());
        assert_eq!(loader.pending(), 6);
        loader.finish(&mut scene);

        let state = scene.background.as_ref().map(|b| b.state());
        match state {
            Some(SkyboxState::Ready(faces)) => {
                assert_eq!(faces.len(), 6);
                assert_eq!((faces[0].width, faces[0].height), (4, 4));
            }
            other => panic!("unexpected background {:?}", other),
        }
    }
}
