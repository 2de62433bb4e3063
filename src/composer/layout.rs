//! Placement data for the room
//!
//! [`SceneLayout::default`] is the birthday gallery: the room shell, 26 wall
//! panels, the music box, the dog and the forest background. A TOML `[layout]`
//! table can replace any part of it.

use std::f32::consts::FRAC_PI_2;
use std::fmt;

use cgmath::Vector3;
use serde::{Deserialize, Serialize};

use crate::gfx::transform::Transform;

/// What a panel face shows.
///
/// A reference containing `.` is an image path; anything else names a live
/// video source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContentRef {
    Image(String),
    Video(String),
}

impl ContentRef {
    pub fn parse(reference: &str) -> Self {
        if reference.contains('.') {
            ContentRef::Image(reference.to_string())
        } else {
            ContentRef::Video(reference.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ContentRef::Image(path) => path,
            ContentRef::Video(name) => name,
        }
    }
}

impl From<String> for ContentRef {
    fn from(reference: String) -> Self {
        Self::parse(&reference)
    }
}

impl From<&str> for ContentRef {
    fn from(reference: &str) -> Self {
        Self::parse(reference)
    }
}

impl From<ContentRef> for String {
    fn from(content: ContentRef) -> Self {
        match content {
            ContentRef::Image(path) => path,
            ContentRef::Video(name) => name,
        }
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One photo or video panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelPlacement {
    pub content: ContentRef,
    pub position: [f32; 3],
    /// XYZ Euler angles in radians
    pub rotation: [f32; 3],
    pub size: [f32; 3],
    /// Shown on the back face
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate: Option<ContentRef>,
}

impl PanelPlacement {
    pub fn transform(&self) -> Transform {
        Transform::from_euler(self.position.into(), self.rotation.into())
    }
}

/// A model attached to the room once it has loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPlacement {
    pub name: String,
    pub path: String,
    pub position: [f32; 3],
    /// Yaw in radians
    #[serde(default)]
    pub rotation_y: f32,
    #[serde(default = "unit_scale")]
    pub scale: f32,
}

impl ModelPlacement {
    pub fn transform(&self) -> Transform {
        Transform::from_euler(self.position.into(), Vector3::new(0.0, self.rotation_y, 0.0))
            .with_uniform_scale(self.scale)
    }
}

fn unit_scale() -> f32 {
    1.0
}

/// The positional music source and its marker sphere
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundPlacement {
    pub path: String,
    pub position: [f32; 3],
    pub radius: f32,
    pub color: u32,
    pub ref_distance: f32,
    pub rolloff_factor: f32,
    pub looping: bool,
}

impl Default for SoundPlacement {
    fn default() -> Self {
        Self {
            path: "finale.mp3".to_string(),
            position: [3.8, 0.3, 5.4],
            radius: 0.05,
            color: 0xff2200,
            ref_distance: 5.0,
            rolloff_factor: 2.0,
            looping: true,
        }
    }
}

/// Everything the composer places
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneLayout {
    pub panels: Vec<PanelPlacement>,
    pub models: Vec<ModelPlacement>,
    pub sound: Option<SoundPlacement>,
    /// Cube-map face images in +X, -X, +Y, -Y, +Z, -Z order
    pub skybox: Option<[String; 6]>,
}

/// Forest faces; the set's Z images go in swapped
fn forest_skybox() -> [String; 6] {
    ["x-pos", "x-neg", "y-pos", "y-neg", "z-neg", "z-pos"]
        .map(|face| format!("./textures/cube-background/forest/{face}.png"))
}

impl Default for SceneLayout {
    fn default() -> Self {
        Self {
            panels: gallery_panels(),
            models: vec![
                ModelPlacement {
                    name: "room".to_string(),
                    path: "models/room.obj".to_string(),
                    position: [0.0, 0.0, 2.0],
                    rotation_y: FRAC_PI_2,
                    scale: 5.0,
                },
                ModelPlacement {
                    name: "dog".to_string(),
                    path: "models/dog.obj".to_string(),
                    position: [4.0, 0.25, 5.0],
                    rotation_y: -FRAC_PI_2,
                    scale: 0.0005,
                },
            ],
            sound: Some(SoundPlacement::default()),
            skybox: Some(forest_skybox()),
        }
    }
}

const LEFT_WALL_X: f32 = -4.49;
const RIGHT_WALL_X: f32 = 4.49;
const LOW_ROW_Y: f32 = 1.5;
const HIGH_ROW_Y: f32 = 3.75;
const SMALL: [f32; 3] = [1.0, 1.0, 0.02];
const BIG: [f32; 3] = [2.5, 2.5, 0.02];
const HIDDEN: [f32; 3] = [5.0, 5.0, 0.02];

fn photo(name: &str) -> String {
    format!("./content/j/{}.jpeg", name)
}

fn panel(content: &str, position: [f32; 3], yaw: f32, size: [f32; 3], alternate: Option<&str>) -> PanelPlacement {
    PanelPlacement {
        content: ContentRef::parse(content),
        position,
        rotation: [0.0, yaw, 0.0],
        size,
        alternate: alternate.map(ContentRef::parse),
    }
}

fn gallery_panels() -> Vec<PanelPlacement> {
    let left = FRAC_PI_2;
    let right = -FRAC_PI_2;
    let mut panels = Vec::with_capacity(26);

    // Left wall, lower row
    let left_low: [(String, f32, Option<String>); 8] = [
        ("jv1".into(), -4.0, Some(photo("j24"))),
        (photo("j7"), -2.5, None),
        (photo("j1"), -1.0, None),
        (photo("j2"), 0.5, None),
        (photo("j3"), 2.0, None),
        (photo("j4"), 3.5, None),
        (photo("j9"), 5.0, None),
        (photo("j10"), 6.5, Some("./textures/monkey.jpeg".into())),
    ];
    for (content, z, alternate) in &left_low {
        panels.push(panel(content, [LEFT_WALL_X, LOW_ROW_Y, *z], left, SMALL, alternate.as_deref()));
    }

    // Left wall, upper row
    let left_high: [(String, f32, Option<String>); 4] = [
        ("jv2".into(), -3.25, None),
        (photo("j6"), -0.25, None),
        (photo("j23"), 2.75, Some(photo("j13"))),
        (photo("j8"), 5.75, None),
    ];
    for (content, z, alternate) in &left_high {
        panels.push(panel(content, [LEFT_WALL_X, HIGH_ROW_Y, *z], left, BIG, alternate.as_deref()));
    }

    // Right wall, lower row
    let right_low: [(String, f32, Option<String>); 8] = [
        (photo("j11"), -4.0, None),
        (photo("j12"), -2.5, None),
        ("jv3".into(), -1.0, None),
        (photo("j5"), 0.5, Some(photo("j16"))),
        ("jv4".into(), 2.0, None),
        (photo("j15"), 3.5, Some(photo("viktor"))),
        ("jv5".into(), 5.0, Some("./textures/7.jpeg".into())),
        (photo("j17"), 6.5, None),
    ];
    for (content, z, alternate) in &right_low {
        panels.push(panel(content, [RIGHT_WALL_X, LOW_ROW_Y, *z], right, SMALL, alternate.as_deref()));
    }

    // Right wall, upper row
    for (name, z) in [("j18", -3.25), ("j19", -0.25), ("j14", 2.75), ("j20", 5.75)] {
        panels.push(panel(&photo(name), [RIGHT_WALL_X, HIGH_ROW_Y, z], right, BIG, None));
    }

    // Behind the walls
    panels.push(panel(&photo("j21"), [-5.05, HIGH_ROW_Y, 5.75], right, HIDDEN, None));
    panels.push(panel(&photo("j22"), [5.05, HIGH_ROW_Y, 5.75], left, HIDDEN, None));

    panels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_reference_rule() {
        assert_eq!(
            ContentRef::parse("./content/j/j1.jpeg"),
            ContentRef::Image("./content/j/j1.jpeg".into())
        );
        assert_eq!(ContentRef::parse("jv1"), ContentRef::Video("jv1".into()));
    }

    #[test]
    fn test_default_gallery() {
        let layout = SceneLayout::default();
        assert_eq!(layout.panels.len(), 26);
        assert_eq!(layout.models.len(), 2);

        let videos = layout
            .panels
            .iter()
            .filter(|p| matches!(p.content, ContentRef::Video(_)))
            .count();
        assert_eq!(videos, 5);

        let alternates = layout.panels.iter().filter(|p| p.alternate.is_some()).count();
        assert_eq!(alternates, 6);

        let first = &layout.panels[0];
        assert_eq!(first.position, [-4.49, 1.5, -4.0]);
        assert_eq!(first.alternate, Some(ContentRef::Image("./content/j/j24.jpeg".into())));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let layout: SceneLayout = toml::from_str(
            r#"
            [[panels]]
            content = "./content/a.jpeg"
            position = [0.0, 1.0, -2.0]
            rotation = [0.0, 0.0, 0.0]
            size = [1.0, 1.0, 0.02]
            alternate = "clip"
            "#,
        )
        .expect("parse layout");

        assert_eq!(layout.panels.len(), 1);
        assert_eq!(layout.panels[0].alternate, Some(ContentRef::Video("clip".into())));
        assert_eq!(layout.models.len(), 2);
        assert!(layout.sound.is_some());
        assert_eq!(layout.skybox, Some(forest_skybox()));
    }

    #[test]
    fn test_skybox_can_be_replaced() {
        let layout: SceneLayout = toml::from_str(
            r#"
            skybox = ["a.png", "b.png", "c.png", "d.png", "e.png", "f.png"]
            "#,
        )
        .expect("parse layout");
        let faces = layout.skybox.expect("skybox");
        assert_eq!(faces[0], "a.png");
        assert_eq!(faces[5], "f.png");

        let forest = forest_skybox();
        assert_eq!(forest[4], "./textures/cube-background/forest/z-neg.png");
    }

    #[test]
    fn test_model_transform_scales_uniformly() {
        let dog = &SceneLayout::default().models[1];
        let transform = dog.transform();
        assert_eq!(transform.scale, Vector3::new(0.0005, 0.0005, 0.0005));
        assert_eq!(transform.position, Vector3::new(4.0, 0.25, 5.0));
    }
}
