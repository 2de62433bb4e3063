use std::time::Duration;

use approx::assert_relative_eq;
use cgmath::{Quaternion, Rad, Rotation3, Vector3, Zero};

use super::*;
use crate::assets::TextureId;
use crate::gfx::scene::{hex_to_rgb, MaterialSlot, SceneObject, Surface, TextureState, COLOR_HIGHLIGHT};
use crate::gfx::transform::Transform;

#[derive(Default)]
struct RecordingRenderer {
    draws: usize,
    last_object_count: usize,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, scene: &Scene, _camera: &Camera, _controller: &Controller) {
        self.draws += 1;
        self.last_object_count = scene.len();
    }

    fn resize(&mut self, _width: u32, _height: u32) {}
}

#[derive(Default)]
struct RecordingHaptic {
    pulses: Vec<(f32, Duration)>,
}

impl HapticActuator for RecordingHaptic {
    fn pulse(&mut self, intensity: f32, duration: Duration) {
        self.pulses.push((intensity, duration));
    }
}

#[derive(Default)]
struct TestGamepad {
    axes: Vec<f32>,
    haptic: Option<RecordingHaptic>,
}

impl TestGamepad {
    fn with_haptics() -> Self {
        Self {
            axes: vec![0.0; 4],
            haptic: Some(RecordingHaptic::default()),
        }
    }

    fn stick(x: f32, y: f32) -> Self {
        Self {
            axes: vec![0.0, 0.0, x, y],
            haptic: None,
        }
    }

    fn pulses(&self) -> usize {
        self.haptic.as_ref().map_or(0, |h| h.pulses.len())
    }
}

impl Gamepad for TestGamepad {
    fn axes(&self) -> &[f32] {
        &self.axes
    }

    fn haptic_actuator(&mut self) -> Option<&mut dyn HapticActuator> {
        match &mut self.haptic {
            Some(haptic) => Some(haptic),
            None => None,
        }
    }
}

/// Room state plus the loop, wired the way the driver wires them
struct Rig {
    scene: Scene,
    controller: Controller,
    interaction: InteractionLoop,
    renderer: RecordingRenderer,
    camera: Camera,
}

impl Rig {
    fn new() -> Self {
        Self {
            scene: Scene::new(),
            controller: Controller::new(),
            interaction: InteractionLoop::new(),
            renderer: RecordingRenderer::default(),
            camera: Camera::default(),
        }
    }

    fn panel(&mut self, position: Vector3<f32>) -> ObjectId {
        self.scene.insert(SceneObject::panel(
            "panel",
            Transform::from_euler(position, Vector3::zero()),
            Vector3::new(1.0, 1.0, 0.02),
            vec![MaterialSlot::neutral(); 6],
        ))
    }

    /// Controller behind `target` on +Z, pointing at it
    fn aim_at(&mut self, target: Vector3<f32>) {
        self.controller
            .set_pose(target + Vector3::new(0.0, 0.0, 2.0), Quaternion::from_angle_y(Rad(0.0)));
    }

    fn aim_away(&mut self) {
        self.controller
            .set_pose(Vector3::new(0.0, 50.0, 0.0), Quaternion::from_angle_x(Rad(1.5)));
    }

    fn frame(&mut self, gamepad: Option<&mut TestGamepad>) -> FrameReport {
        let mut ctx = FrameContext {
            scene: &mut self.scene,
            controller: &mut self.controller,
            gamepad: gamepad.map(|pad| pad as &mut dyn Gamepad),
        };
        self.interaction
            .run_frame(&mut ctx, &self.camera, &mut self.renderer)
    }

    fn event(&mut self, event: ControllerEvent, gamepad: Option<&mut TestGamepad>) {
        let mut ctx = FrameContext {
            scene: &mut self.scene,
            controller: &mut self.controller,
            gamepad: gamepad.map(|pad| pad as &mut dyn Gamepad),
        };
        self.interaction.handle_event(event, &mut ctx);
    }

    fn object(&self, id: ObjectId) -> &SceneObject {
        self.scene.get(id).expect("object exists")
    }

    fn highlighted_count(&self) -> usize {
        self.scene.objects().filter(|o| o.is_highlighted()).count()
    }
}

#[test]
fn test_grab_and_release_scenario() {
    let mut rig = Rig::new();
    let mut pad = TestGamepad::with_haptics();
    let a = rig.panel(Vector3::new(1.0, 0.0, 0.0));
    let initial = rig.object(a).transform;

    rig.aim_at(Vector3::new(1.0, 0.0, 0.0));
    let report = rig.frame(Some(&mut pad));
    assert_eq!(report.nearest, Some(a));
    assert_eq!(rig.interaction.highlighted(), Some(a));
    assert!(rig.object(a).is_highlighted());

    rig.event(ControllerEvent::SelectStart, Some(&mut pad));
    assert_eq!(rig.interaction.selected(), Some(a));
    assert!(!rig.object(a).is_highlighted());
    assert_eq!(pad.pulses(), 1);
    if let Some(haptic) = &pad.haptic {
        assert_eq!(haptic.pulses[0], (0.5, Duration::from_millis(100)));
    }

    let grip = Quaternion::from_angle_z(Rad(0.3)) * Quaternion::from_angle_y(Rad(-0.8));
    rig.controller.set_pose(Vector3::new(2.0, 1.0, 0.0), grip);
    rig.frame(Some(&mut pad));

    let held = rig.object(a).transform;
    assert_eq!(held.position, Vector3::new(2.0, 1.0, 0.0));
    assert_eq!(held.rotation, grip);
    assert_eq!(held.scale, Vector3::new(0.5, 0.5, 0.5));

    rig.event(ControllerEvent::SelectEnd, Some(&mut pad));
    assert_eq!(rig.interaction.phase(), InteractionPhase::Idle);
    assert_eq!(rig.object(a).transform, initial);
}

#[test]
fn test_select_and_release_without_moving_is_exact() {
    let mut rig = Rig::new();
    let rotated = rig.scene.insert(SceneObject::panel(
        "rotated",
        Transform::from_euler(Vector3::new(-4.49, 1.5, 0.5), Vector3::new(0.0, 1.2345, 0.0)),
        Vector3::new(1.0, 1.0, 0.02),
        vec![MaterialSlot::neutral(); 6],
    ));
    let initial = rig.object(rotated).transform;

    rig.controller.set_pose(
        Vector3::new(0.0, 1.5, 0.5),
        Quaternion::from_angle_y(Rad(std::f32::consts::FRAC_PI_2)),
    );
    rig.frame(None);
    assert_eq!(rig.interaction.highlighted(), Some(rotated));

    rig.event(ControllerEvent::SelectStart, None);
    rig.frame(None);
    rig.event(ControllerEvent::SelectEnd, None);

    let restored = rig.object(rotated).transform;
    assert_eq!(restored.position, initial.position);
    assert_eq!(restored.rotation, initial.rotation);
    assert_eq!(restored.scale, initial.scale);
}

#[test]
fn test_highlight_is_edge_triggered() {
    let mut rig = Rig::new();
    let a = rig.panel(Vector3::new(0.0, 0.0, 0.0));
    rig.aim_at(Vector3::new(0.0, 0.0, 0.0));

    rig.frame(None);
    let revision = rig.object(a).material_revision();
    for _ in 0..5 {
        rig.frame(None);
    }

    assert_eq!(rig.object(a).material_revision(), revision);
    assert_eq!(rig.object(a).materials[4].emissive, hex_to_rgb(COLOR_HIGHLIGHT));
}

#[test]
fn test_highlight_moves_between_objects() {
    let mut rig = Rig::new();
    let a = rig.panel(Vector3::new(-2.0, 0.0, 0.0));
    let b = rig.panel(Vector3::new(2.0, 0.0, 0.0));

    rig.aim_at(Vector3::new(-2.0, 0.0, 0.0));
    rig.frame(None);
    assert_eq!(rig.interaction.highlighted(), Some(a));

    rig.aim_at(Vector3::new(2.0, 0.0, 0.0));
    rig.frame(None);
    assert_eq!(rig.interaction.highlighted(), Some(b));
    assert!(!rig.object(a).is_highlighted());
    assert_eq!(rig.highlighted_count(), 1);

    rig.aim_away();
    rig.frame(None);
    assert_eq!(rig.interaction.phase(), InteractionPhase::Idle);
    assert_eq!(rig.highlighted_count(), 0);
}

#[test]
fn test_nothing_is_picked_while_holding() {
    let mut rig = Rig::new();
    let a = rig.panel(Vector3::new(0.0, 0.0, 0.0));
    let b = rig.panel(Vector3::new(5.0, 0.0, 0.0));

    rig.aim_at(Vector3::new(0.0, 0.0, 0.0));
    rig.frame(None);
    rig.event(ControllerEvent::SelectStart, None);

    rig.aim_at(Vector3::new(5.0, 0.0, 0.0));
    let report = rig.frame(None);

    assert_eq!(report.nearest, None);
    assert_eq!(rig.interaction.selected(), Some(a));
    assert!(!rig.object(b).is_highlighted());
    assert_eq!(rig.highlighted_count(), 0);
}

#[test]
fn test_select_start_needs_a_highlight() {
    let mut rig = Rig::new();
    let mut pad = TestGamepad::with_haptics();
    rig.panel(Vector3::new(0.0, 0.0, 0.0));
    rig.aim_away();
    rig.frame(Some(&mut pad));

    rig.event(ControllerEvent::SelectStart, Some(&mut pad));
    assert_eq!(rig.interaction.phase(), InteractionPhase::Idle);
    assert_eq!(pad.pulses(), 0);

    // Releasing with nothing held is a no-op
    rig.event(ControllerEvent::SelectEnd, Some(&mut pad));
    assert_eq!(rig.interaction.phase(), InteractionPhase::Idle);
}

#[test]
fn test_second_select_start_is_ignored() {
    let mut rig = Rig::new();
    let mut pad = TestGamepad::with_haptics();
    let a = rig.panel(Vector3::new(0.0, 0.0, 0.0));
    rig.aim_at(Vector3::new(0.0, 0.0, 0.0));
    rig.frame(Some(&mut pad));

    rig.event(ControllerEvent::SelectStart, Some(&mut pad));
    rig.event(ControllerEvent::SelectStart, Some(&mut pad));

    assert_eq!(rig.interaction.selected(), Some(a));
    assert_eq!(pad.pulses(), 1);
}

#[test]
fn test_released_object_highlights_again() {
    let mut rig = Rig::new();
    let a = rig.panel(Vector3::new(0.0, 0.0, 0.0));
    rig.aim_at(Vector3::new(0.0, 0.0, 0.0));
    rig.frame(None);
    rig.event(ControllerEvent::SelectStart, None);
    rig.frame(None);
    rig.event(ControllerEvent::SelectEnd, None);

    rig.aim_at(Vector3::new(0.0, 0.0, 0.0));
    rig.frame(None);
    assert_eq!(rig.interaction.highlighted(), Some(a));
    assert!(rig.object(a).is_highlighted());
}

#[test]
fn test_centred_stick_never_moves_room() {
    let mut rig = Rig::new();
    let mut pad = TestGamepad::stick(0.0, 0.0);
    rig.controller
        .set_pose(Vector3::new(0.0, 1.0, 0.0), Quaternion::from_angle_y(Rad(0.7)));

    for _ in 0..100 {
        let report = rig.frame(Some(&mut pad));
        assert!(!report.moved);
    }

    assert_eq!(rig.interaction.offset(), Vector3::zero());
    assert_eq!(rig.scene.room_position, Vector3::zero());
}

#[test]
fn test_stick_moves_room_against_controller_heading() {
    let mut rig = Rig::new();
    let mut pad = TestGamepad::stick(1.0, 0.0);

    rig.frame(Some(&mut pad));
    assert_relative_eq!(rig.interaction.offset().x, -1.0 / 15.0);
    assert_eq!(rig.scene.room_position, rig.interaction.offset());

    // Facing a quarter turn left, pushing right moves the room along +Z
    let mut rig = Rig::new();
    rig.controller.set_pose(
        Vector3::zero(),
        Quaternion::from_angle_y(Rad(std::f32::consts::FRAC_PI_2)),
    );
    rig.frame(Some(&mut pad));
    let offset = rig.interaction.offset();
    assert_relative_eq!(offset.x, 0.0, epsilon = 1e-6);
    assert_relative_eq!(offset.y, 0.0);
    assert_relative_eq!(offset.z, 1.0 / 15.0, epsilon = 1e-6);
}

#[test]
fn test_held_object_tracks_controller_in_room_space() {
    let mut rig = Rig::new();
    let mut pad = TestGamepad::stick(0.0, -1.5);
    let a = rig.panel(Vector3::new(0.0, 0.0, 0.0));
    rig.aim_at(Vector3::new(0.0, 0.0, 0.0));

    // Walk forward a few frames; the room moves toward the controller
    for _ in 0..3 {
        rig.frame(Some(&mut pad));
    }
    let offset = rig.interaction.offset();
    assert!(offset.z > 0.0);

    rig.controller.set_pose(
        Vector3::new(0.0, 0.0, 2.0) + offset,
        Quaternion::from_angle_y(Rad(0.0)),
    );
    let mut still = TestGamepad::stick(0.0, 0.0);
    rig.frame(Some(&mut still));
    assert_eq!(rig.interaction.highlighted(), Some(a));

    rig.event(ControllerEvent::SelectStart, Some(&mut still));
    rig.controller
        .set_pose(Vector3::new(1.0, 2.0, 3.0), Quaternion::from_angle_y(Rad(0.0)));
    rig.frame(Some(&mut still));

    assert_eq!(rig.object(a).transform.position, Vector3::new(1.0, 2.0, 3.0) - offset);
}

#[test]
fn test_no_gamepad_still_picks_and_grabs() {
    let mut rig = Rig::new();
    let a = rig.panel(Vector3::new(0.0, 0.0, 0.0));
    rig.aim_at(Vector3::new(0.0, 0.0, 0.0));

    let report = rig.frame(None);
    assert!(!report.moved);
    rig.event(ControllerEvent::SelectStart, None);

    assert_eq!(rig.interaction.selected(), Some(a));
}

#[test]
fn test_failed_texture_panel_is_still_interactive() {
    let mut rig = Rig::new();
    let mut slots = vec![MaterialSlot::neutral(); 6];
    slots[4] = MaterialSlot::textured(TextureId(3));
    let b = rig.scene.insert(SceneObject::panel(
        "b",
        Transform::default(),
        Vector3::new(1.0, 1.0, 0.02),
        slots,
    ));
    rig.scene.resolve_texture(TextureId(3), None);
    assert!(matches!(
        rig.object(b).materials[4].surface,
        Surface::Texture(TextureState::Failed(_))
    ));

    rig.aim_at(Vector3::zero());
    rig.frame(None);
    assert_eq!(rig.interaction.highlighted(), Some(b));
    rig.event(ControllerEvent::SelectStart, None);
    assert_eq!(rig.interaction.selected(), Some(b));
}

#[test]
fn test_every_frame_draws() {
    let mut rig = Rig::new();
    for _ in 0..3 {
        rig.frame(None);
    }
    assert_eq!(rig.renderer.draws, 3);
    assert_eq!(rig.renderer.last_object_count, 0);

    rig.panel(Vector3::zero());
    rig.aim_at(Vector3::zero());
    rig.frame(None);
    rig.event(ControllerEvent::SelectStart, None);
    rig.frame(None);
    assert_eq!(rig.renderer.draws, 5);
}

#[test]
fn test_connect_builds_visual_and_disconnect_releases() {
    let mut rig = Rig::new();
    let a = rig.panel(Vector3::new(1.0, 0.0, 0.0));
    let initial = rig.object(a).transform;

    rig.event(ControllerEvent::Connected(TargetRayMode::Gaze), None);
    assert!(matches!(
        rig.controller.visual(),
        Some(ControllerVisual::GazeRing { .. })
    ));

    rig.aim_at(Vector3::new(1.0, 0.0, 0.0));
    rig.frame(None);
    rig.event(ControllerEvent::SelectStart, None);
    rig.controller
        .set_pose(Vector3::new(3.0, 3.0, 3.0), Quaternion::from_angle_x(Rad(0.4)));
    rig.frame(None);

    rig.event(ControllerEvent::Disconnected, None);
    assert!(!rig.controller.is_connected());
    assert!(rig.controller.visual().is_none());
    assert_eq!(rig.interaction.phase(), InteractionPhase::Idle);
    assert_eq!(rig.object(a).transform, initial);
}

#[test]
fn test_disconnect_clears_highlight() {
    let mut rig = Rig::new();
    let a = rig.panel(Vector3::zero());
    rig.event(ControllerEvent::Connected(TargetRayMode::TrackedPointer), None);
    rig.aim_at(Vector3::zero());
    rig.frame(None);
    assert!(rig.object(a).is_highlighted());

    rig.event(ControllerEvent::Disconnected, None);
    assert!(!rig.object(a).is_highlighted());
    assert_eq!(rig.interaction.phase(), InteractionPhase::Idle);
}

#[test]
fn test_non_draggable_objects_are_never_highlighted() {
    let mut rig = Rig::new();
    let a = rig.panel(Vector3::zero());
    if let Some(object) = rig.scene.get_mut(a) {
        object.is_draggable = false;
    }
    rig.aim_at(Vector3::zero());
    rig.frame(None);

    assert_eq!(rig.interaction.phase(), InteractionPhase::Idle);
    assert_eq!(rig.highlighted_count(), 0);
}

#[test]
fn test_default_loop_starts_idle_at_origin() {
    let interaction = InteractionLoop::default();
    assert_eq!(interaction.phase(), InteractionPhase::Idle);
    assert_eq!(interaction.offset(), Vector3::zero());
    assert!(!interaction.is_selecting());
}
