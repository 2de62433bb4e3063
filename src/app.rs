//! Desktop viewer
//!
//! A winit application that acts as the display scheduler for the
//! [`RenderDriver`]. Outside a headset the controller is emulated: it aims
//! from the eye where the camera looks (gaze mode) and drops to the hand
//! while a panel is held. The left mouse button selects, right-drag turns the
//! head and WASD stands in for the thumbstick.

use std::path::Path;
use std::sync::Arc;

use cgmath::{Quaternion, Rotation, Vector3};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::assets::{AssetLoader, FrameSequence, VideoRegistry};
use crate::composer::{compose_scene, Composition};
use crate::config::AppConfig;
use crate::driver::RenderDriver;
use crate::error::{KeepsakeError, Result};
use crate::gfx::camera::{Camera, LookController};
use crate::gfx::rendering::WgpuRenderer;
use crate::gfx::scene::{ObjectId, Scene};
use crate::interaction::{ControllerEvent, TargetRayMode, VirtualGamepad};

/// Composes the room described by `config`. Videos whose frames cannot be
/// read are skipped; their panels fall back to the neutral material.
pub fn build_room(config: &AppConfig) -> (Scene, AssetLoader, Composition) {
    let mut videos = VideoRegistry::new();
    for video in &config.viewer.videos {
        match FrameSequence::from_dir(&video.name, &video.frames, video.fps) {
            Ok(sequence) => videos.register(Arc::new(sequence)),
            Err(e) => log::warn!("Video {} unavailable: {}", video.name, e),
        }
    }

    let mut scene = Scene::new();
    let mut loader = AssetLoader::new(config.viewer.asset_root.clone());
    let composition = compose_scene(&config.layout, &mut scene, &mut loader, &videos);
    (scene, loader, composition)
}

/// Camera-space spot where the emulated hand holds a grabbed panel
const HAND_OFFSET: [f32; 3] = [0.0, -0.2, -0.4];

/// Pose of the emulated controller. It aims from the eye and moves to the hand
/// while `holding`, which keeps the held panel in front of the near plane.
fn emulated_controller_pose(camera: &Camera, holding: bool) -> (Vector3<f32>, Quaternion<f32>) {
    let rotation = camera.rotation();
    let position = if holding {
        camera.position + rotation.rotate_vector(Vector3::from(HAND_OFFSET))
    } else {
        camera.position
    };
    (position, rotation)
}

/// WASD keys held down, read as thumbstick axes
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct HeldKeys {
    forward: bool,
    back: bool,
    left: bool,
    right: bool,
}

impl HeldKeys {
    /// Returns false for keys that do not move
    fn set(&mut self, key: KeyCode, pressed: bool) -> bool {
        match key {
            KeyCode::KeyW => self.forward = pressed,
            KeyCode::KeyS => self.back = pressed,
            KeyCode::KeyA => self.left = pressed,
            KeyCode::KeyD => self.right = pressed,
            _ => return false,
        }
        true
    }

    /// Right and back are positive, like a thumbstick
    fn axes(&self) -> (f32, f32) {
        let axis = |negative: bool, positive: bool| positive as i8 as f32 - negative as i8 as f32;
        (axis(self.left, self.right), axis(self.forward, self.back))
    }
}

pub struct KeepsakeApp {
    config: AppConfig,
}

struct AppState {
    config: AppConfig,
    window: Option<Arc<Window>>,
    driver: Option<RenderDriver<WgpuRenderer>>,
    look: LookController,
    keys: HeldKeys,
    gamepad: VirtualGamepad,
    startup_error: Option<KeepsakeError>,
}

impl KeepsakeApp {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Opens the window and runs until it is closed
    pub fn run(self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut state = AppState {
            look: LookController::new(self.config.viewer.look_speed),
            config: self.config,
            window: None,
            driver: None,
            keys: HeldKeys::default(),
            gamepad: VirtualGamepad::new(),
            startup_error: None,
        };
        event_loop.run_app(&mut state)?;

        match state.startup_error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: KeepsakeError) {
        log::error!("Viewer startup failed: {}", error);
        self.startup_error = Some(error);
        event_loop.exit();
    }

    fn select(&mut self, pressed: bool) {
        let Some(driver) = self.driver.as_mut() else {
            return;
        };
        let event = if pressed {
            ControllerEvent::SelectStart
        } else {
            ControllerEvent::SelectEnd
        };
        driver.handle_event(event, Some(&mut self.gamepad));
    }

    fn redraw(&mut self) {
        let Some(driver) = self.driver.as_mut() else {
            return;
        };
        let (x, y) = self.keys.axes();
        self.gamepad.set_thumbstick(x, y);

        let holding = driver.interaction().is_selecting();
        let (position, rotation) = emulated_controller_pose(&driver.camera, holding);
        driver.controller.set_pose(position, rotation);
        driver.frame(Some(&mut self.gamepad));
    }
}

#[cfg(feature = "audio")]
fn start_audio(driver: &mut RenderDriver<WgpuRenderer>, emitter: Option<ObjectId>, root: &Path) {
    use crate::audio::{PositionalAudio, RodioAmbience};

    let Some(emitter) = emitter else {
        return;
    };
    let started = RodioAmbience::new().and_then(|backend| {
        PositionalAudio::start(Box::new(backend), &driver.scene, emitter, root)
    });
    match started {
        Ok(audio) => driver.set_audio(audio),
        Err(e) => log::warn!("Ambient audio disabled: {}", e),
    }
}

#[cfg(not(feature = "audio"))]
fn start_audio(_driver: &mut RenderDriver<WgpuRenderer>, emitter: Option<ObjectId>, _root: &Path) {
    if emitter.is_some() {
        log::info!("Built without the audio feature; the sound emitter is silent");
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title("Keepsake")
            .with_inner_size(LogicalSize::new(
                self.config.viewer.width,
                self.config.viewer.height,
            ));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, KeepsakeError::Surface(e.to_string())),
        };
        let (width, height): (u32, u32) = window.inner_size().into();

        let renderer = match pollster::block_on(WgpuRenderer::new(window.clone(), width, height)) {
            Ok(renderer) => renderer,
            Err(e) => return self.fail(event_loop, e),
        };

        let (scene, loader, composition) = build_room(&self.config);
        let camera = Camera::new(width.max(1) as f32 / height.max(1) as f32);
        let mut driver = RenderDriver::new(renderer, camera, scene, loader);
        driver.handle_event(ControllerEvent::Connected(TargetRayMode::Gaze), None);
        start_audio(
            &mut driver,
            composition.sound_emitter,
            &self.config.viewer.asset_root,
        );

        log::info!(
            "Room composed: {} panels, {} assets loading",
            composition.panels.len(),
            driver.loader().pending()
        );
        self.driver = Some(driver);
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state,
                        ..
                    },
                ..
            } => {
                if key_code == KeyCode::Escape {
                    event_loop.exit();
                    return;
                }
                self.keys.set(key_code, state == ElementState::Pressed);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = state == ElementState::Pressed;
                match button {
                    MouseButton::Left => self.select(pressed),
                    MouseButton::Right => self.look.set_looking(pressed),
                    _ => {}
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(driver) = self.driver.as_mut() {
                    driver.resize(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => (),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        let Some(driver) = self.driver.as_mut() else {
            return;
        };
        self.look.process_events(&event, &mut driver.camera);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}
