//! # Render Driver
//!
//! Owns the room state between frames and sequences each frame: apply
//! finished asset loads, update the audio listener, then hand over to the
//! [`InteractionLoop`], which updates and draws. The display scheduler (the
//! winit app on desktop) calls [`RenderDriver::frame`] once per redraw and
//! forwards viewport changes to [`RenderDriver::resize`].

use crate::assets::AssetLoader;
use crate::audio::PositionalAudio;
use crate::gfx::camera::Camera;
use crate::gfx::rendering::Renderer;
use crate::gfx::scene::Scene;
use crate::interaction::{
    Controller, ControllerEvent, FrameContext, FrameReport, Gamepad, InteractionLoop,
};

pub struct RenderDriver<R: Renderer> {
    renderer: R,
    pub camera: Camera,
    pub scene: Scene,
    pub controller: Controller,
    interaction: InteractionLoop,
    loader: AssetLoader,
    audio: Option<PositionalAudio>,
    frames: u64,
}

impl<R: Renderer> RenderDriver<R> {
    pub fn new(renderer: R, camera: Camera, scene: Scene, loader: AssetLoader) -> Self {
        Self {
            renderer,
            camera,
            scene,
            controller: Controller::new(),
            interaction: InteractionLoop::new(),
            loader,
            audio: None,
            frames: 0,
        }
    }

    pub fn set_audio(&mut self, audio: PositionalAudio) {
        self.audio = Some(audio);
    }

    pub fn audio(&self) -> Option<&PositionalAudio> {
        self.audio.as_ref()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn interaction(&self) -> &InteractionLoop {
        &self.interaction
    }

    pub fn loader(&self) -> &AssetLoader {
        &self.loader
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Runs one frame. `gamepad` is None when the session has no gamepad.
    pub fn frame(&mut self, gamepad: Option<&mut dyn Gamepad>) -> FrameReport {
        let applied = self.loader.drain(&mut self.scene);
        if applied > 0 {
            log::debug!(
                "Applied {} asset loads, {} still pending",
                applied,
                self.loader.pending()
            );
        }

        if let Some(audio) = self.audio.as_mut() {
            audio.update_listener(&self.scene, self.camera.position);
        }

        let mut ctx = FrameContext {
            scene: &mut self.scene,
            controller: &mut self.controller,
            gamepad: match gamepad {
                Some(gamepad) => Some(gamepad),
                None => None,
            },
        };
        let report = self
            .interaction
            .run_frame(&mut ctx, &self.camera, &mut self.renderer);
        self.frames += 1;
        report
    }

    /// Forwards a controller event to the interaction loop
    pub fn handle_event(&mut self, event: ControllerEvent, gamepad: Option<&mut dyn Gamepad>) {
        let mut ctx = FrameContext {
            scene: &mut self.scene,
            controller: &mut self.controller,
            gamepad: match gamepad {
                Some(gamepad) => Some(gamepad),
                None => None,
            },
        };
        self.interaction.handle_event(event, &mut ctx);
    }

    /// Updates the camera aspect and the output surface. Returns false for a
    /// zero-sized viewport, which is ignored.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if !self.camera.resize_projection(width, height) {
            log::debug!("Ignoring zero-sized viewport {}x{}", width, height);
            return false;
        }
        self.renderer.resize(width, height);
        true
    }
}
