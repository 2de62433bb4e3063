//! # Interaction Loop
//!
//! Per-frame controller logic for the room: thumbstick locomotion, bounding
//! box refresh, carrying the grabbed panel, ray picking and hover highlight.
//! Select and connection events arrive between frames through
//! [`InteractionLoop::handle_event`].
//!
//! ## Frame order
//!
//! 1. Locomotion from gamepad axes 2 and 3
//! 2. World bounding boxes refreshed
//! 3. The selected object follows the controller
//! 4. Ray cast against draggable objects, only while nothing is held
//! 5. Edge-triggered highlight update
//! 6. Draw
//!
//! Mutable state lives in a [`FrameContext`] handed in each frame; the loop
//! itself only keeps the [`InteractionPhase`] and the room offset.

pub mod controller;
pub mod gamepad;
pub mod phase;

#[cfg(test)]
mod tests;

pub use controller::{Controller, ControllerVisual, TargetRayMode};
pub use gamepad::{
    thumbstick, Gamepad, HapticActuator, VirtualGamepad, GRAB_PULSE_DURATION, GRAB_PULSE_INTENSITY,
};
pub use phase::InteractionPhase;

use cgmath::{Rotation, Vector3, Zero};

use crate::gfx::camera::Camera;
use crate::gfx::picking::cast_draggable;
use crate::gfx::rendering::Renderer;
use crate::gfx::scene::{ObjectId, Scene};

/// Divisor turning a full thumbstick deflection into metres per frame
pub const LOCOMOTION_DIVISOR: f32 = 15.0;

/// Controller input delivered outside the frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerEvent {
    SelectStart,
    SelectEnd,
    Connected(TargetRayMode),
    Disconnected,
}

/// Mutable state the loop works on for one frame or event
pub struct FrameContext<'a> {
    pub scene: &'a mut Scene,
    pub controller: &'a mut Controller,
    /// None when the session exposes no gamepad
    pub gamepad: Option<&'a mut dyn Gamepad>,
}

/// What a frame did, mostly for callers that log or test
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameReport {
    /// Room moved this frame
    pub moved: bool,
    /// Nearest draggable under the ray, when a cast ran
    pub nearest: Option<ObjectId>,
}

#[derive(Debug, Clone)]
pub struct InteractionLoop {
    phase: InteractionPhase,
    offset: Vector3<f32>,
}

impl Default for InteractionLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionLoop {
    pub fn new() -> Self {
        Self {
            phase: InteractionPhase::Idle,
            offset: Vector3::zero(),
        }
    }

    pub fn phase(&self) -> InteractionPhase {
        self.phase
    }

    /// Accumulated locomotion, equal to the room position once anything moved
    pub fn offset(&self) -> Vector3<f32> {
        self.offset
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.phase.selected()
    }

    pub fn highlighted(&self) -> Option<ObjectId> {
        self.phase.highlighted()
    }

    pub fn is_selecting(&self) -> bool {
        self.phase.is_selecting()
    }

    /// Runs steps 1 to 5 and then draws. The draw is issued on every call.
    pub fn run_frame<R: Renderer + ?Sized>(
        &mut self,
        ctx: &mut FrameContext<'_>,
        camera: &Camera,
        renderer: &mut R,
    ) -> FrameReport {
        let report = self.update(ctx);
        renderer.render(ctx.scene, camera, ctx.controller);
        report
    }

    /// Steps 1 to 5 of a frame, without drawing
    pub fn update(&mut self, ctx: &mut FrameContext<'_>) -> FrameReport {
        let moved = self.apply_locomotion(ctx);
        ctx.scene.refresh_bounding_boxes();
        self.follow_controller(ctx);

        let mut report = FrameReport {
            moved,
            nearest: None,
        };
        if !self.phase.is_selecting() {
            report.nearest = cast_draggable(&ctx.controller.ray(), ctx.scene)
                .first()
                .map(|hit| hit.object);
            self.update_highlight(ctx.scene, report.nearest);
        }
        report
    }

    pub fn handle_event(&mut self, event: ControllerEvent, ctx: &mut FrameContext<'_>) {
        log::debug!("Controller event {:?} in {:?}", event, self.phase);
        match event {
            ControllerEvent::SelectStart => self.select_start(ctx),
            ControllerEvent::SelectEnd => self.select_end(ctx.scene),
            ControllerEvent::Connected(mode) => ctx.controller.connect(mode),
            ControllerEvent::Disconnected => {
                ctx.controller.disconnect();
                self.select_end(ctx.scene);
                if let InteractionPhase::Highlighting(id) = self.phase {
                    if let Some(object) = ctx.scene.get_mut(id) {
                        object.clear_highlight();
                    }
                    self.phase = InteractionPhase::Idle;
                }
            }
        }
    }

    fn apply_locomotion(&mut self, ctx: &mut FrameContext<'_>) -> bool {
        let Some(gamepad) = ctx.gamepad.as_deref() else {
            return false;
        };

        let (x, y) = thumbstick(gamepad);
        if x == 0.0 && y == 0.0 {
            return false;
        }

        let shift = Vector3::new(x / LOCOMOTION_DIVISOR, 0.0, y / LOCOMOTION_DIVISOR);
        self.offset += -ctx.controller.rotation.rotate_vector(shift);
        ctx.scene.room_position = self.offset;
        true
    }

    fn follow_controller(&self, ctx: &mut FrameContext<'_>) {
        let Some(id) = self.phase.selected() else {
            return;
        };
        let Some(object) = ctx.scene.get_mut(id) else {
            return;
        };

        object.transform.position = ctx.controller.position - self.offset;
        object.transform.rotation = ctx.controller.rotation;
        let scale = object.effective_grab_scale();
        object.transform.set_uniform_scale(scale);
    }

    fn update_highlight(&mut self, scene: &mut Scene, nearest: Option<ObjectId>) {
        let previous = self.phase.highlighted();
        if previous == nearest {
            return;
        }

        if let Some(object) = previous.and_then(|id| scene.get_mut(id)) {
            object.clear_highlight();
        }

        self.phase = match nearest {
            Some(id) => {
                if let Some(object) = scene.get_mut(id) {
                    object.highlight();
                }
                InteractionPhase::Highlighting(id)
            }
            None => InteractionPhase::Idle,
        };
    }

    fn select_start(&mut self, ctx: &mut FrameContext<'_>) {
        let InteractionPhase::Highlighting(id) = self.phase else {
            return;
        };

        if let Some(object) = ctx.scene.get_mut(id) {
            object.clear_highlight();
        }
        self.phase = InteractionPhase::Selecting(id);
        log::debug!("Grabbed {:?}", id);

        if let Some(gamepad) = ctx.gamepad.as_deref_mut() {
            if let Some(actuator) = gamepad.haptic_actuator() {
                actuator.pulse(GRAB_PULSE_INTENSITY, GRAB_PULSE_DURATION);
            }
        }
    }

    fn select_end(&mut self, scene: &mut Scene) {
        let InteractionPhase::Selecting(id) = self.phase else {
            return;
        };

        self.phase = InteractionPhase::Idle;
        if let Some(object) = scene.get_mut(id) {
            object.reset_transform();
            log::debug!("Released {:?}", id);
        }
    }
}
