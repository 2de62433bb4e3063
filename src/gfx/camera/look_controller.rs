use winit::event::DeviceEvent;

use super::camera::Camera;

/// Desktop mouse look: hold the right button and drag to turn.
///
/// The window reports the button through [`LookController::set_looking`];
/// raw device button ids differ between platforms and are not read here.
/// There is no pan and no zoom; the eye stays where the room puts it.
pub struct LookController {
    pub look_speed: f32,
    is_looking: bool,
}

impl LookController {
    pub fn new(look_speed: f32) -> Self {
        Self {
            look_speed,
            is_looking: false,
        }
    }

    /// Returns true when the camera changed
    pub fn process_events(&mut self, event: &DeviceEvent, camera: &mut Camera) -> bool {
        match event {
            DeviceEvent::MouseMotion { delta } if self.is_looking => {
                self.apply_drag(delta.0 as f32, delta.1 as f32, camera);
                true
            }
            _ => false,
        }
    }

    /// Dragging right turns right, dragging down looks down
    pub fn apply_drag(&self, dx: f32, dy: f32, camera: &mut Camera) {
        camera.add_yaw(-dx * self.look_speed);
        camera.add_pitch(-dy * self.look_speed);
    }

    pub fn set_looking(&mut self, looking: bool) {
        self.is_looking = looking;
    }

    pub fn is_looking(&self) -> bool {
        self.is_looking
    }
}
