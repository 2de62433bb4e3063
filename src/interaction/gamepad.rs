//! Gamepad and haptics seams
//!
//! Only the right thumbstick (axes 2 and 3) and the first haptic actuator are
//! used. Hardware that is missing turns the dependent step into a no-op.

use std::time::Duration;

/// Intensity of the pulse sent when an object is grabbed
pub const GRAB_PULSE_INTENSITY: f32 = 0.5;
/// Length of the grab pulse
pub const GRAB_PULSE_DURATION: Duration = Duration::from_millis(100);

/// Axis index of the thumbstick's horizontal component
pub const THUMBSTICK_X_AXIS: usize = 2;
/// Axis index of the thumbstick's vertical component
pub const THUMBSTICK_Y_AXIS: usize = 3;

pub trait HapticActuator {
    fn pulse(&mut self, intensity: f32, duration: Duration);
}

/// Input state of the controller's gamepad
pub trait Gamepad {
    fn axes(&self) -> &[f32];

    /// First haptic actuator, if the device has one
    fn haptic_actuator(&mut self) -> Option<&mut dyn HapticActuator> {
        None
    }
}

/// Reads axes 2 and 3; absent axes count as centred
pub fn thumbstick(gamepad: &dyn Gamepad) -> (f32, f32) {
    let axes = gamepad.axes();
    let axis = |index: usize| axes.get(index).copied().unwrap_or(0.0);
    (axis(THUMBSTICK_X_AXIS), axis(THUMBSTICK_Y_AXIS))
}

/// Gamepad driven by software, used by the desktop viewer for WASD movement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VirtualGamepad {
    axes: [f32; 4],
}

impl VirtualGamepad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_thumbstick(&mut self, x: f32, y: f32) {
        self.axes[THUMBSTICK_X_AXIS] = x.clamp(-1.0, 1.0);
        self.axes[THUMBSTICK_Y_AXIS] = y.clamp(-1.0, 1.0);
    }
}

impl Gamepad for VirtualGamepad {
    fn axes(&self) -> &[f32] {
        &self.axes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TwoAxisPad([f32; 2]);

    impl Gamepad for TwoAxisPad {
        fn axes(&self) -> &[f32] {
            &self.0
        }
    }

    #[test]
    fn test_short_axes_read_as_centred() {
        let pad = TwoAxisPad([0.7, -0.3]);
        assert_eq!(thumbstick(&pad), (0.0, 0.0));
    }

    #[test]
    fn test_virtual_gamepad_clamps() {
        let mut pad = VirtualGamepad::new();
        pad.set_thumbstick(2.0, -0.5);
        assert_eq!(thumbstick(&pad), (1.0, -0.5));
        assert!(pad.haptic_actuator().is_none());
    }
}
