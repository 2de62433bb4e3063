//! The single XR controller: pose, connection and visual

use std::fmt;
use std::str::FromStr;

use cgmath::{One, Quaternion, Rotation, Vector3, Zero};

use crate::gfx::geometry::{generate_pointer_beam, generate_ring, GeometryData};
use crate::gfx::picking::Ray;

/// How the input source aims
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetRayMode {
    TrackedPointer,
    Gaze,
    Screen,
}

impl FromStr for TargetRayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tracked-pointer" => Ok(TargetRayMode::TrackedPointer),
            "gaze" => Ok(TargetRayMode::Gaze),
            "screen" => Ok(TargetRayMode::Screen),
            other => Err(format!("unknown target ray mode: {}", other)),
        }
    }
}

impl fmt::Display for TargetRayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TargetRayMode::TrackedPointer => "tracked-pointer",
            TargetRayMode::Gaze => "gaze",
            TargetRayMode::Screen => "screen",
        })
    }
}

/// What is drawn at the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControllerVisual {
    /// Beam from the controller to one metre ahead
    PointerLine { length: f32 },
    /// Ring floating in front of the eyes
    GazeRing {
        inner_radius: f32,
        outer_radius: f32,
        segments: u32,
        distance: f32,
    },
}

impl ControllerVisual {
    pub const POINTER_THICKNESS: f32 = 0.004;

    /// Visual for a mode; screen input draws nothing
    pub fn for_mode(mode: TargetRayMode) -> Option<Self> {
        match mode {
            TargetRayMode::TrackedPointer => Some(ControllerVisual::PointerLine { length: 1.0 }),
            TargetRayMode::Gaze => Some(ControllerVisual::GazeRing {
                inner_radius: 0.02,
                outer_radius: 0.04,
                segments: 32,
                distance: 1.0,
            }),
            TargetRayMode::Screen => None,
        }
    }

    /// Mesh in controller space
    pub fn geometry(&self) -> GeometryData {
        match *self {
            ControllerVisual::PointerLine { length } => {
                generate_pointer_beam(length, Self::POINTER_THICKNESS)
            }
            ControllerVisual::GazeRing {
                inner_radius,
                outer_radius,
                segments,
                distance,
            } => generate_ring(inner_radius, outer_radius, segments, -distance),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Connection {
    mode: TargetRayMode,
    visual: Option<ControllerVisual>,
}

/// Pose and connection state of the controller, in world space
#[derive(Debug, Clone, PartialEq)]
pub struct Controller {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    connection: Option<Connection>,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    pub fn new() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Quaternion::one(),
            connection: None,
        }
    }

    pub fn set_pose(&mut self, position: Vector3<f32>, rotation: Quaternion<f32>) {
        self.position = position;
        self.rotation = rotation;
    }

    /// Unit vector the controller points along (its local -Z)
    pub fn forward(&self) -> Vector3<f32> {
        self.rotation.rotate_vector(-Vector3::unit_z())
    }

    /// Pick ray from the controller pose
    pub fn ray(&self) -> Ray {
        Ray::new(self.position, self.forward())
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn target_ray_mode(&self) -> Option<TargetRayMode> {
        self.connection.map(|c| c.mode)
    }

    pub fn visual(&self) -> Option<ControllerVisual> {
        self.connection.and_then(|c| c.visual)
    }

    pub(crate) fn connect(&mut self, mode: TargetRayMode) {
        let visual = ControllerVisual::for_mode(mode);
        log::info!("Controller connected ({}), visual {:?}", mode, visual);
        self.connection = Some(Connection { mode, visual });
    }

    pub(crate) fn disconnect(&mut self) {
        if self.connection.take().is_some() {
            log::info!("Controller disconnected");
        }
    }
}
