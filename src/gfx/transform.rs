//! Position / rotation / scale transforms
//!
//! Rotations are stored as quaternions so a controller orientation can be
//! copied onto an object exactly. Layout data describes rotations as XYZ Euler
//! angles in radians, which [`euler_xyz`] converts.

use cgmath::{Matrix4, One, Quaternion, Rad, Rotation3, Vector3};

/// Builds a rotation from XYZ Euler angles (radians), applied as `Rx * Ry * Rz`.
pub fn euler_xyz(angles: Vector3<f32>) -> Quaternion<f32> {
    Quaternion::from_angle_x(Rad(angles.x))
        * Quaternion::from_angle_y(Rad(angles.y))
        * Quaternion::from_angle_z(Rad(angles.z))
}

/// Local transform of a scene object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn new(position: Vector3<f32>, rotation: Quaternion<f32>, scale: Vector3<f32>) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Unit-scale transform from a position and XYZ Euler angles
    pub fn from_euler(position: Vector3<f32>, angles: Vector3<f32>) -> Self {
        Self {
            position,
            rotation: euler_xyz(angles),
            ..Default::default()
        }
    }

    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.set_uniform_scale(scale);
        self
    }

    pub fn set_uniform_scale(&mut self, scale: f32) {
        self.scale = Vector3::new(scale, scale, scale);
    }

    /// Composes `T * R * S`
    pub fn matrix(&self) -> Matrix4<f32> {
        let t = Matrix4::from_translation(self.position);
        let r = Matrix4::from(self.rotation);
        let s = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        t * r * s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::{Rotation, Vector4};
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_identity_matrix() {
        let m = Transform::default().matrix();
        let p = m * Vector4::new(1.0, 2.0, 3.0, 1.0);
        assert_relative_eq!(p.x, 1.0);
        assert_relative_eq!(p.y, 2.0);
        assert_relative_eq!(p.z, 3.0);
    }

    #[test]
    fn test_trs_order() {
        let transform = Transform::from_euler(
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, FRAC_PI_2, 0.0),
        )
        .with_uniform_scale(2.0);

        // +X scaled to 2, yawed a quarter turn onto -Z, then translated
        let p = transform.matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(p.z, -2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_euler_single_axis_matches_axis_rotation() {
        let q = euler_xyz(Vector3::new(0.0, 0.0, FRAC_PI_2));
        let v = q.rotate_vector(Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(v.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(v.y, 1.0, epsilon = 1e-6);
    }
}
