use cgmath::{perspective, Deg, Matrix4, Quaternion, Rad, Rotation3, Vector3};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Pitch stays just short of straight up or down
pub const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// First-person perspective camera standing in the room.
///
/// Looks down -Z at zero yaw and pitch, Y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vector3<f32>,
    /// Rotation about +Y in radians
    pub yaw: f32,
    /// Rotation about the camera's X axis in radians, positive looks up
    pub pitch: f32,
    pub fovy: Deg<f32>,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 1.0, 0.0),
            yaw: 0.0,
            pitch: 0.0,
            fovy: Deg(50.0),
            aspect: 16.0 / 9.0,
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            aspect,
            ..Default::default()
        }
    }

    pub fn rotation(&self) -> Quaternion<f32> {
        Quaternion::from_angle_y(Rad(self.yaw)) * Quaternion::from_angle_x(Rad(self.pitch))
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.yaw = (self.yaw + delta) % std::f32::consts::TAU;
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.pitch = (self.pitch + delta).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Updates the aspect ratio. A zero-sized viewport is ignored.
    pub fn resize_projection(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.aspect = width as f32 / height as f32;
        true
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::from(self.rotation().conjugate()) * Matrix4::from_translation(-self.position)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }

    pub fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// View-projection without the eye translation, for backgrounds at infinity
    pub fn orientation_view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix() * Matrix4::from(self.rotation().conjugate())
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_position: self.position.extend(1.0).into(),
            view_proj: self.build_view_projection_matrix().into(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// Eye position in homogeneous coordinates, padded to 16 bytes
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
}
