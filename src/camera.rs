use glam::{Mat4, Vec3};

use crate::pose::Pose;

/// Render-facing camera driven by the trackball controller. Holds the
/// mutable position/up pair plus projection parameters; orientation is set
/// by looking at a target.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Vec3,
    pub up: Vec3,
    forward: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 10.0),
            up: Vec3::Y,
            forward: Vec3::NEG_Z,
            fov_y: 75f32.to_radians(),
            aspect,
            near: 0.1,
            far: 10000.0,
        }
    }

    /// Point the camera at a world-space target from its current position.
    pub fn look_at(&mut self, target: Vec3) {
        self.forward = (target - self.position).normalize_or_zero();
    }

    /// Adopt a full pose: position, up, and orientation toward the target.
    pub fn apply(&mut self, pose: &Pose) {
        self.position = pose.position;
        self.up = pose.up;
        self.look_at(pose.target);
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn right(&self) -> Vec3 {
        self.forward.cross(self.up).normalize_or_zero()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }
}
