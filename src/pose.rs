use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Camera orientation snapshot: where the camera sits, the point it looks
/// at, and which way is up. Two poses compare equal only when all three
/// vectors match component-wise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl Pose {
    pub const fn new(position: Vec3, target: Vec3, up: Vec3) -> Self {
        Self {
            position,
            target,
            up,
        }
    }

    /// Eye vector: position relative to the look-at target. Rotate and zoom
    /// math operates on this vector.
    pub fn eye(&self) -> Vec3 {
        self.position - self.target
    }

    /// Distance from the camera to its target.
    pub fn distance(&self) -> f32 {
        self.eye().length()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
        }
    }
}
