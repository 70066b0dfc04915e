use glam::Vec2;

/// Ease-in/ease-out curve for animated camera transitions.
/// Quadratic on both ends, continuous at t = 0.5.
pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

/// Screen rectangle used to turn pointer pixels into gesture coordinates.
#[derive(Debug, Clone, Copy)]
pub struct ScreenRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ScreenRect {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }

    /// Pointer position normalized to [0, 1] in both axes.
    /// Used for zoom and pan gestures.
    pub fn mouse_on_screen(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(
            (x - self.left) / self.width,
            (y - self.top) / self.height,
        )
    }

    /// Pointer position projected onto the virtual trackball circle,
    /// centered on the screen. Both axes divide by width so rotation speed
    /// is isotropic on non-square viewports.
    pub fn mouse_on_circle(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(
            (x - self.width * 0.5 - self.left) / (self.width * 0.5),
            (self.height + 2.0 * (self.top - y)) / self.width,
        )
    }
}
