use std::collections::BTreeMap;

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::trackball::{InteractionState, PointerButton, Trackball};

/// Adapter that bridges winit window events to the trackball controller's
/// gesture lifecycle. Tracks the cursor position (winit reports mouse
/// buttons without coordinates) and the set of live touch points.
#[derive(Debug, Default)]
pub struct WinitInputAdapter {
    attached: bool,
    cursor: Option<Vec2>,
    touches: BTreeMap<u64, Vec2>,
}

impl WinitInputAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start forwarding events. Idempotent; a no-op while the controller is
    /// disabled.
    pub fn attach(&mut self, controller: &Trackball) {
        if !controller.enabled {
            return;
        }
        self.attached = true;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Route one winit event into the controller.
    pub fn process_event(&mut self, controller: &mut Trackball, event: &WindowEvent) {
        if !self.attached {
            return;
        }

        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let pos = Vec2::new(position.x as f32, position.y as f32);
                self.cursor = Some(pos);
                controller.pointer_move(pos.x, pos.y);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let Some(button) = Self::map_mouse_button(*button) else {
                    return;
                };
                match state {
                    ElementState::Pressed => {
                        if let Some(pos) = self.cursor {
                            controller.pointer_down(button, pos.x, pos.y);
                        }
                    }
                    ElementState::Released => controller.pointer_up(),
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                controller.wheel(Self::wheel_ticks(delta));
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    if let Some(kind) = Self::map_override_key(keycode) {
                        match event.state {
                            ElementState::Pressed => controller.key_down(kind),
                            ElementState::Released => controller.key_up(),
                        }
                    }
                }
            }
            WindowEvent::Touch(touch) => {
                let pos = Vec2::new(touch.location.x as f32, touch.location.y as f32);
                match touch.phase {
                    TouchPhase::Started => {
                        self.touches.insert(touch.id, pos);
                        controller.touch_start(&self.touch_points());
                    }
                    TouchPhase::Moved => {
                        self.touches.insert(touch.id, pos);
                        controller.touch_move(&self.touch_points());
                    }
                    TouchPhase::Ended | TouchPhase::Cancelled => {
                        self.touches.remove(&touch.id);
                        controller.touch_end(&self.touch_points());
                    }
                }
            }
            WindowEvent::Resized(size) => {
                controller.handle_resize(size.width as f32, size.height as f32);
            }
            _ => {}
        }
    }

    fn touch_points(&self) -> Vec<Vec2> {
        self.touches.values().copied().collect()
    }

    /// Left drag rotates, middle zooms, right pans.
    fn map_mouse_button(button: MouseButton) -> Option<PointerButton> {
        match button {
            MouseButton::Left => Some(PointerButton::Left),
            MouseButton::Middle => Some(PointerButton::Middle),
            MouseButton::Right => Some(PointerButton::Right),
            _ => None,
        }
    }

    /// A/S/D restrict input to rotate/zoom/pan while held.
    fn map_override_key(keycode: KeyCode) -> Option<InteractionState> {
        match keycode {
            KeyCode::KeyA => Some(InteractionState::Rotate),
            KeyCode::KeyS => Some(InteractionState::Zoom),
            KeyCode::KeyD => Some(InteractionState::Pan),
            _ => None,
        }
    }

    /// Normalize wheel input to line-sized ticks.
    fn wheel_ticks(delta: &MouseScrollDelta) -> f32 {
        match delta {
            MouseScrollDelta::LineDelta(_, y) => *y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 40.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Pose;

    // Winit event construction needs fields without public constructors, so
    // these tests cover the adapter's own state and mappings.

    #[test]
    fn attach_is_gated_on_enabled_and_idempotent() {
        let mut controller = Trackball::new(Pose::default(), 100.0, 100.0);
        let mut adapter = WinitInputAdapter::new();

        controller.enabled = false;
        adapter.attach(&controller);
        assert!(!adapter.is_attached());

        controller.enabled = true;
        adapter.attach(&controller);
        adapter.attach(&controller);
        assert!(adapter.is_attached());
    }

    #[test]
    fn mouse_buttons_map_to_gesture_kinds() {
        assert_eq!(
            WinitInputAdapter::map_mouse_button(MouseButton::Left),
            Some(PointerButton::Left)
        );
        assert_eq!(
            WinitInputAdapter::map_mouse_button(MouseButton::Right),
            Some(PointerButton::Right)
        );
        assert_eq!(WinitInputAdapter::map_mouse_button(MouseButton::Back), None);
    }

    #[test]
    fn override_keys_map_to_states() {
        assert_eq!(
            WinitInputAdapter::map_override_key(KeyCode::KeyA),
            Some(InteractionState::Rotate)
        );
        assert_eq!(
            WinitInputAdapter::map_override_key(KeyCode::KeyS),
            Some(InteractionState::Zoom)
        );
        assert_eq!(
            WinitInputAdapter::map_override_key(KeyCode::KeyD),
            Some(InteractionState::Pan)
        );
        assert_eq!(WinitInputAdapter::map_override_key(KeyCode::KeyW), None);
    }

    #[test]
    fn wheel_ticks_normalize_pixel_deltas() {
        let lines = MouseScrollDelta::LineDelta(0.0, 2.0);
        assert_eq!(WinitInputAdapter::wheel_ticks(&lines), 2.0);

        let pixels = MouseScrollDelta::PixelDelta(winit::dpi::PhysicalPosition::new(0.0, 80.0));
        assert_eq!(WinitInputAdapter::wheel_ticks(&pixels), 2.0);
    }
}
