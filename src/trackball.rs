use glam::{Quat, Vec2, Vec3};
use log::{debug, trace};

use crate::events::{ControlEvent, EventHub, EventKind, SubscriptionToken};
use crate::math::{ease_in_out, ScreenRect};
use crate::pose::Pose;
use crate::timer::FixedStep;

/// Squared-distance threshold below which the pose counts as unmoved.
const EPS: f32 = 1e-6;

/// Interval between interpolation steps of an animated transition.
const TRANSITION_STEP_MS: f32 = 30.0;

/// Which gesture branch processes incoming input. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionState {
    None,
    Rotate,
    Zoom,
    Pan,
    TouchRotate,
    TouchZoom,
    TouchPan,
    Custom,
}

/// Pointer button pressed at gesture start. Selects the gesture kind when no
/// state is forced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

/// In-flight animated camera move. At most one exists per controller; a new
/// `change_camera` call jumps the pending one to completion first.
struct Transition {
    from: Pose,
    to: Pose,
    t: f32,
    delta: f32,
    step: FixedStep,
    on_complete: Option<Box<dyn FnOnce()>>,
}

type CustomHandler = Box<dyn FnMut(Vec2, Vec2)>;

/// Trackball camera controller.
///
/// Interprets pointer/touch/keyboard gestures into pose changes with
/// inertial damping, clamps camera distance, runs smooth ease-in/out
/// transitions, and emits lifecycle events through an observer table.
/// All time comes in through `update(dt_ms)`; the controller never reads
/// the clock itself.
pub struct Trackball {
    // tuning
    pub enabled: bool,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub no_rotate: bool,
    pub no_zoom: bool,
    pub no_pan: bool,
    pub no_custom: bool,
    pub static_moving: bool,
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,

    // pose
    position: Vec3,
    target: Vec3,
    up: Vec3,
    initial: Pose,
    screen: ScreenRect,

    // state machine
    state: InteractionState,
    previous_state: InteractionState,
    forced_state: InteractionState,
    dragging: bool,
    key_override: bool,

    // gesture buffers
    eye: Vec3,
    move_prev: Vec2,
    move_curr: Vec2,
    last_axis: Vec3,
    last_angle: f32,
    zoom_start: Vec2,
    zoom_end: Vec2,
    touch_zoom_distance_start: f32,
    touch_zoom_distance_end: f32,
    pan_start: Vec2,
    pan_end: Vec2,
    custom_start: Vec2,
    custom_end: Vec2,
    last_position: Vec3,

    transition: Option<Transition>,
    custom_handler: Option<CustomHandler>,
    hub: EventHub,
}

impl Trackball {
    pub fn new(initial: Pose, width: f32, height: f32) -> Self {
        Self {
            enabled: true,
            rotate_speed: 1.0,
            zoom_speed: 1.2,
            pan_speed: 0.3,
            no_rotate: false,
            no_zoom: false,
            no_pan: false,
            no_custom: false,
            static_moving: false,
            damping_factor: 0.2,
            min_distance: 0.0,
            max_distance: f32::INFINITY,

            position: initial.position,
            target: initial.target,
            up: initial.up,
            initial,
            screen: ScreenRect::new(width, height),

            state: InteractionState::None,
            previous_state: InteractionState::None,
            forced_state: InteractionState::None,
            dragging: false,
            key_override: false,

            eye: initial.eye(),
            move_prev: Vec2::ZERO,
            move_curr: Vec2::ZERO,
            last_axis: Vec3::ZERO,
            last_angle: 0.0,
            zoom_start: Vec2::ZERO,
            zoom_end: Vec2::ZERO,
            touch_zoom_distance_start: 0.0,
            touch_zoom_distance_end: 0.0,
            pan_start: Vec2::ZERO,
            pan_end: Vec2::ZERO,
            custom_start: Vec2::ZERO,
            custom_end: Vec2::ZERO,
            last_position: initial.position,

            transition: None,
            custom_handler: None,
            hub: EventHub::new(),
        }
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.target, self.up)
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn in_transition(&self) -> bool {
        self.transition.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn subscribe(
        &mut self,
        kind: EventKind,
        handler: impl FnMut(&ControlEvent) + 'static,
    ) -> SubscriptionToken {
        self.hub.subscribe(kind, handler)
    }

    pub fn unsubscribe(&mut self, token: SubscriptionToken) -> bool {
        self.hub.unsubscribe(token)
    }

    /// Hook run each update while in the Custom state, receiving the start
    /// and current screen projections of the gesture.
    pub fn set_custom_handler(&mut self, handler: impl FnMut(Vec2, Vec2) + 'static) {
        self.custom_handler = Some(Box::new(handler));
    }

    /// Recompute the screen rect used by the pointer projections.
    pub fn handle_resize(&mut self, width: f32, height: f32) {
        self.screen = ScreenRect::new(width, height);
    }

    /// Force the interaction state to a single gesture kind. It also becomes
    /// the resumption state after a keyboard override ends. Passing
    /// `InteractionState::None` clears the restriction.
    pub fn set_state(&mut self, state: InteractionState) {
        self.forced_state = state;
        self.previous_state = state;
        self.state = state;
    }

    fn accepts_input(&self) -> bool {
        self.enabled && self.transition.is_none()
    }

    // --- simulation step ---

    /// Advance one simulation step by `dt_ms` elapsed milliseconds.
    ///
    /// Applies buffered rotate/zoom/pan deltas to the eye vector, clamps
    /// distance, and emits `Change` when the position moved. While a
    /// transition is in flight only the transition advances; direct
    /// manipulation is locked out.
    pub fn update(&mut self, dt_ms: f32) {
        if self.transition.is_some() {
            self.advance_transition(dt_ms);
            self.emit_change_if_moved();
            return;
        }

        self.eye = self.position - self.target;

        if !self.no_rotate {
            self.rotate_camera();
        }
        if !self.no_zoom {
            self.zoom_camera();
        }
        if !self.no_pan {
            self.pan_camera();
        }
        if !self.no_custom {
            if let Some(mut handler) = self.custom_handler.take() {
                handler(self.custom_start, self.custom_end);
                self.custom_handler = Some(handler);
            }
        }

        self.position = self.target + self.eye;
        self.check_distances();
        self.emit_change_if_moved();
    }

    fn rotate_camera(&mut self) {
        let delta = self.move_curr - self.move_prev;
        let mut angle = delta.length();

        if angle != 0.0 {
            self.eye = self.position - self.target;

            let eye_dir = self.eye.normalize_or_zero();
            let up_dir = self.up.normalize_or_zero();
            let side_dir = up_dir.cross(eye_dir).normalize_or_zero();

            let move_dir = up_dir * delta.y + side_dir * delta.x;
            let axis = move_dir.cross(self.eye).normalize_or_zero();
            if axis == Vec3::ZERO {
                // degenerate gesture, pose stays put
                self.move_prev = self.move_curr;
                return;
            }

            angle *= self.rotate_speed;
            let quat = Quat::from_axis_angle(axis, angle);

            self.eye = quat * self.eye;
            self.up = quat * self.up;

            self.last_axis = axis;
            self.last_angle = angle;
        } else if !self.static_moving && self.last_angle != 0.0 {
            // inertial coast after release
            self.last_angle *= (1.0 - self.damping_factor).sqrt();
            self.eye = self.position - self.target;
            let quat = Quat::from_axis_angle(self.last_axis, self.last_angle);
            self.eye = quat * self.eye;
            self.up = quat * self.up;
        }

        self.move_prev = self.move_curr;
    }

    fn zoom_camera(&mut self) {
        if self.state == InteractionState::TouchZoom {
            if self.touch_zoom_distance_end > 0.0 && self.touch_zoom_distance_start > 0.0 {
                let factor = self.touch_zoom_distance_start / self.touch_zoom_distance_end;
                self.touch_zoom_distance_start = self.touch_zoom_distance_end;
                self.eye *= factor;
            }
        } else {
            let factor = 1.0 + (self.zoom_end.y - self.zoom_start.y) * self.zoom_speed;

            if factor != 1.0 && factor > 0.0 {
                self.eye *= factor;

                if self.static_moving {
                    self.zoom_start = self.zoom_end;
                } else {
                    self.zoom_start.y +=
                        (self.zoom_end.y - self.zoom_start.y) * self.damping_factor;
                }
            }
        }
    }

    fn pan_camera(&mut self) {
        let mut mouse_change = self.pan_end - self.pan_start;

        if mouse_change.length_squared() != 0.0 {
            mouse_change *= self.eye.length() * self.pan_speed;

            let mut pan = self.eye.cross(self.up).normalize_or_zero() * mouse_change.x;
            pan += self.up.normalize_or_zero() * mouse_change.y;

            self.position += pan;
            self.target += pan;

            if self.static_moving {
                self.pan_start = self.pan_end;
            } else {
                self.pan_start += (self.pan_end - self.pan_start) * self.damping_factor;
            }
        }
    }

    /// Rescale the eye vector onto [min_distance, max_distance], keeping
    /// its direction.
    fn check_distances(&mut self) {
        if self.no_zoom && self.no_pan {
            return;
        }

        if self.eye.length_squared() > self.max_distance * self.max_distance {
            self.eye = self.eye.normalize_or_zero() * self.max_distance;
            self.position = self.target + self.eye;
        }

        if self.eye.length_squared() < self.min_distance * self.min_distance {
            self.eye = self.eye.normalize_or_zero() * self.min_distance;
            self.position = self.target + self.eye;
        }
    }

    // --- animated transitions ---

    /// Begin an animated move to `to` over `duration_ms`, or apply it
    /// synchronously when the duration is zero or negative. A pending
    /// transition is jumped to completion first so interpolations never
    /// compound.
    pub fn change_camera(&mut self, to: Pose, duration_ms: f32) {
        self.change_camera_inner(to, duration_ms, None);
    }

    /// Like `change_camera`, invoking `on_complete` exactly once when the
    /// transition finishes (or is jumped to completion by a newer one).
    pub fn change_camera_then(
        &mut self,
        to: Pose,
        duration_ms: f32,
        on_complete: impl FnOnce() + 'static,
    ) {
        self.change_camera_inner(to, duration_ms, Some(Box::new(on_complete)));
    }

    fn change_camera_inner(
        &mut self,
        to: Pose,
        duration_ms: f32,
        on_complete: Option<Box<dyn FnOnce()>>,
    ) {
        if to == self.pose() {
            return;
        }

        self.finish_transition();

        if duration_ms <= 0.0 {
            self.apply_pose_now(to);
            if let Some(done) = on_complete {
                done();
            }
            return;
        }

        debug!(
            "camera transition started: {:?} -> {:?} over {}ms",
            self.position, to.position, duration_ms
        );

        self.transition = Some(Transition {
            from: self.pose(),
            to,
            t: 0.0,
            delta: TRANSITION_STEP_MS / duration_ms,
            step: FixedStep::new(TRANSITION_STEP_MS),
            on_complete,
        });
    }

    /// Jump a pending transition to its final pose and fire its completion
    /// callback. No-op when nothing is in flight.
    pub fn finish_transition(&mut self) {
        if let Some(tr) = self.transition.take() {
            self.apply_pose_now(tr.to);
            if let Some(done) = tr.on_complete {
                done();
            }
        }
    }

    fn advance_transition(&mut self, dt_ms: f32) {
        let steps = match self.transition.as_mut() {
            Some(tr) => tr.step.tick(dt_ms),
            None => return,
        };

        for _ in 0..steps {
            let step = match self.transition.as_mut() {
                Some(tr) => {
                    let k = ease_in_out(tr.t);
                    let next = Pose {
                        position: tr.from.position.lerp(tr.to.position, k),
                        target: tr.from.target.lerp(tr.to.target, k),
                        up: tr.from.up.lerp(tr.to.up, k).normalize(),
                    };
                    tr.t += tr.delta;
                    Some((next, tr.t > 1.0))
                }
                None => None,
            };

            let Some((next, finished)) = step else { break };
            self.apply_pose_now(next);

            if finished {
                trace!("camera transition finished");
                self.finish_transition();
                break;
            }
        }
    }

    /// Synchronous pose application: resets the gesture state machine and
    /// the change-tracking baseline. Forced-state restrictions survive.
    fn apply_pose_now(&mut self, pose: Pose) {
        self.state = InteractionState::None;
        self.previous_state = InteractionState::None;

        self.position = pose.position;
        self.target = pose.target;
        self.up = pose.up;
        self.eye = pose.eye();
        self.last_position = pose.position;
    }

    /// Snap back to the construction-time pose and notify observers.
    pub fn reset(&mut self) {
        let initial = self.initial;
        self.change_camera(initial, 0.0);
        self.emit(EventKind::Change);
    }

    // --- pointer gestures ---

    pub fn pointer_down(&mut self, button: PointerButton, x: f32, y: f32) {
        if !self.accepts_input() {
            return;
        }

        self.dragging = true;

        if self.state == InteractionState::None {
            self.state = match button {
                PointerButton::Left => InteractionState::Rotate,
                PointerButton::Middle => InteractionState::Zoom,
                PointerButton::Right => InteractionState::Pan,
            };
        }

        match self.state {
            InteractionState::Rotate if !self.no_rotate => {
                self.move_curr = self.screen.mouse_on_circle(x, y);
                self.move_prev = self.move_curr;
            }
            InteractionState::Zoom if !self.no_zoom => {
                self.zoom_start = self.screen.mouse_on_screen(x, y);
                self.zoom_end = self.zoom_start;
            }
            InteractionState::Pan if !self.no_pan => {
                self.pan_start = self.screen.mouse_on_screen(x, y);
                self.pan_end = self.pan_start;
            }
            InteractionState::Custom if !self.no_custom => {
                self.custom_start = self.screen.mouse_on_screen(x, y);
                self.custom_end = self.custom_start;
            }
            _ => {}
        }

        self.emit(EventKind::Start);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if !self.accepts_input() || !self.dragging {
            return;
        }

        match self.state {
            InteractionState::Rotate if !self.no_rotate => {
                self.move_prev = self.move_curr;
                self.move_curr = self.screen.mouse_on_circle(x, y);
            }
            InteractionState::Zoom if !self.no_zoom => {
                self.zoom_end = self.screen.mouse_on_screen(x, y);
            }
            InteractionState::Pan if !self.no_pan => {
                self.pan_end = self.screen.mouse_on_screen(x, y);
            }
            InteractionState::Custom if !self.no_custom => {
                self.custom_end = self.screen.mouse_on_screen(x, y);
            }
            _ => {}
        }
    }

    pub fn pointer_up(&mut self) {
        if !self.accepts_input() || !self.dragging {
            return;
        }

        self.dragging = false;

        if self.forced_state == InteractionState::None {
            self.state = InteractionState::None;
        }

        self.emit(EventKind::End);
    }

    /// A wheel tick is an instantaneous, atomic zoom: it buffers the delta
    /// and fires a synthetic ZoomStart/ZoomEnd pair, both carrying the
    /// camera's actual pose.
    pub fn wheel(&mut self, delta: f32) {
        if !self.accepts_input() {
            return;
        }

        if self.state == InteractionState::Custom {
            self.custom_start.y += delta * 0.01;
        } else {
            self.zoom_start.y += delta * 0.01;
        }

        self.emit(EventKind::ZoomStart);
        self.emit(EventKind::ZoomEnd);
    }

    // --- keyboard overrides ---

    /// Temporarily restrict input to one gesture kind while a modifier key
    /// is held. Repeat key-down events while already overriding are ignored.
    pub fn key_down(&mut self, kind: InteractionState) {
        if !self.accepts_input() || self.key_override {
            return;
        }

        self.key_override = true;
        self.previous_state = self.state;

        if self.state != InteractionState::None {
            return;
        }

        let allowed = match kind {
            InteractionState::Rotate => !self.no_rotate,
            InteractionState::Zoom => !self.no_zoom,
            InteractionState::Pan => !self.no_pan,
            _ => false,
        };
        if allowed {
            self.state = kind;
        }
    }

    /// Revert a keyboard override, restoring the prior state.
    pub fn key_up(&mut self) {
        if !self.enabled || !self.key_override {
            return;
        }

        self.key_override = false;
        self.state = self.previous_state;
    }

    // --- touch gestures ---

    /// Touch-down with the full current set of touch points. The state is
    /// re-derived from the touch count, so a second finger landing mid
    /// single-touch gesture switches branches cleanly.
    pub fn touch_start(&mut self, touches: &[Vec2]) {
        if !self.accepts_input() {
            return;
        }

        if self.forced_state == InteractionState::None {
            match touches.len() {
                1 => {
                    self.state = InteractionState::TouchRotate;
                    self.move_curr = self.screen.mouse_on_circle(touches[0].x, touches[0].y);
                    self.move_prev = self.move_curr;
                }
                2 => {
                    self.state = InteractionState::TouchZoom;
                    let distance = touches[0].distance(touches[1]);
                    self.touch_zoom_distance_start = distance;
                    self.touch_zoom_distance_end = distance;

                    let mid = (touches[0] + touches[1]) * 0.5;
                    self.pan_start = self.screen.mouse_on_screen(mid.x, mid.y);
                    self.pan_end = self.pan_start;
                }
                _ => self.state = InteractionState::None,
            }
        } else {
            match self.forced_state {
                InteractionState::Rotate | InteractionState::TouchRotate => {
                    if let Some(first) = touches.first() {
                        self.state = InteractionState::TouchRotate;
                        self.move_curr = self.screen.mouse_on_circle(first.x, first.y);
                        self.move_prev = self.move_curr;
                    }
                }
                InteractionState::Zoom | InteractionState::TouchZoom => {
                    if touches.len() >= 2 {
                        self.state = InteractionState::TouchZoom;
                        let distance = touches[0].distance(touches[1]);
                        self.touch_zoom_distance_start = distance;
                        self.touch_zoom_distance_end = distance;
                    } else if let Some(first) = touches.first() {
                        self.state = InteractionState::Zoom;
                        self.zoom_start = self.screen.mouse_on_screen(first.x, first.y);
                        self.zoom_end = self.zoom_start;
                    }
                }
                InteractionState::Pan | InteractionState::TouchPan => {
                    if touches.len() >= 2 {
                        self.state = InteractionState::TouchPan;
                        let mid = (touches[0] + touches[1]) * 0.5;
                        self.pan_start = self.screen.mouse_on_screen(mid.x, mid.y);
                        self.pan_end = self.pan_start;
                    } else if let Some(first) = touches.first() {
                        self.state = InteractionState::Pan;
                        self.pan_start = self.screen.mouse_on_screen(first.x, first.y);
                        self.pan_end = self.pan_start;
                    }
                }
                InteractionState::Custom => {
                    if touches.len() >= 2 {
                        self.state = InteractionState::Custom;
                        let mid = (touches[0] + touches[1]) * 0.5;
                        self.custom_start = self.screen.mouse_on_screen(mid.x, mid.y);
                        self.custom_end = self.custom_start;
                    }
                }
                _ => self.state = InteractionState::None,
            }
        }

        self.emit(EventKind::Start);
    }

    pub fn touch_move(&mut self, touches: &[Vec2]) {
        if !self.accepts_input() {
            return;
        }

        if self.forced_state == InteractionState::None {
            match touches.len() {
                1 => {
                    self.move_prev = self.move_curr;
                    self.move_curr = self.screen.mouse_on_circle(touches[0].x, touches[0].y);
                }
                2 => {
                    self.touch_zoom_distance_end = touches[0].distance(touches[1]);

                    let mid = (touches[0] + touches[1]) * 0.5;
                    self.pan_end = self.screen.mouse_on_screen(mid.x, mid.y);
                }
                _ => self.state = InteractionState::None,
            }
        } else {
            match self.state {
                InteractionState::TouchRotate | InteractionState::Rotate => {
                    if let Some(first) = touches.first() {
                        self.move_prev = self.move_curr;
                        self.move_curr = self.screen.mouse_on_circle(first.x, first.y);
                    }
                }
                InteractionState::Zoom => {
                    if let Some(first) = touches.first() {
                        self.zoom_end = self.screen.mouse_on_screen(first.x, first.y);
                    }
                }
                InteractionState::Pan => {
                    if let Some(first) = touches.first() {
                        self.pan_end = self.screen.mouse_on_screen(first.x, first.y);
                    }
                }
                InteractionState::TouchZoom => {
                    if touches.len() >= 2 {
                        self.touch_zoom_distance_end = touches[0].distance(touches[1]);
                    }
                }
                InteractionState::TouchPan => {
                    if touches.len() >= 2 {
                        let mid = (touches[0] + touches[1]) * 0.5;
                        self.pan_end = self.screen.mouse_on_screen(mid.x, mid.y);
                    }
                }
                InteractionState::Custom => {
                    if touches.len() >= 2 {
                        let mid = (touches[0] + touches[1]) * 0.5;
                        self.custom_end = self.screen.mouse_on_screen(mid.x, mid.y);
                    }
                }
                _ => self.state = InteractionState::None,
            }
        }
    }

    /// Touch-up with the touches that remain on the surface.
    pub fn touch_end(&mut self, touches: &[Vec2]) {
        if !self.accepts_input() {
            return;
        }

        if self.forced_state == InteractionState::None {
            match touches.len() {
                1 => {
                    self.move_prev = self.move_curr;
                    self.move_curr = self.screen.mouse_on_circle(touches[0].x, touches[0].y);
                }
                2 => {
                    self.touch_zoom_distance_start = 0.0;
                    self.touch_zoom_distance_end = 0.0;

                    let mid = (touches[0] + touches[1]) * 0.5;
                    self.pan_end = self.screen.mouse_on_screen(mid.x, mid.y);
                    self.pan_start = self.pan_end;
                }
                _ => {}
            }

            self.state = InteractionState::None;
        } else {
            match self.state {
                InteractionState::TouchRotate | InteractionState::Rotate => {
                    if let Some(first) = touches.first() {
                        self.move_prev = self.move_curr;
                        self.move_curr = self.screen.mouse_on_circle(first.x, first.y);
                    }
                }
                InteractionState::TouchZoom => {
                    self.touch_zoom_distance_start = 0.0;
                    self.touch_zoom_distance_end = 0.0;
                    self.state = InteractionState::Zoom;
                }
                InteractionState::TouchPan => {
                    if touches.len() >= 2 {
                        let mid = (touches[0] + touches[1]) * 0.5;
                        self.pan_end = self.screen.mouse_on_screen(mid.x, mid.y);
                        self.pan_start = self.pan_end;
                    }
                    self.state = InteractionState::Pan;
                }
                InteractionState::Custom => {
                    if touches.len() >= 2 {
                        let mid = (touches[0] + touches[1]) * 0.5;
                        self.custom_end = self.screen.mouse_on_screen(mid.x, mid.y);
                        self.custom_start = self.custom_end;
                    }
                }
                InteractionState::Zoom | InteractionState::Pan => {}
                _ => self.state = InteractionState::None,
            }
        }

        self.emit(EventKind::End);
    }

    // --- event plumbing ---

    fn emit(&mut self, kind: EventKind) {
        let event = ControlEvent {
            kind,
            pose: self.pose(),
            state: self.state,
        };
        self.hub.emit(&event);
    }

    fn emit_change_if_moved(&mut self) {
        if self.last_position.distance_squared(self.position) > EPS {
            self.last_position = self.position;
            self.emit(EventKind::Change);
        }
    }
}

impl std::fmt::Debug for Trackball {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trackball")
            .field("enabled", &self.enabled)
            .field("state", &self.state)
            .field("pose", &self.pose())
            .field("in_transition", &self.in_transition())
            .finish()
    }
}
