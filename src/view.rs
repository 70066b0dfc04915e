use std::cell::RefCell;
use std::rc::Rc;

use log::info;

use crate::camera::Camera;
use crate::commands::{CameraReplay, Command, CommandKind, ObjectRef, DEFAULT_REPLAY_MS};
use crate::events::EventKind;
use crate::graph::ProvenanceGraph;
use crate::pose::Pose;
use crate::timer::Debounce;
use crate::trackball::Trackball;

/// Quiet window after the last wheel tick before a zoom burst becomes one
/// provenance command.
const ZOOM_DEBOUNCE_MS: f32 = 500.0;

/// Placement of the view inside the hosting shell.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// State shared between the adapter and its event handlers.
struct BridgeState {
    orientation_start: Option<Pose>,
    zoom_old: Option<Pose>,
    zoom_debounce: Debounce,
    replaying: bool,
}

type ScreenshotHook = Box<dyn Fn() -> String>;

/// Bridges trackball lifecycle events to the provenance graph.
///
/// Each discrete gesture becomes one command holding the pose before and
/// after; rapid wheel ticks are debounced into a single zoom command.
/// Replaying a command back into the controller goes through the
/// `CameraReplay` impl, which suppresses recording so undo/redo never
/// feeds back into the history.
pub struct ViewAdapter {
    controller: Rc<RefCell<Trackball>>,
    camera: Rc<RefCell<Camera>>,
    graph: Rc<RefCell<ProvenanceGraph>>,
    bridge: Rc<RefCell<BridgeState>>,
    object: ObjectRef,
    dims: (f32, f32),
    bounds: Bounds,
    screenshot_hook: Option<ScreenshotHook>,
}

impl ViewAdapter {
    /// Build the adapter and its controller. Works before any rendering
    /// surface exists: the pose and dimensions start at lazy defaults and
    /// are corrected by the first `set_bounds` call.
    pub fn new(graph: Rc<RefCell<ProvenanceGraph>>) -> Self {
        let object = graph.borrow_mut().find_or_add_object("camera", "visual");

        let controller = Rc::new(RefCell::new(Trackball::new(Pose::default(), 100.0, 100.0)));
        let camera = Rc::new(RefCell::new(Camera::new(1.0)));
        let bridge = Rc::new(RefCell::new(BridgeState {
            orientation_start: None,
            zoom_old: None,
            zoom_debounce: Debounce::new(ZOOM_DEBOUNCE_MS),
            replaying: false,
        }));

        {
            let mut ctrl = controller.borrow_mut();

            let state = bridge.clone();
            ctrl.subscribe(EventKind::Start, move |ev| {
                let mut state = state.borrow_mut();
                if !state.replaying {
                    state.orientation_start = Some(ev.pose);
                }
            });

            let state = bridge.clone();
            let sink = graph.clone();
            ctrl.subscribe(EventKind::End, move |ev| {
                let mut state = state.borrow_mut();
                if state.replaying {
                    return;
                }
                if let Some(old) = state.orientation_start.take() {
                    sink.borrow_mut().push(Command::new(
                        CommandKind::SetControlOrientation,
                        object,
                        old,
                        ev.pose,
                    ));
                }
            });

            let state = bridge.clone();
            ctrl.subscribe(EventKind::ZoomStart, move |ev| {
                let mut state = state.borrow_mut();
                // first tick of a burst wins as the before-pose
                if !state.replaying && !state.zoom_debounce.is_armed() {
                    state.zoom_old = Some(ev.pose);
                }
            });

            let state = bridge.clone();
            ctrl.subscribe(EventKind::ZoomEnd, move |_| {
                let mut state = state.borrow_mut();
                if !state.replaying {
                    state.zoom_debounce.poke();
                }
            });
        }

        Self {
            controller,
            camera,
            graph,
            bridge,
            object,
            dims: (100.0, 100.0),
            bounds: Bounds::default(),
            screenshot_hook: None,
        }
    }

    pub fn controller(&self) -> Rc<RefCell<Trackball>> {
        self.controller.clone()
    }

    pub fn camera(&self) -> Rc<RefCell<Camera>> {
        self.camera.clone()
    }

    pub fn graph(&self) -> Rc<RefCell<ProvenanceGraph>> {
        self.graph.clone()
    }

    pub fn target_ref(&self) -> ObjectRef {
        self.object
    }

    /// Advance the controller and flush any debounced zoom burst into the
    /// graph. Call once per rendered frame.
    pub fn update(&mut self, dt_ms: f32) {
        self.controller.borrow_mut().update(dt_ms);

        let fired = self.bridge.borrow_mut().zoom_debounce.tick(dt_ms);
        if fired {
            let new = self.controller.borrow().pose();
            let old = self.bridge.borrow_mut().zoom_old.take();
            if let Some(old) = old {
                self.graph.borrow_mut().push(Command::new(
                    CommandKind::SetControlZoom,
                    self.object,
                    old,
                    new,
                ));
            }
        }

        self.camera.borrow_mut().apply(&self.controller.borrow().pose());
    }

    pub fn get_dimensions(&self) -> (f32, f32) {
        self.dims
    }

    pub fn get_bounds(&self) -> Bounds {
        self.bounds
    }

    /// Place and size the view; recomputes the camera aspect ratio and the
    /// controller's screen-space bookkeeping.
    pub fn set_bounds(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.bounds = Bounds { x, y, w, h };
        self.dims = (w, h);

        if h > 0.0 {
            self.camera.borrow_mut().set_aspect(w / h);
        }
        self.controller.borrow_mut().handle_resize(w, h);
    }

    /// Enable or disable direct manipulation; animated transitions and
    /// replay are unaffected.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.controller.borrow_mut().enabled = interactive;
        info!("view interactive: {}", interactive);
    }

    pub fn undo(&mut self) -> bool {
        let graph = self.graph.clone();
        let mut graph = graph.borrow_mut();
        graph.undo(self)
    }

    pub fn redo(&mut self) -> bool {
        let graph = self.graph.clone();
        let mut graph = graph.borrow_mut();
        graph.redo(self)
    }

    pub fn set_screenshot_hook(&mut self, hook: impl Fn() -> String + 'static) {
        self.screenshot_hook = Some(Box::new(hook));
    }

    /// Export hook for the UI shell; correctness is not this core's concern.
    pub fn make_screenshot(&self) -> Option<String> {
        self.screenshot_hook.as_ref().map(|hook| hook())
    }

    fn replay(&mut self, pose: Pose, within_ms: f32) {
        self.bridge.borrow_mut().replaying = true;
        let duration = if within_ms > 0.0 {
            within_ms
        } else {
            DEFAULT_REPLAY_MS
        };
        self.controller.borrow_mut().change_camera(pose, duration);
        self.bridge.borrow_mut().replaying = false;
    }
}

impl CameraReplay for ViewAdapter {
    fn set_control_zoom(&mut self, pose: Pose, within_ms: f32) {
        self.replay(pose, within_ms);
    }

    fn set_control_orientation(&mut self, pose: Pose, within_ms: f32) {
        self.replay(pose, within_ms);
    }
}

impl std::fmt::Debug for ViewAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewAdapter")
            .field("dims", &self.dims)
            .field("bounds", &self.bounds)
            .finish()
    }
}
