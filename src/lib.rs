pub mod camera;
pub mod cli;
pub mod commands;
pub mod events;
pub mod graph;
pub mod input;
pub mod math;
pub mod pose;
pub mod timer;
pub mod trackball;
pub mod view;

pub use camera::Camera;
pub use commands::{CameraReplay, Command, CommandKind, ObjectRef};
pub use events::{ControlEvent, EventKind, SubscriptionToken};
pub use graph::{CommandHandle, ProvenanceGraph};
pub use input::WinitInputAdapter;
pub use pose::Pose;
pub use trackball::{InteractionState, PointerButton, Trackball};
pub use view::ViewAdapter;
