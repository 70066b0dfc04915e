use serde::{Deserialize, Serialize};

use crate::pose::Pose;

/// Replay duration used when a command carries no explicit timing.
pub const DEFAULT_REPLAY_MS: f32 = 1000.0;

/// Which controller operation a provenance command replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    SetControlZoom,
    SetControlOrientation,
}

/// Stable reference to a provenance-tracked object, handed out by
/// `ProvenanceGraph::find_or_add_object`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef(pub(crate) u32);

/// Sink that applies a recorded pose during replay without recording a new
/// command. The view adapter implements this over the trackball controller.
pub trait CameraReplay {
    fn set_control_zoom(&mut self, pose: Pose, within_ms: f32);
    fn set_control_orientation(&mut self, pose: Pose, within_ms: f32);
}

/// Provenance entry for one discrete camera change: the pose before and
/// after a gesture. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub kind: CommandKind,
    pub target: ObjectRef,
    pub old: Pose,
    pub new: Pose,
}

impl Command {
    pub fn new(kind: CommandKind, target: ObjectRef, old: Pose, new: Pose) -> Self {
        Self {
            kind,
            target,
            old,
            new,
        }
    }

    /// Apply the after-pose (redo direction).
    pub fn execute(&self, replay: &mut dyn CameraReplay) {
        self.apply(replay, self.new);
    }

    /// Apply the before-pose (undo direction).
    pub fn undo(&self, replay: &mut dyn CameraReplay) {
        self.apply(replay, self.old);
    }

    fn apply(&self, replay: &mut dyn CameraReplay, pose: Pose) {
        match self.kind {
            CommandKind::SetControlZoom => replay.set_control_zoom(pose, DEFAULT_REPLAY_MS),
            CommandKind::SetControlOrientation => {
                replay.set_control_orientation(pose, DEFAULT_REPLAY_MS)
            }
        }
    }

    /// Merge with a later command of the same kind on the same target,
    /// discarding the intermediate pose. Returns `None` for any other pair.
    pub fn compress(&self, later: &Command) -> Option<Command> {
        if self.kind != later.kind || self.target != later.target {
            return None;
        }

        Some(Command::new(self.kind, self.target, self.old, later.new))
    }
}
