use log::debug;
use serde::{Deserialize, Serialize};

use crate::commands::{CameraReplay, Command, ObjectRef};

/// Handle to a pushed command, usable to look it up later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandHandle(usize);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ObjectEntry {
    name: String,
    category: String,
}

/// Linear provenance history of camera commands with undo/redo and
/// adjacent-command compression.
///
/// `cursor` counts the applied prefix: commands below it are in effect,
/// commands at or above it are the redo tail.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProvenanceGraph {
    objects: Vec<ObjectEntry>,
    history: Vec<Command>,
    cursor: usize,
}

impl ProvenanceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stable reference for a named object; repeated calls with the same
    /// name and category return the same reference.
    pub fn find_or_add_object(&mut self, name: &str, category: &str) -> ObjectRef {
        if let Some(index) = self
            .objects
            .iter()
            .position(|o| o.name == name && o.category == category)
        {
            return ObjectRef(index as u32);
        }

        self.objects.push(ObjectEntry {
            name: name.to_string(),
            category: category.to_string(),
        });
        ObjectRef((self.objects.len() - 1) as u32)
    }

    /// Append a command. Any redo tail left by prior undos is discarded.
    pub fn push(&mut self, command: Command) -> CommandHandle {
        self.history.truncate(self.cursor);
        self.history.push(command);
        self.cursor = self.history.len();

        debug!(
            "provenance push: {:?} (history depth {})",
            command.kind,
            self.history.len()
        );
        CommandHandle(self.history.len() - 1)
    }

    /// Revert the most recent applied command by replaying its before-pose.
    /// Returns false when there is nothing to undo.
    pub fn undo(&mut self, replay: &mut dyn CameraReplay) -> bool {
        if self.cursor == 0 {
            return false;
        }

        self.cursor -= 1;
        self.history[self.cursor].undo(replay);
        true
    }

    /// Re-apply the next undone command. Returns false at the history head.
    pub fn redo(&mut self, replay: &mut dyn CameraReplay) -> bool {
        if self.cursor >= self.history.len() {
            return false;
        }

        self.history[self.cursor].execute(replay);
        self.cursor += 1;
        true
    }

    /// Fold adjacent same-kind, same-target commands into single entries,
    /// collapsing intermediate poses. Only runs when the whole history is
    /// applied (no pending redo tail); returns the number of entries
    /// removed.
    pub fn compress(&mut self) -> usize {
        if self.cursor != self.history.len() {
            return 0;
        }

        let before = self.history.len();
        let mut compressed: Vec<Command> = Vec::with_capacity(before);

        for command in self.history.drain(..) {
            match compressed.last().and_then(|prev| prev.compress(&command)) {
                Some(merged) => {
                    let last = compressed.len() - 1;
                    compressed[last] = merged;
                }
                None => compressed.push(command),
            }
        }

        self.history = compressed;
        self.cursor = self.history.len();

        let removed = before - self.history.len();
        if removed > 0 {
            debug!("provenance compress: removed {} entries", removed);
        }
        removed
    }

    pub fn commands(&self) -> &[Command] {
        &self.history
    }

    pub fn get(&self, handle: CommandHandle) -> Option<&Command> {
        self.history.get(handle.0)
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Number of applied commands (undo moves this down, redo back up).
    pub fn applied(&self) -> usize {
        self.cursor
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
