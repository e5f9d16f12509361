use serde::{Deserialize, Serialize};

/// A single to-do entry.
///
/// `position` is the 1-based display rank. It is persisted under the `index`
/// key so snapshots keep the `[{ description, index, completed }]` layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub description: String,
    #[serde(rename = "index")]
    pub position: i64,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// New open task; `TaskList::add` assigns the position
    pub fn new(description: impl Into<String>) -> Self {
        Self::with_state(description, 0, false)
    }

    pub fn with_position(description: impl Into<String>, position: i64) -> Self {
        Self::with_state(description, position, false)
    }

    pub fn with_state(description: impl Into<String>, position: i64, completed: bool) -> Self {
        Task {
            description: description.into(),
            position,
            completed,
        }
    }
}
