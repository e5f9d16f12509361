use thiserror::Error;

/// All possible errors in the to-do list
#[derive(Error, Debug)]
pub enum TodoError {
    #[error("No task at slot {slot} (list has {len} tasks)")]
    InvalidSlot { slot: usize, len: usize },

    #[error("No task #{index} (list has {len} tasks)")]
    InvalidIndex { index: usize, len: usize },

    #[error("No saved list found under key `{0}`")]
    SnapshotMissing(String),

    #[error("Saved list under key `{key}` is malformed: {source}")]
    Deserialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, TodoError>;
