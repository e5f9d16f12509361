//! Runtime configuration.

use crate::storage::DEFAULT_KEY;
use std::path::PathBuf;
use std::time::Duration;

/// Database file used when none is given
pub const DEFAULT_DB: &str = "todo.db";

/// Icon swap delay in milliseconds
pub const DEFAULT_ICON_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub storage_key: String,
    pub icon_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db_path: PathBuf::from(DEFAULT_DB),
            storage_key: DEFAULT_KEY.to_string(),
            icon_delay: Duration::from_millis(DEFAULT_ICON_DELAY_MS),
        }
    }
}
