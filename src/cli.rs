use crate::config::{Config, DEFAULT_DB, DEFAULT_ICON_DELAY_MS};
use crate::storage::DEFAULT_KEY;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "Ordered to-do list")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// SQLite file holding the list
    #[arg(long, global = true, env = "TODO_DB", default_value = DEFAULT_DB)]
    pub db: PathBuf,

    /// Key the list snapshot is stored under
    #[arg(long, global = true, env = "TODO_KEY", default_value = DEFAULT_KEY)]
    pub key: String,

    /// Delay before row icons swap after a focus change, in milliseconds
    #[arg(long, global = true, env = "TODO_ICON_DELAY_MS", default_value_t = DEFAULT_ICON_DELAY_MS)]
    pub icon_delay_ms: u64,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            db_path: self.db.clone(),
            storage_key: self.key.clone(),
            icon_delay: Duration::from_millis(self.icon_delay_ms),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task to the end of the list
    Add {
        /// Task description
        description: String,
    },

    /// Show the list
    List,

    /// Remove a task
    Remove {
        /// Task number as shown by `list`
        index: usize,
    },

    /// Replace a task's description
    Edit {
        /// Task number
        index: usize,
        /// New description
        description: String,
    },

    /// Mark a task done, or open again
    Toggle {
        /// Task number
        index: usize,
    },

    /// Remove every completed task
    Clear,

    /// Swap two tasks
    Move {
        /// Task being moved
        from: usize,
        /// Task it is dropped on
        to: usize,
    },

    /// Print the saved list as JSON
    Export,

    /// Delete the saved list
    Reset,

    /// Read commands from stdin, one per line
    Shell,
}
