pub mod cli;
pub mod cli_handlers;
pub mod config;
pub mod controller;
pub mod core;
pub mod deferred;
pub mod error;
pub mod models;
pub mod reorder;
pub mod storage;
pub mod view;

pub use crate::core::TaskList;
pub use error::{Result, TodoError};
pub use models::*;
