//! Maps user gestures to task list operations.

use crate::core::TaskList;
use crate::error::{Result, TodoError};
use crate::models::Task;
use crate::reorder::swap_items;
use crate::storage::Storage;
use crate::view::ViewRenderer;

/// One user gesture.
///
/// Slots are zero-based storage slots; `Reorder` takes one-based slots, the
/// same numbers the rows display after a render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddTask(String),
    RemoveTask(usize),
    EditTask(usize, String),
    ToggleCompleted(usize),
    ClearCompleted,
    Reorder { from: usize, to: usize },
}

/// What dispatching a command did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The list changed and was saved
    Applied,
    /// The command had nothing to do (empty new task)
    Ignored,
}

impl Command {
    /// Parse a shell line. Row numbers are the one-based numbers shown in the
    /// list, so `rm 1` removes slot 0.
    pub fn parse_line(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb {
            "add" => Ok(Command::AddTask(rest.to_string())),
            "rm" | "remove" => Ok(Command::RemoveTask(parse_row(rest)? - 1)),
            "edit" => {
                let (row, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                Ok(Command::EditTask(parse_row(row)? - 1, text.trim().to_string()))
            }
            "toggle" | "done" => Ok(Command::ToggleCompleted(parse_row(rest)? - 1)),
            "clear" => Ok(Command::ClearCompleted),
            "move" | "mv" => {
                let mut parts = rest.split_whitespace();
                let from = parse_row(parts.next().unwrap_or(""))?;
                let to = parse_row(parts.next().unwrap_or(""))?;
                if parts.next().is_some() {
                    return Err(TodoError::InvalidCommand(format!(
                        "`{verb}` takes two row numbers"
                    )));
                }
                Ok(Command::Reorder { from, to })
            }
            "" => Err(TodoError::InvalidCommand("empty command".to_string())),
            other => Err(TodoError::InvalidCommand(format!("unknown command `{other}`"))),
        }
    }
}

fn parse_row(s: &str) -> Result<usize> {
    match s.trim().parse::<usize>() {
        Ok(0) | Err(_) => Err(TodoError::InvalidCommand(format!(
            "expected a row number, got `{s}`"
        ))),
        Ok(n) => Ok(n),
    }
}

/// Apply one command to the list and view
pub fn dispatch<S, V>(list: &mut TaskList<S>, view: &mut V, command: Command) -> Result<Dispatch>
where
    S: Storage,
    V: ViewRenderer + ?Sized,
{
    tracing::debug!(?command, "dispatch");
    match command {
        Command::AddTask(description) => {
            if description.is_empty() {
                return Ok(Dispatch::Ignored);
            }
            list.add(Task::new(description));
            list.render_list(view)?;
        }
        Command::RemoveTask(slot) => {
            list.remove(slot)?;
            list.render_list(view)?;
        }
        Command::EditTask(slot, description) => {
            list.edit(slot, description)?;
            list.save()?;
        }
        Command::ToggleCompleted(slot) => {
            list.toggle_completed(slot)?;
        }
        Command::ClearCompleted => {
            list.filter_completed();
            list.render_list(view)?;
        }
        Command::Reorder { from, to } => {
            swap_items(from, to, list, view)?;
        }
    }
    Ok(Dispatch::Applied)
}
