use crate::config::Config;
use crate::controller::{Command, Dispatch, dispatch};
use crate::core::TaskList;
use crate::error::{Result, TodoError};
use crate::storage::{SqliteStorage, Storage};
use crate::view::TerminalView;
use std::io::{BufRead, Write};
use std::time::Instant;

/// Open the stored list the way a page load does: hydrate, then render so
/// displayed numbers match storage slots.
fn open(config: &Config) -> Result<(TaskList<SqliteStorage>, TerminalView)> {
    let storage = SqliteStorage::open(&config.db_path, config.storage_key.as_str())?;
    let mut view = TerminalView::with_icon_delay(config.icon_delay);
    let had_snapshot = storage.exists()?;
    let mut list = TaskList::hydrate(storage)?;
    if had_snapshot {
        list.render_list(&mut view)?;
    }
    Ok((list, view))
}

/// Convert a displayed task number to a storage slot
fn slot_for<S: Storage>(list: &TaskList<S>, index: usize) -> Result<usize> {
    if index == 0 || index > list.len() {
        return Err(TodoError::InvalidIndex {
            index,
            len: list.len(),
        });
    }
    Ok(index - 1)
}

/// Handle the add command
pub fn handle_add(config: &Config, description: &str) -> Result<()> {
    let (mut list, mut view) = open(config)?;

    match dispatch(&mut list, &mut view, Command::AddTask(description.to_string()))? {
        Dispatch::Ignored => println!("Nothing to add."),
        Dispatch::Applied => {
            println!("Added task #{}: {}", list.len(), description);
            print!("{view}");
        }
    }

    Ok(())
}

/// Handle the list command
pub fn handle_list(config: &Config) -> Result<()> {
    let (_list, view) = open(config)?;
    print!("{view}");
    Ok(())
}

/// Handle the remove command
pub fn handle_remove(config: &Config, index: usize) -> Result<()> {
    let (mut list, mut view) = open(config)?;
    let slot = slot_for(&list, index)?;
    let description = list.items()[slot].description.clone();

    dispatch(&mut list, &mut view, Command::RemoveTask(slot))?;

    println!("Removed task #{index}: {description}");
    print!("{view}");
    Ok(())
}

/// Handle the edit command
pub fn handle_edit(config: &Config, index: usize, description: &str) -> Result<()> {
    let (mut list, mut view) = open(config)?;
    let slot = slot_for(&list, index)?;

    dispatch(
        &mut list,
        &mut view,
        Command::EditTask(slot, description.to_string()),
    )?;

    println!("Updated task #{index}: {description}");
    Ok(())
}

/// Handle the toggle command
pub fn handle_toggle(config: &Config, index: usize) -> Result<()> {
    let (mut list, mut view) = open(config)?;
    let slot = slot_for(&list, index)?;

    dispatch(&mut list, &mut view, Command::ToggleCompleted(slot))?;

    let task = &list.items()[slot];
    let state = if task.completed { "done" } else { "open" };
    println!("Task #{index} is {state}: {}", task.description);
    Ok(())
}

/// Handle the clear command
pub fn handle_clear(config: &Config) -> Result<()> {
    let (mut list, mut view) = open(config)?;
    let before = list.len();

    dispatch(&mut list, &mut view, Command::ClearCompleted)?;

    println!("Cleared {} completed task(s)", before - list.len());
    print!("{view}");
    Ok(())
}

/// Handle the move command
pub fn handle_move(config: &Config, from: usize, to: usize) -> Result<()> {
    let (mut list, mut view) = open(config)?;

    dispatch(&mut list, &mut view, Command::Reorder { from, to })?;

    println!("Swapped #{from} and #{to}");
    print!("{view}");
    Ok(())
}

/// Handle the export command
pub fn handle_export(config: &Config) -> Result<()> {
    let storage = SqliteStorage::open(&config.db_path, config.storage_key.as_str())?;
    let tasks = if storage.exists()? {
        storage.load()?
    } else {
        Vec::new()
    };
    println!("{}", serde_json::to_string_pretty(&tasks)?);
    Ok(())
}

/// Handle the reset command
pub fn handle_reset(config: &Config) -> Result<()> {
    let storage = SqliteStorage::open(&config.db_path, config.storage_key.as_str())?;
    storage.remove()?;
    println!("Deleted saved list `{}`", storage.key());
    Ok(())
}

/// Handle the shell command
pub fn handle_shell(config: &Config) -> Result<()> {
    let (mut list, mut view) = open(config)?;
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_shell(&mut list, &mut view, stdin.lock(), stdout.lock())
}

/// Read commands line by line until EOF or `quit`.
///
/// A failing command is reported and the session continues.
pub fn run_shell<S, R, W>(
    list: &mut TaskList<S>,
    view: &mut TerminalView,
    input: R,
    mut out: W,
) -> Result<()>
where
    S: Storage,
    R: BufRead,
    W: Write,
{
    write!(out, "{view}")?;

    for line in input.lines() {
        let line = line?;
        view.poll(Instant::now());

        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let result = match verb {
            "" => continue,
            "quit" | "exit" => break,
            "list" | "ls" => Ok(Dispatch::Applied),
            "help" => {
                writeln!(
                    out,
                    "add <text> | rm <n> | edit <n> <text> | toggle <n> | clear | move <a> <b> | focus <n> | blur <n> | list | quit"
                )?;
                continue;
            }
            "focus" => set_focus(view, rest.trim(), true),
            "blur" => set_focus(view, rest.trim(), false),
            _ => run_line(list, view, line),
        };

        match result {
            Ok(Dispatch::Applied) => write!(out, "{view}")?,
            Ok(Dispatch::Ignored) => writeln!(out, "Nothing to add.")?,
            Err(e) => {
                tracing::warn!(error = %e, "command failed");
                writeln!(out, "Error: {e}")?;
            }
        }
    }

    Ok(())
}

/// Focus or blur a drawn row; its icons swap once the delay passes
fn set_focus(view: &mut TerminalView, arg: &str, focused: bool) -> Result<Dispatch> {
    let index: usize = arg
        .parse()
        .map_err(|_| TodoError::InvalidCommand(format!("expected a row number, got `{arg}`")))?;
    let position = index as i64;
    if view.row(position).is_none() {
        return Err(TodoError::InvalidIndex {
            index,
            len: view.rows().len(),
        });
    }

    let now = Instant::now();
    if focused {
        view.focus(position, now);
    } else {
        view.blur(position, now);
    }
    Ok(Dispatch::Applied)
}

fn run_line<S: Storage>(
    list: &mut TaskList<S>,
    view: &mut TerminalView,
    line: &str,
) -> Result<Dispatch> {
    let command = Command::parse_line(line)?;

    // Edits and checkbox changes do not redraw, so their row is patched
    let patched = match &command {
        Command::RemoveTask(slot) => {
            slot_for(list, slot + 1)?;
            None
        }
        Command::ToggleCompleted(slot) | Command::EditTask(slot, _) => {
            Some(slot_for(list, slot + 1)?)
        }
        _ => None,
    };

    let outcome = dispatch(list, view, command)?;
    if let Some(slot) = patched {
        view.patch_row(&list.items()[slot]);
    }
    Ok(outcome)
}
