//! Rendering of the task list.

use crate::deferred::{Scheduler, ToggleHandle};
use crate::models::Task;
use std::fmt;
use std::time::{Duration, Instant};

/// Delay before the remove/edit icons swap after a focus change
pub const DEFAULT_ICON_DELAY: Duration = Duration::from_millis(1000);

/// Draws the list. `TaskList::render_list` drives it in this order:
/// `clear`, one `render_item` per task, `attach_behavior`.
pub trait ViewRenderer {
    /// Drop every displayed item and anything tied to them
    fn clear(&mut self);

    fn render_item(&mut self, task: &Task);

    /// Wire up the affordances for the freshly rendered items
    fn attach_behavior(&mut self, tasks: &[Task]);
}

/// A rendered row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub position: i64,
    pub description: String,
    pub completed: bool,
    pub editing: bool,
    pub icons_swapped: bool,
}

impl Row {
    fn line(&self) -> String {
        let check = if self.completed { "[x]" } else { "[ ]" };
        let marker = if self.editing { "*" } else { " " };
        // Edit handle by default, remove icon once swapped in
        let icon = if self.icons_swapped { "[rm]" } else { "[::]" };
        if self.completed {
            format!(
                "{marker}[{:>2}] {check} ~~{}~~ {icon}",
                self.position, self.description
            )
        } else {
            format!("{marker}[{:>2}] {check} {} {icon}", self.position, self.description)
        }
    }
}

/// Terminal renderer that buffers rows until printed
#[derive(Debug)]
pub struct TerminalView {
    rows: Vec<Row>,
    footer: Option<usize>,
    scheduler: Scheduler,
    icon_delay: Duration,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::with_icon_delay(DEFAULT_ICON_DELAY)
    }

    pub fn with_icon_delay(icon_delay: Duration) -> Self {
        TerminalView {
            rows: Vec::new(),
            footer: None,
            scheduler: Scheduler::new(),
            icon_delay,
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, position: i64) -> Option<&Row> {
        self.rows.iter().find(|r| r.position == position)
    }

    /// True once `attach_behavior` has run for the current rows
    pub fn is_attached(&self) -> bool {
        self.footer.is_some()
    }

    /// Output lines: one per row plus the clear-completed footer
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.rows.iter().map(Row::line).collect();
        if lines.is_empty() {
            lines.push("No tasks.".to_string());
        }
        if let Some(done) = self.footer {
            lines.push(String::new());
            lines.push(format!("Clear all completed ({done})"));
        }
        lines
    }

    /// Start editing a row. The icon swap follows after the delay.
    /// Returns `None` if there is no such row or it is already focused.
    pub fn focus(&mut self, position: i64, now: Instant) -> Option<ToggleHandle> {
        self.set_editing(position, true, now)
    }

    /// Stop editing a row. The icon swap back follows after the delay.
    pub fn blur(&mut self, position: i64, now: Instant) -> Option<ToggleHandle> {
        self.set_editing(position, false, now)
    }

    fn set_editing(&mut self, position: i64, editing: bool, now: Instant) -> Option<ToggleHandle> {
        let row = self.rows.iter_mut().find(|r| r.position == position)?;
        if row.editing == editing {
            return None;
        }
        row.editing = editing;
        Some(self.scheduler.schedule(position, now + self.icon_delay))
    }

    /// Update a drawn row in place after an edit or checkbox change.
    /// Returns false if the task has no row.
    pub fn patch_row(&mut self, task: &Task) -> bool {
        match self.rows.iter_mut().find(|r| r.position == task.position) {
            Some(row) => {
                row.description = task.description.clone();
                row.completed = task.completed;
                true
            }
            None => false,
        }
    }

    /// Apply every icon swap due at `now`. Returns how many fired.
    pub fn poll(&mut self, now: Instant) -> usize {
        let due = self.scheduler.drain_due(now);
        let mut fired = 0;
        for position in due {
            if let Some(row) = self.rows.iter_mut().find(|r| r.position == position) {
                row.icons_swapped = !row.icons_swapped;
                fired += 1;
            }
        }
        fired
    }

    pub fn pending_toggles(&self) -> usize {
        self.scheduler.pending()
    }
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewRenderer for TerminalView {
    fn clear(&mut self) {
        if self.scheduler.pending() > 0 {
            tracing::debug!(
                pending = self.scheduler.pending(),
                "cancelling icon toggles for cleared rows"
            );
        }
        self.scheduler.cancel_all();
        self.rows.clear();
        self.footer = None;
    }

    fn render_item(&mut self, task: &Task) {
        self.rows.push(Row {
            position: task.position,
            description: task.description.clone(),
            completed: task.completed,
            editing: false,
            icons_swapped: false,
        });
    }

    fn attach_behavior(&mut self, tasks: &[Task]) {
        self.footer = Some(tasks.iter().filter(|t| t.completed).count());
    }
}

impl fmt::Display for TerminalView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
