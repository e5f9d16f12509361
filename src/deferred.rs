//! Cancellable delayed icon toggles.
//!
//! Focusing or blurring a row swaps its remove/edit icons after a delay. Each
//! pending swap has a handle so the view can cancel it when the row goes away.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::time::Instant;

/// Identifies one scheduled toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToggleHandle(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
struct ScheduledToggle {
    due: Instant,
    handle: ToggleHandle,
    position: i64,
}

impl PartialOrd for ScheduledToggle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledToggle {
    // Reversed so BinaryHeap pops the earliest due time first; ties go to the
    // handle scheduled first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.handle.cmp(&self.handle))
    }
}

/// Min-heap of pending toggles keyed by due time
#[derive(Debug, Default)]
pub struct Scheduler {
    queue: BinaryHeap<ScheduledToggle>,
    cancelled: HashSet<ToggleHandle>,
    next_handle: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a toggle of the row at `position`
    pub fn schedule(&mut self, position: i64, due: Instant) -> ToggleHandle {
        let handle = ToggleHandle(self.next_handle);
        self.next_handle += 1;
        self.queue.push(ScheduledToggle {
            due,
            handle,
            position,
        });
        handle
    }

    /// Cancel a pending toggle. Returns false if it already fired or was unknown.
    pub fn cancel(&mut self, handle: ToggleHandle) -> bool {
        let pending = self
            .queue
            .iter()
            .any(|t| t.handle == handle && !self.cancelled.contains(&handle));
        if pending {
            self.cancelled.insert(handle);
        }
        pending
    }

    pub fn cancel_all(&mut self) {
        self.queue.clear();
        self.cancelled.clear();
    }

    /// Number of toggles still waiting to fire
    pub fn pending(&self) -> usize {
        self.queue
            .iter()
            .filter(|t| !self.cancelled.contains(&t.handle))
            .count()
    }

    /// Pop every toggle due at or before `now`, in due order
    pub fn drain_due(&mut self, now: Instant) -> Vec<i64> {
        let mut fired = Vec::new();
        while let Some(entry) = self.queue.peek() {
            if entry.due > now {
                break;
            }
            let Some(entry) = self.queue.pop() else {
                break;
            };
            if !self.cancelled.remove(&entry.handle) {
                fired.push(entry.position);
            }
        }
        fired
    }
}
