use crate::error::{Result, TodoError};
use crate::models::Task;
use crate::storage::Storage;
use crate::view::ViewRenderer;

/// Ordered owner of the tasks and the only way to mutate them.
///
/// Slot-taking operations address the zero-based storage slot, not the
/// `position` field. The two agree (`position == slot + 1`) right after
/// `render_list`; callers that map a displayed number to a slot must render
/// first.
pub struct TaskList<S: Storage> {
    items: Vec<Task>,
    storage: S,
}

impl<S: Storage> TaskList<S> {
    /// Empty list
    pub fn new(storage: S) -> Self {
        Self::with_items(storage, Vec::new())
    }

    pub fn with_items(storage: S, items: Vec<Task>) -> Self {
        TaskList { items, storage }
    }

    /// Load the stored snapshot if there is one, otherwise start empty
    pub fn hydrate(storage: S) -> Result<Self> {
        if storage.exists()? {
            let items = storage.load()?;
            tracing::debug!(tasks = items.len(), "hydrated list from snapshot");
            Ok(Self::with_items(storage, items))
        } else {
            tracing::debug!("no snapshot, starting with an empty list");
            Ok(Self::new(storage))
        }
    }

    pub fn items(&self) -> &[Task] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn check_slot(&self, slot: usize) -> Result<()> {
        if slot < self.items.len() {
            Ok(())
        } else {
            Err(TodoError::InvalidSlot {
                slot,
                len: self.items.len(),
            })
        }
    }

    // ==================== Mutations ====================

    /// Append a task as the last entry. Its position becomes the new length.
    pub fn add(&mut self, mut task: Task) -> &[Task] {
        task.position = self.items.len() as i64 + 1;
        tracing::debug!(position = task.position, "task added");
        self.items.push(task);
        &self.items
    }

    /// Remove the task at `slot`. Other positions are left as they are.
    pub fn remove(&mut self, slot: usize) -> Result<&[Task]> {
        self.check_slot(slot)?;
        let removed = self.items.remove(slot);
        tracing::debug!(slot, position = removed.position, "task removed");
        Ok(&self.items)
    }

    /// Replace the description at `slot`. Does not persist.
    pub fn edit(&mut self, slot: usize, description: impl Into<String>) -> Result<&[Task]> {
        self.check_slot(slot)?;
        self.items[slot].description = description.into();
        tracing::debug!(slot, "task edited");
        Ok(&self.items)
    }

    /// Flip the completed flag at `slot` and persist immediately
    pub fn toggle_completed(&mut self, slot: usize) -> Result<()> {
        self.check_slot(slot)?;
        let task = &mut self.items[slot];
        task.completed = !task.completed;
        tracing::debug!(slot, completed = task.completed, "task toggled");
        self.save()
    }

    /// Drop every completed task, keeping the others in order
    pub fn filter_completed(&mut self) -> &[Task] {
        let before = self.items.len();
        self.items.retain(|t| !t.completed);
        tracing::debug!(removed = before - self.items.len(), "completed tasks cleared");
        &self.items
    }

    /// Stable sort by position
    pub fn sort(&mut self) {
        self.items.sort_by_key(|t| t.position);
    }

    /// Set every position to its slot + 1
    pub fn renumber(&mut self) {
        for (slot, task) in self.items.iter_mut().enumerate() {
            task.position = slot as i64 + 1;
        }
    }

    /// Exchange the position fields of two slots; the items stay where they are
    pub(crate) fn swap_positions(&mut self, a: usize, b: usize) -> Result<()> {
        self.check_slot(a)?;
        self.check_slot(b)?;
        let first = self.items[a].position;
        let second = self.items[b].position;
        self.items[a].position = second;
        self.items[b].position = first;
        Ok(())
    }

    // ==================== Synchronization ====================

    /// Write the full list through the storage, replacing the prior snapshot
    pub fn save(&self) -> Result<()> {
        self.storage.save(&self.items)
    }

    /// Redraw the list and persist it.
    ///
    /// On return the items are sorted, positions are contiguous `1..=len`, the
    /// snapshot matches the items and the view shows them.
    pub fn render_list<V: ViewRenderer + ?Sized>(&mut self, view: &mut V) -> Result<()> {
        view.clear();
        self.sort();
        self.renumber();
        for task in &self.items {
            view.render_item(task);
        }
        self.save()?;
        view.attach_behavior(&self.items);
        tracing::trace!(tasks = self.items.len(), "list rendered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::view::TerminalView;

    /// Records the calls `render_list` makes, in order
    #[derive(Default)]
    struct RecordingView {
        calls: Vec<String>,
    }

    impl ViewRenderer for RecordingView {
        fn clear(&mut self) {
            self.calls.push("clear".to_string());
        }

        fn render_item(&mut self, task: &Task) {
            self.calls.push(format!("item {}", task.position));
        }

        fn attach_behavior(&mut self, tasks: &[Task]) {
            self.calls.push(format!("attach {}", tasks.len()));
        }
    }

    fn three_tasks() -> Vec<Task> {
        vec![
            Task::with_state("I am Here", 1, true),
            Task::with_state("myself is the greatest", 2, false),
            Task::with_state("this is a test", 3, false),
        ]
    }

    fn setup() -> (TaskList<MemoryStorage>, MemoryStorage) {
        let storage = MemoryStorage::new();
        let list = TaskList::with_items(storage.clone(), three_tasks());
        (list, storage)
    }

    #[test]
    fn test_add_to_empty_list() {
        let mut list = TaskList::new(MemoryStorage::new());
        let items = list.add(Task::new("hello"));
        assert_eq!(items, &[Task::with_state("hello", 1, false)]);
    }

    #[test]
    fn test_add_sets_position_to_length() {
        let mut list = TaskList::new(MemoryStorage::new());
        for n in 1..=5 {
            list.add(Task::with_position(format!("task {n}"), 99));
            assert_eq!(list.len(), n);
            assert_eq!(list.items()[n - 1].position, n as i64);
        }
    }

    #[test]
    fn test_add_does_not_persist() {
        let storage = MemoryStorage::new();
        let mut list = TaskList::new(storage.clone());
        list.add(Task::new("hello"));
        assert_eq!(storage.save_count(), 0);
    }

    #[test]
    fn test_remove_leaves_position_gap() {
        let (mut list, storage) = setup();
        let items = list.remove(1).unwrap();
        assert_eq!(
            items,
            &[
                Task::with_state("I am Here", 1, true),
                Task::with_state("this is a test", 3, false),
            ]
        );
        assert_eq!(storage.save_count(), 0);
    }

    #[test]
    fn test_remove_keeps_relative_order() {
        let (mut list, _) = setup();
        list.remove(0).unwrap();
        let descriptions: Vec<&str> = list.items().iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descriptions, vec!["myself is the greatest", "this is a test"]);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_remove_out_of_range() {
        let (mut list, _) = setup();
        let result = list.remove(3);
        assert!(matches!(result, Err(TodoError::InvalidSlot { slot: 3, len: 3 })));
        assert_eq!(list.items(), three_tasks().as_slice());
    }

    #[test]
    fn test_edit() {
        let (mut list, storage) = setup();
        let items = list.edit(2, "rewritten").unwrap();
        assert_eq!(items[2].description, "rewritten");
        assert_eq!(items[2].position, 3);
        assert_eq!(storage.save_count(), 0);
    }

    #[test]
    fn test_edit_out_of_range() {
        let mut list = TaskList::new(MemoryStorage::new());
        assert!(matches!(
            list.edit(0, "x"),
            Err(TodoError::InvalidSlot { slot: 0, len: 0 })
        ));
    }

    #[test]
    fn test_toggle_completed_is_self_inverse_and_saves() {
        let (mut list, storage) = setup();
        list.toggle_completed(1).unwrap();
        assert!(list.items()[1].completed);
        assert!(storage.load().unwrap()[1].completed);

        list.toggle_completed(1).unwrap();
        assert!(!list.items()[1].completed);
        assert_eq!(storage.save_count(), 2);
        assert_eq!(storage.load().unwrap(), three_tasks());
    }

    #[test]
    fn test_toggle_out_of_range_does_not_save() {
        let (mut list, storage) = setup();
        assert!(list.toggle_completed(10).is_err());
        assert_eq!(storage.save_count(), 0);
    }

    #[test]
    fn test_filter_completed() {
        let mut list = TaskList::with_items(
            MemoryStorage::new(),
            vec![
                Task::with_state("a", 1, true),
                Task::with_state("b", 2, false),
                Task::with_state("c", 3, true),
                Task::with_state("d", 4, false),
            ],
        );
        let items = list.filter_completed();
        assert_eq!(
            items,
            &[Task::with_state("b", 2, false), Task::with_state("d", 4, false)]
        );
        assert!(list.items().iter().all(|t| !t.completed));
    }

    #[test]
    fn test_sort_is_stable() {
        let mut list = TaskList::with_items(
            MemoryStorage::new(),
            vec![
                Task::with_position("b", 2),
                Task::with_position("first 1", 1),
                Task::with_position("second 1", 1),
            ],
        );
        list.sort();
        let descriptions: Vec<&str> = list.items().iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descriptions, vec!["first 1", "second 1", "b"]);
    }

    #[test]
    fn test_render_list_call_order() {
        let (mut list, _) = setup();
        let mut view = RecordingView::default();
        list.render_list(&mut view).unwrap();
        assert_eq!(
            view.calls,
            vec!["clear", "item 1", "item 2", "item 3", "attach 3"]
        );
    }

    #[test]
    fn test_render_list_sorts_renumbers_and_saves() {
        let storage = MemoryStorage::new();
        let mut list = TaskList::with_items(
            storage.clone(),
            vec![
                Task::with_position("c", 9),
                Task::with_position("a", 2),
                Task::with_position("b", 4),
            ],
        );
        let mut view = TerminalView::new();
        list.render_list(&mut view).unwrap();

        assert_eq!(
            list.items(),
            &[
                Task::with_position("a", 1),
                Task::with_position("b", 2),
                Task::with_position("c", 3),
            ]
        );
        assert_eq!(storage.load().unwrap(), list.items());
        assert_eq!(view.rows().len(), 3);
        assert_eq!(view.rows()[2].description, "c");
    }

    #[test]
    fn test_render_list_closes_gap_after_remove() {
        let (mut list, _) = setup();
        list.remove(1).unwrap();
        list.render_list(&mut TerminalView::new()).unwrap();
        let positions: Vec<i64> = list.items().iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![1, 2]);
    }

    #[test]
    fn test_render_list_is_idempotent() {
        let (mut list, _) = setup();
        list.remove(0).unwrap();
        let mut view = TerminalView::new();
        list.render_list(&mut view).unwrap();
        let first = list.items().to_vec();
        list.render_list(&mut view).unwrap();
        assert_eq!(list.items(), first.as_slice());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let (list, storage) = setup();
        list.save().unwrap();
        assert_eq!(storage.load().unwrap(), list.items());
    }

    #[test]
    fn test_hydrate() {
        let storage = MemoryStorage::new();
        let empty = TaskList::hydrate(storage.clone()).unwrap();
        assert!(empty.is_empty());

        storage.save(&three_tasks()).unwrap();
        let list = TaskList::hydrate(storage).unwrap();
        assert_eq!(list.items(), three_tasks().as_slice());
    }

    #[test]
    fn test_hydrate_malformed_snapshot() {
        let storage = MemoryStorage::new();
        storage.put_raw("[{\"description\": 1}]");
        assert!(matches!(
            TaskList::hydrate(storage),
            Err(TodoError::Deserialization { .. })
        ));
    }
}
