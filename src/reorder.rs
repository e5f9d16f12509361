//! Drag-and-drop reordering.

use crate::core::TaskList;
use crate::error::{Result, TodoError};
use crate::storage::Storage;
use crate::view::ViewRenderer;

/// Swap the display ranks of two tasks, then save and redraw.
///
/// `source` and `target` are one-based storage slots (the dragged row and the
/// row it was dropped on). Only the `position` fields are exchanged; the
/// following `render_list` re-sorts, so the two tasks trade places and every
/// other task keeps its order. Dropping a row on itself still saves and
/// redraws.
pub fn swap_items<S, V>(
    source: usize,
    target: usize,
    list: &mut TaskList<S>,
    view: &mut V,
) -> Result<()>
where
    S: Storage,
    V: ViewRenderer + ?Sized,
{
    let len = list.len();
    for index in [source, target] {
        if index == 0 || index > len {
            return Err(TodoError::InvalidIndex { index, len });
        }
    }

    list.swap_positions(source - 1, target - 1)?;
    tracing::debug!(source, target, "positions swapped");
    list.save()?;
    list.render_list(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;
    use crate::storage::MemoryStorage;
    use crate::view::TerminalView;

    fn setup() -> (TaskList<MemoryStorage>, MemoryStorage) {
        let storage = MemoryStorage::new();
        let list = TaskList::with_items(
            storage.clone(),
            vec![
                Task::with_state("I am Here", 1, true),
                Task::with_state("myself is the greatest", 2, false),
                Task::with_state("this is a test", 3, false),
            ],
        );
        (list, storage)
    }

    fn order(list: &TaskList<MemoryStorage>) -> Vec<(&str, i64)> {
        list.items()
            .iter()
            .map(|t| (t.description.as_str(), t.position))
            .collect()
    }

    #[test]
    fn test_swap_first_two() {
        let (mut list, _) = setup();
        let mut view = TerminalView::new();
        swap_items(1, 2, &mut list, &mut view).unwrap();
        list.render_list(&mut view).unwrap();

        assert_eq!(
            order(&list),
            vec![
                ("myself is the greatest", 1),
                ("I am Here", 2),
                ("this is a test", 3),
            ]
        );
    }

    #[test]
    fn test_swap_non_adjacent_keeps_middle() {
        let (mut list, _) = setup();
        swap_items(3, 1, &mut list, &mut TerminalView::new()).unwrap();
        assert_eq!(
            order(&list),
            vec![
                ("this is a test", 1),
                ("myself is the greatest", 2),
                ("I am Here", 3),
            ]
        );
    }

    #[test]
    fn test_swap_saves_then_renders() {
        let (mut list, storage) = setup();
        let mut view = TerminalView::new();
        swap_items(1, 2, &mut list, &mut view).unwrap();

        // One save from the swap, one from render_list
        assert_eq!(storage.save_count(), 2);
        assert_eq!(storage.load().unwrap(), list.items());
        assert_eq!(view.rows()[0].description, "myself is the greatest");
    }

    #[test]
    fn test_swap_with_itself_is_noop() {
        let (mut list, storage) = setup();
        let before = list.items().to_vec();
        swap_items(2, 2, &mut list, &mut TerminalView::new()).unwrap();
        assert_eq!(list.items(), before.as_slice());
        assert_eq!(storage.save_count(), 2);
    }

    #[test]
    fn test_swap_out_of_range() {
        let (mut list, storage) = setup();
        let result = swap_items(1, 4, &mut list, &mut TerminalView::new());
        assert!(matches!(result, Err(TodoError::InvalidIndex { index: 4, len: 3 })));

        let result = swap_items(0, 1, &mut list, &mut TerminalView::new());
        assert!(matches!(result, Err(TodoError::InvalidIndex { index: 0, len: 3 })));
        assert_eq!(storage.save_count(), 0);
    }

    #[test]
    fn test_swap_uses_position_fields_not_slots() {
        // Slots and positions disagree before a render
        let storage = MemoryStorage::new();
        let mut list = TaskList::with_items(
            storage,
            vec![
                Task::with_position("b", 2),
                Task::with_position("a", 1),
                Task::with_position("c", 3),
            ],
        );
        swap_items(1, 3, &mut list, &mut TerminalView::new()).unwrap();
        // "b" took position 3 and "c" took position 2
        assert_eq!(order(&list), vec![("a", 1), ("c", 2), ("b", 3)]);
    }
}
