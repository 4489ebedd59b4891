//! Derived, read-only projection of the task list.

use crate::filter::TextMatcher;
use crate::sort::{SortKey, sort_tasks};
use crate::task::Task;

/// Filter `tasks` by `search_text`, then sort the survivors by `key`.
///
/// Always computed fresh from its inputs; the source slice is left untouched.
#[must_use]
pub fn derive_view(tasks: &[Task], search_text: &str, key: SortKey) -> Vec<Task> {
    let matcher = TextMatcher::new(search_text);
    let mut visible: Vec<Task> = tasks
        .iter()
        .filter(|task| matcher.as_ref().is_none_or(|m| m.matches(task)))
        .cloned()
        .collect();
    sort_tasks(&mut visible, key);
    visible
}
