//! Domain types, ordering, and filtering for taskdeck tasks.

/// Text search over tasks.
pub mod filter;
/// Identifier types.
pub mod id;
pub mod sort;
pub mod task;
pub mod timestamp;
pub mod view;

pub use filter::{TextMatcher, matches};
pub use id::TaskId;
pub use sort::{ParseSortKeyError, SortKey, compare_tasks, sort_tasks};
pub use task::{ParsePriorityError, Priority, Task, TaskDraft, UPCOMING_WINDOW, ValidationError};
pub use view::derive_view;
