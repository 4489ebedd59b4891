//! Ordering of tasks for the derived view.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::{fmt, str::FromStr};
use thiserror::Error;
use time::OffsetDateTime;

use crate::task::Task;

/// Secondary ordering applied inside each completion group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Oldest `dateAdded` first.
    #[default]
    DateAddedAsc,
    /// Newest `dateAdded` first.
    DateAddedDesc,
    /// Earliest due date first.
    DueDateAsc,
    /// Latest due date first.
    DueDateDesc,
    /// Low priority first.
    PriorityAsc,
    /// High priority first.
    PriorityDesc,
}

impl SortKey {
    /// Every sort key, in menu order.
    pub const ALL: [Self; 6] = [
        Self::DateAddedAsc,
        Self::DateAddedDesc,
        Self::DueDateAsc,
        Self::DueDateDesc,
        Self::PriorityAsc,
        Self::PriorityDesc,
    ];

    /// Stable textual name, shared by config files and the CLI.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DateAddedAsc => "dateAddedAsc",
            Self::DateAddedDesc => "dateAddedDesc",
            Self::DueDateAsc => "dueDateAsc",
            Self::DueDateDesc => "dueDateDesc",
            Self::PriorityAsc => "priorityAsc",
            Self::PriorityDesc => "priorityDesc",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a sort key name is not recognised.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown sort key '{0}'")]
pub struct ParseSortKeyError(pub String);

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseSortKeyError(s.to_owned()))
    }
}

/// Compare two tasks: open before done, then by `key`.
#[must_use]
pub fn compare_tasks(a: &Task, b: &Task, key: SortKey) -> Ordering {
    a.done.cmp(&b.done).then_with(|| compare_by_key(a, b, key))
}

fn compare_by_key(a: &Task, b: &Task, key: SortKey) -> Ordering {
    match key {
        SortKey::DateAddedAsc => compare_instants(a.added_at(), b.added_at()),
        SortKey::DateAddedDesc => compare_instants(b.added_at(), a.added_at()),
        SortKey::DueDateAsc => compare_instants(a.due_at(), b.due_at()),
        SortKey::DueDateDesc => compare_instants(b.due_at(), a.due_at()),
        SortKey::PriorityAsc => a.priority.rank().cmp(&b.priority.rank()),
        SortKey::PriorityDesc => b.priority.rank().cmp(&a.priority.rank()),
    }
}

// `None` (unparseable) orders before every real instant.
fn compare_instants(a: Option<OffsetDateTime>, b: Option<OffsetDateTime>) -> Ordering {
    a.cmp(&b)
}

/// Stable in-place sort by [`compare_tasks`].
pub fn sort_tasks(tasks: &mut [Task], key: SortKey) {
    tasks.sort_by(|a, b| compare_tasks(a, b, key));
}
