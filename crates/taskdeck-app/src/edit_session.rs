//! Staging copy of a task while it is being edited.

use taskdeck_core::{Priority, Task, TaskId};

/// Value copy of one task under edit.
///
/// The copy is taken when editing starts, so staged changes never touch the
/// collection until [`crate::TaskCollection::save_edit`] submits them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    id: TaskId,
    staged: Task,
}

impl EditSession {
    /// Start editing a copy of `task`, splitting `day` into date and time.
    pub(crate) fn start(id: TaskId, task: &Task) -> Self {
        let mut staged = task.clone();
        staged.split_day();
        Self { id, staged }
    }

    /// Id of the task being edited.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Staged values, including the split `date` and `time`.
    #[must_use]
    pub const fn staged(&self) -> &Task {
        &self.staged
    }

    /// Stage new text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.staged.text = text.into();
    }

    /// Stage a new due date (`YYYY-MM-DD`).
    pub fn set_date(&mut self, date: impl Into<String>) {
        self.staged.date = date.into();
    }

    /// Stage a new due time (`HH:MM`).
    pub fn set_time(&mut self, time: impl Into<String>) {
        self.staged.time = time.into();
    }

    /// Stage a new priority.
    pub const fn set_priority(&mut self, priority: Priority) {
        self.staged.priority = priority;
    }

    /// Stage the reminder flag.
    pub const fn set_reminder(&mut self, reminder: bool) {
        self.staged.reminder = reminder;
    }

    /// The edited task with `day` recombined from `date` and `time`.
    #[must_use]
    pub fn to_task(&self) -> Task {
        let mut task = self.staged.clone();
        task.sync_day();
        task
    }
}
