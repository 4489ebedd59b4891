use taskdeck_core::{TaskId, ValidationError};
use taskdeck_store::StoreError;
use thiserror::Error;

/// Errors surfaced by [`crate::TaskCollection`].
#[derive(Debug, Error)]
pub enum CollectionError {
    /// The draft or edit was malformed; nothing was sent to the store.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Fetching the task list failed; the mirror was left as it was.
    #[error("failed to load tasks: {0}")]
    Load(#[source] StoreError),
    /// The store rejected or failed the request; the mirror holds the last confirmed state.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The store no longer knows this task; the stale local entry was dropped.
    #[error("task {0} no longer exists")]
    NotFound(TaskId),
    /// The id is not present in the collection.
    #[error("task {0} is not in the collection")]
    UnknownTask(TaskId),
    /// The task has never been persisted.
    #[error("task has no id")]
    MissingId,
    /// Another edit session is already open.
    #[error("task {0} is already being edited")]
    EditInProgress(TaskId),
    /// No edit session is open.
    #[error("no task is being edited")]
    NoActiveEdit,
    /// The creation timestamp could not be rendered.
    #[error("failed to stamp creation time: {0}")]
    Clock(#[from] time::error::Format),
}

impl CollectionError {
    /// True for network or server failures the caller may retry.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Load(StoreError::Transport(_) | StoreError::Io(_))
                | Self::Store(StoreError::Transport(_) | StoreError::Io(_))
        )
    }
}
