//! Authoritative in-memory task list synchronized with a persistence service.

use std::collections::HashSet;
use std::time::Duration;

use taskdeck_core::timestamp::now_rfc3339;
use taskdeck_core::{SortKey, Task, TaskDraft, TaskId, ValidationError, derive_view};
use taskdeck_store::StoreError;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::async_store::AsyncTaskStore;
use crate::edit_session::EditSession;
use crate::error::CollectionError;
use crate::undo::{DEFAULT_UNDO_WINDOW, PendingDeletion, UndoSlot};

/// Construction-time knobs for a [`TaskCollection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionOptions {
    /// Sort key in effect before the user picks one.
    pub sort_key: SortKey,
    /// How long a deleted task stays restorable.
    pub undo_window: Duration,
}

impl Default for CollectionOptions {
    fn default() -> Self {
        Self {
            sort_key: SortKey::default(),
            undo_window: DEFAULT_UNDO_WINDOW,
        }
    }
}

/// Owner of the task mirror, its derived view, the undo slot, and the edit slot.
///
/// Mutations go to the store first and touch the mirror only once the store
/// confirms them; `toggle_done` is the one optimistic exception and rolls
/// back on failure. All mutating methods take `&mut self`, so a second
/// mutation cannot start until the previous response has been applied.
#[derive(Debug)]
pub struct TaskCollection<S> {
    store: S,
    tasks: Vec<Task>,
    visible: Vec<Task>,
    search_text: String,
    sort_key: SortKey,
    undo: UndoSlot,
    editing: Option<EditSession>,
}

impl<S> TaskCollection<S> {
    /// Empty collection with default options; call [`load`](Self::load) to populate it.
    pub fn new(store: S) -> Self {
        Self::with_options(store, CollectionOptions::default())
    }

    /// Empty collection with explicit options.
    pub const fn with_options(store: S, options: CollectionOptions) -> Self {
        Self {
            store,
            tasks: Vec::new(),
            visible: Vec::new(),
            search_text: String::new(),
            sort_key: options.sort_key,
            undo: UndoSlot::new(options.undo_window),
            editing: None,
        }
    }

    /// Borrow the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Authoritative mirror in service order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Filtered and sorted projection for display.
    pub fn visible_tasks(&self) -> &[Task] {
        &self.visible
    }

    /// Current search text.
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Current sort key.
    pub const fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    /// Look up a task in the mirror.
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == Some(id))
    }

    /// Replace the search text and re-derive the view.
    pub fn set_search_text(&mut self, search_text: impl Into<String>) {
        self.search_text = search_text.into();
        self.refresh_view();
    }

    /// Replace the sort key and re-derive the view.
    pub fn set_sort_key(&mut self, sort_key: SortKey) {
        self.sort_key = sort_key;
        self.refresh_view();
    }

    /// Most recent deletion, while its undo window is open.
    pub fn pending_deletion(&self) -> Option<&PendingDeletion> {
        self.undo.peek(Instant::now())
    }

    /// Time left to undo the most recent deletion.
    pub fn undo_remaining(&self) -> Option<Duration> {
        self.undo.remaining(Instant::now())
    }

    /// Forget the pending deletion if its window has closed.
    pub fn expire_pending_deletion(&mut self) -> bool {
        let expired = self.undo.expire(Instant::now());
        if expired {
            debug!("undo window closed");
        }
        expired
    }

    /// Open an edit session on a copy of the task.
    ///
    /// # Errors
    /// Returns [`CollectionError::EditInProgress`] while another session is
    /// open, or [`CollectionError::UnknownTask`] for ids not in the mirror.
    pub fn begin_edit(&mut self, id: TaskId) -> Result<&mut EditSession, CollectionError> {
        if let Some(active) = &self.editing {
            return Err(CollectionError::EditInProgress(active.id()));
        }
        let task = self.task(id).ok_or(CollectionError::UnknownTask(id))?;
        let session = EditSession::start(id, task);
        Ok(self.editing.insert(session))
    }

    /// The open edit session, if any.
    pub const fn edit_session(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    /// Mutable access to the open edit session.
    pub const fn edit_session_mut(&mut self) -> Option<&mut EditSession> {
        self.editing.as_mut()
    }

    /// Discard the open edit session without touching the mirror.
    pub const fn cancel_edit(&mut self) -> Option<EditSession> {
        self.editing.take()
    }

    fn refresh_view(&mut self) {
        self.visible = derive_view(&self.tasks, &self.search_text, self.sort_key);
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == Some(id))
    }

    // Drop a local entry, closing its edit session if one is open.
    fn forget_at(&mut self, index: usize) -> Task {
        let removed = self.tasks.remove(index);
        if self
            .editing
            .as_ref()
            .is_some_and(|session| Some(session.id()) == removed.id)
        {
            self.editing = None;
        }
        self.refresh_view();
        removed
    }
}

impl<S: AsyncTaskStore> TaskCollection<S> {
    /// Replace the mirror with the store's full task list.
    ///
    /// # Errors
    /// Returns [`CollectionError::Load`] when the store cannot be read; the
    /// mirror is left untouched.
    pub async fn load(&mut self) -> Result<(), CollectionError> {
        let mut tasks = self.store.list().await.map_err(|err| {
            let err: StoreError = err.into();
            warn!(error = %err, "failed to load tasks");
            CollectionError::Load(err)
        })?;

        let mut seen = HashSet::new();
        tasks.retain(|task| task.id.is_none_or(|id| seen.insert(id)));

        info!(count = tasks.len(), "loaded tasks");
        self.tasks = tasks;
        self.refresh_view();
        Ok(())
    }

    /// Validate a draft, stamp it, and create it in the store.
    ///
    /// # Errors
    /// Returns [`CollectionError::Validation`] before any I/O for malformed
    /// drafts, or [`CollectionError::Store`] when the store fails; the mirror
    /// is unchanged on error.
    pub async fn add(&mut self, draft: TaskDraft) -> Result<Task, CollectionError> {
        draft.validate()?;
        let task = draft.into_task(now_rfc3339()?)?;
        self.create(task).await
    }

    async fn create(&mut self, mut task: Task) -> Result<Task, CollectionError> {
        task.id = None;
        let created = self.store.create(task).await.map_err(|err| {
            let err: StoreError = err.into();
            warn!(error = %err, "failed to create task");
            CollectionError::Store(err)
        })?;
        let Some(id) = created.id else {
            return Err(StoreError::Transport("store returned a task without an id".into()).into());
        };

        if let Some(index) = self.position(id) {
            warn!(%id, "store reused an id already in the mirror; replacing entry");
            self.tasks[index] = created.clone();
        } else {
            self.tasks.push(created.clone());
        }
        debug!(%id, "task created");
        self.refresh_view();
        Ok(created)
    }

    /// Submit a full-record update for a task already in the mirror.
    ///
    /// `day` is re-derived from `date` and `time`, and `dateAdded` is kept
    /// from the mirror. The mirror changes only after the store confirms.
    ///
    /// # Errors
    /// Returns [`CollectionError::UnknownTask`] for ids not in the mirror,
    /// [`CollectionError::Validation`] for blank text,
    /// [`CollectionError::NotFound`] when the store no longer has the task
    /// (the local entry is dropped), or [`CollectionError::Store`] otherwise.
    pub async fn update(&mut self, mut edited: Task) -> Result<(), CollectionError> {
        let id = edited.id.ok_or(CollectionError::MissingId)?;
        let index = self.position(id).ok_or(CollectionError::UnknownTask(id))?;
        if edited.text.trim().is_empty() {
            return Err(ValidationError::EmptyText.into());
        }
        edited.sync_day();
        edited.date_added.clone_from(&self.tasks[index].date_added);

        match self.store.update(&edited).await.map_err(Into::<StoreError>::into) {
            // `&mut self` is held across the await, so `index` still points at `id`.
            Ok(()) => {
                self.tasks[index] = edited;
                self.refresh_view();
                Ok(())
            }
            Err(StoreError::NotFound(_)) => {
                warn!(%id, "task vanished from store; dropping local entry");
                self.forget_at(index);
                Err(CollectionError::NotFound(id))
            }
            Err(err) => {
                warn!(%id, error = %err, "failed to update task");
                Err(err.into())
            }
        }
    }

    /// Flip `done`, submit it, and roll the flip back if the store fails.
    ///
    /// Returns the confirmed `done` value.
    ///
    /// # Errors
    /// Returns [`CollectionError::UnknownTask`] for ids not in the mirror,
    /// [`CollectionError::NotFound`] when the store no longer has the task,
    /// or [`CollectionError::Store`] after rolling the flip back.
    pub async fn toggle_done(&mut self, id: TaskId) -> Result<bool, CollectionError> {
        let index = self.position(id).ok_or(CollectionError::UnknownTask(id))?;
        let previous = self.tasks[index].done;
        self.tasks[index].done = !previous;
        let submitted = self.tasks[index].clone();
        self.refresh_view();

        match self.store.update(&submitted).await.map_err(Into::<StoreError>::into) {
            Ok(()) => Ok(!previous),
            Err(StoreError::NotFound(_)) => {
                warn!(%id, "task vanished from store; dropping local entry");
                self.forget_at(index);
                Err(CollectionError::NotFound(id))
            }
            Err(err) => {
                warn!(%id, error = %err, "failed to toggle task; rolling back");
                self.tasks[index].done = previous;
                self.refresh_view();
                Err(err.into())
            }
        }
    }

    /// Delete a task and open its undo window.
    ///
    /// A store answer of "not found" counts as already deleted.
    ///
    /// # Errors
    /// Returns [`CollectionError::UnknownTask`] for ids not in the mirror, or
    /// [`CollectionError::Store`] when the store fails; the task then stays.
    pub async fn remove(&mut self, id: TaskId) -> Result<(), CollectionError> {
        let index = self.position(id).ok_or(CollectionError::UnknownTask(id))?;

        match self.store.delete(id).await.map_err(Into::<StoreError>::into) {
            Ok(()) => {}
            Err(StoreError::NotFound(_)) => debug!(%id, "task already gone from store"),
            Err(err) => {
                warn!(%id, error = %err, "failed to delete task");
                return Err(err.into());
            }
        }

        let removed = self.forget_at(index);
        if let Some(displaced) = self.undo.arm(removed, Instant::now()) {
            debug!(id = ?displaced.id, "previous deletion is no longer undoable");
        }
        info!(%id, "task deleted");
        Ok(())
    }

    /// Re-create the most recently deleted task while its window is open.
    ///
    /// The restored task gets a new id from the store and keeps its original
    /// `dateAdded`. Returns `None` when there is nothing to undo.
    ///
    /// # Errors
    /// Returns [`CollectionError::Store`] when re-creation fails; the pending
    /// deletion then stays available until its original deadline.
    pub async fn undo_delete(&mut self) -> Result<Option<Task>, CollectionError> {
        let Some(pending) = self.undo.take(Instant::now()) else {
            debug!("nothing to undo");
            return Ok(None);
        };

        match self.create(pending.task.clone()).await {
            Ok(restored) => {
                info!(old = ?pending.task.id, new = ?restored.id, "deletion undone");
                Ok(Some(restored))
            }
            Err(err) => {
                self.undo.restore(pending);
                Err(err)
            }
        }
    }

    /// Submit the open edit session through [`update`](Self::update).
    ///
    /// `done` is taken from the mirror rather than the session, so a toggle
    /// confirmed while the session was open is kept. The session closes on
    /// success or when the task turns out to be gone; on other failures it
    /// stays open so the edit can be retried.
    ///
    /// # Errors
    /// Returns [`CollectionError::NoActiveEdit`] without a session, otherwise
    /// whatever [`update`](Self::update) returns.
    pub async fn save_edit(&mut self) -> Result<(), CollectionError> {
        let mut edited = self
            .editing
            .as_ref()
            .map(EditSession::to_task)
            .ok_or(CollectionError::NoActiveEdit)?;
        if let Some(current) = edited.id.and_then(|id| self.task(id)) {
            edited.done = current.done;
        }

        match self.update(edited).await {
            Ok(()) => {
                self.editing = None;
                Ok(())
            }
            Err(err @ (CollectionError::NotFound(_) | CollectionError::UnknownTask(_))) => {
                self.editing = None;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }
}
