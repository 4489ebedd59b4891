//! Async persistence abstraction consumed by the task collection.

use std::sync::Arc;

use taskdeck_core::{Task, TaskId};
use taskdeck_store::{HttpStore, JsonFileStore, MemoryStore, StoreError};

/// Async CRUD contract of the task persistence service.
///
/// Calls resolve on the caller's task; nothing here requires `Send`, matching
/// the single-threaded event loop that drives a [`crate::TaskCollection`].
#[allow(async_fn_in_trait)]
pub trait AsyncTaskStore {
    /// Error type bubbled up from the backing store.
    type Error: Into<StoreError>;

    /// Fetch every task.
    ///
    /// # Errors
    /// Returns a store-specific error when the service is unreachable or fails.
    async fn list(&self) -> Result<Vec<Task>, Self::Error>;

    /// Persist a task that has no id yet and return it with the assigned id.
    ///
    /// # Errors
    /// Returns a store-specific error when the payload is rejected or the call fails.
    async fn create(&self, task: Task) -> Result<Task, Self::Error>;

    /// Replace the stored record carrying the same id.
    ///
    /// # Errors
    /// Returns a store-specific error, including "not found" for stale ids.
    async fn update(&self, task: &Task) -> Result<(), Self::Error>;

    /// Delete the stored record by id.
    ///
    /// # Errors
    /// Returns a store-specific error, including "not found" for stale ids.
    async fn delete(&self, id: TaskId) -> Result<(), Self::Error>;
}

impl AsyncTaskStore for MemoryStore {
    type Error = StoreError;

    async fn list(&self) -> Result<Vec<Task>, Self::Error> {
        Self::list(self).await
    }

    async fn create(&self, task: Task) -> Result<Task, Self::Error> {
        Self::create(self, task).await
    }

    async fn update(&self, task: &Task) -> Result<(), Self::Error> {
        Self::update(self, task).await
    }

    async fn delete(&self, id: TaskId) -> Result<(), Self::Error> {
        Self::delete(self, id).await
    }
}

impl AsyncTaskStore for JsonFileStore {
    type Error = StoreError;

    async fn list(&self) -> Result<Vec<Task>, Self::Error> {
        Self::list(self).await
    }

    async fn create(&self, task: Task) -> Result<Task, Self::Error> {
        Self::create(self, task).await
    }

    async fn update(&self, task: &Task) -> Result<(), Self::Error> {
        Self::update(self, task).await
    }

    async fn delete(&self, id: TaskId) -> Result<(), Self::Error> {
        Self::delete(self, id).await
    }
}

impl AsyncTaskStore for HttpStore {
    type Error = StoreError;

    async fn list(&self) -> Result<Vec<Task>, Self::Error> {
        Self::list(self).await
    }

    async fn create(&self, task: Task) -> Result<Task, Self::Error> {
        Self::create(self, task).await
    }

    async fn update(&self, task: &Task) -> Result<(), Self::Error> {
        Self::update(self, task).await
    }

    async fn delete(&self, id: TaskId) -> Result<(), Self::Error> {
        Self::delete(self, id).await
    }
}

impl<S> AsyncTaskStore for &S
where
    S: AsyncTaskStore + ?Sized,
{
    type Error = S::Error;

    async fn list(&self) -> Result<Vec<Task>, Self::Error> {
        (**self).list().await
    }

    async fn create(&self, task: Task) -> Result<Task, Self::Error> {
        (**self).create(task).await
    }

    async fn update(&self, task: &Task) -> Result<(), Self::Error> {
        (**self).update(task).await
    }

    async fn delete(&self, id: TaskId) -> Result<(), Self::Error> {
        (**self).delete(id).await
    }
}

impl<S> AsyncTaskStore for Arc<S>
where
    S: AsyncTaskStore + ?Sized,
{
    type Error = S::Error;

    async fn list(&self) -> Result<Vec<Task>, Self::Error> {
        (**self).list().await
    }

    async fn create(&self, task: Task) -> Result<Task, Self::Error> {
        (**self).create(task).await
    }

    async fn update(&self, task: &Task) -> Result<(), Self::Error> {
        (**self).update(task).await
    }

    async fn delete(&self, id: TaskId) -> Result<(), Self::Error> {
        (**self).delete(id).await
    }
}
