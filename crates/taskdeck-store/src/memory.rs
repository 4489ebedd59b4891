//! In-process task store.

use std::sync::Arc;

use taskdeck_core::{Task, TaskId};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::StoreError;
use crate::table::TaskTable;

/// Task store held entirely in memory.
///
/// Clones share the same table, so a test can keep a handle and inspect
/// what a consumer wrote.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    table: Arc<Mutex<TaskTable>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `tasks`; rows without an id get one.
    #[must_use]
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            table: Arc::new(Mutex::new(TaskTable::from_tasks(tasks))),
        }
    }

    /// Every stored task in insertion order.
    ///
    /// # Errors
    /// Never fails; the signature matches the other stores.
    pub async fn list(&self) -> Result<Vec<Task>, StoreError> {
        let table = self.table.lock().await;
        debug!(count = table.tasks().len(), "memory store list");
        Ok(table.tasks().to_vec())
    }

    /// Store a new task and return it with its id.
    ///
    /// # Errors
    /// Returns [`StoreError::Validation`] when the text is blank.
    pub async fn create(&self, task: Task) -> Result<Task, StoreError> {
        let created = self.table.lock().await.insert(task)?;
        debug!(id = ?created.id, "memory store create");
        Ok(created)
    }

    /// Replace a stored task by id.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] for unknown ids.
    pub async fn update(&self, task: &Task) -> Result<(), StoreError> {
        debug!(id = ?task.id, "memory store update");
        self.table.lock().await.replace(task)
    }

    /// Delete a stored task by id.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] for unknown ids.
    pub async fn delete(&self, id: TaskId) -> Result<(), StoreError> {
        debug!(%id, "memory store delete");
        self.table.lock().await.remove(id)
    }
}
