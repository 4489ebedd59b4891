//! JSON document store compatible with a json-server `db.json`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use taskdeck_core::{Task, TaskId};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::StoreError;
use crate::table::TaskTable;

/// Task store persisted as a single JSON document on disk.
///
/// Every operation reads the document, applies the change, and rewrites it
/// through a temporary file so a crash never leaves a half-written file.
/// Top-level keys other than `tasks` and `nextId` are written back as read.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open (lazily) the document at `path`. A missing file reads as empty.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Location of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_table(&self) -> Result<TaskTable, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(TaskTable::default()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(TaskTable::default()),
            Err(err) => Err(err.into()),
        }
    }

    async fn write_table(&self, table: &TaskTable) -> Result<(), StoreError> {
        let encoded = serde_json::to_vec_pretty(table)?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, encoded).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        Ok(())
    }

    /// Every stored task in insertion order.
    ///
    /// # Errors
    /// Returns an error when the document cannot be read or decoded.
    pub async fn list(&self) -> Result<Vec<Task>, StoreError> {
        let _guard = self.lock.lock().await;
        let table = self.read_table().await?;
        debug!(path = %self.path.display(), count = table.tasks().len(), "file store list");
        Ok(table.tasks().to_vec())
    }

    /// Store a new task and return it with its id.
    ///
    /// # Errors
    /// Returns an error when validation fails or the document cannot be rewritten.
    pub async fn create(&self, task: Task) -> Result<Task, StoreError> {
        let _guard = self.lock.lock().await;
        let mut table = self.read_table().await?;
        let created = table.insert(task)?;
        self.write_table(&table).await?;
        debug!(id = ?created.id, "file store create");
        Ok(created)
    }

    /// Replace a stored task by id.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] for unknown ids, or an I/O error.
    pub async fn update(&self, task: &Task) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut table = self.read_table().await?;
        table.replace(task)?;
        self.write_table(&table).await?;
        debug!(id = ?task.id, "file store update");
        Ok(())
    }

    /// Delete a stored task by id.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] for unknown ids, or an I/O error.
    pub async fn delete(&self, id: TaskId) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut table = self.read_table().await?;
        table.remove(id)?;
        self.write_table(&table).await?;
        debug!(%id, "file store delete");
        Ok(())
    }
}
