//! Task table shared by the in-process and file-backed stores.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use taskdeck_core::{Task, TaskId};
use tracing::warn;

use crate::error::StoreError;

/// Task rows plus the id high-water mark.
///
/// Serialized as `{"tasks": [...], "nextId": n}`; the `tasks` array is the
/// same shape a json-server `db.json` uses. Other top-level collections in
/// the document are carried through untouched.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskTable {
    #[serde(default)]
    tasks: Vec<Task>,
    #[serde(default)]
    next_id: u64,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TaskTable {
    /// Build a table from existing rows, assigning ids to rows that lack one.
    ///
    /// Rows that cannot get an id because the id space is exhausted are dropped.
    #[must_use]
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut table = Self {
            tasks,
            ..Self::default()
        };
        for index in 0..table.tasks.len() {
            if table.tasks[index].id.is_some() {
                continue;
            }
            match table.allocate_id() {
                Ok(id) => table.tasks[index].id = Some(id),
                Err(err) => warn!(error = %err, text = %table.tasks[index].text, "dropping seed row"),
            }
        }
        table.tasks.retain(|task| task.id.is_some());
        table
    }

    /// Rows in insertion order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    // Ids are never handed out twice, even after the highest row is deleted.
    fn allocate_id(&mut self) -> Result<TaskId, StoreError> {
        let highest = self
            .tasks
            .iter()
            .filter_map(|task| task.id.map(TaskId::get))
            .max()
            .unwrap_or(0);
        let exhausted = || StoreError::Validation("id space exhausted".into());
        let id = self.next_id.max(highest.checked_add(1).ok_or_else(exhausted)?);
        self.next_id = id.checked_add(1).ok_or_else(exhausted)?;
        Ok(TaskId(id))
    }

    /// Insert a new row and return it with its assigned id.
    ///
    /// # Errors
    /// Returns [`StoreError::Validation`] when the text is blank or no id is left.
    pub fn insert(&mut self, mut task: Task) -> Result<Task, StoreError> {
        if task.text.trim().is_empty() {
            return Err(StoreError::Validation("text is required".into()));
        }
        task.id = Some(self.allocate_id()?);
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Replace the row with the same id.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] for unknown ids and
    /// [`StoreError::Validation`] when the task carries no id.
    pub fn replace(&mut self, task: &Task) -> Result<(), StoreError> {
        let id = task
            .id
            .ok_or_else(|| StoreError::Validation("task has no id".into()))?;
        let slot = self
            .tasks
            .iter_mut()
            .find(|row| row.id == Some(id))
            .ok_or(StoreError::NotFound(id))?;
        *slot = task.clone();
        Ok(())
    }

    /// Delete the row with `id`.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] for unknown ids.
    pub fn remove(&mut self, id: TaskId) -> Result<(), StoreError> {
        let index = self
            .tasks
            .iter()
            .position(|row| row.id == Some(id))
            .ok_or(StoreError::NotFound(id))?;
        self.tasks.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdeck_core::TaskDraft;

    fn draft(text: &str) -> Task {
        TaskDraft::new(text, "2024-01-01", "10:00")
            .into_task("2024-01-01T00:00:00Z".into())
            .unwrap_or_else(|err| panic!("draft must be valid: {err}"))
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let mut table = TaskTable::default();
        let first = table.insert(draft("a")).unwrap_or_else(|err| panic!("insert: {err}"));
        let second = table.insert(draft("b")).unwrap_or_else(|err| panic!("insert: {err}"));
        assert_eq!(first.id, Some(TaskId(1)));
        assert_eq!(second.id, Some(TaskId(2)));
    }

    #[test]
    fn deleted_ids_are_not_reused() {
        let mut table = TaskTable::default();
        let first = table.insert(draft("a")).unwrap_or_else(|err| panic!("insert: {err}"));
        let id = first.id.unwrap_or_else(|| panic!("id assigned"));
        table.remove(id).unwrap_or_else(|err| panic!("remove: {err}"));
        let again = table.insert(draft("a")).unwrap_or_else(|err| panic!("insert: {err}"));
        assert_ne!(again.id, Some(id));
    }

    #[test]
    fn from_tasks_fills_missing_ids_after_existing_ones() {
        let mut seeded = draft("seeded");
        seeded.id = Some(TaskId(5));
        let table = TaskTable::from_tasks(vec![seeded, draft("fresh")]);
        let ids: Vec<_> = table.tasks().iter().filter_map(|t| t.id).collect();
        assert_eq!(ids, vec![TaskId(5), TaskId(6)]);
    }

    #[test]
    fn replace_and_remove_report_missing_rows() {
        let mut table = TaskTable::default();
        let mut ghost = draft("ghost");
        ghost.id = Some(TaskId(99));
        assert!(matches!(table.replace(&ghost), Err(StoreError::NotFound(TaskId(99)))));
        assert!(matches!(table.remove(TaskId(99)), Err(StoreError::NotFound(TaskId(99)))));
        ghost.id = None;
        assert!(matches!(table.replace(&ghost), Err(StoreError::Validation(_))));
    }

    #[test]
    fn from_tasks_does_not_collide_with_later_rows() {
        let mut seeded = draft("seeded");
        seeded.id = Some(TaskId(1));
        let table = TaskTable::from_tasks(vec![draft("fresh"), seeded]);
        let ids: Vec<_> = table.tasks().iter().filter_map(|t| t.id).collect();
        assert_eq!(ids, vec![TaskId(2), TaskId(1)]);
    }

    #[test]
    fn exhausted_id_space_is_an_error() {
        let mut last = draft("last");
        last.id = Some(TaskId(u64::MAX));
        let mut table = TaskTable::from_tasks(vec![last]);
        assert!(matches!(table.insert(draft("one more")), Err(StoreError::Validation(_))));
        assert_eq!(table.tasks().len(), 1);

        let mut near = draft("near");
        near.id = Some(TaskId(u64::MAX - 1));
        let table = TaskTable::from_tasks(vec![near, draft("unplaceable")]);
        assert_eq!(table.tasks().len(), 1);
    }

    #[test]
    fn unknown_collections_round_trip() {
        let table: TaskTable =
            serde_json::from_str(r#"{"tasks": [], "profile": {"name": "typicode"}}"#)
                .unwrap_or_else(|err| panic!("decode: {err}"));
        let encoded = serde_json::to_value(&table).unwrap_or_else(|err| panic!("encode: {err}"));
        assert_eq!(encoded["profile"]["name"], "typicode");
    }

    #[test]
    fn insert_rejects_blank_text() {
        let mut table = TaskTable::default();
        let mut blank = draft("x");
        blank.text = "  ".into();
        assert!(matches!(table.insert(blank), Err(StoreError::Validation(_))));
        assert!(table.tasks().is_empty());
    }
}
