//! REST client for a json-server style `/tasks` resource.

use std::time::Duration;

use reqwest::{Response, StatusCode};
use taskdeck_core::{Task, TaskId};
use tracing::{debug, warn};

use crate::error::StoreError;

/// Task store reached over HTTP.
///
/// Speaks `GET/POST {base}/tasks` and `PUT/DELETE {base}/tasks/{id}`.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStore {
    /// Build a client rooted at `base_url` with a per-request timeout.
    ///
    /// # Errors
    /// Returns [`StoreError::Transport`] when the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { client, base_url }
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/tasks", self.base_url)
    }

    fn task_url(&self, id: TaskId) -> String {
        format!("{}/tasks/{id}", self.base_url)
    }

    /// Fetch every task.
    ///
    /// # Errors
    /// Returns [`StoreError::Transport`] on network or server failure.
    pub async fn list(&self) -> Result<Vec<Task>, StoreError> {
        debug!(url = %self.collection_url(), "GET tasks");
        let response = self.client.get(self.collection_url()).send().await?;
        let response = check_status(response, None).await?;
        Ok(response.json().await?)
    }

    /// Create a task; the server assigns the id.
    ///
    /// # Errors
    /// Returns [`StoreError::Validation`] when the server rejects the payload,
    /// or [`StoreError::Transport`] on failure or when no id comes back.
    pub async fn create(&self, task: Task) -> Result<Task, StoreError> {
        debug!(text = %task.text, "POST task");
        let response = self
            .client
            .post(self.collection_url())
            .json(&task)
            .send()
            .await?;
        let response = check_status(response, None).await?;
        let created: Task = response.json().await?;
        if created.id.is_none() {
            return Err(StoreError::Transport("server returned a task without an id".into()));
        }
        Ok(created)
    }

    /// Replace a task by id.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] on 404, [`StoreError::Validation`] when
    /// the task has no id or is rejected, [`StoreError::Transport`] otherwise.
    pub async fn update(&self, task: &Task) -> Result<(), StoreError> {
        let id = task
            .id
            .ok_or_else(|| StoreError::Validation("task has no id".into()))?;
        debug!(%id, "PUT task");
        let response = self.client.put(self.task_url(id)).json(task).send().await?;
        check_status(response, Some(id)).await?;
        Ok(())
    }

    /// Delete a task by id.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] on 404, [`StoreError::Transport`] otherwise.
    pub async fn delete(&self, id: TaskId) -> Result<(), StoreError> {
        debug!(%id, "DELETE task");
        let response = self.client.delete(self.task_url(id)).send().await?;
        check_status(response, Some(id)).await?;
        Ok(())
    }
}

async fn check_status(response: Response, id: Option<TaskId>) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    warn!(%status, body = %body, "task store request failed");
    Err(match (status, id) {
        (StatusCode::NOT_FOUND, Some(id)) => StoreError::NotFound(id),
        (StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY, _) => {
            StoreError::Validation(if body.is_empty() { status.to_string() } else { body })
        }
        _ => StoreError::Transport(format!("HTTP {status}: {body}")),
    })
}
