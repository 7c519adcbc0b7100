//! Todoist REST API (v1) client.

use async_trait::async_trait;
use tracing::debug;

use crate::error::TaskmateError;
use crate::provider::http::{bearer_headers, check_status, join_url, shared_client};

use super::{NewTask, Task, TaskPage, TodoService};

pub const DEFAULT_BASE_URL: &str = "https://api.todoist.com/api/v1";

/// Environment variable holding the Todoist token, named in credential errors.
pub const API_KEY_VAR: &str = "TODOIST_API_KEY";

/// Thin client over the task endpoints.
#[derive(Clone)]
pub struct TodoistClient {
    api_key: Option<String>,
    base_url: String,
    page_limit: Option<u32>,
}

impl std::fmt::Debug for TodoistClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoistClient")
            .field("api_key", &self.api_key.as_ref().map(|_| ".."))
            .field("base_url", &self.base_url)
            .field("page_limit", &self.page_limit)
            .finish()
    }
}

impl TodoistClient {
    /// Create a client. A missing token is reported on the first request.
    pub fn new(api_key: Option<String>, base_url: Option<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            page_limit: None,
        }
    }

    /// Request pages of at most `limit` tasks instead of the server default.
    pub fn with_page_limit(mut self, limit: u32) -> Self {
        self.page_limit = Some(limit);
        self
    }

    fn api_key(&self) -> Result<&str, TaskmateError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| TaskmateError::MissingCredential(API_KEY_VAR.into()))
    }
}

#[async_trait]
impl TodoService for TodoistClient {
    async fn create_task(&self, task: &NewTask) -> Result<Task, TaskmateError> {
        let api_key = self.api_key()?;
        let url = join_url(&self.base_url, "tasks");

        debug!(content = %task.content, "Todoist create_task");

        let resp = shared_client()
            .post(&url)
            .headers(bearer_headers(api_key))
            .json(task)
            .send()
            .await?;
        Ok(check_status(resp).await?.json().await?)
    }

    async fn list_tasks_page(&self, cursor: Option<&str>) -> Result<TaskPage, TaskmateError> {
        let api_key = self.api_key()?;
        let url = join_url(&self.base_url, "tasks");

        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.to_string()));
        }
        if let Some(limit) = self.page_limit {
            query.push(("limit", limit.to_string()));
        }

        debug!(cursor, "Todoist list_tasks_page");

        let resp = shared_client()
            .get(&url)
            .headers(bearer_headers(api_key))
            .query(&query)
            .send()
            .await?;
        Ok(check_status(resp).await?.json().await?)
    }
}
