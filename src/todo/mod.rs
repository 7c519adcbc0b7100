//! To-do service abstraction and the Todoist REST client.
//!
//! Tasks live entirely in the external service; this module only mirrors the
//! fields a single create or list call returns.

pub mod todoist;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TaskmateError;

pub use todoist::TodoistClient;

/// A task as returned by the to-do service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<TaskDue>,
}

/// Due date information attached to a task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskDue {
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
}

/// Body of a create-task request.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewTask {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewTask {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

/// One page of a paginated task listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TaskPage {
    #[serde(default)]
    pub results: Vec<Task>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// The operations the assistant needs from a to-do backend.
#[async_trait]
pub trait TodoService: Send + Sync {
    /// Create one task.
    async fn create_task(&self, task: &NewTask) -> Result<Task, TaskmateError>;

    /// Fetch one page of tasks. `None` requests the first page.
    async fn list_tasks_page(&self, cursor: Option<&str>) -> Result<TaskPage, TaskmateError>;
}

/// Fetch every page and concatenate them in service order.
///
/// The result is exactly the pages joined end to end: no filtering, sorting
/// or deduplication. Listing stops when the cursor is absent or empty.
pub async fn list_all_tasks(service: &dyn TodoService) -> Result<Vec<Task>, TaskmateError> {
    let mut tasks = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = service.list_tasks_page(cursor.as_deref()).await?;
        pages += 1;
        tasks.extend(page.results);

        match page.next_cursor {
            Some(next) if !next.is_empty() => cursor = Some(next),
            _ => break,
        }
    }

    debug!(pages, tasks = tasks.len(), "listed tasks");
    Ok(tasks)
}
