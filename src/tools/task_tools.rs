//! The to-do tools exposed to the model.
//!
//! Names, descriptions and parameter descriptions below are what the model
//! reads when deciding whether a message calls for a tool. Treat edits to
//! them as behavior changes.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::Result;
use crate::todo::{list_all_tasks, NewTask, Task, TodoService};

use super::tool::{decode_args, Tool};

pub const ADD_TASK: &str = "add_task";
pub const ADD_TASK_DESCRIPTION: &str = "Adds a task to the todo list";
pub const ADD_TASK_TASK_PARAM: &str = "The task to add to the todo list";
pub const ADD_TASK_DESC_PARAM: &str = "Description of the task";

pub const SHOW_TASKS: &str = "show_tasks";
pub const SHOW_TASKS_DESCRIPTION: &str = "Shows all the tasks in the todo list";

/// Create one task with `task` as its content.
///
/// Emptiness is not checked here; the service accepts or rejects the content.
pub async fn add_task(service: &dyn TodoService, task: &str, desc: Option<&str>) -> Result<()> {
    let request = NewTask::new(task).with_description(desc.map(str::to_string));
    let created = service.create_task(&request).await?;
    info!(task_id = %created.id, "task created");
    Ok(())
}

/// Every task in the service, pages concatenated in order.
pub async fn show_tasks(service: &dyn TodoService) -> Result<Vec<Task>> {
    list_all_tasks(service).await
}

/// `add_task(task, desc?)`: answers the model with `null`.
pub struct AddTask {
    service: Arc<dyn TodoService>,
}

impl AddTask {
    pub fn new(service: Arc<dyn TodoService>) -> Self {
        Self { service }
    }
}

#[derive(Deserialize)]
struct AddTaskArgs {
    task: String,
    #[serde(default)]
    desc: Option<String>,
}

#[async_trait]
impl Tool for AddTask {
    fn name(&self) -> &str {
        ADD_TASK
    }

    fn description(&self) -> &str {
        ADD_TASK_DESCRIPTION
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "task": {"type": "string", "description": ADD_TASK_TASK_PARAM},
                "desc": {"type": "string", "description": ADD_TASK_DESC_PARAM},
            },
            "required": ["task"],
        })
    }

    async fn call(&self, args: Value) -> Result<Value> {
        let args: AddTaskArgs = decode_args(ADD_TASK, args)?;
        add_task(self.service.as_ref(), &args.task, args.desc.as_deref()).await?;
        Ok(Value::Null)
    }
}

/// `show_tasks()`: answers the model with the task list as a JSON array.
pub struct ShowTasks {
    service: Arc<dyn TodoService>,
}

impl ShowTasks {
    pub fn new(service: Arc<dyn TodoService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for ShowTasks {
    fn name(&self) -> &str {
        SHOW_TASKS
    }

    fn description(&self) -> &str {
        SHOW_TASKS_DESCRIPTION
    }

    fn parameters(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    async fn call(&self, _args: Value) -> Result<Value> {
        let tasks = show_tasks(self.service.as_ref()).await?;
        Ok(serde_json::to_value(tasks)?)
    }
}
