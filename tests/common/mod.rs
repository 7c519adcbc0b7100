//! Shared test helpers: a scripted model provider and an in-memory to-do service.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use taskmate::error::TaskmateError;
use taskmate::provider::{ModelProvider, ProviderRequest, ProviderResponse};
use taskmate::todo::{NewTask, Task, TaskPage, TodoService};
use taskmate::types::*;

/// A provider that replays queued responses and records every request.
pub struct MockProvider {
    responses: Mutex<VecDeque<Result<ProviderResponse, TaskmateError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a final text response.
    pub fn queue_response(&self, text: &str) {
        self.responses.lock().unwrap().push_back(Ok(ProviderResponse {
            text: text.to_string(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 20,
                total_tokens: 30,
            },
            tool_calls: vec![],
            finish_reason: Some(FinishReason::Stop),
        }));
    }

    /// Queue a tool call response.
    pub fn queue_tool_call(&self, id: &str, name: &str, args: serde_json::Value) {
        self.responses.lock().unwrap().push_back(Ok(ProviderResponse {
            text: String::new(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 5,
                total_tokens: 15,
            },
            tool_calls: vec![AgentToolCall {
                id: id.to_string(),
                name: name.to_string(),
                arguments: args,
                thought_signature: None,
            }],
            finish_reason: Some(FinishReason::ToolCalls),
        }));
    }

    /// Queue a failure.
    pub fn queue_error(&self, error: TaskmateError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn model_id(&self) -> &str {
        "mock-model"
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, TaskmateError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(ProviderResponse {
                    text: "Mock response".to_string(),
                    usage: Usage::default(),
                    tool_calls: vec![],
                    finish_reason: Some(FinishReason::Stop),
                })
            })
    }
}

/// In-memory to-do backend serving fixed pages and recording creates.
pub struct FakeTodoService {
    pages: Vec<Vec<Task>>,
    created: Mutex<Vec<NewTask>>,
    page_requests: Mutex<Vec<Option<String>>>,
    fail_creates: bool,
}

impl FakeTodoService {
    pub fn new() -> Self {
        Self::with_pages(vec![])
    }

    pub fn with_pages(pages: Vec<Vec<Task>>) -> Self {
        Self {
            pages,
            created: Mutex::new(Vec::new()),
            page_requests: Mutex::new(Vec::new()),
            fail_creates: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_creates: true,
            ..Self::new()
        }
    }

    pub fn created(&self) -> Vec<NewTask> {
        self.created.lock().unwrap().clone()
    }

    pub fn page_requests(&self) -> Vec<Option<String>> {
        self.page_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TodoService for FakeTodoService {
    async fn create_task(&self, task: &NewTask) -> Result<Task, TaskmateError> {
        if self.fail_creates {
            return Err(TaskmateError::api(400, "content must not be empty"));
        }
        let mut created = self.created.lock().unwrap();
        created.push(task.clone());
        Ok(Task {
            description: task.description.clone().unwrap_or_default(),
            ..task_fixture(&created.len().to_string(), &task.content)
        })
    }

    async fn list_tasks_page(&self, cursor: Option<&str>) -> Result<TaskPage, TaskmateError> {
        self.page_requests
            .lock()
            .unwrap()
            .push(cursor.map(str::to_string));

        let index: usize = match cursor {
            None => 0,
            Some(c) => c
                .strip_prefix("page-")
                .and_then(|n| n.parse().ok())
                .ok_or_else(|| TaskmateError::api(400, "bad cursor"))?,
        };
        let results = self.pages.get(index).cloned().unwrap_or_default();
        let next_cursor = (index + 1 < self.pages.len()).then(|| format!("page-{}", index + 1));
        Ok(TaskPage {
            results,
            next_cursor,
        })
    }
}

pub fn task_fixture(id: &str, content: &str) -> Task {
    Task {
        id: id.to_string(),
        content: content.to_string(),
        description: String::new(),
        project_id: None,
        priority: None,
        labels: vec![],
        due: None,
    }
}
