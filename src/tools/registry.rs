//! Fixed, ordered set of tools offered to the model.

use std::sync::Arc;

use crate::provider::ToolDefinition;
use crate::todo::TodoService;

use super::task_tools::{AddTask, ShowTasks};
use super::tool::Tool;

/// Tools in declaration order; names are unique.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The assistant's tool set: `add_task` and `show_tasks` over one to-do backend.
    pub fn task_tools(service: Arc<dyn TodoService>) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(AddTask::new(service.clone())));
        registry.register(Box::new(ShowTasks::new(service)));
        registry
    }

    /// Add a tool, replacing any existing tool with the same name in place.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        match self.tools.iter().position(|t| t.name() == tool.name()) {
            Some(idx) => self.tools[idx] = tool,
            None => self.tools.push(tool),
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    /// Name, description and schema of every tool, as sent to the provider.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
