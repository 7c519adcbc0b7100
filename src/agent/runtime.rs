//! Agent runtime: one user turn through the model, running tool calls until
//! the model answers in text.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::AgentConfig;
use crate::error::TaskmateError;
use crate::prompt::PromptTemplate;
use crate::provider::{GoogleProvider, ModelProvider, ProviderRequest, ToolDefinition};
use crate::todo::TodoistClient;
use crate::tools::validation::validate_arguments;
use crate::tools::ToolRegistry;
use crate::types::*;
use crate::util::retry::RetryPolicy;

use super::conversation::ConversationTurn;

/// Provider calls allowed per turn before giving up.
pub const DEFAULT_MAX_ITERATIONS: usize = 15;

/// Output returned when a turn exhausts its iteration budget.
pub const ITERATION_LIMIT_OUTPUT: &str = "Agent stopped due to iteration limit or time limit.";

/// What the session hands the runtime for one turn.
#[derive(Debug, Clone, Copy)]
pub struct AgentInput<'a> {
    pub input: &'a str,
    pub history: &'a [ConversationTurn],
}

/// The runtime's answer for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentOutput {
    pub output: String,
}

/// Something that can answer a user turn given the prior history.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    async fn invoke(&self, input: AgentInput<'_>) -> Result<AgentOutput, TaskmateError>;
}

/// Tool-calling loop over a [`ModelProvider`].
pub struct AgentExecutor {
    provider: Arc<dyn ModelProvider>,
    tools: ToolRegistry,
    prompt: PromptTemplate,
    settings: GenerationSettings,
    retry: RetryPolicy,
    max_iterations: usize,
}

impl AgentExecutor {
    pub fn new(provider: Arc<dyn ModelProvider>, tools: ToolRegistry, prompt: PromptTemplate) -> Self {
        Self {
            provider,
            tools,
            prompt,
            settings: GenerationSettings::default(),
            retry: RetryPolicy::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Wire the Gemini provider and the Todoist-backed tools from configuration.
    pub fn from_config(config: &AgentConfig) -> Self {
        let provider = GoogleProvider::new(
            config.model.clone(),
            config.gemini_api_key.clone(),
            config.gemini_base_url.clone(),
        );
        let todo = TodoistClient::new(
            config.todoist_api_key.clone(),
            config.todoist_base_url.clone(),
        );

        Self::new(
            Arc::new(provider),
            ToolRegistry::task_tools(Arc::new(todo)),
            PromptTemplate::new(config.system_prompt.clone()),
        )
        .with_settings(
            GenerationSettings::builder()
                .temperature(config.temperature)
                .build(),
        )
        .with_retry_policy(config.retry.clone())
        .with_max_iterations(config.max_iterations)
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn prompt(&self) -> &PromptTemplate {
        &self.prompt
    }

    /// Run one tool call.
    ///
    /// Unknown tools are reported back to the model; bad arguments and tool
    /// failures abort the turn.
    async fn run_tool_call(&self, call: &AgentToolCall) -> Result<AgentToolResult, TaskmateError> {
        let Some(tool) = self.tools.get(&call.name) else {
            warn!(tool = %call.name, "Tool not found");
            return Ok(AgentToolResult {
                tool_call_id: call.id.clone(),
                name: call.name.clone(),
                result: serde_json::json!({
                    "error": format!(
                        "{} is not a valid tool, try one of [{}].",
                        call.name,
                        self.tools.names().join(", ")
                    )
                }),
                is_error: true,
            });
        };

        validate_arguments(&call.arguments, &tool.parameters()).map_err(|message| {
            TaskmateError::MalformedToolArguments {
                tool_name: call.name.clone(),
                message,
            }
        })?;

        info!(tool = %call.name, call_id = %call.id, "Executing tool");
        let result = tool.call(call.arguments.clone()).await?;

        Ok(AgentToolResult {
            tool_call_id: call.id.clone(),
            name: call.name.clone(),
            result,
            is_error: false,
        })
    }
}

#[async_trait]
impl AgentRuntime for AgentExecutor {
    async fn invoke(&self, input: AgentInput<'_>) -> Result<AgentOutput, TaskmateError> {
        let tool_defs: Option<Vec<ToolDefinition>> = if self.tools.is_empty() {
            None
        } else {
            Some(self.tools.definitions())
        };

        let mut scratchpad: Vec<ModelMessage> = Vec::new();
        let mut total_usage = Usage::default();

        for iteration in 0..self.max_iterations {
            let request = ProviderRequest {
                messages: self.prompt.render(input.history, input.input, &scratchpad),
                settings: self.settings.clone(),
                tools: tool_defs.clone(),
            };

            debug!(
                model = self.provider.model_id(),
                iteration,
                history = input.history.len(),
                scratchpad = scratchpad.len(),
                "invoke: calling provider"
            );
            let response = self
                .retry
                .run(|| self.provider.generate_text(&request))
                .await?;
            total_usage.merge(&response.usage);

            if response.tool_calls.is_empty() {
                debug!(
                    iterations = iteration + 1,
                    input_tokens = total_usage.input_tokens,
                    output_tokens = total_usage.output_tokens,
                    finish_reason = ?response.finish_reason,
                    "invoke: final answer"
                );
                return Ok(AgentOutput {
                    output: response.text,
                });
            }

            scratchpad.push(ModelMessage::assistant_tool_calls(
                &response.text,
                &response.tool_calls,
            ));
            for call in &response.tool_calls {
                let result = self.run_tool_call(call).await?;
                scratchpad.push(ModelMessage::tool_result(result));
            }
        }

        warn!(
            max_iterations = self.max_iterations,
            "invoke: iteration limit reached"
        );
        Ok(AgentOutput {
            output: ITERATION_LIMIT_OUTPUT.to_string(),
        })
    }
}
