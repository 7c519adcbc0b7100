//! Model provider trait and the Gemini implementation.

pub mod google;
pub mod http;

use async_trait::async_trait;

use crate::error::TaskmateError;
use crate::types::{message::AgentToolCall, FinishReason, GenerationSettings, ModelMessage, Usage};

pub use google::GoogleProvider;

/// A request sent to a model provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub messages: Vec<ModelMessage>,
    pub settings: GenerationSettings,
    pub tools: Option<Vec<ToolDefinition>>,
}

/// Tool definition sent to the provider API.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Response from a provider.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub text: String,
    pub usage: Usage,
    pub tool_calls: Vec<AgentToolCall>,
    pub finish_reason: Option<FinishReason>,
}

/// Core trait implemented by model providers.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Model id as the service names it, for logs.
    fn model_id(&self) -> &str;

    /// Generate a single (non-streaming) response.
    async fn generate_text(&self, request: &ProviderRequest)
        -> Result<ProviderResponse, TaskmateError>;
}
