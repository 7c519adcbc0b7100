//! The seam between the runtime and the functions the model may call.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Result, TaskmateError};
use crate::provider::ToolDefinition;

/// A function offered to the model.
///
/// `name`, `description` and `parameters` are sent to the model verbatim and
/// decide when it calls the tool, so changing their wording changes behavior.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema of the arguments object.
    fn parameters(&self) -> Value;

    /// Run with the model's arguments. The runtime has already checked them
    /// against [`Tool::parameters`].
    async fn call(&self, args: Value) -> Result<Value>;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

/// Decode a tool's arguments into its own type.
pub fn decode_args<T: DeserializeOwned>(tool_name: &str, args: Value) -> Result<T> {
    serde_json::from_value(args).map_err(|e| TaskmateError::MalformedToolArguments {
        tool_name: tool_name.to_string(),
        message: e.to_string(),
    })
}
