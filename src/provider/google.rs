//! Google Gemini API provider.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::TaskmateError;
use crate::models::GoogleModel;
use crate::types::*;

use super::http::{check_status, join_url, shared_client};
use super::{ModelProvider, ProviderRequest, ProviderResponse, ToolDefinition};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variable holding the Gemini key, named in credential errors.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

pub struct GoogleProvider {
    model: GoogleModel,
    api_key: Option<String>,
    base_url: String,
}

impl GoogleProvider {
    /// Create a provider. A missing key is reported on the first request.
    pub fn new(model: GoogleModel, api_key: Option<String>, base_url: Option<String>) -> Self {
        Self {
            model,
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    pub fn build_request_body(&self, request: &ProviderRequest) -> Value {
        let mut system_instruction = None;
        let mut contents: Vec<Value> = Vec::new();

        for msg in &request.messages {
            match msg.role {
                Role::System => {
                    system_instruction = Some(json!({
                        "parts": [{"text": msg.text()}]
                    }));
                }
                Role::User => {
                    contents.push(json!({
                        "role": "user",
                        "parts": [{"text": msg.text()}],
                    }));
                }
                Role::Assistant => {
                    let parts = build_model_parts(&msg.content);
                    if !parts.is_empty() {
                        contents.push(json!({
                            "role": "model",
                            "parts": parts,
                        }));
                    }
                }
                Role::Tool => {
                    for part in &msg.content {
                        if let ContentPart::ToolResult(tr) = part {
                            push_function_response(&mut contents, tr);
                        }
                    }
                }
            }
        }

        let mut body = serde_json::Map::new();
        body.insert("contents".into(), Value::Array(contents));

        if let Some(sys) = system_instruction {
            body.insert("systemInstruction".into(), sys);
        }

        let mut gen_config = serde_json::Map::new();
        if let Some(temp) = request.settings.temperature {
            gen_config.insert("temperature".into(), temp.into());
        }
        if let Some(max) = request.settings.max_output_tokens {
            gen_config.insert("maxOutputTokens".into(), max.into());
        }
        if !gen_config.is_empty() {
            body.insert("generationConfig".into(), Value::Object(gen_config));
        }

        if let Some(ref tools) = request.tools {
            if !tools.is_empty() {
                let fn_decls: Vec<Value> = tools.iter().map(function_declaration).collect();
                body.insert(
                    "tools".into(),
                    json!([{"functionDeclarations": fn_decls}]),
                );
            }
        }

        Value::Object(body)
    }
}

#[async_trait]
impl ModelProvider for GoogleProvider {
    fn model_id(&self) -> &str {
        self.model.as_str()
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, TaskmateError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| TaskmateError::MissingCredential(API_KEY_VAR.into()))?;

        let body = self.build_request_body(request);
        let url = join_url(
            &self.base_url,
            &format!("models/{}:generateContent", self.model.as_str()),
        );

        debug!(
            model = self.model.as_str(),
            messages = request.messages.len(),
            "Google generate_text"
        );

        let resp = shared_client()
            .post(&url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;
        let data: GeminiResponse = check_status(resp).await?.json().await?;

        let candidate = data
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| TaskmateError::Provider {
                provider: "google".into(),
                message: "No candidates in Gemini response".into(),
            })?;

        let mut text = String::new();
        let mut tool_calls = Vec::new();

        for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
            if let Some(t) = part.text {
                if !part.thought {
                    text.push_str(&t);
                }
            }
            if let Some(fc) = part.function_call {
                tool_calls.push(AgentToolCall {
                    id: fc.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                    name: fc.name,
                    arguments: fc.args.unwrap_or_else(|| Value::Object(Default::default())),
                    thought_signature: part.thought_signature,
                });
            }
        }

        let finish_reason = if tool_calls.is_empty() {
            candidate.finish_reason.as_deref().map(FinishReason::from_gemini)
        } else {
            Some(FinishReason::ToolCalls)
        };

        let usage = data
            .usage_metadata
            .map(|u| Usage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            })
            .unwrap_or_default();

        Ok(ProviderResponse {
            text,
            usage,
            tool_calls,
            finish_reason,
        })
    }
}

/// One `functionDeclarations` entry.
///
/// Gemini rejects an object schema with no properties, so a tool that takes
/// no arguments is declared without `parameters`.
fn function_declaration(tool: &ToolDefinition) -> Value {
    let mut decl = json!({
        "name": tool.name,
        "description": tool.description,
    });
    let has_properties = tool.parameters["properties"]
        .as_object()
        .is_some_and(|props| !props.is_empty());
    if has_properties {
        decl["parameters"] = tool.parameters.clone();
    }
    decl
}

fn build_model_parts(content: &[ContentPart]) -> Vec<Value> {
    content
        .iter()
        .filter_map(|part| match part {
            ContentPart::Text { text } if !text.is_empty() => Some(json!({"text": text})),
            ContentPart::ToolCall(tc) => {
                let mut part = json!({
                    "functionCall": {
                        "name": tc.name,
                        "args": tc.arguments,
                    }
                });
                if let Some(ref sig) = tc.thought_signature {
                    part["thoughtSignature"] = json!(sig);
                }
                Some(part)
            }
            _ => None,
        })
        .collect()
}

/// Function responses for one round of calls travel together in a single user turn.
fn push_function_response(contents: &mut Vec<Value>, result: &AgentToolResult) {
    let response = match &result.result {
        Value::Object(_) => result.result.clone(),
        other => json!({ "result": other }),
    };
    let part = json!({
        "functionResponse": {
            "name": result.name,
            "response": response,
        }
    });

    if let Some(last) = contents.last_mut() {
        let is_response_turn = last["role"] == "user"
            && last["parts"]
                .as_array()
                .is_some_and(|parts| parts.iter().all(|p| p.get("functionResponse").is_some()));
        if is_response_turn {
            if let Some(parts) = last["parts"].as_array_mut() {
                parts.push(part);
                return;
            }
        }
    }

    contents.push(json!({
        "role": "user",
        "parts": [part],
    }));
}

// Internal Gemini response types

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
    function_call: Option<GeminiFunctionCall>,
    thought_signature: Option<String>,
}

#[derive(Deserialize)]
struct GeminiFunctionCall {
    id: Option<String>,
    name: String,
    args: Option<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}
