//! Gemini provider against a mock HTTP server.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use taskmate::error::TaskmateError;
use taskmate::models::GoogleModel;
use taskmate::provider::{GoogleProvider, ModelProvider, ProviderRequest, ToolDefinition};
use taskmate::todo::{TodoService, TodoistClient};
use taskmate::tools::ToolRegistry;
use taskmate::types::*;

const GENERATE_PATH: &str = "/models/gemini-2.5-flash:generateContent";

fn provider(server: &MockServer) -> GoogleProvider {
    GoogleProvider::new(
        GoogleModel::Gemini25Flash,
        Some("gem-key".into()),
        Some(server.uri()),
    )
}

fn add_task_request() -> ProviderRequest {
    ProviderRequest {
        messages: vec![
            ModelMessage::system("You are a helpful assistant."),
            ModelMessage::user("add a task to call mom"),
        ],
        settings: GenerationSettings::builder().temperature(0.3).build(),
        tools: Some(vec![ToolDefinition {
            name: "add_task".into(),
            description: "Adds a task to the todo list".into(),
            parameters: json!({
                "type": "object",
                "properties": {"task": {"type": "string"}},
                "required": ["task"],
            }),
        }]),
    }
}

#[tokio::test]
async fn sends_tools_temperature_and_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "gem-key"))
        .and(body_partial_json(json!({
            "systemInstruction": {"parts": [{"text": "You are a helpful assistant."}]},
            "contents": [{"role": "user", "parts": [{"text": "add a task to call mom"}]}],
            "generationConfig": {"temperature": 0.3},
            "tools": [{"functionDeclarations": [{
                "name": "add_task",
                "description": "Adds a task to the todo list",
            }]}],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Sure."}]},
                "finishReason": "STOP",
            }],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 2, "totalTokenCount": 14},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = provider(&server)
        .generate_text(&add_task_request())
        .await
        .expect("generate should succeed");

    assert_eq!(response.text, "Sure.");
    assert_eq!(response.finish_reason, Some(FinishReason::Stop));
    assert_eq!(response.usage.total_tokens, 14);
    assert!(response.tool_calls.is_empty());
}

#[tokio::test]
async fn parses_function_calls_with_signatures() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{
                    "functionCall": {"name": "add_task", "args": {"task": "call mom"}},
                    "thoughtSignature": "c2ln",
                }]},
                "finishReason": "STOP",
            }],
        })))
        .mount(&server)
        .await;

    let response = provider(&server)
        .generate_text(&add_task_request())
        .await
        .expect("generate should succeed");

    assert_eq!(response.finish_reason, Some(FinishReason::ToolCalls));
    assert_eq!(response.tool_calls.len(), 1);
    let call = &response.tool_calls[0];
    assert_eq!(call.name, "add_task");
    assert_eq!(call.arguments, json!({"task": "call mom"}));
    assert_eq!(call.thought_signature.as_deref(), Some("c2ln"));
    assert!(!call.id.is_empty());
}

#[tokio::test]
async fn thought_parts_are_not_part_of_the_answer() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"parts": [
                    {"text": "The user wants a task.", "thought": true},
                    {"text": "Added it."},
                ]},
                "finishReason": "STOP",
            }],
        })))
        .mount(&server)
        .await;

    let response = provider(&server)
        .generate_text(&add_task_request())
        .await
        .unwrap();

    assert_eq!(response.text, "Added it.");
}

#[tokio::test]
async fn empty_candidates_is_a_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": {"blockReason": "SAFETY"},
        })))
        .mount(&server)
        .await;

    let err = provider(&server)
        .generate_text(&add_task_request())
        .await
        .unwrap_err();

    assert!(matches!(err, TaskmateError::Provider { .. }));
}

#[tokio::test]
async fn rate_limit_status_is_retryable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota"))
        .mount(&server)
        .await;

    let err = provider(&server)
        .generate_text(&add_task_request())
        .await
        .unwrap_err();

    assert!(matches!(err, TaskmateError::RateLimited { .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn missing_key_is_reported_on_first_call() {
    let provider = GoogleProvider::new(GoogleModel::Gemini25Flash, None, None);

    let err = provider
        .generate_text(&add_task_request())
        .await
        .unwrap_err();

    assert!(matches!(err, TaskmateError::MissingCredential(ref var) if var == "GEMINI_API_KEY"));
}

#[tokio::test]
async fn show_tasks_is_declared_without_parameters() {
    let server = MockServer::start().await;
    let todo: Arc<dyn TodoService> = Arc::new(TodoistClient::new(None, None));

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "ok"}]}, "finishReason": "STOP"}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = ProviderRequest {
        tools: Some(ToolRegistry::task_tools(todo).definitions()),
        ..add_task_request()
    };
    provider(&server).generate_text(&request).await.unwrap();

    let sent: serde_json::Value = server.received_requests().await.unwrap()[0]
        .body_json()
        .unwrap();
    let decls = sent["tools"][0]["functionDeclarations"].as_array().unwrap();
    assert_eq!(decls.len(), 2);
    assert_eq!(decls[0]["name"], "add_task");
    assert_eq!(decls[0]["parameters"]["required"], json!(["task"]));
    assert_eq!(decls[1]["name"], "show_tasks");
    assert!(decls[1].get("parameters").is_none());
}

#[tokio::test]
async fn rate_limit_carries_gemini_retry_delay() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {
                "code": 429,
                "status": "RESOURCE_EXHAUSTED",
                "details": [
                    {"@type": "type.googleapis.com/google.rpc.RetryInfo", "retryDelay": "30s"},
                ],
            },
        })))
        .mount(&server)
        .await;

    let err = provider(&server)
        .generate_text(&add_task_request())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TaskmateError::RateLimited {
            retry_after_ms: Some(30_000)
        }
    ));
}
