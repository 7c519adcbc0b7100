//! Shared HTTP client and status mapping.

use std::sync::OnceLock;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};

use crate::error::TaskmateError;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .pool_max_idle_per_host(10)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new())
    })
}

/// Build default headers for a Bearer-token API.
pub fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// Map a non-success HTTP status and body to an error.
pub fn status_to_error(status: u16, body: &str) -> TaskmateError {
    match status {
        401 | 403 => TaskmateError::Authentication(body.to_string()),
        429 => TaskmateError::RateLimited {
            retry_after_ms: retry_delay_from_body(body),
        },
        _ => TaskmateError::api(status, body),
    }
}

/// Read a response, turning non-2xx statuses into errors.
///
/// A `Retry-After` header (seconds) wins over any delay named in the body.
pub async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, TaskmateError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let header_wait = resp
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(|secs| secs * 1000);
    let body_text = resp.text().await.unwrap_or_default();

    Err(match status_to_error(status.as_u16(), &body_text) {
        TaskmateError::RateLimited { retry_after_ms } => TaskmateError::RateLimited {
            retry_after_ms: header_wait.or(retry_after_ms),
        },
        other => other,
    })
}

/// Gemini's 429 body: `error.details[].retryDelay`, e.g. `"30s"` or `"1.5s"`.
fn retry_delay_from_body(body: &str) -> Option<u64> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value["error"]["details"]
        .as_array()?
        .iter()
        .filter_map(|detail| detail["retryDelay"].as_str())
        .find_map(|delay| delay.strip_suffix('s')?.parse::<f64>().ok())
        .map(|secs| (secs * 1000.0) as u64)
}

/// Join a base URL and a path without doubling the slash.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_covers_auth_and_rate_limits() {
        assert!(matches!(
            status_to_error(401, "nope"),
            TaskmateError::Authentication(_)
        ));
        assert!(matches!(
            status_to_error(403, "nope"),
            TaskmateError::Authentication(_)
        ));
        assert!(matches!(
            status_to_error(
                429,
                r#"{"error":{"code":429,"details":[
                    {"@type":"type.googleapis.com/google.rpc.QuotaFailure"},
                    {"@type":"type.googleapis.com/google.rpc.RetryInfo","retryDelay":"1.5s"}
                ]}}"#
            ),
            TaskmateError::RateLimited {
                retry_after_ms: Some(1500)
            }
        ));
        assert!(matches!(
            status_to_error(500, "boom"),
            TaskmateError::Api { status: 500, .. }
        ));
    }

    #[test]
    fn rate_limit_without_named_delay_has_none() {
        assert!(matches!(
            status_to_error(429, "quota exceeded"),
            TaskmateError::RateLimited {
                retry_after_ms: None
            }
        ));
    }

    #[test]
    fn join_url_normalizes_slashes() {
        assert_eq!(join_url("http://x/api/", "/tasks"), "http://x/api/tasks");
        assert_eq!(join_url("http://x/api", "tasks"), "http://x/api/tasks");
    }
}
