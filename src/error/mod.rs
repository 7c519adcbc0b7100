//! Error types for taskmate.

use std::time::Duration;

use thiserror::Error;

/// Every failure a turn or startup can hit.
#[derive(Error, Debug)]
pub enum TaskmateError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Missing credential: {0} is not set")]
    MissingCredential(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limited by the service")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Provider error: {provider}: {message}")]
    Provider { provider: String, message: String },

    #[error("Malformed arguments for tool {tool_name}: {message}")]
    MalformedToolArguments { tool_name: String, message: String },
}

/// Coarse grouping used for retry decisions and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A key is missing or was refused.
    Credentials,
    /// The service asked us to slow down.
    RateLimit,
    /// Transport failure or a 5xx; another attempt may succeed.
    Transient,
    /// The service or model refused this request as sent.
    Rejected,
    /// The model called a tool with arguments that do not fit its schema.
    ToolArguments,
    Configuration,
    /// Local I/O or decoding failure.
    Internal,
}

impl TaskmateError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingCredential(_) | Self::Authentication(_) => ErrorCategory::Credentials,
            Self::RateLimited { .. } => ErrorCategory::RateLimit,
            Self::Network(_) => ErrorCategory::Transient,
            Self::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Credentials,
                429 => ErrorCategory::RateLimit,
                500..=599 => ErrorCategory::Transient,
                _ => ErrorCategory::Rejected,
            },
            Self::Provider { .. } => ErrorCategory::Rejected,
            Self::MalformedToolArguments { .. } => ErrorCategory::ToolArguments,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Io(_) | Self::Serialization(_) => ErrorCategory::Internal,
        }
    }

    /// Rate limits and transient failures; nothing the caller sent was wrong.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::RateLimit | ErrorCategory::Transient
        )
    }

    /// The wait the service asked for, when it named one.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited {
                retry_after_ms: Some(ms),
            } => Some(Duration::from_millis(*ms)),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TaskmateError>;
