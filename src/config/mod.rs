//! Configuration: `.env` file, then process environment, then CLI flags.

use std::fmt;
use std::str::FromStr;

use crate::agent::conversation::MIN_HISTORY_TURNS;
use crate::agent::runtime::DEFAULT_MAX_ITERATIONS;
use crate::error::{Result, TaskmateError};
use crate::models::GoogleModel;
use crate::prompt::DEFAULT_SYSTEM_PROMPT;
use crate::session::TurnErrorPolicy;
use crate::util::retry::RetryPolicy;

/// Default sampling temperature; low so tool selection stays predictable.
pub const DEFAULT_TEMPERATURE: f64 = 0.3;

/// Everything the binary needs to wire a session.
///
/// Credentials are optional here: a missing key surfaces as
/// [`TaskmateError::MissingCredential`] when that service is first called.
#[derive(Clone, PartialEq)]
pub struct AgentConfig {
    pub gemini_api_key: Option<String>,
    pub todoist_api_key: Option<String>,
    pub gemini_base_url: Option<String>,
    pub todoist_base_url: Option<String>,
    pub model: GoogleModel,
    pub temperature: f64,
    pub system_prompt: String,
    pub max_history_turns: Option<usize>,
    pub max_iterations: usize,
    pub retry: RetryPolicy,
    pub on_turn_error: TurnErrorPolicy,
}

impl fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentConfig")
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| ".."))
            .field("todoist_api_key", &self.todoist_api_key.as_ref().map(|_| ".."))
            .field("gemini_base_url", &self.gemini_base_url)
            .field("todoist_base_url", &self.todoist_base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("system_prompt", &self.system_prompt)
            .field("max_history_turns", &self.max_history_turns)
            .field("max_iterations", &self.max_iterations)
            .field("retry", &self.retry)
            .field("on_turn_error", &self.on_turn_error)
            .finish()
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            todoist_api_key: None,
            gemini_base_url: None,
            todoist_base_url: None,
            model: GoogleModel::default(),
            temperature: DEFAULT_TEMPERATURE,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_history_turns: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            retry: RetryPolicy::default(),
            on_turn_error: TurnErrorPolicy::default(),
        }
    }
}

impl AgentConfig {
    /// Load from the environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self {
            gemini_api_key: get("GEMINI_API_KEY").or_else(|| get("GOOGLE_API_KEY")),
            todoist_api_key: get("TODOIST_API_KEY"),
            gemini_base_url: get("GEMINI_BASE_URL"),
            todoist_base_url: get("TODOIST_BASE_URL"),
            ..Self::default()
        };

        if let Some(model) = parse_var::<GoogleModel>(&get, "TASKMATE_MODEL")? {
            config.model = model;
        }
        if let Some(temperature) = parse_var::<f64>(&get, "TASKMATE_TEMPERATURE")? {
            config.temperature = temperature;
        }
        if let Some(prompt) = get("TASKMATE_SYSTEM_PROMPT") {
            config.system_prompt = prompt;
        }
        config.max_history_turns = parse_var::<usize>(&get, "TASKMATE_MAX_HISTORY")?;
        if let Some(attempts) = parse_var::<u32>(&get, "TASKMATE_MAX_ATTEMPTS")? {
            config.retry = RetryPolicy::with_max_attempts(attempts);
        }
        if let Some(iterations) = parse_var::<usize>(&get, "TASKMATE_MAX_ITERATIONS")? {
            config.max_iterations = iterations;
        }
        if let Some(policy) = parse_var::<TurnErrorPolicy>(&get, "TASKMATE_ON_ERROR")? {
            config.on_turn_error = policy;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values the runtime cannot honor.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(TaskmateError::Configuration(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }
        if let Some(max) = self.max_history_turns {
            if max < MIN_HISTORY_TURNS {
                return Err(TaskmateError::Configuration(format!(
                    "max history must be at least {MIN_HISTORY_TURNS} (one exchange), got {max}"
                )));
            }
        }
        if self.max_iterations == 0 {
            return Err(TaskmateError::Configuration(
                "max iterations must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T>(get: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    get(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| {
                TaskmateError::Configuration(format!("invalid {key}={raw:?}: {e}"))
            })
        })
        .transpose()
}
