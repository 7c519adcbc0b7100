//! Command-line flags. All optional; each overrides its environment variable.

use clap::Parser;

use crate::config::AgentConfig;
use crate::models::GoogleModel;
use crate::session::TurnErrorPolicy;

/// Conversational to-do assistant
#[derive(Parser, Debug)]
#[command(name = "taskmate", version, about = "Chat with Gemini to manage your Todoist tasks")]
pub struct Cli {
    /// Gemini model id (e.g., gemini-2.5-flash)
    #[arg(short, long)]
    pub model: Option<GoogleModel>,

    /// Sampling temperature (0.0 - 2.0)
    #[arg(short, long)]
    pub temperature: Option<f64>,

    /// System prompt
    #[arg(short, long)]
    pub system: Option<String>,

    /// Keep at most this many history entries (default: unbounded)
    #[arg(long)]
    pub max_history: Option<usize>,

    /// What to do when a turn fails: abort or continue
    #[arg(long)]
    pub on_error: Option<TurnErrorPolicy>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Apply flags on top of an environment-derived config.
    pub fn apply_to(&self, config: &mut AgentConfig) {
        if let Some(ref model) = self.model {
            config.model = model.clone();
        }
        if let Some(temperature) = self.temperature {
            config.temperature = temperature;
        }
        if let Some(ref system) = self.system {
            config.system_prompt = system.clone();
        }
        if self.max_history.is_some() {
            config.max_history_turns = self.max_history;
        }
        if let Some(policy) = self.on_error {
            config.on_turn_error = policy;
        }
    }

    /// Default tracing filter when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "taskmate=debug"
        } else {
            "taskmate=warn"
        }
    }
}
