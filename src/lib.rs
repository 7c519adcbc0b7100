//! taskmate: a conversational to-do assistant.
//!
//! Each line the user types goes to a Gemini model together with the
//! conversation so far. The model may call two Todoist-backed tools,
//! `add_task` and `show_tasks`, before answering in plain text.
//!
//! # Quick Start
//!
//! ```no_run
//! use taskmate::agent::AgentExecutor;
//! use taskmate::config::AgentConfig;
//! use taskmate::session::Session;
//!
//! # async fn example() -> taskmate::error::Result<()> {
//! let config = AgentConfig::from_env()?;
//! let mut session = Session::new(AgentExecutor::from_config(&config));
//! let reply = session.turn("add a task to call mom").await?;
//! println!("{reply}");
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod prompt;
pub mod provider;
pub mod session;
pub mod todo;
pub mod tools;
pub mod types;
pub mod util;
