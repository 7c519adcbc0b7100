//! Interactive session loop: prompt, read a line, answer, remember.

use strum::{Display, EnumString};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error};

use crate::agent::conversation::History;
use crate::agent::runtime::{AgentInput, AgentRuntime};
use crate::error::Result;

/// Text shown before each read.
pub const PROMPT: &str = "Enter a task: ";

/// The line that ends the session. Compared exactly: case-sensitive, untrimmed.
pub const EXIT_COMMAND: &str = "exit";

/// What to do when a turn fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum TurnErrorPolicy {
    /// Stop the session and return the error.
    #[default]
    Abort,
    /// Report the error on stderr and prompt again; history is left untouched.
    Continue,
}

/// Loop states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    AwaitingInput,
    Invoking(String),
    Terminated,
}

impl SessionState {
    /// State following a read. `None` is end of input.
    pub fn after_read(line: Option<String>) -> Self {
        match line {
            None => Self::Terminated,
            Some(line) if line == EXIT_COMMAND => Self::Terminated,
            Some(line) => Self::Invoking(line),
        }
    }
}

/// One user's conversation with a runtime. Owns the history exclusively.
pub struct Session<R> {
    runtime: R,
    history: History,
    on_turn_error: TurnErrorPolicy,
}

impl<R: AgentRuntime> Session<R> {
    pub fn new(runtime: R) -> Self {
        Self {
            runtime,
            history: History::new(),
            on_turn_error: TurnErrorPolicy::default(),
        }
    }

    pub fn with_history_limit(mut self, max_turns: Option<usize>) -> Self {
        self.history = History::with_limit(max_turns);
        self
    }

    pub fn with_error_policy(mut self, policy: TurnErrorPolicy) -> Self {
        self.on_turn_error = policy;
        self
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Answer one input. History grows by the exchange only on success.
    pub async fn turn(&mut self, input: &str) -> Result<String> {
        let reply = self
            .runtime
            .invoke(AgentInput {
                input,
                history: self.history.turns(),
            })
            .await?;

        self.history.record_exchange(input, reply.output.clone());
        debug!(history = self.history.len(), "turn complete");
        Ok(reply.output)
    }

    /// Drive the loop until `exit` or end of input.
    pub async fn run<I, O>(&mut self, input: I, mut output: O) -> Result<()>
    where
        I: AsyncBufRead + Unpin,
        O: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        let mut state = SessionState::AwaitingInput;

        loop {
            state = match state {
                SessionState::AwaitingInput => {
                    output.write_all(PROMPT.as_bytes()).await?;
                    output.flush().await?;
                    let line = lines.next_line().await?;
                    if line.is_none() {
                        output.write_all(b"\n").await?;
                    }
                    SessionState::after_read(line)
                }
                SessionState::Invoking(line) => {
                    match self.turn(&line).await {
                        Ok(reply) => {
                            output.write_all(reply.as_bytes()).await?;
                            output.write_all(b"\n").await?;
                            output.flush().await?;
                        }
                        Err(e) => match self.on_turn_error {
                            TurnErrorPolicy::Abort => return Err(e),
                            TurnErrorPolicy::Continue => {
                                error!(error = %e, category = ?e.category(), "turn failed");
                                eprintln!("Error: {e}");
                            }
                        },
                    }
                    SessionState::AwaitingInput
                }
                SessionState::Terminated => {
                    output.flush().await?;
                    return Ok(());
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_is_matched_exactly() {
        assert_eq!(
            SessionState::after_read(Some("exit".into())),
            SessionState::Terminated
        );
        assert_eq!(
            SessionState::after_read(Some("Exit".into())),
            SessionState::Invoking("Exit".into())
        );
        assert_eq!(
            SessionState::after_read(Some(" exit".into())),
            SessionState::Invoking(" exit".into())
        );
        assert_eq!(SessionState::after_read(None), SessionState::Terminated);
    }

    #[test]
    fn turn_error_policy_parses_lowercase() {
        assert_eq!(
            "continue".parse::<TurnErrorPolicy>().unwrap(),
            TurnErrorPolicy::Continue
        );
        assert_eq!(TurnErrorPolicy::Abort.to_string(), "abort");
        assert!("retry".parse::<TurnErrorPolicy>().is_err());
    }
}
