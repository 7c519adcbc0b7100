//! Conversation history kept across turns of one session.

use serde::{Deserialize, Serialize};

use crate::types::ModelMessage;

/// Smallest useful cap: one user/agent exchange.
pub const MIN_HISTORY_TURNS: usize = 2;

/// One completed utterance. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "text", rename_all = "snake_case")]
pub enum ConversationTurn {
    User(String),
    Agent(String),
}

impl ConversationTurn {
    pub fn text(&self) -> &str {
        match self {
            Self::User(text) | Self::Agent(text) => text,
        }
    }

    /// The provider-facing message for this turn.
    pub fn to_message(&self) -> ModelMessage {
        match self {
            Self::User(text) => ModelMessage::user(text.clone()),
            Self::Agent(text) => ModelMessage::assistant(text.clone()),
        }
    }
}

/// Ordered turn history; oldest first.
///
/// Unbounded unless a cap is set. With a cap, whole user/agent exchanges are
/// evicted from the front so the history always opens with a user turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    turns: Vec<ConversationTurn>,
    max_turns: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `max_turns` entries, rounded down to whole exchanges but
    /// never below one exchange.
    pub fn with_limit(max_turns: Option<usize>) -> Self {
        Self {
            turns: Vec::new(),
            max_turns,
        }
    }

    /// Record a completed exchange: the user's input, then the agent's reply.
    pub fn record_exchange(&mut self, input: impl Into<String>, output: impl Into<String>) {
        self.turns.push(ConversationTurn::User(input.into()));
        self.turns.push(ConversationTurn::Agent(output.into()));
        self.enforce_limit();
    }

    fn enforce_limit(&mut self) {
        let Some(max) = self.max_turns else {
            return;
        };
        let keep = (max - max % 2).max(MIN_HISTORY_TURNS);
        if self.turns.len() > keep {
            let excess = self.turns.len() - keep;
            self.turns.drain(..excess);
        }
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_exchange_appends_user_then_agent() {
        let mut history = History::new();
        history.record_exchange("add a task to call mom", "Done!");

        assert_eq!(
            history.turns(),
            &[
                ConversationTurn::User("add a task to call mom".into()),
                ConversationTurn::Agent("Done!".into()),
            ]
        );
    }

    #[test]
    fn unbounded_history_keeps_everything() {
        let mut history = History::new();
        for i in 0..50 {
            history.record_exchange(format!("in {i}"), format!("out {i}"));
        }
        assert_eq!(history.len(), 100);
        assert_eq!(history.turns()[0].text(), "in 0");
    }

    #[test]
    fn capped_history_evicts_whole_exchanges() {
        let mut history = History::with_limit(Some(5));
        for i in 0..4 {
            history.record_exchange(format!("in {i}"), format!("out {i}"));
        }

        assert_eq!(history.len(), 4);
        assert_eq!(history.turns()[0], ConversationTurn::User("in 2".into()));
        assert_eq!(history.turns()[3], ConversationTurn::Agent("out 3".into()));
    }

    #[test]
    fn caps_below_one_exchange_still_keep_the_latest_exchange() {
        for cap in [0, 1] {
            let mut history = History::with_limit(Some(cap));
            history.record_exchange("in 0", "out 0");
            history.record_exchange("in 1", "out 1");

            assert_eq!(
                history.turns(),
                &[
                    ConversationTurn::User("in 1".into()),
                    ConversationTurn::Agent("out 1".into()),
                ]
            );
        }
    }

    #[test]
    fn turn_maps_to_provider_roles() {
        use crate::types::Role;

        assert_eq!(ConversationTurn::User("a".into()).to_message().role, Role::User);
        assert_eq!(
            ConversationTurn::Agent("b".into()).to_message().role,
            Role::Assistant
        );
    }
}
