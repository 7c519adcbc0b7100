//! Prompt template: system instruction, history, user input, scratchpad.

use crate::agent::conversation::ConversationTurn;
use crate::types::ModelMessage;

/// Default system instruction.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Fixed-shape prompt rendered once per model call.
///
/// Layout: `[system, *history, user(input), *scratchpad]`. The scratchpad
/// carries the current turn's tool calls and their results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    system_prompt: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT)
    }
}

impl PromptTemplate {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Render the message sequence for one model call. Never mutates history.
    pub fn render(
        &self,
        history: &[ConversationTurn],
        input: &str,
        scratchpad: &[ModelMessage],
    ) -> Vec<ModelMessage> {
        let mut messages = Vec::with_capacity(history.len() + scratchpad.len() + 2);
        messages.push(ModelMessage::system(self.system_prompt.clone()));
        messages.extend(history.iter().map(ConversationTurn::to_message));
        messages.push(ModelMessage::user(input));
        messages.extend(scratchpad.iter().cloned());
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    #[test]
    fn render_orders_system_history_input_scratchpad() {
        let template = PromptTemplate::default();
        let history = vec![
            ConversationTurn::User("add a task to call mom".into()),
            ConversationTurn::Agent("Added 'call mom'.".into()),
        ];
        let scratchpad = vec![ModelMessage::assistant("thinking")];

        let messages = template.render(&history, "what's on my list?", &scratchpad);

        let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                Role::System,
                Role::User,
                Role::Assistant,
                Role::User,
                Role::Assistant
            ]
        );
        assert_eq!(messages[0].text(), DEFAULT_SYSTEM_PROMPT);
        assert_eq!(messages[1].text(), "add a task to call mom");
        assert_eq!(messages[3].text(), "what's on my list?");
        assert_eq!(messages[4].text(), "thinking");
    }

    #[test]
    fn empty_history_renders_system_and_input_only() {
        let template = PromptTemplate::new("Be brief.");

        let messages = template.render(&[], "hi", &[]);

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text(), "Be brief.");
        assert_eq!(messages[1].role, Role::User);
    }
}
