//! Agent: conversation history and the tool-calling runtime.

pub mod conversation;
pub mod runtime;

pub use conversation::{ConversationTurn, History};
pub use runtime::{AgentExecutor, AgentInput, AgentOutput, AgentRuntime};
