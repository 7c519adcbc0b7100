//! Tools the model can call: the trait, the registry, and the to-do tools.

pub mod registry;
pub mod task_tools;
pub mod tool;
pub mod validation;

pub use registry::ToolRegistry;
pub use task_tools::{AddTask, ShowTasks};
pub use tool::Tool;
