pub mod message;
pub mod tool;

pub use message::{Message, MessageKind};
pub use tool::{FunctionDefinition, Tool, ToolCall, ToolChoice};
