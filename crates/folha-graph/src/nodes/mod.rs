pub mod responder_node;
pub mod tool_node;

pub use responder_node::ResponderNode;
pub use tool_node::ToolNode;
