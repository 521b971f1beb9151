pub mod error;
pub mod state;
pub mod router;
pub mod node;
pub mod nodes;
pub mod config;
pub mod prompts;
pub mod graph;
pub mod builder;
pub mod session;

pub use builder::GraphBuilder;
pub use config::{GraphConfig, ResponderConfig};
pub use error::{GraphError, GraphResult};
pub use graph::{Graph, HOP_LIMIT_MESSAGE, HOP_LIMIT_NAME, HOP_LIMIT_TOOL_RESULT};
pub use node::{Node, NodeType};
pub use nodes::{ResponderNode, ToolNode};
pub use router::{MentionRouter, Route, Router};
pub use session::{Session, SessionStore, Submission, TurnGuard};
pub use state::{append_messages, ConversationState};

// Re-export the message model so callers need a single dependency
pub use folha_llm::{Message, MessageKind, ToolCall};
