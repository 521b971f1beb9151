pub mod types;
pub mod traits;
pub mod config;
pub mod mock;
pub mod openai;

pub use traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, TokenUsage};

pub use config::{ClientFactory, ProviderConfig, ProviderType};
pub use mock::ScriptedClient;
pub use openai::OpenAIClient;
pub use types::{Message, MessageKind, Tool, ToolCall, ToolChoice};
