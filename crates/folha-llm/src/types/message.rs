use serde::{Deserialize, Serialize};
use super::tool::ToolCall;

/// Discriminant of a [`Message`], used by routing instead of inspecting fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Human,
    AI,
    Tool,
}

/// Entry of the conversation log (provider-agnostic)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    /// External input
    #[serde(rename = "user")]
    Human {
        content: String,
    },

    /// Output of a responder
    #[serde(rename = "assistant")]
    AI {
        #[serde(default)]
        content: String,

        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,

        /// Only set on synthesized error messages
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },

    /// Result of executing one tool call
    Tool {
        content: String,
        tool_call_id: String,
        name: String,
    },
}

impl Message {
    /// Create human message
    pub fn human(content: impl Into<String>) -> Self {
        Self::Human {
            content: content.into(),
        }
    }

    /// Create AI message with text
    pub fn ai(content: impl Into<String>) -> Self {
        Self::AI {
            content: content.into(),
            tool_calls: Vec::new(),
            name: None,
        }
    }

    /// Create AI message with tool calls
    pub fn ai_with_tools(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self::AI {
            content: content.into(),
            tool_calls,
            name: None,
        }
    }

    /// Create a named AI message describing a failure
    pub fn ai_error(content: impl Into<String>, name: impl Into<String>) -> Self {
        Self::AI {
            content: content.into(),
            tool_calls: Vec::new(),
            name: Some(name.into()),
        }
    }

    /// Create tool result message
    pub fn tool_result(
        tool_call_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::Tool {
            content: content.into(),
            tool_call_id: tool_call_id.into(),
            name: name.into(),
        }
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Human { .. } => MessageKind::Human,
            Self::AI { .. } => MessageKind::AI,
            Self::Tool { .. } => MessageKind::Tool,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::Human { content } | Self::AI { content, .. } | Self::Tool { content, .. } => {
                content
            }
        }
    }

    /// Tool calls carried by an AI message (empty for every other kind)
    pub fn tool_calls(&self) -> &[ToolCall] {
        match self {
            Self::AI { tool_calls, .. } => tool_calls,
            _ => &[],
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::AI { name, .. } => name.as_deref(),
            Self::Tool { name, .. } => Some(name),
            Self::Human { .. } => None,
        }
    }

    /// Get role as string
    pub fn role(&self) -> &str {
        match self {
            Self::Human { .. } => "user",
            Self::AI { .. } => "assistant",
            Self::Tool { .. } => "tool",
        }
    }
}
