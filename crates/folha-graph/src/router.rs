use crate::error::{GraphError, GraphResult};
use crate::state::ConversationState;
use folha_llm::Message;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MENTION_A: &str = "@groq";
pub const DEFAULT_MENTION_B: &str = "@openai";

/// Decides which node runs next
///
/// Evaluated fresh on every hop; implementations must not keep hidden state.
pub trait Router: Send + Sync {
    fn next(&self, state: &ConversationState) -> GraphResult<Route>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Tool,
    RespondA,
    RespondB,
    Terminate,
}

/// Router with explicit mention overrides and parity alternation:
///
/// 1. empty log: terminate
/// 2. last AI message with tool calls: tool
/// 3. last AI message without tool calls: terminate
/// 4. last human message mentioning B, else A: that responder
/// 5. otherwise: even number of AI messages goes to A, odd to B
#[derive(Debug, Clone)]
pub struct MentionRouter {
    mention_a: String,
    mention_b: String,
}

impl MentionRouter {
    /// Tokens are matched against lowercased input, so they are stored lowercased
    pub fn new(mention_a: impl Into<String>, mention_b: impl Into<String>) -> Self {
        Self {
            mention_a: mention_a.into().to_lowercase(),
            mention_b: mention_b.into().to_lowercase(),
        }
    }

    pub fn mention_a(&self) -> &str {
        &self.mention_a
    }

    pub fn mention_b(&self) -> &str {
        &self.mention_b
    }

    fn mentioned(&self, content: &str) -> Option<Route> {
        let content = content.to_lowercase();
        // B wins when both tokens appear
        if !self.mention_b.is_empty() && content.contains(&self.mention_b) {
            Some(Route::RespondB)
        } else if !self.mention_a.is_empty() && content.contains(&self.mention_a) {
            Some(Route::RespondA)
        } else {
            None
        }
    }
}

impl Default for MentionRouter {
    fn default() -> Self {
        Self::new(DEFAULT_MENTION_A, DEFAULT_MENTION_B)
    }
}

/// Default responder choice from the number of AI messages in the log
pub fn alternate(ai_messages: usize) -> Route {
    if ai_messages % 2 == 0 {
        Route::RespondA
    } else {
        Route::RespondB
    }
}

impl Router for MentionRouter {
    fn next(&self, state: &ConversationState) -> GraphResult<Route> {
        let Some(last) = state.last_message() else {
            return Ok(Route::Terminate);
        };

        match last {
            Message::AI { tool_calls, .. } if !tool_calls.is_empty() => return Ok(Route::Tool),
            Message::AI { .. } => return Ok(Route::Terminate),
            Message::Human { content } => {
                if let Some(route) = self.mentioned(content) {
                    return Ok(route);
                }
            }
            Message::Tool { tool_call_id, .. } => ensure_answers_a_call(state, tool_call_id)?,
        }

        Ok(alternate(state.ai_message_count()))
    }
}

// A tool result with no issuing AI message means the log was assembled wrongly.
fn ensure_answers_a_call(state: &ConversationState, tool_call_id: &str) -> GraphResult<()> {
    let issued = state
        .messages
        .iter()
        .flat_map(Message::tool_calls)
        .any(|call| call.id == tool_call_id);

    if issued {
        Ok(())
    } else {
        Err(GraphError::Routing(format!(
            "tool result '{}' does not answer any tool call in the log",
            tool_call_id
        )))
    }
}
