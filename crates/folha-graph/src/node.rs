use crate::error::GraphResult;
use crate::state::ConversationState;
use async_trait::async_trait;
use folha_llm::Message;

/// Unit of work in the graph
///
/// A node reads the whole log and returns the messages it wants appended.
/// It never mutates the state itself; the graph applies the delta.
#[async_trait]
pub trait Node: Send + Sync {
    async fn execute(&self, state: &ConversationState) -> GraphResult<Vec<Message>>;

    fn node_type(&self) -> NodeType;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Responder,
    Tool,
}
