use crate::error::GraphResult;
use crate::node::{Node, NodeType};
use crate::state::ConversationState;
use async_trait::async_trait;
use folha_llm::{Message, ToolCall};
use folha_sql::{SqlQueryTool, QUERY_ARGUMENT};
use std::time::Instant;

/// Runs every tool call of the last AI message, one result message per call
pub struct ToolNode {
    tool: SqlQueryTool,
}

impl ToolNode {
    pub fn new(tool: SqlQueryTool) -> Self {
        Self { tool }
    }

    async fn run_call(&self, call: &ToolCall) -> GraphResult<String> {
        if call.name != self.tool.name() {
            tracing::warn!("TOOL_NODE: unknown tool '{}'", call.name);
            return Ok(format!(
                "Erro: A ferramenta '{}' não existe. Use '{}'.",
                call.name,
                self.tool.name()
            ));
        }

        let Some(query) = call.str_argument(QUERY_ARGUMENT) else {
            tracing::warn!("TOOL_NODE: call {} has no '{}' argument", call.id, QUERY_ARGUMENT);
            return Ok(format!(
                "Erro: O argumento '{}' é obrigatório e deve ser um texto.",
                QUERY_ARGUMENT
            ));
        };

        let tool = self.tool.clone();
        let query = query.to_string();
        Ok(tokio::task::spawn_blocking(move || tool.execute(&query)).await?)
    }
}

#[async_trait]
impl Node for ToolNode {
    async fn execute(&self, state: &ConversationState) -> GraphResult<Vec<Message>> {
        let calls = state.pending_tool_calls();
        let mut results = Vec::with_capacity(calls.len());

        for call in calls {
            let start = Instant::now();
            let output = self.run_call(call).await?;
            tracing::info!(
                "TOOL_NODE: {} ({}) finished in {}ms",
                call.name,
                call.id,
                start.elapsed().as_millis()
            );
            results.push(Message::tool_result(call.id.clone(), call.name.clone(), output));
        }

        Ok(results)
    }

    fn node_type(&self) -> NodeType {
        NodeType::Tool
    }
}
