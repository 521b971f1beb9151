use crate::config::ResponderConfig;
use crate::error::GraphResult;
use crate::node::{Node, NodeType};
use crate::state::ConversationState;
use anyhow::Result;
use async_trait::async_trait;
use folha_llm::{ChatClient, ChatOptions, ChatRequest, Message, Tool, ToolChoice};
use std::sync::Arc;
use std::time::Duration;

/// Responder bound to one chat client and the query tool
///
/// Always yields exactly one message. Failures of the upstream call,
/// including timeouts, become a named AI message instead of an error.
pub struct ResponderNode {
    client: Arc<dyn ChatClient>,
    config: ResponderConfig,
    tools: Vec<Tool>,
    timeout: Duration,
}

impl ResponderNode {
    pub fn new(client: Arc<dyn ChatClient>, config: ResponderConfig, tool: Tool) -> Self {
        Self {
            client,
            config,
            tools: vec![tool],
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn config(&self) -> &ResponderConfig {
        &self.config
    }

    fn build_request(&self, state: &ConversationState) -> ChatRequest {
        let mut options = ChatOptions::new()
            .tools(self.tools.clone())
            .tool_choice(ToolChoice::auto());

        if let Some(temp) = self.config.temperature {
            options = options.temperature(temp);
        }
        if let Some(max_tokens) = self.config.max_tokens {
            options = options.max_tokens(max_tokens);
        }

        let request = ChatRequest::new(self.config.model.clone(), state.messages.clone())
            .with_options(options);

        if self.config.system_prompt.is_empty() {
            request
        } else {
            request.with_system(self.config.system_prompt.clone())
        }
    }

    async fn call(&self, request: ChatRequest) -> Result<Message> {
        let response = tokio::time::timeout(self.timeout, self.client.chat(request))
            .await
            .map_err(|_| anyhow::anyhow!("request timed out after {:?}", self.timeout))??;
        Ok(response.into_message())
    }

    fn failure_message(&self, error: &anyhow::Error) -> Message {
        Message::ai_error(
            format!(
                "[ERRO INTERNO {}]: Não foi possível processar com {}. Detalhe: {}",
                self.config.label.to_uppercase(),
                self.config.label,
                error
            ),
            self.config.error_name.clone(),
        )
    }
}

#[async_trait]
impl Node for ResponderNode {
    async fn execute(&self, state: &ConversationState) -> GraphResult<Vec<Message>> {
        let request = self.build_request(state);
        tracing::info!(
            "RESPONDER {}: calling model={} with {} messages",
            self.config.label,
            request.model,
            request.messages.len()
        );
        tracing::debug!("RESPONDER {}: request {:?}", self.config.label, request);

        let message = match self.call(request).await {
            Ok(message) => {
                if message.tool_calls().is_empty() {
                    tracing::info!(
                        "RESPONDER {}: answered with {} chars",
                        self.config.label,
                        message.content().len()
                    );
                } else {
                    tracing::info!(
                        "RESPONDER {}: requested tools {:?}",
                        self.config.label,
                        message.tool_calls()
                    );
                }
                message
            }
            Err(e) => {
                tracing::error!("RESPONDER {}: call failed: {:#}", self.config.label, e);
                self.failure_message(&e)
            }
        };

        Ok(vec![message])
    }

    fn node_type(&self) -> NodeType {
        NodeType::Responder
    }
}
