use crate::config::GraphConfig;
use crate::error::GraphResult;
use crate::node::Node;
use crate::router::{Route, Router};
use crate::session::Session;
use crate::state::ConversationState;
use folha_llm::Message;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

pub const HOP_LIMIT_MESSAGE: &str =
    "Não foi possível concluir a solicitação dentro do limite de etapas.";
pub const HOP_LIMIT_NAME: &str = "LimiteDeEtapas";
/// Result recorded for tool calls left unexecuted when the hop ceiling is hit
pub const HOP_LIMIT_TOOL_RESULT: &str =
    "Consulta não executada: limite de etapas atingido.";

/// Router-centred state machine: every node hands control back to the router
/// until it decides to terminate.
pub struct Graph {
    router: Arc<dyn Router>,
    respond_a: Arc<dyn Node>,
    respond_b: Arc<dyn Node>,
    tool: Arc<dyn Node>,
    config: GraphConfig,
}

impl Graph {
    pub fn new(
        router: Arc<dyn Router>,
        respond_a: Arc<dyn Node>,
        respond_b: Arc<dyn Node>,
        tool: Arc<dyn Node>,
        config: GraphConfig,
    ) -> Self {
        Self {
            router,
            respond_a,
            respond_b,
            tool,
            config,
        }
    }

    /// Create a builder for fluent construction
    pub fn builder() -> crate::builder::GraphBuilder {
        crate::builder::GraphBuilder::new()
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Run hops until the router terminates and return the grown log
    ///
    /// Only routing faults and crashed tool tasks escape; callers diff the
    /// result against their input to get the new messages.
    pub async fn invoke(&self, state: ConversationState) -> GraphResult<ConversationState> {
        let run_id = uuid::Uuid::new_v4().to_string();
        self.execute_loop(state)
            .instrument(tracing::info_span!("turn", run_id = %run_id))
            .await
    }

    async fn execute_loop(&self, mut state: ConversationState) -> GraphResult<ConversationState> {
        let start_time = Instant::now();
        let submitted = state.len();
        let mut hops = 0;

        loop {
            let route = self.router.next(&state)?;
            tracing::info!("GRAPH: hop {} routed to {:?}", hops, route);

            let node = match route {
                Route::Terminate => break,
                Route::Tool => &self.tool,
                Route::RespondA => &self.respond_a,
                Route::RespondB => &self.respond_b,
            };

            // Guardrail: max hops
            if hops >= self.config.max_hops {
                tracing::warn!(
                    "GRAPH: max hops ({}) reached while routing to {:?}",
                    self.config.max_hops,
                    route
                );
                state.apply(close_at_hop_limit(&state));
                break;
            }

            let delta = node.execute(&state).await?;
            tracing::debug!("GRAPH: {:?} node produced {} messages", node.node_type(), delta.len());
            state.apply(delta);
            hops += 1;
        }

        tracing::info!(
            "GRAPH: turn finished after {} hops in {}ms, {} new messages",
            hops,
            start_time.elapsed().as_millis(),
            state.len() - submitted
        );
        Ok(state)
    }

    /// One guarded turn over a session; returns the messages it produced
    ///
    /// The guard is released on every path, including errors.
    pub async fn run_turn(&self, session: &Session) -> GraphResult<Vec<Message>> {
        let guard = session.begin_turn()?;
        let input = guard.snapshot();
        let submitted = input.len();

        let output = self.invoke(input).await?;
        let delta = output.messages_since(submitted).to_vec();
        guard.commit(output);

        Ok(delta)
    }
}

/// Answer every outstanding tool call, then the fallback message
///
/// Chat endpoints reject a log where an assistant tool call has no tool
/// message after it, so the ceiling must not leave one behind.
fn close_at_hop_limit(state: &ConversationState) -> Vec<Message> {
    let mut closing: Vec<Message> = state
        .pending_tool_calls()
        .iter()
        .map(|call| Message::tool_result(&call.id, &call.name, HOP_LIMIT_TOOL_RESULT))
        .collect();
    closing.push(Message::ai_error(HOP_LIMIT_MESSAGE, HOP_LIMIT_NAME));
    closing
}
