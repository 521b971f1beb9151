use std::sync::Arc;
use anyhow::{anyhow, Result};

use folha_llm::ChatClient;
use folha_sql::SqlQueryTool;

use crate::config::{GraphConfig, ResponderConfig};
use crate::graph::Graph;
use crate::node::Node;
use crate::nodes::{ResponderNode, ToolNode};
use crate::router::{MentionRouter, Router};

enum ResponderSlot {
    Client(Arc<dyn ChatClient>, ResponderConfig),
    Node(Arc<dyn Node>),
}

/// Builder for constructing a Graph
///
/// Responders given as clients are bound to the query tool and to the
/// configured call timeout at build time.
pub struct GraphBuilder {
    router: Option<Arc<dyn Router>>,
    responder_a: Option<ResponderSlot>,
    responder_b: Option<ResponderSlot>,
    tool: Option<SqlQueryTool>,
    tool_node: Option<Arc<dyn Node>>,
    config: GraphConfig,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            router: None,
            responder_a: None,
            responder_b: None,
            tool: None,
            tool_node: None,
            config: GraphConfig::default(),
        }
    }

    /// Defaults to [`MentionRouter::default`]
    pub fn router(mut self, router: Arc<dyn Router>) -> Self {
        self.router = Some(router);
        self
    }

    pub fn responder_a(mut self, client: Arc<dyn ChatClient>, config: ResponderConfig) -> Self {
        self.responder_a = Some(ResponderSlot::Client(client, config));
        self
    }

    pub fn responder_b(mut self, client: Arc<dyn ChatClient>, config: ResponderConfig) -> Self {
        self.responder_b = Some(ResponderSlot::Client(client, config));
        self
    }

    /// Use a custom node in place of responder A
    pub fn responder_a_node(mut self, node: Arc<dyn Node>) -> Self {
        self.responder_a = Some(ResponderSlot::Node(node));
        self
    }

    pub fn responder_b_node(mut self, node: Arc<dyn Node>) -> Self {
        self.responder_b = Some(ResponderSlot::Node(node));
        self
    }

    /// Set the query tool executed by the tool node and advertised to responders
    pub fn sql_tool(mut self, tool: SqlQueryTool) -> Self {
        self.tool = Some(tool);
        self
    }

    /// Use a custom tool node; the query tool is still needed for client-backed responders
    pub fn tool_node(mut self, node: Arc<dyn Node>) -> Self {
        self.tool_node = Some(node);
        self
    }

    pub fn config(mut self, config: GraphConfig) -> Self {
        self.config = config;
        self
    }

    pub fn max_hops(mut self, max: usize) -> Self {
        self.config.max_hops = max;
        self
    }

    /// Build the Graph
    pub fn build(self) -> Result<Graph> {
        let tool_node: Arc<dyn Node> = match (self.tool_node, &self.tool) {
            (Some(node), _) => node,
            (None, Some(tool)) => Arc::new(ToolNode::new(tool.clone())),
            (None, None) => return Err(anyhow!("SQL tool or tool node is required")),
        };

        let respond_a = Self::resolve(self.responder_a, self.tool.as_ref(), &self.config, "A")?;
        let respond_b = Self::resolve(self.responder_b, self.tool.as_ref(), &self.config, "B")?;
        let router = self
            .router
            .unwrap_or_else(|| Arc::new(MentionRouter::default()));

        Ok(Graph::new(router, respond_a, respond_b, tool_node, self.config))
    }

    fn resolve(
        slot: Option<ResponderSlot>,
        tool: Option<&SqlQueryTool>,
        config: &GraphConfig,
        which: &str,
    ) -> Result<Arc<dyn Node>> {
        match slot {
            Some(ResponderSlot::Node(node)) => Ok(node),
            Some(ResponderSlot::Client(client, responder)) => {
                let tool = tool.ok_or_else(|| {
                    anyhow!("SQL tool is required to bind responder {}", which)
                })?;
                Ok(Arc::new(
                    ResponderNode::new(client, responder, tool.definition())
                        .with_timeout(config.call_timeout),
                ))
            }
            None => Err(anyhow!("Responder {} is required", which)),
        }
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
