use crate::config::{Config, ResponderSettings};
use anyhow::{Context, Result};
use folha_graph::{Graph, GraphConfig, MentionRouter};
use folha_llm::{ChatClient, ClientFactory, ProviderConfig, ProviderType};
use folha_sql::SqlQueryTool;
use std::sync::Arc;

/// Wire the graph from configuration: two provider clients, the query tool
/// and a mention router using the configured tokens.
pub fn build_graph(config: &Config) -> Result<Graph> {
    let client_a = create_client(config, &config.responders.a).context("Responder A")?;
    let client_b = create_client(config, &config.responders.b).context("Responder B")?;

    let router = MentionRouter::new(
        config.responders.a.mention.clone(),
        config.responders.b.mention.clone(),
    );

    tracing::info!(
        "Responders: A = {} {} ({}), B = {} {} ({})",
        config.responders.a.provider,
        config.responders.a.model,
        router.mention_a(),
        config.responders.b.provider,
        config.responders.b.model,
        router.mention_b()
    );

    Graph::builder()
        .sql_tool(SqlQueryTool::sqlite(&config.database.path))
        .responder_a(client_a, config.responders.a.responder_config())
        .responder_b(client_b, config.responders.b.responder_config())
        .router(Arc::new(router))
        .config(GraphConfig::from(&config.graph))
        .build()
}

fn create_client(config: &Config, settings: &ResponderSettings) -> Result<Arc<dyn ChatClient>> {
    let provider = settings.provider;
    let api_key = config.api_key(provider).with_context(|| {
        format!("{} environment variable is required", provider.api_key_var())
    })?;

    let mut provider_config = match provider {
        ProviderType::OpenAI => ProviderConfig::openai(api_key),
        ProviderType::Groq => ProviderConfig::groq(api_key),
    };
    if let Some(base_url) = &settings.base_url {
        provider_config = provider_config.with_base_url(base_url.clone());
    }

    ClientFactory::create_chat_client(provider_config)
}
