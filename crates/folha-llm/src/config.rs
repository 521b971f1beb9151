// Configuration layer for provider-agnostic chat client creation
// Both supported providers speak the Chat Completions wire format, so they
// differ only in endpoint and credentials.

use crate::openai::{OpenAIClient, GROQ_API_BASE, OPENAI_API_BASE};
use crate::traits::ChatClient;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Type of LLM provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    #[default]
    OpenAI,
    Groq,
}

impl ProviderType {
    /// Environment variable holding the API key for this provider
    pub fn api_key_var(&self) -> &'static str {
        match self {
            ProviderType::OpenAI => "OPENAI_API_KEY",
            ProviderType::Groq => "GROQ_API_KEY",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderType::OpenAI => OPENAI_API_BASE,
            ProviderType::Groq => GROQ_API_BASE,
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderType::OpenAI => write!(f, "OpenAI"),
            ProviderType::Groq => write!(f, "Groq"),
        }
    }
}

/// Complete provider configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider: ProviderType,
    pub api_key: String,
    /// Overrides the provider's default endpoint (proxies, local gateways)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ProviderConfig {
    /// Create OpenAI provider config
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self {
            provider: ProviderType::OpenAI,
            api_key: api_key.into(),
            base_url: None,
        }
    }

    /// Create Groq provider config
    pub fn groq(api_key: impl Into<String>) -> Self {
        Self {
            provider: ProviderType::Groq,
            api_key: api_key.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn provider_type(&self) -> ProviderType {
        self.provider
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }
}

/// Factory for creating chat clients from configuration
pub struct ClientFactory;

impl ClientFactory {
    /// Create a chat client from provider configuration
    pub fn create_chat_client(config: ProviderConfig) -> Result<Arc<dyn ChatClient>> {
        let base_url = config.base_url().to_string();
        let client = OpenAIClient::new(config.api_key)?.with_base_url(base_url);
        Ok(Arc::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_config() {
        let config = ProviderConfig::openai("test-key");
        assert_eq!(config.provider_type(), ProviderType::OpenAI);
        assert_eq!(config.base_url(), OPENAI_API_BASE);
    }

    #[test]
    fn test_groq_config() {
        let config = ProviderConfig::groq("gsk-test");
        assert_eq!(config.provider_type(), ProviderType::Groq);
        assert_eq!(config.base_url(), GROQ_API_BASE);
        assert_eq!(config.provider.api_key_var(), "GROQ_API_KEY");
    }

    #[test]
    fn test_base_url_override() {
        let config = ProviderConfig::groq("gsk-test").with_base_url("http://localhost:8080/v1");
        assert_eq!(config.base_url(), "http://localhost:8080/v1");
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = ProviderConfig::openai("sk-secret");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("sk-secret"));
    }

    #[test]
    fn test_provider_type_deserializes_lowercase() {
        let provider: ProviderType = serde_json::from_str("\"groq\"").unwrap();
        assert_eq!(provider, ProviderType::Groq);
    }

    #[test]
    fn test_factory_creates_client() {
        assert!(ClientFactory::create_chat_client(ProviderConfig::openai("sk-test")).is_ok());
    }
}
