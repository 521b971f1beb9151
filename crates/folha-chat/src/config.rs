use config::{Config as ConfigLoader, ConfigError, Environment, File};
use folha_graph::{GraphConfig, ResponderConfig};
use folha_llm::ProviderType;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub graph: GraphSettings,
    pub responders: RespondersConfig,
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(skip)]
    pub openai_api_key: Option<String>,
    #[serde(skip)]
    pub groq_api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    /// SQL script used by `folha-init-db`
    pub script: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("folha_pagamento.db"),
            script: PathBuf::from("criacao_banco.sql"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    pub max_hops: usize,
    pub call_timeout_secs: u64,
}

impl Default for GraphSettings {
    fn default() -> Self {
        let defaults = GraphConfig::default();
        Self {
            max_hops: defaults.max_hops,
            call_timeout_secs: defaults.call_timeout.as_secs(),
        }
    }
}

impl From<&GraphSettings> for GraphConfig {
    fn from(settings: &GraphSettings) -> Self {
        GraphConfig::new()
            .with_max_hops(settings.max_hops)
            .with_call_timeout(Duration::from_secs(settings.call_timeout_secs))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RespondersConfig {
    pub a: ResponderSettings,
    pub b: ResponderSettings,
}

impl Default for RespondersConfig {
    fn default() -> Self {
        Self {
            a: ResponderSettings::groq(),
            b: ResponderSettings::openai(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponderSettings {
    pub provider: ProviderType,
    pub model: String,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Token in human input that forces this responder
    pub mention: String,
    #[serde(default)]
    pub base_url: Option<String>,
}

impl ResponderSettings {
    pub fn groq() -> Self {
        Self {
            provider: ProviderType::Groq,
            model: "llama-3.1-8b-instant".to_string(),
            temperature: Some(0.2),
            max_tokens: None,
            mention: "@groq".to_string(),
            base_url: None,
        }
    }

    pub fn openai() -> Self {
        Self {
            provider: ProviderType::OpenAI,
            model: "gpt-3.5-turbo".to_string(),
            temperature: Some(0.2),
            max_tokens: None,
            mention: "@openai".to_string(),
            base_url: None,
        }
    }

    /// Prompt and labels follow the provider; model and sampling follow the settings
    pub fn responder_config(&self) -> ResponderConfig {
        let base = match self.provider {
            ProviderType::Groq => ResponderConfig::groq(),
            ProviderType::OpenAI => ResponderConfig::openai(),
        };
        let mut config = base.with_model(self.model.clone());
        config.temperature = self.temperature;
        config.max_tokens = self.max_tokens;
        config
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables prefixed `FOLHA_`, nested with `__`
    ///    (e.g. `FOLHA_GRAPH__MAX_HOPS=5`)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("FOLHA")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut cfg: Config = builder.build()?.try_deserialize()?;

        // Secrets are checked when the responder needing them is built
        cfg.openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        cfg.groq_api_key = std::env::var("GROQ_API_KEY").ok();

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        ConfigLoader::builder()
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()
    }

    pub fn api_key(&self, provider: ProviderType) -> Option<&str> {
        match provider {
            ProviderType::OpenAI => self.openai_api_key.as_deref(),
            ProviderType::Groq => self.groq_api_key.as_deref(),
        }
        .filter(|key| !key.trim().is_empty())
    }
}
