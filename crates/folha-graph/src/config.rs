use crate::prompts::{GROQ_SYSTEM_PROMPT, OPENAI_SYSTEM_PROMPT};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphConfig {
    /// Node executions allowed per turn before the turn is cut short
    pub max_hops: usize,
    /// Upper bound for a single responder call
    pub call_timeout: Duration,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_hops: 10,
            call_timeout: Duration::from_secs(60),
        }
    }
}

impl GraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_hops(mut self, max: usize) -> Self {
        self.max_hops = max;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }
}

/// What distinguishes one responder from the other
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponderConfig {
    /// Display label, e.g. `Groq`
    pub label: String,
    /// `name` of the AI message synthesized on failure
    pub error_name: String,
    pub model: String,
    pub system_prompt: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl ResponderConfig {
    pub fn new(label: impl Into<String>, model: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            error_name: format!("Erro{}", label),
            label,
            model: model.into(),
            system_prompt: String::new(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Responder A: Llama on Groq
    pub fn groq() -> Self {
        Self::new("Groq", "llama-3.1-8b-instant")
            .with_system_prompt(GROQ_SYSTEM_PROMPT)
            .with_temperature(0.2)
    }

    /// Responder B: GPT on OpenAI
    pub fn openai() -> Self {
        Self::new("OpenAI", "gpt-3.5-turbo")
            .with_system_prompt(OPENAI_SYSTEM_PROMPT)
            .with_temperature(0.2)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }
}
