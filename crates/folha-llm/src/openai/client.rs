// OpenAI-compatible client implementation (OpenAI and Groq share the wire format)

use crate::traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, TokenUsage};
use crate::types::{Message, ToolCall};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// OpenAI-compatible client (HTTP direct, no SDK)
pub struct OpenAIClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OpenAIClient {
    /// Create new client with API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .context("Invalid API key format")?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: OPENAI_API_BASE.to_string(),
        })
    }

    /// Point the client at another OpenAI-compatible endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build chat completion request payload
    fn build_chat_request(
        &self,
        model: &str,
        system: Option<&str>,
        messages: &[Message],
        options: &ChatOptions,
    ) -> Result<Value> {
        let mut wire_messages = Vec::with_capacity(messages.len() + 1);
        if let Some(system) = system {
            wire_messages.push(serde_json::json!({
                "role": "system",
                "content": system,
            }));
        }
        for msg in messages {
            wire_messages.push(convert_message(msg)?);
        }

        let mut request = Map::new();
        request.insert("model".to_string(), Value::String(model.to_string()));
        request.insert("messages".to_string(), Value::Array(wire_messages));
        request.insert("stream".to_string(), Value::Bool(false));

        if let Some(temp) = options.temperature {
            request.insert("temperature".to_string(), serde_json::json!(temp));
        }
        if let Some(max_tokens) = options.max_tokens {
            request.insert("max_tokens".to_string(), serde_json::json!(max_tokens));
        }
        if let Some(tools) = &options.tools {
            request.insert("tools".to_string(), serde_json::to_value(tools)?);
        }
        if let Some(tool_choice) = &options.tool_choice {
            request.insert("tool_choice".to_string(), serde_json::to_value(tool_choice)?);
        }

        Ok(Value::Object(request))
    }
}

/// Convert our Message type to the Chat Completions format
fn convert_message(message: &Message) -> Result<Value> {
    match message {
        Message::Human { content } => Ok(serde_json::json!({
            "role": "user",
            "content": content,
        })),
        Message::AI { content, tool_calls, name } => {
            let mut obj = Map::new();
            obj.insert("role".to_string(), Value::String("assistant".to_string()));

            // Providers reject an empty string next to tool calls
            let content = if content.is_empty() && !tool_calls.is_empty() {
                Value::Null
            } else {
                Value::String(content.clone())
            };
            obj.insert("content".to_string(), content);

            if !tool_calls.is_empty() {
                let calls = tool_calls
                    .iter()
                    .map(WireToolCall::from_call)
                    .collect::<Result<Vec<_>>>()?;
                obj.insert("tool_calls".to_string(), serde_json::to_value(calls)?);
            }

            if let Some(name) = name {
                obj.insert("name".to_string(), Value::String(name.clone()));
            }

            Ok(Value::Object(obj))
        }
        Message::Tool { content, tool_call_id, .. } => Ok(serde_json::json!({
            "role": "tool",
            "tool_call_id": tool_call_id,
            "content": content,
        })),
    }
}

// ============================================================================
// TRAIT IMPLEMENTATIONS
// ============================================================================

#[async_trait]
impl ChatClient for OpenAIClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let payload = self.build_chat_request(
            &request.model,
            request.system.as_deref(),
            &request.messages,
            &request.options,
        )?;

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Sending chat completion request to {}",
            self.base_url
        );

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&payload)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Chat API error ({}): {}", status, error_text);
        }

        let raw: OpenAIChatResponse = response
            .json()
            .await
            .context("Failed to parse response")?;

        let choice = raw
            .choices
            .into_iter()
            .next()
            .context("Response contained no choices")?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(WireToolCall::into_call)
            .collect::<Result<Vec<_>>>()?;

        Ok(ChatResponse {
            content: choice.message.content,
            tool_calls,
            usage: raw.usage.map(|usage| TokenUsage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            }),
            finish_reason: choice.finish_reason,
        })
    }
}

// ============================================================================
// WIRE TYPES (Chat Completions)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type", default = "function_type")]
    tool_type: String,
    function: WireFunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    /// JSON-encoded object
    #[serde(default)]
    arguments: String,
}

fn function_type() -> String {
    "function".to_string()
}

impl WireToolCall {
    fn from_call(call: &ToolCall) -> Result<Self> {
        Ok(Self {
            id: call.id.clone(),
            tool_type: function_type(),
            function: WireFunctionCall {
                name: call.name.clone(),
                arguments: serde_json::to_string(&call.arguments)?,
            },
        })
    }

    fn into_call(self) -> Result<ToolCall> {
        let raw = self.function.arguments.trim();
        let arguments = if raw.is_empty() {
            Map::new()
        } else {
            serde_json::from_str::<Map<String, Value>>(raw).with_context(|| {
                format!(
                    "Tool call '{}' carried non-object arguments: {}",
                    self.function.name, raw
                )
            })?
        };
        Ok(ToolCall::new(self.id, self.function.name, arguments))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Debug, Clone, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
