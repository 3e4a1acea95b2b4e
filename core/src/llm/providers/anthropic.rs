//! Anthropic Claude client implementation

use crate::config::ResolvedLlmConfig;
use crate::error::{LlmError, Result};
use crate::llm::{
    ChatOptions, ContentBlock, FinishReason, LlmClient, LlmMessage, LlmResponse, Usage,
};
use crate::tools::ToolSpec;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Sent when neither the call nor the config sets `max_tokens`
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Anthropic Claude client
pub struct AnthropicClient {
    client: Client,
    config: ResolvedLlmConfig,
}

impl AnthropicClient {
    /// Create a new Anthropic client from resolved configuration
    pub fn new(config: &ResolvedLlmConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(LlmError::Authentication {
                message: "No API key found for Anthropic".to_string(),
            }
            .into());
        }

        Ok(Self {
            client: Client::new(),
            config: config.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }

    fn build_request(
        &self,
        messages: &[LlmMessage],
        system: &str,
        tools: &[ToolSpec],
        options: Option<ChatOptions>,
    ) -> AnthropicRequest {
        let params = &self.config.params;
        let (max_tokens, temperature, stop) = match options {
            Some(o) => (o.max_tokens, o.temperature, o.stop),
            None => (None, None, None),
        };

        AnthropicRequest {
            model: self.config.model.clone(),
            max_tokens: max_tokens.or(params.max_tokens).unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: temperature.or(params.temperature),
            top_p: params.top_p,
            system: (!system.is_empty()).then(|| system.to_string()),
            messages: messages.to_vec(),
            tools: (!tools.is_empty()).then(|| tools.to_vec()),
            stop_sequences: stop.or_else(|| params.stop_sequences.clone()),
        }
    }

    fn convert_response(response: AnthropicResponse) -> LlmResponse {
        let content = response
            .content
            .into_iter()
            .filter_map(|block| match block {
                AnthropicContent::Text { text } => Some(ContentBlock::Text { text }),
                AnthropicContent::ToolUse { id, name, input } => {
                    Some(ContentBlock::ToolUse { id, name, input })
                }
                AnthropicContent::Unsupported => None,
            })
            .collect();

        let usage = response.usage.map(|u| Usage {
            prompt_tokens: u.input_tokens,
            completion_tokens: u.output_tokens,
            total_tokens: u.input_tokens + u.output_tokens,
        });

        LlmResponse {
            content,
            usage,
            model: response.model,
            finish_reason: response
                .stop_reason
                .as_deref()
                .map(FinishReason::from_stop_reason),
        }
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn chat_completion(
        &self,
        messages: &[LlmMessage],
        system: &str,
        tools: &[ToolSpec],
        options: Option<ChatOptions>,
    ) -> Result<LlmResponse> {
        let request = self.build_request(messages, system, tools, options);

        let mut builder = self
            .client
            .post(self.endpoint())
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json");
        for (key, value) in &self.config.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        tracing::debug!(
            model = %self.config.model,
            messages = messages.len(),
            tools = tools.len(),
            "sending messages request"
        );

        let response = builder
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Network {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = extract_error_message(&error_text);
            return Err(match status.as_u16() {
                401 | 403 => LlmError::Authentication { message },
                429 => LlmError::RateLimit,
                400 => LlmError::InvalidRequest { message },
                code => LlmError::ApiError {
                    status: code,
                    message,
                },
            }
            .into());
        }

        let body = response.text().await.map_err(|e| LlmError::Network {
            message: e.to_string(),
        })?;
        let anthropic_response: AnthropicResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::MalformedResponse {
                message: format!("Failed to parse response: {}", e),
            })?;

        Ok(Self::convert_response(anthropic_response))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn provider_name(&self) -> &str {
        "anthropic"
    }
}

/// Pull `error.message` out of an Anthropic error body, falling back to the raw text
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<HashMap<String, serde_json::Value>>(body)
        .ok()
        .and_then(|map| {
            map.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<LlmMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ToolSpec>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_sequences: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    model: String,
    content: Vec<AnthropicContent>,
    stop_reason: Option<String>,
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AnthropicContent {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}
