//! LLM client trait and response structures

use crate::error::Result;
use crate::tools::ToolSpec;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::message::{collect_text, ContentBlock, LlmMessage};

/// Trait for LLM clients
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send one conversation turn and wait for the full response
    async fn chat_completion(
        &self,
        messages: &[LlmMessage],
        system: &str,
        tools: &[ToolSpec],
        options: Option<ChatOptions>,
    ) -> Result<LlmResponse>;

    /// Get the model name
    fn model_name(&self) -> &str;

    /// Get the provider name
    fn provider_name(&self) -> &str;
}

/// Response from an LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    /// Content blocks in the order the model produced them
    pub content: Vec<ContentBlock>,

    /// Usage statistics
    pub usage: Option<Usage>,

    /// Model used for generation
    pub model: String,

    /// Finish reason
    pub finish_reason: Option<FinishReason>,
}

impl LlmResponse {
    /// Build a response from bare content blocks
    pub fn from_content(content: Vec<ContentBlock>) -> Self {
        let finish_reason = if content
            .iter()
            .any(|b| matches!(b, ContentBlock::ToolUse { .. }))
        {
            FinishReason::ToolUse
        } else {
            FinishReason::Stop
        };

        Self {
            content,
            usage: None,
            model: String::new(),
            finish_reason: Some(finish_reason),
        }
    }

    /// Whether the model stopped because it wants tools to run
    pub fn halts_for_tool_use(&self) -> bool {
        self.finish_reason == Some(FinishReason::ToolUse)
    }

    /// Whether any block requests a tool
    pub fn has_tool_use(&self) -> bool {
        self.content
            .iter()
            .any(|block| matches!(block, ContentBlock::ToolUse { .. }))
    }

    /// Concatenated text of all text blocks
    pub fn text(&self) -> String {
        collect_text(&self.content)
    }
}

/// Usage statistics for a request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Usage {
    /// Number of tokens in the prompt
    pub prompt_tokens: u32,

    /// Number of tokens in the completion
    pub completion_tokens: u32,

    /// Total number of tokens
    pub total_tokens: u32,
}

/// Reason why generation finished
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Generation completed naturally
    Stop,

    /// Hit the maximum token limit
    Length,

    /// Model decided to call a tool
    ToolUse,

    /// Other reason
    Other(String),
}

impl FinishReason {
    /// Map a provider stop reason string
    pub fn from_stop_reason(reason: &str) -> Self {
        match reason {
            "end_turn" | "stop_sequence" => FinishReason::Stop,
            "max_tokens" => FinishReason::Length,
            "tool_use" => FinishReason::ToolUse,
            other => FinishReason::Other(other.to_string()),
        }
    }
}

/// Per-call options; unset fields fall back to the client's model params
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatOptions {
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,

    /// Temperature for generation
    pub temperature: Option<f32>,

    /// Stop sequences
    pub stop: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_content_derives_finish_reason() {
        let text_only = LlmResponse::from_content(vec![ContentBlock::text("done")]);
        assert!(!text_only.halts_for_tool_use());
        assert_eq!(text_only.text(), "done");

        let with_tool = LlmResponse::from_content(vec![ContentBlock::ToolUse {
            id: "t1".to_string(),
            name: "explain".to_string(),
            input: json!({"topic": "xss"}),
        }]);
        assert!(with_tool.halts_for_tool_use());
        assert!(with_tool.has_tool_use());
    }

    #[test]
    fn test_stop_reason_mapping() {
        assert_eq!(FinishReason::from_stop_reason("end_turn"), FinishReason::Stop);
        assert_eq!(
            FinishReason::from_stop_reason("tool_use"),
            FinishReason::ToolUse
        );
        assert_eq!(
            FinishReason::from_stop_reason("refusal"),
            FinishReason::Other("refusal".to_string())
        );
    }
}
