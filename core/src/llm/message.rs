//! LLM message structures

use crate::tools::ToolCall;
use serde::{Deserialize, Serialize};

/// Represents a message in an LLM conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmMessage {
    /// Role of the message sender
    pub role: MessageRole,

    /// Ordered content blocks
    pub content: Vec<ContentBlock>,
}

/// Role of the message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Human input and tool results
    User,

    /// Model output
    Assistant,
}

/// A block of content within a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Text content
    Text { text: String },

    /// Tool use request
    ToolUse {
        /// Correlation id echoed back by the matching tool result
        id: String,
        /// Name of the tool to use
        name: String,
        /// Input parameters for the tool
        input: serde_json::Value,
    },

    /// Tool result
    ToolResult {
        /// ID of the tool use this is a result for
        tool_use_id: String,
        /// JSON-encoded result payload
        content: String,
        /// Set when the payload describes a failure
        #[serde(default, skip_serializing_if = "Option::is_none")]
        is_error: Option<bool>,
    },
}

impl ContentBlock {
    /// Create a text block
    pub fn text<S: Into<String>>(text: S) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    /// Convert a tool use block into a call the registry can dispatch
    pub fn as_tool_call(&self) -> Option<ToolCall> {
        match self {
            ContentBlock::ToolUse { id, name, input } => Some(ToolCall {
                id: id.clone(),
                name: name.clone(),
                parameters: input.clone(),
            }),
            _ => None,
        }
    }
}

impl LlmMessage {
    /// Create a new user message holding a single text block
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self {
            role: MessageRole::User,
            content: vec![ContentBlock::text(content)],
        }
    }

    /// Create an assistant message from the blocks the model returned
    pub fn assistant(content: Vec<ContentBlock>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content,
        }
    }

    /// Create a user message carrying tool results
    pub fn tool_results(results: Vec<ContentBlock>) -> Self {
        Self {
            role: MessageRole::User,
            content: results,
        }
    }

    /// Concatenate all text blocks in order
    pub fn get_text(&self) -> String {
        collect_text(&self.content)
    }

    /// Check if the message contains tool use
    pub fn has_tool_use(&self) -> bool {
        self.content
            .iter()
            .any(|block| matches!(block, ContentBlock::ToolUse { .. }))
    }

    /// Extract tool calls in the order the model emitted them
    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.content
            .iter()
            .filter_map(ContentBlock::as_tool_call)
            .collect()
    }
}

/// Concatenate the text blocks of a content sequence
pub(crate) fn collect_text(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}
