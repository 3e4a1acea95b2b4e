//! LLM client abstractions and implementations

pub mod client;
pub mod message;
pub mod providers;

pub use client::{ChatOptions, FinishReason, LlmClient, LlmResponse, Usage};
pub use message::{ContentBlock, LlmMessage, MessageRole};
pub use providers::{create_client, AnthropicClient};
