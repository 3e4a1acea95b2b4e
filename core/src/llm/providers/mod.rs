//! LLM provider implementations

pub mod anthropic;

pub use anthropic::AnthropicClient;

use crate::config::{Protocol, ResolvedLlmConfig};
use crate::error::{ConfigError, Result};
use crate::llm::LlmClient;
use std::sync::Arc;

/// Build a client for the configured protocol
pub fn create_client(config: &ResolvedLlmConfig) -> Result<Arc<dyn LlmClient>> {
    match &config.protocol {
        Protocol::Anthropic => Ok(Arc::new(AnthropicClient::new(config)?)),
        Protocol::Custom(name) => Err(ConfigError::UnsupportedProtocol {
            protocol: name.clone(),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_by_protocol() {
        let config = ResolvedLlmConfig::new(
            Protocol::Anthropic,
            "https://api.anthropic.com".to_string(),
            "sk-test".to_string(),
            "claude-test".to_string(),
        );
        let client = create_client(&config).unwrap();
        assert_eq!(client.provider_name(), "anthropic");
        assert_eq!(client.model_name(), "claude-test");

        let mut custom = config;
        custom.protocol = Protocol::Custom("openai".to_string());
        assert!(create_client(&custom).is_err());
    }
}
