//! Minimal configuration types for Pentrex core
//!
//! Core only accepts fully resolved, validated configuration.
//! All discovery, loading, and merging happens in CLI layer.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Default model used when neither config nor environment names one
pub const DEFAULT_MODEL: &str = "claude-haiku-4-5-20251001";

/// Default iteration cap for the interactive and autonomous agents
pub const DEFAULT_MAX_AGENT_ITERATIONS: usize = 25;

/// Fixed iteration cap for crew workers
pub const WORKER_MAX_STEPS: usize = 15;

/// Supported LLM protocols
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    /// Anthropic Messages API
    #[serde(rename = "anthropic")]
    Anthropic,
    /// Anything else; rejected when a client is built
    #[serde(rename = "custom")]
    Custom(String),
}

impl Protocol {
    /// Parse a protocol name as written in config files
    pub fn parse(name: &str) -> Self {
        match name {
            "anthropic" => Protocol::Anthropic,
            other => Protocol::Custom(other.to_string()),
        }
    }

    /// Get the protocol name as a string
    pub fn as_str(&self) -> &str {
        match self {
            Protocol::Anthropic => "anthropic",
            Protocol::Custom(name) => name,
        }
    }

    /// Get the default base URL for this protocol
    pub fn default_base_url(&self) -> Option<&'static str> {
        match self {
            Protocol::Anthropic => Some("https://api.anthropic.com"),
            Protocol::Custom(_) => None,
        }
    }
}

/// Model parameters for LLM requests
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelParams {
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Temperature for sampling (0.0 to 1.0)
    pub temperature: Option<f32>,
    /// Top-p sampling parameter
    pub top_p: Option<f32>,
    /// Stop sequences
    pub stop_sequences: Option<Vec<String>>,
}

/// A fully resolved LLM configuration ready for use by core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedLlmConfig {
    /// The protocol to use
    pub protocol: Protocol,
    /// Base URL for the API
    pub base_url: String,
    /// API key for authentication
    pub api_key: String,
    /// Model name/identifier
    pub model: String,
    /// Model parameters
    #[serde(default)]
    pub params: ModelParams,
    /// Additional headers for requests
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl ResolvedLlmConfig {
    /// Create a new resolved LLM config
    pub fn new(protocol: Protocol, base_url: String, api_key: String, model: String) -> Self {
        Self {
            protocol,
            base_url,
            api_key,
            model,
            params: ModelParams::default(),
            headers: HashMap::new(),
        }
    }

    /// Set model parameters
    pub fn with_params(mut self, params: ModelParams) -> Self {
        self.params = params;
        self
    }

    /// Add multiple headers
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("api_key", &self.api_key),
            ("model", &self.model),
            ("base_url", &self.base_url),
        ] {
            if value.is_empty() {
                return Err(ConfigError::MissingField { field: field.to_string() });
            }
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "base_url".to_string(),
                value: format!("{} (must start with http:// or https://)", self.base_url),
            });
        }

        for (field, value) in [("temperature", self.params.temperature), ("top_p", self.params.top_p)] {
            if let Some(v) = value {
                if !(0.0..=1.0).contains(&v) {
                    return Err(ConfigError::InvalidValue {
                        field: field.to_string(),
                        value: format!("{} (must be between 0.0 and 1.0)", v),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Session-level settings shared by every agent in one process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Iteration cap for the interactive, autonomous and orchestrator loops
    pub max_agent_iterations: usize,
    /// Iteration cap for each delegated worker
    pub worker_max_steps: usize,
    /// Target host, IP or range the agents focus on
    pub target: Option<String>,
    /// Where findings are persisted
    pub notes_path: PathBuf,
    /// Where generated reports are written
    pub report_dir: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_agent_iterations: DEFAULT_MAX_AGENT_ITERATIONS,
            worker_max_steps: WORKER_MAX_STEPS,
            target: None,
            notes_path: PathBuf::from("loot").join("notes.json"),
            report_dir: PathBuf::from("loot"),
        }
    }
}

impl SessionConfig {
    /// The current target, or an empty string when unset
    pub fn target_or_empty(&self) -> &str {
        self.target.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ResolvedLlmConfig {
        ResolvedLlmConfig::new(
            Protocol::Anthropic,
            "https://api.anthropic.com".to_string(),
            "sk-test".to_string(),
            DEFAULT_MODEL.to_string(),
        )
    }

    #[test]
    fn test_validate_accepts_resolved_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = valid();
        config.api_key.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField { field }) if field == "api_key"
        ));

        let mut config = valid();
        config.base_url = "api.anthropic.com".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "base_url"
        ));

        let config = valid().with_params(ModelParams {
            temperature: Some(1.5),
            ..Default::default()
        });
        let err = config.validate().unwrap_err();
        assert!(matches!(&err, ConfigError::InvalidValue { field, .. } if field == "temperature"));
        assert!(err.to_string().contains("1.5"));
    }

    #[test]
    fn test_protocol_parse() {
        assert_eq!(Protocol::parse("anthropic"), Protocol::Anthropic);
        assert_eq!(
            Protocol::parse("openai"),
            Protocol::Custom("openai".to_string())
        );
        assert_eq!(Protocol::Anthropic.as_str(), "anthropic");
    }

    #[test]
    fn test_session_defaults() {
        let session = SessionConfig::default();
        assert_eq!(session.max_agent_iterations, 25);
        assert_eq!(session.worker_max_steps, 15);
        assert!(session.notes_path.ends_with("notes.json"));
        assert_eq!(session.target_or_empty(), "");
    }
}
