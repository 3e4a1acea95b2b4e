//! Base tool traits and structures

use crate::error::{Result, ToolError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Trait for all tools
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the name of the tool
    fn name(&self) -> &str;

    /// Get the description of the tool
    fn description(&self) -> &str;

    /// Get the JSON schema for the tool's parameters
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given parameters
    async fn execute(&self, call: ToolCall) -> Result<ToolResult>;

    /// Schema presented to the model
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.parameters_schema(),
        }
    }
}

/// Name, description and input schema of a tool, in the shape the model API expects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

impl ToolSpec {
    /// Names of the required parameters
    pub fn required(&self) -> Vec<&str> {
        self.input_schema
            .get("required")
            .and_then(|r| r.as_array())
            .map(|r| r.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default()
    }
}

/// A call to a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Correlation id; matches the id of the model's tool use block
    pub id: String,

    /// Name of the tool to call
    pub name: String,

    /// Parameters to pass to the tool
    pub parameters: serde_json::Value,
}

/// Result of a tool execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// ID of the tool call this is a result for
    pub tool_call_id: String,

    /// Whether the execution was successful
    pub success: bool,

    /// JSON payload handed back to the model
    pub payload: serde_json::Value,

    /// Execution duration in milliseconds
    pub duration_ms: Option<u64>,
}

impl ToolCall {
    /// Create a new tool call with a fresh id
    pub fn new<S: Into<String>>(name: S, parameters: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            parameters,
        }
    }

    /// Get a parameter value by key
    pub fn get_parameter<T>(&self, key: &str) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let value = self
            .parameters
            .get(key)
            .ok_or_else(|| ToolError::InvalidParameters {
                message: format!("Missing parameter: {}", key),
            })?;

        serde_json::from_value(value.clone()).map_err(|_| {
            ToolError::InvalidParameters {
                message: format!("Invalid parameter type for: {}", key),
            }
            .into()
        })
    }

    /// Get a parameter value by key with a default
    pub fn get_parameter_or<T>(&self, key: &str, default: T) -> T
    where
        T: for<'de> Deserialize<'de>,
    {
        self.get_parameter(key).unwrap_or(default)
    }

    /// Optional string parameter; empty strings count as absent
    pub fn get_optional_str(&self, key: &str) -> Option<String> {
        self.get_parameter::<String>(key)
            .ok()
            .filter(|s| !s.is_empty())
    }
}

impl ToolResult {
    /// Create a successful result
    pub fn success<S: Into<String>>(tool_call_id: S, payload: serde_json::Value) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            success: true,
            payload,
            duration_ms: None,
        }
    }

    /// Create an error result with payload `{"error": message}`
    pub fn error<S: Into<String>, M: Into<String>>(tool_call_id: S, message: M) -> Self {
        Self::error_with(
            tool_call_id,
            serde_json::json!({ "error": message.into() }),
        )
    }

    /// Create an error result carrying extra fields next to `error`
    pub fn error_with<S: Into<String>>(tool_call_id: S, payload: serde_json::Value) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            success: false,
            payload,
            duration_ms: None,
        }
    }

    /// Set execution duration
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Payload serialized for a tool result block
    pub fn content(&self) -> String {
        self.payload.to_string()
    }

    /// The `error` field of the payload, if any
    pub fn error_message(&self) -> Option<&str> {
        self.payload.get("error").and_then(|e| e.as_str())
    }
}
