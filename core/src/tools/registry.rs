//! Immutable registry of the tools available to an agent

use crate::error::{Result, ToolError};
use crate::tools::{Tool, ToolCall, ToolResult, ToolSpec};
use futures::FutureExt;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

/// Name-indexed tool set, fixed once built
///
/// Registration order is preserved so schemas reach the model in a stable order.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

/// Builder that collects tools before the registry is frozen
#[derive(Default)]
pub struct ToolRegistryBuilder {
    registry: ToolRegistry,
}

impl ToolRegistryBuilder {
    /// Register a tool; a second tool with the same name is rejected
    pub fn register(mut self, tool: Arc<dyn Tool>) -> Result<Self> {
        let name = tool.name().to_string();
        if self.registry.index.contains_key(&name) {
            return Err(ToolError::Duplicate { name }.into());
        }
        self.registry
            .index
            .insert(name, self.registry.tools.len());
        self.registry.tools.push(tool);
        Ok(self)
    }

    /// Freeze the registry
    pub fn build(self) -> ToolRegistry {
        self.registry
    }
}

impl ToolRegistry {
    /// Start building a registry
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&i| Arc::clone(&self.tools[i]))
    }

    /// Whether a tool with this name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// List all tool names in registration order
    pub fn list_tools(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Tool schemas in registration order
    pub fn list_schemas(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|t| t.spec()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// A registry restricted to the named tools, in registration order
    ///
    /// Names that are not registered are skipped.
    pub fn subset<S: AsRef<str>>(&self, names: &[S]) -> ToolRegistry {
        let mut subset = ToolRegistry::default();
        for tool in &self.tools {
            if names.iter().any(|n| n.as_ref() == tool.name()) {
                subset
                    .index
                    .insert(tool.name().to_string(), subset.tools.len());
                subset.tools.push(Arc::clone(tool));
            }
        }
        for name in names {
            if !self.contains(name.as_ref()) {
                tracing::warn!(tool = name.as_ref(), "requested tool is not registered");
            }
        }
        subset
    }

    /// Run a tool call. Never fails: unknown tools, tool errors and panics
    /// all come back as error payloads.
    pub async fn dispatch(&self, call: ToolCall) -> ToolResult {
        let Some(tool) = self.get(&call.name) else {
            tracing::warn!(tool = %call.name, "unknown tool requested");
            let err = ToolError::NotFound { name: call.name.clone() };
            return ToolResult::error(call.id, err.to_string());
        };

        let start_time = Instant::now();
        let call_id = call.id.clone();
        let name = call.name.clone();
        tracing::debug!(tool = %name, "dispatching tool call");

        let outcome = AssertUnwindSafe(tool.execute(call)).catch_unwind().await;
        let duration = start_time.elapsed().as_millis() as u64;

        let mut result = match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => ToolResult::error(&call_id, format!("{} failed: {}", name, e)),
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "tool panicked".to_string());
                tracing::error!(tool = %name, "tool panicked: {}", message);
                ToolResult::error(&call_id, format!("{} failed: {}", name, message))
            }
        };
        result.tool_call_id = call_id;
        result.with_duration(duration)
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.list_tools())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    /// Echoes its `x` argument back as `{"echoed": x}`
    pub(crate) struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the input"
        }

        fn parameters_schema(&self) -> serde_json::Value {
            json!({
                "type": "object",
                "properties": {"x": {"type": "string", "description": "Value to echo"}},
                "required": ["x"]
            })
        }

        async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
            let x: String = call.get_parameter("x")?;
            Ok(ToolResult::success(&call.id, json!({ "echoed": x })))
        }
    }

    struct PanicTool;

    #[async_trait]
    impl Tool for PanicTool {
        fn name(&self) -> &str {
            "boom"
        }

        fn description(&self) -> &str {
            "Always panics"
        }

        fn parameters_schema(&self) -> serde_json::Value {
            json!({"type": "object", "properties": {}, "required": []})
        }

        async fn execute(&self, _call: ToolCall) -> Result<ToolResult> {
            panic!("kaboom");
        }
    }

    fn registry() -> ToolRegistry {
        ToolRegistry::builder()
            .register(Arc::new(EchoTool))
            .unwrap()
            .register(Arc::new(PanicTool))
            .unwrap()
            .build()
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let result = ToolRegistry::builder()
            .register(Arc::new(EchoTool))
            .unwrap()
            .register(Arc::new(EchoTool));
        assert!(result.is_err());
    }

    #[test]
    fn test_schemas_in_registration_order() {
        let names: Vec<_> = registry()
            .list_schemas()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["echo", "boom"]);
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool() {
        let result = registry()
            .dispatch(ToolCall::new("does_not_exist", json!({})))
            .await;
        assert!(!result.success);
        assert_eq!(result.payload, json!({"error": "Unknown tool: does_not_exist"}));
    }

    #[tokio::test]
    async fn test_dispatch_wraps_errors_and_panics() {
        let registry = registry();

        let missing = registry.dispatch(ToolCall::new("echo", json!({}))).await;
        assert!(missing
            .error_message()
            .unwrap()
            .starts_with("echo failed: "));

        let call = ToolCall::new("boom", json!({}));
        let id = call.id.clone();
        let panicked = registry.dispatch(call).await;
        assert_eq!(panicked.tool_call_id, id);
        assert_eq!(panicked.error_message(), Some("boom failed: kaboom"));
    }

    #[tokio::test]
    async fn test_dispatch_success_keeps_call_id() {
        let call = ToolCall::new("echo", json!({"x": "hi"}));
        let id = call.id.clone();
        let result = registry().dispatch(call).await;
        assert!(result.success);
        assert_eq!(result.tool_call_id, id);
        assert_eq!(result.payload, json!({"echoed": "hi"}));
        assert!(result.duration_ms.is_some());
    }

    #[test]
    fn test_subset_skips_unknown_names() {
        let subset = registry().subset(&["boom", "missing"]);
        assert_eq!(subset.list_tools(), vec!["boom"]);
    }
}
