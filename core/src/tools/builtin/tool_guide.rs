//! Tool guide lookups

use crate::error::Result;
use crate::knowledge::KnowledgeBase;
use crate::tools::{Tool, ToolCall, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

pub struct ToolGuideTool {
    kb: Arc<KnowledgeBase>,
}

impl ToolGuideTool {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }
}

#[async_trait]
impl Tool for ToolGuideTool {
    fn name(&self) -> &str {
        "get_tool_guide"
    }

    fn description(&self) -> &str {
        "Get usage guide for a penetration testing tool."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "tool": {
                    "type": "string",
                    "description": "Tool name: nmap, metasploit, burp_suite, wireshark, sqlmap, hydra, aircrack, john"
                }
            },
            "required": ["tool"]
        })
    }

    async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let tool: String = call.get_parameter("tool")?;

        match self.kb.find_tool_guide(&tool) {
            Some((_, guide)) => Ok(ToolResult::success(&call.id, serde_json::to_value(guide)?)),
            None => Ok(ToolResult::error_with(
                &call.id,
                json!({
                    "error": format!("Tool not found: {}", tool),
                    "available": KnowledgeBase::keys(self.kb.tool_guides()),
                }),
            )),
        }
    }
}

pub struct ListToolGuidesTool {
    kb: Arc<KnowledgeBase>,
}

impl ListToolGuidesTool {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }
}

#[async_trait]
impl Tool for ListToolGuidesTool {
    fn name(&self) -> &str {
        "list_tools"
    }

    fn description(&self) -> &str {
        "List all available tool guides."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({"type": "object", "properties": {}, "required": []})
    }

    async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let tools: Vec<_> = self
            .kb
            .tool_guides()
            .iter()
            .map(|(key, guide)| json!({"key": key, "name": guide.name, "category": guide.category}))
            .collect();

        Ok(ToolResult::success(&call.id, json!({ "tools": tools })))
    }
}
