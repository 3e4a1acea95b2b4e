//! Practice scenarios

use crate::error::Result;
use crate::knowledge::KnowledgeBase;
use crate::tools::{Tool, ToolCall, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

pub struct ScenarioTool {
    kb: Arc<KnowledgeBase>,
}

impl ScenarioTool {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }
}

#[async_trait]
impl Tool for ScenarioTool {
    fn name(&self) -> &str {
        "get_scenario"
    }

    fn description(&self) -> &str {
        "Get a hands-on attack scenario to practice."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "scenario": {
                    "type": "string",
                    "description": "Scenario: web_sql_injection, network_arp_spoofing, wireless_wpa_crack, system_privilege_escalation"
                }
            },
            "required": ["scenario"]
        })
    }

    async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let scenario: String = call.get_parameter("scenario")?;

        match self.kb.find_scenario(&scenario) {
            Some((_, found)) => Ok(ToolResult::success(&call.id, serde_json::to_value(found)?)),
            None => Ok(ToolResult::error_with(
                &call.id,
                json!({
                    "error": format!("Scenario not found: {}", scenario),
                    "available": KnowledgeBase::keys(self.kb.scenarios()),
                }),
            )),
        }
    }
}

pub struct ListScenariosTool {
    kb: Arc<KnowledgeBase>,
}

impl ListScenariosTool {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }
}

#[async_trait]
impl Tool for ListScenariosTool {
    fn name(&self) -> &str {
        "list_scenarios"
    }

    fn description(&self) -> &str {
        "List all available practice scenarios."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({"type": "object", "properties": {}, "required": []})
    }

    async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let scenarios: Vec<_> = self
            .kb
            .scenarios()
            .iter()
            .map(|(key, s)| {
                json!({
                    "key": key,
                    "title": s.title,
                    "difficulty": s.difficulty,
                    "category": s.category,
                })
            })
            .collect();

        Ok(ToolResult::success(&call.id, json!({ "scenarios": scenarios })))
    }
}
