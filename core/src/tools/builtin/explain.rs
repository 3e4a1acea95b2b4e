//! Concept explanations

use crate::error::Result;
use crate::knowledge::KnowledgeBase;
use crate::tools::{Tool, ToolCall, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

pub struct ExplainTool {
    kb: Arc<KnowledgeBase>,
}

impl ExplainTool {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }
}

#[async_trait]
impl Tool for ExplainTool {
    fn name(&self) -> &str {
        "explain"
    }

    fn description(&self) -> &str {
        "Explain a cybersecurity concept. Topics: sql_injection, xss, arp_spoofing, \
         privilege_escalation, buffer_overflow, phishing. Or provide any security topic."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "topic": {
                    "type": "string",
                    "description": "Security concept to explain"
                }
            },
            "required": ["topic"]
        })
    }

    async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let topic: String = call.get_parameter("topic")?;

        // Unknown topics are not an error: the model explains them itself.
        let payload = match self.kb.find_concept(&topic) {
            Some((_, concept)) => serde_json::to_value(concept)?,
            None => json!({
                "available_topics": KnowledgeBase::keys(self.kb.concepts()),
                "message": format!(
                    "No built-in explanation for '{}'. Ask me directly and I'll explain it.",
                    topic
                ),
            }),
        };
        Ok(ToolResult::success(&call.id, payload))
    }
}
