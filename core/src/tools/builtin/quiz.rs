//! Quiz tools over the embedded question bank

use crate::error::Result;
use crate::knowledge::{option_letter, KnowledgeBase, QuizQuestion};
use crate::tools::{Tool, ToolCall, ToolResult};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use serde_json::json;
use std::sync::Arc;

/// Pick a question; `random` chooses the domain as well
///
/// Returns the resolved domain name alongside the question.
pub fn pick_question<'a>(kb: &'a KnowledgeBase, domain: &str) -> Option<(&'a str, &'a QuizQuestion)> {
    let mut rng = rand::thread_rng();
    let (name, questions) = if domain == "random" {
        kb.quiz_domains().choose(&mut rng)?
    } else {
        kb.quiz_domains().iter().find(|(name, _)| name == domain)?
    };
    questions.choose(&mut rng).map(|q| (name.as_str(), q))
}

/// Question payload as the model sees it
pub fn question_payload(domain: &str, question: &QuizQuestion) -> serde_json::Value {
    let options: serde_json::Map<String, serde_json::Value> = question
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| (option_letter(i).to_string(), json!(option)))
        .collect();

    json!({
        "domain": domain,
        "question": question.question,
        "options": options,
        "correct_index": question.answer,
        "explanation": question.explanation,
    })
}

pub struct QuizQuestionTool {
    kb: Arc<KnowledgeBase>,
}

impl QuizQuestionTool {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }
}

#[async_trait]
impl Tool for QuizQuestionTool {
    fn name(&self) -> &str {
        "get_quiz_question"
    }

    fn description(&self) -> &str {
        "Get a quiz question from a specific domain or random. Returns question, options, \
         and the correct answer with its explanation."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "domain": {
                    "type": "string",
                    "description": "Domain: reconnaissance, scanning, system_hacking, web_attacks, \
                                    network_attacks, wireless, cryptography, or 'random'"
                }
            },
            "required": ["domain"]
        })
    }

    async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let domain: String = call.get_parameter("domain")?;

        match pick_question(&self.kb, &domain) {
            Some((name, question)) => {
                Ok(ToolResult::success(&call.id, question_payload(name, question)))
            }
            None => Ok(ToolResult::error_with(
                &call.id,
                json!({
                    "error": format!("Unknown domain: {}", domain),
                    "available": KnowledgeBase::keys(self.kb.quiz_domains()),
                }),
            )),
        }
    }
}

pub struct ListQuizDomainsTool {
    kb: Arc<KnowledgeBase>,
}

impl ListQuizDomainsTool {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }
}

#[async_trait]
impl Tool for ListQuizDomainsTool {
    fn name(&self) -> &str {
        "list_quiz_domains"
    }

    fn description(&self) -> &str {
        "List all available quiz domains with question counts."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({"type": "object", "properties": {}, "required": []})
    }

    async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let domains: serde_json::Map<String, serde_json::Value> = self
            .kb
            .quiz_domains()
            .iter()
            .map(|(name, questions)| (name.clone(), json!(questions.len())))
            .collect();

        Ok(ToolResult::success(
            &call.id,
            json!({"domains": domains, "total_questions": self.kb.total_questions()}),
        ))
    }
}
