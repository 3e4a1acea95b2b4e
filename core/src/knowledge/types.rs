//! Record types of the embedded knowledge tables

use serde::{Deserialize, Serialize};

/// One multiple-choice quiz question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    #[serde(rename = "q")]
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options` of the correct answer
    pub answer: usize,
    pub explanation: String,
}

impl QuizQuestion {
    /// Letter of the correct option (`A` for index 0)
    pub fn answer_letter(&self) -> char {
        option_letter(self.answer)
    }
}

/// Letter label for an option index
pub fn option_letter(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub title: String,
    pub category: String,
    pub description: String,
    pub how_it_works: String,
    pub example: String,
    pub tools: Vec<String>,
    pub defenses: Vec<String>,
}

/// Usage guide for an offensive-security tool
///
/// Guides share a header but each carries its own sections (flags, examples, tips...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolGuide {
    pub name: String,
    pub category: String,
    pub description: String,
    #[serde(flatten)]
    pub sections: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub title: String,
    pub difficulty: String,
    pub category: String,
    pub setup: ScenarioSetup,
    pub steps: Vec<ScenarioStep>,
    pub lessons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSetup {
    pub target: String,
    pub objective: String,
    pub tools_needed: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioStep {
    pub step: u32,
    pub task: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commands: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    pub expected: String,
}

/// A canned autonomous task; steps are templates over `{{target}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playbook {
    pub name: String,
    pub description: String,
    pub steps: Vec<String>,
}
