//! Static cybersecurity knowledge tables
//!
//! The tables are compiled into the binary and parsed once; callers share a
//! single [`KnowledgeBase`] behind an `Arc`.

pub mod types;

pub use types::{
    option_letter, Concept, Playbook, QuizQuestion, Scenario, ScenarioSetup, ScenarioStep,
    ToolGuide,
};

use crate::error::{AgentError, Result};
use crate::tools::utils::normalize_key;
use serde::de::DeserializeOwned;

const QUIZ_JSON: &str = include_str!("../../data/quiz.json");
const CONCEPTS_JSON: &str = include_str!("../../data/concepts.json");
const TOOL_GUIDES_JSON: &str = include_str!("../../data/tool_guides.json");
const SCENARIOS_JSON: &str = include_str!("../../data/scenarios.json");
const PLAYBOOKS_JSON: &str = include_str!("../../data/playbooks.json");

/// Keyed tables in authored order
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    quiz: Vec<(String, Vec<QuizQuestion>)>,
    concepts: Vec<(String, Concept)>,
    tool_guides: Vec<(String, ToolGuide)>,
    scenarios: Vec<(String, Scenario)>,
    playbooks: Vec<(String, Playbook)>,
}

fn parse_table<T: DeserializeOwned>(table: &str, raw: &str) -> Result<Vec<(String, T)>> {
    let map: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(raw).map_err(|e| AgentError::Knowledge {
            message: format!("{}: {}", table, e),
        })?;

    map.into_iter()
        .map(|(key, value)| {
            let record = serde_json::from_value(value).map_err(|e| AgentError::Knowledge {
                message: format!("{}.{}: {}", table, key, e),
            })?;
            Ok((key, record))
        })
        .collect()
}

fn lookup<'a, T>(table: &'a [(String, T)], key: &str) -> Option<(&'a str, &'a T)> {
    table
        .iter()
        .find(|(k, _)| k == key)
        .map(|(k, v)| (k.as_str(), v))
}

impl KnowledgeBase {
    /// Parse the tables compiled into the crate
    pub fn embedded() -> Result<Self> {
        Ok(Self {
            quiz: parse_table("quiz", QUIZ_JSON)?,
            concepts: parse_table("concepts", CONCEPTS_JSON)?,
            tool_guides: parse_table("tool_guides", TOOL_GUIDES_JSON)?,
            scenarios: parse_table("scenarios", SCENARIOS_JSON)?,
            playbooks: parse_table("playbooks", PLAYBOOKS_JSON)?,
        })
    }

    /// Quiz domains with their questions
    pub fn quiz_domains(&self) -> &[(String, Vec<QuizQuestion>)] {
        &self.quiz
    }

    /// Questions of one domain
    pub fn quiz_questions(&self, domain: &str) -> Option<&[QuizQuestion]> {
        lookup(&self.quiz, domain).map(|(_, q)| q.as_slice())
    }

    pub fn total_questions(&self) -> usize {
        self.quiz.iter().map(|(_, q)| q.len()).sum()
    }

    pub fn concepts(&self) -> &[(String, Concept)] {
        &self.concepts
    }

    /// Find a concept by normalized key, then by substring match on key or title
    pub fn find_concept(&self, topic: &str) -> Option<(&str, &Concept)> {
        let key = normalize_key(topic);
        if key.is_empty() {
            return None;
        }
        lookup(&self.concepts, &key).or_else(|| {
            self.concepts
                .iter()
                .find(|(k, c)| {
                    k.contains(&key) || key.contains(k.as_str()) || c.title.to_lowercase().contains(&key)
                })
                .map(|(k, c)| (k.as_str(), c))
        })
    }

    pub fn tool_guides(&self) -> &[(String, ToolGuide)] {
        &self.tool_guides
    }

    /// Find a tool guide by normalized key
    pub fn find_tool_guide(&self, tool: &str) -> Option<(&str, &ToolGuide)> {
        lookup(&self.tool_guides, &normalize_key(tool))
    }

    pub fn scenarios(&self) -> &[(String, Scenario)] {
        &self.scenarios
    }

    /// Find a scenario by normalized key
    pub fn find_scenario(&self, scenario: &str) -> Option<(&str, &Scenario)> {
        lookup(&self.scenarios, &normalize_key(scenario))
    }

    pub fn playbooks(&self) -> &[(String, Playbook)] {
        &self.playbooks
    }

    pub fn find_playbook(&self, name: &str) -> Option<(&str, &Playbook)> {
        lookup(&self.playbooks, name)
    }

    /// Keys of a table, in order
    pub fn keys<T>(table: &[(String, T)]) -> Vec<String> {
        table.iter().map(|(k, _)| k.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kb() -> KnowledgeBase {
        KnowledgeBase::embedded().unwrap()
    }

    #[test]
    fn test_embedded_tables_parse_in_order() {
        let kb = kb();
        let domains = KnowledgeBase::keys(kb.quiz_domains());
        assert_eq!(domains.first().map(String::as_str), Some("reconnaissance"));
        assert_eq!(domains.len(), 7);
        assert_eq!(kb.total_questions(), 21);
        assert!(kb
            .quiz_domains()
            .iter()
            .flat_map(|(_, qs)| qs)
            .all(|q| q.options.len() == 4 && q.answer < 4));

        assert_eq!(kb.concepts().len(), 6);
        assert_eq!(kb.tool_guides().len(), 8);
        assert_eq!(kb.scenarios().len(), 4);
        assert_eq!(
            KnowledgeBase::keys(kb.playbooks()),
            vec!["web_recon", "network_scan", "vuln_scan", "web_vuln"]
        );
    }

    #[test]
    fn test_find_concept_exact_and_fuzzy() {
        let kb = kb();
        assert_eq!(kb.find_concept("SQL Injection").unwrap().0, "sql_injection");
        assert_eq!(kb.find_concept("privilege").unwrap().0, "privilege_escalation");
        assert_eq!(kb.find_concept("scripting").unwrap().0, "xss");
        assert!(kb.find_concept("quantum tunnelling").is_none());
        assert!(kb.find_concept("").is_none());
    }

    #[test]
    fn test_find_tool_guide_and_scenario() {
        let kb = kb();
        let (key, guide) = kb.find_tool_guide("Burp Suite").unwrap();
        assert_eq!(key, "burp_suite");
        assert!(guide.sections.contains_key("components"));

        let (_, scenario) = kb.find_scenario("network-arp-spoofing").unwrap();
        assert!(scenario.setup.requirements.is_some());
        assert!(kb.find_scenario("nope").is_none());
    }

    #[test]
    fn test_answer_letter() {
        let kb = kb();
        let q = &kb.quiz_questions("reconnaissance").unwrap()[0];
        assert_eq!(q.answer_letter(), 'B');
    }
}
