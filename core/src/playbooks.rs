//! Canned autonomous tasks

use crate::agent::PromptBuilder;
use crate::error::{AgentError, Result};
use crate::knowledge::KnowledgeBase;
use serde_json::json;

/// `(key, description)` of every playbook, in authored order
pub fn list(kb: &KnowledgeBase) -> Vec<(&str, &str)> {
    kb.playbooks()
        .iter()
        .map(|(key, playbook)| (key.as_str(), playbook.description.as_str()))
        .collect()
}

/// Render a playbook into the instruction handed to the autonomous agent
pub fn build_task(kb: &KnowledgeBase, prompts: &PromptBuilder, name: &str, target: &str) -> Result<String> {
    let (_, playbook) = kb
        .find_playbook(name)
        .ok_or_else(|| AgentError::UnknownPlaybook {
            name: name.to_string(),
        })?;

    if target.trim().is_empty() {
        return Err(AgentError::InvalidTask {
            message: "a target is required to run a playbook".to_string(),
        }
        .into());
    }

    let data = json!({ "target": target });
    let steps = playbook
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| Ok(format!("{}. {}", i + 1, prompts.render(step, &data)?)))
        .collect::<Result<Vec<_>>>()?;

    Ok(format!(
        "Execute this playbook: {}\nTarget: {}\n\nSteps:\n{}\n\n\
         Execute each step sequentially. Save findings along the way. Adapt if something fails.",
        playbook.name,
        target,
        steps.join("\n")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_build_task_renders_target() {
        let kb = KnowledgeBase::embedded().unwrap();
        let task = build_task(&kb, &PromptBuilder::new(), "web_recon", "example.com").unwrap();

        assert!(task.starts_with("Execute this playbook: Web Reconnaissance\nTarget: example.com\n\nSteps:\n1. "));
        assert!(task.contains("2. Run nmap quick scan on example.com to identify open ports and services"));
        assert!(!task.contains("{{target}}"));
        assert!(task.ends_with("Adapt if something fails."));
    }

    #[test]
    fn test_build_task_errors() {
        let kb = KnowledgeBase::embedded().unwrap();
        let prompts = PromptBuilder::new();
        assert!(matches!(
            build_task(&kb, &prompts, "nope", "x"),
            Err(Error::Agent(AgentError::UnknownPlaybook { .. }))
        ));
        assert!(matches!(
            build_task(&kb, &prompts, "vuln_scan", " "),
            Err(Error::Agent(AgentError::InvalidTask { .. }))
        ));
    }

    #[test]
    fn test_list() {
        let kb = KnowledgeBase::embedded().unwrap();
        let playbooks = list(&kb);
        assert_eq!(playbooks.len(), 4);
        assert_eq!(playbooks[1].0, "network_scan");
    }
}
