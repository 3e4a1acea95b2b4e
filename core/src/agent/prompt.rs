//! System prompts for the assist, autonomous, orchestrator and worker agents

use crate::agent::roles::WorkerRole;
use crate::error::Result;
use crate::notes::Note;
use crate::tools::utils::truncate_chars;
use handlebars::Handlebars;
use serde_json::json;

pub const ASSIST_PROMPT: &str = "You are Pentrex, an AI penetration testing assistant. You help security professionals with:

1. Running reconnaissance and scanning tools (nmap, terminal commands)
2. Analyzing results and identifying vulnerabilities
3. Suggesting next steps in the pentest workflow
4. Teaching security concepts (quiz, explain tools)
5. Documenting findings (save_note tool)

Rules:
- Only test systems with explicit authorization
- Always save important findings using save_note
- Explain what you're doing and why
- Follow the standard pentest methodology: Recon → Scan → Enumerate → Exploit → Post-Exploit → Report
- If a target is set, focus your efforts on that target
- Be concise and technical

{{target_context}}
{{notes_context}}
";

pub const AGENT_PROMPT: &str = "You are Pentrex in autonomous agent mode. Execute the given task methodically.

Task: {{task}}
Target: {{target}}

Approach:
1. Plan your steps before executing
2. Use tools to gather information
3. Analyze results before proceeding
4. Save all findings with save_note
5. Stop when the task is complete or you've exhausted options

Be methodical. Don't repeat failed commands. Adapt based on results.

{{notes_context}}
";

pub const ORCHESTRATOR_PROMPT: &str = "You are the Pentrex Crew Orchestrator. You coordinate a team of specialized security workers.

Available workers:
- recon: Reconnaissance specialist (DNS, OSINT, fingerprinting)
- scan: Network/service scanner (ports, versions, OS detection)
- vuln: Vulnerability analyst (CVE identification, misconfigs)
- exploit: Exploitation specialist (PoC, verification)

Your job:
1. Analyze the task and current findings
2. Decide which worker to deploy next
3. Give specific instructions to the worker
4. Analyze their results and decide next steps
5. Stop when the objective is achieved or all avenues exhausted

Use the delegate_worker tool to assign tasks to workers.
Use read_notes to check what has been found so far.

Task: {{task}}
Target: {{target}}

{{findings_summary}}

Think strategically. Don't repeat work already done. Build on previous findings.
";

const RECON_PROMPT: &str = "You are a reconnaissance specialist. Your job:
- DNS enumeration and subdomain discovery
- WHOIS lookups and IP range identification
- Technology stack fingerprinting
- OSINT gathering (public info, headers, certificates)
- Save ALL findings using save_note with category 'recon'

Be thorough. Every detail matters for later phases.
Target: {{target}}";

const SCAN_PROMPT: &str = "You are a network and service scanner. Your job:
- Port scanning (TCP and UDP)
- Service version detection
- OS fingerprinting
- Banner grabbing
- Save ALL findings using save_note with category 'recon'

Use nmap_scan with appropriate profiles. Be systematic.
Target: {{target}}";

const VULN_PROMPT: &str = "You are a vulnerability analyst. Your job:
- Analyze scan results from previous workers
- Identify potential vulnerabilities based on service versions
- Run vulnerability-specific nmap scripts
- Check for common misconfigurations
- Classify findings by severity (critical, high, medium, low)
- Save ALL findings using save_note with category 'vulnerability'

Read existing notes first to see what recon/scan found.
Target: {{target}}";

const EXPLOIT_PROMPT: &str = "You are an exploitation specialist. Your job:
- Review vulnerabilities found by VulnWorker
- Attempt safe exploitation where authorized
- Verify vulnerabilities are exploitable
- Document proof-of-concept steps
- Save ALL findings using save_note with category 'vulnerability'

IMPORTANT: Only attempt exploitation on authorized targets.
Read existing notes first to see what was found.
Target: {{target}}";

/// Notes shown to the assist and autonomous agents
const NOTES_IN_PROMPT: usize = 10;
/// Findings summarized for the orchestrator
const FINDINGS_IN_PROMPT: usize = 15;
const FINDING_PREVIEW_CHARS: usize = 100;

fn last<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

/// `Previous findings:` block with the most recent notes, or empty
pub fn notes_context(notes: &[Note]) -> String {
    if notes.is_empty() {
        return String::new();
    }
    let lines: Vec<String> = last(notes, NOTES_IN_PROMPT)
        .iter()
        .map(|n| format!("- [{}] {}", n.category, n.content))
        .collect();
    format!("Previous findings:\n{}", lines.join("\n"))
}

/// `Current findings:` block for the orchestrator, or empty
pub fn findings_summary(notes: &[Note]) -> String {
    if notes.is_empty() {
        return String::new();
    }
    let lines: Vec<String> = last(notes, FINDINGS_IN_PROMPT)
        .iter()
        .map(|n| {
            format!(
                "- [{}] {}",
                n.category,
                truncate_chars(&n.content, FINDING_PREVIEW_CHARS)
            )
        })
        .collect();
    format!("Current findings:\n{}", lines.join("\n"))
}

/// Renders the agent prompt templates
pub struct PromptBuilder {
    handlebars: Handlebars<'static>,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptBuilder {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        Self { handlebars }
    }

    /// Render an arbitrary template with `{{target}}`-style placeholders
    pub fn render(&self, template: &str, data: &serde_json::Value) -> Result<String> {
        Ok(self.handlebars.render_template(template, data)?)
    }

    /// Prompt for the interactive assistant; rebuilt before every chat turn
    pub fn assist(&self, target: &str, notes: &[Note]) -> Result<String> {
        let target_context = if target.is_empty() {
            "No target set. Ask the user or use /target to set one.".to_string()
        } else {
            format!("Current target: {}", target)
        };
        self.render(
            ASSIST_PROMPT,
            &json!({
                "target_context": target_context,
                "notes_context": notes_context(notes),
            }),
        )
    }

    pub fn autonomous(&self, task: &str, target: &str, notes: &[Note]) -> Result<String> {
        self.render(
            AGENT_PROMPT,
            &json!({
                "task": task,
                "target": target,
                "notes_context": notes_context(notes),
            }),
        )
    }

    pub fn orchestrator(&self, task: &str, target: &str, notes: &[Note]) -> Result<String> {
        self.render(
            ORCHESTRATOR_PROMPT,
            &json!({
                "task": task,
                "target": target,
                "findings_summary": findings_summary(notes),
            }),
        )
    }

    pub fn worker(&self, role: WorkerRole, target: &str) -> Result<String> {
        let template = match role {
            WorkerRole::Recon => RECON_PROMPT,
            WorkerRole::Scan => SCAN_PROMPT,
            WorkerRole::Vuln => VULN_PROMPT,
            WorkerRole::Exploit => EXPLOIT_PROMPT,
        };
        self.render(template, &json!({ "target": target }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn note(id: u64, category: &str, content: &str) -> Note {
        Note {
            id,
            content: content.to_string(),
            category: category.to_string(),
            target: String::new(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_assist_prompt_target_context() {
        let prompts = PromptBuilder::new();
        let unset = prompts.assist("", &[]).unwrap();
        assert!(unset.contains("No target set. Ask the user or use /target to set one."));
        assert!(!unset.contains("Previous findings"));

        let set = prompts
            .assist("10.0.0.5", &[note(1, "recon", "port 80 <open> & \"http\"")])
            .unwrap();
        assert!(set.contains("Current target: 10.0.0.5"));
        assert!(set.contains("- [recon] port 80 <open> & \"http\""));
    }

    #[test]
    fn test_notes_context_keeps_last_ten() {
        let notes: Vec<_> = (1..=12).map(|i| note(i, "finding", &format!("n{}", i))).collect();
        let context = notes_context(&notes);
        assert!(!context.contains("- [finding] n2\n"));
        assert!(context.contains("- [finding] n3\n"));
        assert!(context.ends_with("- [finding] n12"));
    }

    #[test]
    fn test_findings_summary_truncates() {
        let long = "x".repeat(150);
        let summary = findings_summary(&[note(1, "vulnerability", &long)]);
        assert_eq!(summary, format!("Current findings:\n- [vulnerability] {}", "x".repeat(100)));
        assert_eq!(findings_summary(&[]), "");
    }

    #[test]
    fn test_worker_prompt_has_target() {
        let prompt = PromptBuilder::new().worker(WorkerRole::Scan, "10.0.0.0/24").unwrap();
        assert!(prompt.starts_with("You are a network and service scanner."));
        assert!(prompt.ends_with("Target: 10.0.0.0/24"));
    }
}
