//! Agent configuration structures

use crate::agent::roles::{WorkerRole, WORKER_TOOLS};
use crate::config::types::{DEFAULT_MAX_AGENT_ITERATIONS, WORKER_MAX_STEPS};
use serde::{Deserialize, Serialize};

/// Budget message shown to interactive users
pub const BUDGET_EXHAUSTED_MESSAGE: &str = "Max iterations reached. Use /clear to reset.";

/// How the loop treats history and builds its reply
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum LoopMode {
    /// History persists across turns; the reply is the final response's text
    Interactive,
    /// Fresh history per run; the reply joins every non-empty text block
    #[default]
    Autonomous,
}

/// Configuration for one conversation loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Name used in the stop marker, e.g. `[Agent stopped by user]`
    pub name: String,

    /// System prompt sent with every model request
    #[serde(default)]
    pub system_prompt: String,

    /// Tools available to this agent; empty means every registered tool
    #[serde(default)]
    pub tools: Vec<String>,

    /// Maximum number of model round-trips per run
    pub max_steps: usize,

    #[serde(default)]
    pub mode: LoopMode,

    /// Prefix of progress lines; `None` gives `[step N]` and `[tool]`
    #[serde(default)]
    pub progress_label: Option<String>,

    /// Characters of model text shown per progress line
    pub text_preview_chars: usize,

    /// Prepended to the caller's input to form the first user message
    #[serde(default)]
    pub input_prefix: String,

    /// Reply of an autonomous run that produced no text
    pub empty_result: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: "Agent".to_string(),
            system_prompt: String::new(),
            tools: Vec::new(),
            max_steps: DEFAULT_MAX_AGENT_ITERATIONS,
            mode: LoopMode::Autonomous,
            progress_label: None,
            text_preview_chars: 100,
            input_prefix: String::new(),
            empty_result: "Task completed.".to_string(),
        }
    }
}

impl AgentConfig {
    /// The chat assistant: all tools, persistent history
    pub fn interactive(max_steps: usize) -> Self {
        Self {
            name: "Assistant".to_string(),
            max_steps,
            mode: LoopMode::Interactive,
            ..Default::default()
        }
    }

    /// The autonomous agent used for tasks and playbooks
    pub fn autonomous(max_steps: usize) -> Self {
        Self {
            max_steps,
            input_prefix: "Execute this task: ".to_string(),
            ..Default::default()
        }
    }

    /// The crew orchestrator; its tools are supplied by the crew
    pub fn orchestrator(max_steps: usize) -> Self {
        Self {
            name: "Crew".to_string(),
            max_steps,
            progress_label: Some("Orchestrator".to_string()),
            text_preview_chars: 120,
            input_prefix: "Execute this crew task: ".to_string(),
            empty_result: "Crew task completed.".to_string(),
            ..Default::default()
        }
    }

    /// A crew worker for one role
    pub fn worker(role: WorkerRole) -> Self {
        Self {
            name: role.display_name().to_string(),
            tools: WORKER_TOOLS.iter().map(|t| t.to_string()).collect(),
            max_steps: WORKER_MAX_STEPS,
            progress_label: Some(role.display_name().to_string()),
            empty_result: "Worker completed with no text output.".to_string(),
            ..Default::default()
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_tools(mut self, tools: Vec<String>) -> Self {
        self.tools = tools;
        self
    }
}
