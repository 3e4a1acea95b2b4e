//! Crew mode: an orchestrator loop that delegates subtasks to role workers

use super::base::{Agent, AgentResult};
use super::config::AgentConfig;
use super::core::AgentCore;
use super::execution::{AgentExecution, CancellationFlag, StepCallback};
use super::prompt::PromptBuilder;
use super::roles::WorkerRole;
use crate::error::Result;
use crate::llm::LlmClient;
use crate::notes::NoteStore;
use crate::tools::utils::truncate_chars;
use crate::tools::{Tool, ToolCall, ToolRegistry, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Worker output embedded in the orchestrator's conversation is cut to this many characters
pub const DELEGATION_OUTPUT_LIMIT: usize = 3000;

/// Full worker outputs keyed by role, latest delegation wins
pub type WorkerResults = Arc<Mutex<HashMap<WorkerRole, String>>>;

/// The orchestrator's delegation tool; runs a worker to completion
pub struct DelegateTool {
    llm_client: Arc<dyn LlmClient>,
    tools: Arc<ToolRegistry>,
    prompts: Arc<PromptBuilder>,
    target: String,
    worker_max_steps: usize,
    on_step: Option<StepCallback>,
    cancel: CancellationFlag,
    results: WorkerResults,
}

impl DelegateTool {
    fn emit(&self, line: String) {
        if let Some(callback) = &self.on_step {
            callback(&line);
        }
    }

    async fn run_worker(&self, role: WorkerRole, instructions: &str) -> Result<AgentExecution> {
        let config = AgentConfig::worker(role)
            .with_max_steps(self.worker_max_steps)
            .with_system_prompt(self.prompts.worker(role, &self.target)?);
        let mut worker = AgentCore::new(config, Arc::clone(&self.llm_client), Arc::clone(&self.tools))
            .with_cancel(self.cancel.clone());
        worker.run(instructions, self.on_step.as_ref()).await
    }
}

#[async_trait]
impl Tool for DelegateTool {
    fn name(&self) -> &str {
        "delegate_worker"
    }

    fn description(&self) -> &str {
        "Delegate a subtask to a specialized worker. Workers: recon, scan, vuln, exploit. \
         Give specific instructions."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "worker": {
                    "type": "string",
                    "description": "Worker to delegate to: recon, scan, vuln, exploit"
                },
                "instructions": {
                    "type": "string",
                    "description": "Specific instructions for the worker"
                }
            },
            "required": ["worker", "instructions"]
        })
    }

    async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let worker: String = call.get_parameter_or("worker", String::new());
        let instructions: String = call.get_parameter_or("instructions", String::new());

        let Some(role) = WorkerRole::parse(&worker) else {
            tracing::warn!(%worker, "orchestrator asked for an unknown worker");
            return Ok(ToolResult::error(
                &call.id,
                format!("Unknown worker: {}. Use: {}", worker, WorkerRole::valid_keys()),
            ));
        };

        self.emit(format!("[Crew] Delegating to {}...", role.display_name()));
        tracing::info!(worker = %role, "delegating subtask");

        let (status, output) = match self.run_worker(role, &instructions).await {
            Ok(execution) => (
                execution.status.as_delegation_status(),
                execution.final_result,
            ),
            Err(e) => {
                tracing::warn!(worker = %role, "worker failed: {}", e);
                ("failed", e.to_string())
            }
        };

        let truncated = truncate_chars(&output, DELEGATION_OUTPUT_LIMIT);
        self.results.lock().await.insert(role, output);

        Ok(ToolResult::success(
            &call.id,
            json!({
                "worker": role.key(),
                "status": status,
                "output": truncated,
            }),
        ))
    }
}

/// Orchestrator plus the workers it spawns
pub struct Crew {
    llm_client: Arc<dyn LlmClient>,
    tools: Arc<ToolRegistry>,
    notes: Arc<dyn NoteStore>,
    prompts: Arc<PromptBuilder>,
    target: String,
    max_iterations: usize,
    worker_max_steps: usize,
    cancel: CancellationFlag,
    results: WorkerResults,
}

impl Crew {
    /// `tools` is the full registry; workers draw their subset from it and the
    /// orchestrator only borrows `read_notes`
    pub fn new(
        llm_client: Arc<dyn LlmClient>,
        tools: Arc<ToolRegistry>,
        notes: Arc<dyn NoteStore>,
        target: impl Into<String>,
    ) -> Self {
        let defaults = crate::config::SessionConfig::default();
        Self {
            llm_client,
            tools,
            notes,
            prompts: Arc::new(PromptBuilder::new()),
            target: target.into(),
            max_iterations: defaults.max_agent_iterations,
            worker_max_steps: defaults.worker_max_steps,
            cancel: CancellationFlag::new(),
            results: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn with_limits(mut self, max_iterations: usize, worker_max_steps: usize) -> Self {
        self.max_iterations = max_iterations;
        self.worker_max_steps = worker_max_steps;
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Full outputs of the workers run by the latest `run`
    pub async fn worker_results(&self) -> HashMap<WorkerRole, String> {
        self.results.lock().await.clone()
    }

    pub async fn worker_output(&self, role: WorkerRole) -> Option<String> {
        self.results.lock().await.get(&role).cloned()
    }

    fn orchestrator_tools(&self, delegate: DelegateTool) -> Result<ToolRegistry> {
        let mut builder = ToolRegistry::builder().register(Arc::new(delegate))?;
        if let Some(read_notes) = self.tools.get("read_notes") {
            builder = builder.register(read_notes)?;
        }
        Ok(builder.build())
    }

    /// Run the orchestrator on a task
    pub async fn run(&mut self, task: &str, on_step: Option<&StepCallback>) -> Result<AgentExecution> {
        self.cancel.reset();
        self.results.lock().await.clear();

        let notes = self.notes.all().await?;
        let system_prompt = self.prompts.orchestrator(task, &self.target, &notes)?;

        let delegate = DelegateTool {
            llm_client: Arc::clone(&self.llm_client),
            tools: Arc::clone(&self.tools),
            prompts: Arc::clone(&self.prompts),
            target: self.target.clone(),
            worker_max_steps: self.worker_max_steps,
            on_step: on_step.cloned(),
            cancel: self.cancel.clone(),
            results: Arc::clone(&self.results),
        };
        let tools = Arc::new(self.orchestrator_tools(delegate)?);

        let config = AgentConfig::orchestrator(self.max_iterations).with_system_prompt(system_prompt);
        let mut orchestrator =
            AgentCore::new(config, Arc::clone(&self.llm_client), tools).with_cancel(self.cancel.clone());
        orchestrator.run(task, on_step).await
    }
}

#[async_trait]
impl Agent for Crew {
    async fn run(&mut self, input: &str, on_step: Option<&StepCallback>) -> AgentResult<AgentExecution> {
        Crew::run(self, input, on_step).await
    }

    fn cancel_flag(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    fn agent_type(&self) -> &str {
        "Crew"
    }
}
