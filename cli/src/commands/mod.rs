//! CLI command implementations

pub mod agent;
pub mod chat;
pub mod crew;
pub mod learn;
pub mod notes;
pub mod playbook;
pub mod report;
pub mod tools;

pub use agent::agent_command;
pub use chat::chat_command;
pub use crew::crew_command;
pub use learn::learn_command;
pub use notes::notes_command;
pub use playbook::{playbook_command, playbooks_command};
pub use report::report_command;
pub use tools::tools_command;

use crate::config::RawConfig;
use crate::output;
use anyhow::{Context, Result};
use colored::Colorize;
use pentrex_core::{create_client, Agent, AgentExecution, LlmClient, Session, StepCallback};
use std::sync::Arc;

/// Session over the configured notes file; no API key needed
pub(crate) fn open_session(config: &RawConfig) -> Result<Session> {
    Session::new(config.session_config()).context("Failed to initialize session")
}

/// Model client for commands that talk to the model
pub(crate) fn connect(config: &RawConfig) -> Result<Arc<dyn LlmClient>> {
    let llm_config = config.llm_config()?;
    tracing::info!(model = %llm_config.model, protocol = llm_config.protocol.as_str(), "connecting");
    create_client(&llm_config).context("Failed to create model client")
}

/// Step callback that prints agent progress
pub(crate) fn progress_printer() -> StepCallback {
    Arc::new(|line: &str| println!("{}", output::progress_line(line)))
}

/// Run an agent until it finishes; Ctrl-C asks it to stop at the next step
pub(crate) async fn run_interruptible<A>(
    agent: &mut A,
    input: &str,
    on_step: &StepCallback,
) -> pentrex_core::Result<AgentExecution>
where
    A: Agent + ?Sized,
{
    let cancel = agent.cancel_flag();
    let run = agent.run(input, Some(on_step));
    tokio::pin!(run);

    loop {
        tokio::select! {
            result = &mut run => return result,
            _ = tokio::signal::ctrl_c() => {
                cancel.cancel();
                println!("{}", output::warn("Stopping after the current step..."));
            }
        }
    }
}

/// Print the outcome of a one-shot run
pub(crate) fn print_execution(execution: &AgentExecution) {
    println!("\n{}", output::format_reply(&execution.final_result));
    if execution.budget_exhausted() {
        println!("\n{}", output::warn("Iteration budget exhausted before the task finished."));
    }
    let summary = format!(
        "{} step(s) in {:.1}s",
        execution.steps_executed,
        execution.duration_ms as f64 / 1000.0
    );
    println!("\n  {}", summary.dimmed());
}
