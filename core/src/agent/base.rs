//! Base agent trait

use super::execution::{AgentExecution, CancellationFlag, StepCallback};
use crate::error::Result;
use async_trait::async_trait;

/// Result type for agent operations
pub type AgentResult<T> = Result<T>;

/// What callers can do with any runnable agent
#[async_trait]
pub trait Agent: Send {
    /// Run one task or chat message to completion
    async fn run(&mut self, input: &str, on_step: Option<&StepCallback>) -> AgentResult<AgentExecution>;

    /// Handle that stops the agent from another task
    fn cancel_flag(&self) -> CancellationFlag;

    /// Ask the current run to stop at its next iteration boundary
    fn stop(&self) {
        self.cancel_flag().cancel();
    }

    /// Get the agent's name
    fn agent_type(&self) -> &str;
}
