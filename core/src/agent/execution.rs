//! Agent execution result structures

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopStatus {
    /// The model answered without requesting tools
    Completed,
    /// The iteration cap was reached first
    BudgetExhausted,
    /// A stop was requested
    Stopped,
}

impl LoopStatus {
    /// Status word reported to the orchestrator for a delegated run
    pub fn as_delegation_status(&self) -> &'static str {
        match self {
            LoopStatus::Completed => "completed",
            LoopStatus::BudgetExhausted => "incomplete",
            LoopStatus::Stopped => "stopped",
        }
    }
}

/// Result of agent execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentExecution {
    pub status: LoopStatus,

    /// Final result message
    pub final_result: String,

    /// Number of model round-trips made
    pub steps_executed: usize,

    /// Total execution time in milliseconds
    pub duration_ms: u64,
}

impl AgentExecution {
    pub fn new(status: LoopStatus, final_result: String, steps_executed: usize, duration_ms: u64) -> Self {
        Self {
            status,
            final_result,
            steps_executed,
            duration_ms,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == LoopStatus::Completed
    }

    pub fn budget_exhausted(&self) -> bool {
        self.status == LoopStatus::BudgetExhausted
    }

    pub fn was_stopped(&self) -> bool {
        self.status == LoopStatus::Stopped
    }
}

/// Cooperative stop signal, polled at iteration boundaries
///
/// Clones share state, so a crew and the workers it spawns observe one flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop; calling it again has no further effect
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Progress side channel
pub type StepCallback = Arc<dyn Fn(&str) + Send + Sync>;
