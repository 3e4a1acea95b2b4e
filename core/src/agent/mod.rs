//! Agent core logic and execution engine

pub mod base;
pub mod config;
pub mod core;
pub mod crew;
pub mod execution;
pub mod prompt;
pub mod roles;

pub use base::{Agent, AgentResult};
pub use config::{AgentConfig, LoopMode, BUDGET_EXHAUSTED_MESSAGE};
pub use self::core::AgentCore;
pub use crew::{Crew, DelegateTool, DELEGATION_OUTPUT_LIMIT};
pub use execution::{AgentExecution, CancellationFlag, LoopStatus, StepCallback};
pub use prompt::PromptBuilder;
pub use roles::WorkerRole;
