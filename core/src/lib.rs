//! # Pentrex Core
//!
//! Core library for pentrex, an LLM assistant for penetration testing and
//! security training.
//!
//! It provides the tool-calling agent loop, the crew orchestrator that
//! delegates to specialized workers, the built-in security tools, the
//! embedded knowledge tables and the findings store.

pub mod agent;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod llm;
pub mod notes;
pub mod playbooks;
pub mod report;
pub mod session;
pub mod tools;

pub use agent::{
    Agent, AgentConfig, AgentCore, AgentExecution, CancellationFlag, Crew, LoopMode, LoopStatus,
    StepCallback, WorkerRole,
};
pub use config::{ModelParams, Protocol, ResolvedLlmConfig, SessionConfig};
pub use error::{Error, Result};
pub use knowledge::KnowledgeBase;
pub use llm::{create_client, LlmClient};
pub use notes::{JsonFileNoteStore, MemoryNoteStore, NewNote, Note, NoteFilter, NoteStore};
pub use session::Session;
pub use tools::{default_registry, ToolRegistry};

/// Current version of the pentrex-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing at `debug` or `warn`, unless `RUST_LOG` says otherwise
pub fn init_tracing_with_debug(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
