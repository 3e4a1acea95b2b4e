//! Minimal configuration module for pentrex core
//!
//! Only exports pure data types. All loading logic is in CLI layer.

pub mod types;

pub use types::{
    ModelParams, Protocol, ResolvedLlmConfig, SessionConfig, DEFAULT_MAX_AGENT_ITERATIONS,
    DEFAULT_MODEL, WORKER_MAX_STEPS,
};
