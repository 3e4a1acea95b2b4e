//! Helpers shared by the built-in tools

pub mod run;
pub mod text;

pub use run::{execute_command, is_blocked_command, CommandOptions, CommandResult};
pub use text::{normalize_key, truncate_chars, truncate_middle};
