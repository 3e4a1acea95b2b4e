//! Terminal output for the CLI

pub mod formatter;

pub use formatter::{
    banner, bullet, command, error, format_reply, heading, numbered, progress_line, rule, spinner,
    success, warn,
};
