//! Tools listing command

use super::open_session;
use crate::config::RawConfig;
use crate::output;
use anyhow::Result;

/// Show available tools
pub fn tools_command(config: RawConfig) -> Result<()> {
    let session = open_session(&config)?;

    println!("{}\n", output::heading("Available Tools"));
    for spec in session.tools().list_schemas() {
        let first_line = spec.description.lines().next().unwrap_or_default();
        println!("{}", output::bullet(&spec.name));
        println!("      {}\n", first_line);
    }
    Ok(())
}
