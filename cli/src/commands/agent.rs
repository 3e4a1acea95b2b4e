//! One-shot autonomous agent

use super::{connect, open_session, print_execution, progress_printer, run_interruptible};
use crate::config::RawConfig;
use crate::output;
use anyhow::Result;

pub async fn agent_command(config: RawConfig, task: &str) -> Result<()> {
    let session = open_session(&config)?;
    let llm = connect(&config)?;

    println!("{}", output::heading(&format!("Agent mode: {}", task)));
    println!("{}\n", output::warn("Press Ctrl+C to stop"));

    let mut agent = session.autonomous(llm, task).await?;
    let execution = run_interruptible(&mut agent, task, &progress_printer()).await?;
    print_execution(&execution);
    Ok(())
}
