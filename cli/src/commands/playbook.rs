//! Playbook listing and execution

use super::{connect, open_session, print_execution, progress_printer, run_interruptible};
use crate::config::RawConfig;
use crate::output;
use anyhow::Result;
use pentrex_core::{playbooks, Session};

pub(crate) fn print_playbooks(session: &Session) {
    println!("{}", output::heading("Available Playbooks:"));
    for (name, description) in playbooks::list(session.knowledge()) {
        println!("{}", output::bullet(&format!("{} - {}", name, description)));
    }
}

pub fn playbooks_command(config: RawConfig) -> Result<()> {
    print_playbooks(&open_session(&config)?);
    Ok(())
}

pub async fn playbook_command(config: RawConfig, name: &str) -> Result<()> {
    let session = open_session(&config)?;
    let task = session.playbook_task(name)?;
    let llm = connect(&config)?;

    println!("{}", output::heading(&format!("Running playbook: {}", name)));
    println!("{}\n", output::warn("Press Ctrl+C to stop"));

    let mut agent = session.autonomous(llm, &task).await?;
    let execution = run_interruptible(&mut agent, &task, &progress_printer()).await?;
    print_execution(&execution);
    Ok(())
}
