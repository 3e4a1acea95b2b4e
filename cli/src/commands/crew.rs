//! One-shot crew run

use super::{connect, open_session, print_execution, progress_printer, run_interruptible};
use crate::config::RawConfig;
use crate::output;
use anyhow::Result;
use pentrex_core::WorkerRole;

pub async fn crew_command(config: RawConfig, task: &str) -> Result<()> {
    let session = open_session(&config)?;
    let llm = connect(&config)?;

    println!("{}", output::heading(&format!("Crew mode: {}", task)));
    if !session.target().is_empty() {
        println!("{}", output::success(&format!("Target: {}", session.target())));
    }
    println!("{}\n", output::warn("Press Ctrl+C to stop"));

    let mut crew = session.crew(llm);
    let execution = run_interruptible(&mut crew, task, &progress_printer()).await?;
    print_execution(&execution);

    let results = crew.worker_results().await;
    if !results.is_empty() {
        println!("\n{}", output::heading("Workers used:"));
        for role in WorkerRole::ALL.iter().filter(|r| results.contains_key(r)) {
            println!("{}", output::bullet(role.display_name()));
        }
    }
    Ok(())
}
