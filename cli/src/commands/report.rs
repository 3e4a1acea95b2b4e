//! Report generation

use super::open_session;
use crate::config::RawConfig;
use crate::output;
use anyhow::{Context, Result};
use pentrex_core::report::{save_report, NO_FINDINGS};
use pentrex_core::Session;
use std::path::{Path, PathBuf};

/// Generate and save a report; `None` when there is nothing to report
pub(crate) async fn write_report(session: &Session, dir: &Path) -> Result<Option<PathBuf>> {
    let report = session.report().await?;
    if report == NO_FINDINGS {
        return Ok(None);
    }
    let path = save_report(dir, &report)
        .await
        .with_context(|| format!("Failed to write report to {}", dir.display()))?;
    Ok(Some(path))
}

pub async fn report_command(config: RawConfig, output_dir: Option<PathBuf>) -> Result<()> {
    let session = open_session(&config)?;
    let dir = output_dir.unwrap_or_else(|| session.config().report_dir.clone());

    match write_report(&session, &dir).await? {
        Some(path) => println!("{}", output::success(&format!("Report saved: {}", path.display()))),
        None => println!("{}", output::warn(NO_FINDINGS)),
    }
    Ok(())
}
