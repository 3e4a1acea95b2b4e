//! Saved findings

use super::open_session;
use crate::config::RawConfig;
use crate::output;
use anyhow::Result;
use colored::Colorize;
use pentrex_core::tools::utils::truncate_chars;
use pentrex_core::{Note, NoteFilter, Session};

/// Notes shown by the chat `/notes` command
const CHAT_NOTES_LIMIT: usize = 15;

fn note_line(note: &Note, width: Option<usize>) -> String {
    let content = match width {
        Some(width) => truncate_chars(&note.content, width),
        None => note.content.clone(),
    };
    format!(
        "    {} {} {} {}",
        format!("#{}", note.id).dimmed(),
        format!("[{}]", note.category).cyan(),
        note.target.dimmed(),
        content
    )
}

pub(crate) async fn print_notes(session: &Session, filter: &NoteFilter, width: Option<usize>) -> Result<()> {
    let total = session.notes().count(filter).await?;
    if total == 0 {
        println!("{}", output::warn("No notes saved yet."));
        return Ok(());
    }

    println!("{}", output::heading(&format!("Saved Findings ({}):", total)));
    for note in session.notes().query(filter).await? {
        println!("{}", note_line(&note, width));
    }
    Ok(())
}

/// Last findings for the chat view
pub(crate) async fn print_recent_notes(session: &Session) -> Result<()> {
    let filter = NoteFilter {
        limit: Some(CHAT_NOTES_LIMIT),
        ..Default::default()
    };
    print_notes(session, &filter, Some(80)).await
}

pub async fn notes_command(config: RawConfig, category: Option<String>) -> Result<()> {
    let session = open_session(&config)?;
    let filter = NoteFilter {
        category,
        target: session.config().target.clone(),
        limit: None,
    };
    print_notes(&session, &filter, None).await
}
