//! Colored terminal formatting

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const INDENT: &str = "  ";

pub fn banner() -> String {
    let art = r"
    ██████╗ ███████╗███╗   ██╗████████╗██████╗ ███████╗██╗  ██╗
    ██╔══██╗██╔════╝████╗  ██║╚══██╔══╝██╔══██╗██╔════╝╚██╗██╔╝
    ██████╔╝█████╗  ██╔██╗ ██║   ██║   ██████╔╝█████╗   ╚███╔╝
    ██╔═══╝ ██╔══╝  ██║╚██╗██║   ██║   ██╔══██╗██╔══╝   ██╔██╗
    ██║     ███████╗██║ ╚████║   ██║   ██║  ██║███████╗██╔╝ ██╗
    ╚═╝     ╚══════╝╚═╝  ╚═══╝   ╚═╝   ╚═╝  ╚═╝╚══════╝╚═╝  ╚═╝";
    format!(
        "{}\n\n    {}\n    {}\n",
        art.cyan().bold(),
        format!("AI Penetration Testing Agent v{}", pentrex_core::VERSION).dimmed(),
        "Type /help for commands, /quit to exit".dimmed()
    )
}

pub fn heading(text: &str) -> String {
    format!("{}{}", INDENT, text.yellow().bold())
}

pub fn bullet(text: &str) -> String {
    format!("{}  {} {}", INDENT, "►".green(), text)
}

pub fn numbered(index: usize, text: &str) -> String {
    format!("{}  {}", INDENT, format!("{}. {}", index, text).yellow())
}

pub fn command(text: &str) -> String {
    format!("{}  {}", INDENT, text.magenta())
}

pub fn success(text: &str) -> String {
    format!("{}{}", INDENT, text.green())
}

pub fn warn(text: &str) -> String {
    format!("{}{}", INDENT, text.yellow())
}

pub fn error(text: &str) -> String {
    format!("{}{}", INDENT, text.red())
}

pub fn rule() -> String {
    format!("\n{}{}\n", INDENT, "─".repeat(50).dimmed())
}

/// Agent progress line: tool calls in blue, everything else dimmed
pub fn progress_line(line: &str) -> String {
    let is_tool = line.starts_with("[tool]") || line.contains(":tool]") || line.starts_with("[Crew]");
    if is_tool {
        format!("{}  {}", INDENT, line.blue())
    } else {
        format!("{}  {}", INDENT, line.dimmed())
    }
}

fn is_numbered(line: &str) -> bool {
    let mut chars = line.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(d), Some('.' | ')')) if d.is_ascii_digit()
    )
}

/// Light markdown styling for a model reply
pub fn format_reply(text: &str) -> String {
    text.lines()
        .map(|line| {
            let stripped = line.trim();
            if stripped.starts_with('#') {
                format!("{}{}", INDENT, stripped.trim_start_matches('#').trim().cyan().bold())
            } else if stripped.len() > 2 && stripped.starts_with(['-', '*', '•', '►']) {
                let content: String = stripped.chars().skip(1).collect();
                format!("{}  {} {}", INDENT, "►".green(), content.trim())
            } else if is_numbered(stripped) {
                format!("{}  {}", INDENT, stripped.yellow())
            } else if stripped.starts_with('`') || stripped.starts_with('$') {
                format!("{}  {}", INDENT, stripped.magenta())
            } else if stripped.starts_with('[') && stripped.contains("tool]") {
                progress_line(stripped)
            } else if stripped.is_empty() {
                String::new()
            } else {
                format!("{}{}", INDENT, stripped)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Spinner shown while waiting on the model
pub fn spinner(message: &str) -> ProgressBar {
    let style = ProgressStyle::default_spinner()
        .template("  {spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    let bar = ProgressBar::new_spinner();
    bar.set_style(style);
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}
