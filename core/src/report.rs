//! Markdown pentest report built from saved notes

use crate::error::Result;
use crate::notes::Note;
use chrono::Utc;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Returned instead of a report when nothing has been saved
pub const NO_FINDINGS: &str = "No findings to report. Use save_note to record findings first.";

/// Categories with a detailed section, in report order
const DETAILED_CATEGORIES: [&str; 5] = ["vulnerability", "credential", "recon", "finding", "artifact"];

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Group notes by category, keeping first-seen category order
fn group(notes: &[Note]) -> Vec<(&str, Vec<&Note>)> {
    let mut order: Vec<&str> = Vec::new();
    let mut grouped: BTreeMap<&str, Vec<&Note>> = BTreeMap::new();
    for note in notes {
        let category = note.category.as_str();
        if !grouped.contains_key(category) {
            order.push(category);
        }
        grouped.entry(category).or_default().push(note);
    }
    order
        .into_iter()
        .map(|c| (c, grouped.remove(c).unwrap_or_default()))
        .collect()
}

/// Render the report; with a target, only notes for that target or for no target are included
pub fn generate_report(notes: &[Note], target: Option<&str>) -> String {
    if notes.is_empty() {
        return NO_FINDINGS.to_string();
    }

    let target = target.filter(|t| !t.is_empty());
    let notes: Vec<Note> = match target {
        Some(t) => notes
            .iter()
            .filter(|n| n.target.is_empty() || n.target.contains(t))
            .cloned()
            .collect(),
        None => notes.to_vec(),
    };
    let grouped = group(&notes);

    let mut lines = vec![
        "# Penetration Test Report".to_string(),
        String::new(),
        format!("**Target:** {}", target.unwrap_or("Multiple targets")),
        format!("**Date:** {}", Utc::now().format("%Y-%m-%d %H:%M UTC")),
        format!("**Tool:** Pentrex v{}", crate::VERSION),
        String::new(),
        "---".to_string(),
        String::new(),
        "## Executive Summary".to_string(),
        String::new(),
        format!("Total findings: {}", notes.len()),
        String::new(),
    ];

    for (category, items) in &grouped {
        lines.push(format!("- **{}**: {} finding(s)", title_case(category), items.len()));
    }
    lines.extend([String::new(), "---".to_string(), String::new()]);

    for category in DETAILED_CATEGORIES {
        let Some((_, items)) = grouped.iter().find(|(c, _)| *c == category) else {
            continue;
        };
        lines.push(format!("## {}", title_case(category)));
        lines.push(String::new());
        for note in items {
            let stamp = note.timestamp.format("%Y-%m-%dT%H:%M");
            lines.push(format!("### [{}] {}", stamp, note.target));
            lines.push(String::new());
            lines.push(note.content.clone());
            lines.push(String::new());
        }
    }

    for (category, items) in &grouped {
        if DETAILED_CATEGORIES.contains(category) {
            continue;
        }
        lines.push(format!("## {}", title_case(category)));
        lines.push(String::new());
        for note in items {
            lines.push(format!("- {}", note.content));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Write a report as `report_YYYYMMDD_HHMM.md` under `dir`
pub async fn save_report(dir: &Path, report: &str) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(format!("report_{}.md", Utc::now().format("%Y%m%d_%H%M")));
    tokio::fs::write(&path, report).await?;
    tracing::info!(path = %path.display(), "report written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn note(id: u64, category: &str, content: &str, target: &str) -> Note {
        Note {
            id,
            content: content.to_string(),
            category: category.to_string(),
            target: target.to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 3, 1, 14, 30, 5).unwrap(),
        }
    }

    #[test]
    fn test_empty_store() {
        assert_eq!(generate_report(&[], None), NO_FINDINGS);
    }

    #[test]
    fn test_sections_in_order() {
        let notes = vec![
            note(1, "recon", "port 80 open", "10.0.0.5"),
            note(2, "todo", "retest later", ""),
            note(3, "vulnerability", "outdated apache", "10.0.0.5"),
            note(4, "recon", "other host", "10.0.0.9"),
        ];
        let report = generate_report(&notes, Some("10.0.0.5"));

        assert!(report.contains("**Target:** 10.0.0.5"));
        assert!(report.contains("Total findings: 3"));
        assert!(report.contains("- **Recon**: 1 finding(s)\n- **Todo**: 1 finding(s)\n- **Vulnerability**: 1 finding(s)"));
        assert!(!report.contains("other host"));

        let vuln = report.find("## Vulnerability").unwrap();
        let recon = report.find("## Recon").unwrap();
        let todo = report.find("## Todo").unwrap();
        assert!(vuln < recon && recon < todo);
        assert!(report.contains("### [2025-03-01T14:30] 10.0.0.5\n\noutdated apache\n"));
        assert!(report.contains("## Todo\n\n- retest later\n"));
    }

    #[test]
    fn test_without_target() {
        let report = generate_report(&[note(1, "finding", "x", "")], None);
        assert!(report.contains("**Target:** Multiple targets"));
    }

    #[tokio::test]
    async fn test_save_report() {
        let dir = TempDir::new().unwrap();
        let path = save_report(&dir.path().join("loot"), "# Report").await.unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("report_") && name.ends_with(".md"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# Report");
    }
}
