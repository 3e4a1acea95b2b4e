use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// `pentrex` isolated from the caller's config, keys and notes
fn pentrex(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pentrex").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("ANTHROPIC_API_KEY")
        .env_remove("ANTHROPIC_BASE_URL")
        .env_remove("PENTREX_MODEL")
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", dir.path().join("xdg"))
        .env("NO_COLOR", "1");
    cmd
}

const NOTES: &str = r#"[
  {"id": 1, "content": "ssh open on 22", "category": "recon", "target": "10.0.0.5", "timestamp": "2025-03-01T14:30:05Z"},
  {"id": 2, "content": "outdated openssh", "category": "vulnerability", "target": "10.0.0.5", "timestamp": "2025-03-01T14:35:00Z"}
]"#;

#[test]
fn tools_lists_every_builtin() {
    let dir = TempDir::new().unwrap();
    pentrex(&dir)
        .arg("tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("nmap_scan"))
        .stdout(predicate::str::contains("get_quiz_question"))
        .stdout(predicate::str::contains("list_scenarios"));
}

#[test]
fn playbooks_are_listed() {
    let dir = TempDir::new().unwrap();
    pentrex(&dir)
        .arg("playbooks")
        .assert()
        .success()
        .stdout(predicate::str::contains("web_recon"))
        .stdout(predicate::str::contains("web_vuln"));
}

#[test]
fn playbook_without_target_fails_before_needing_a_key() {
    let dir = TempDir::new().unwrap();
    pentrex(&dir)
        .args(["playbook", "web_recon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("a target is required"));

    pentrex(&dir)
        .args(["playbook", "nope", "-t", "example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown playbook: nope"));
}

#[test]
fn agent_requires_api_key() {
    let dir = TempDir::new().unwrap();
    pentrex(&dir)
        .args(["agent", "scan the network"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No API key found"));
}

#[test]
fn learn_is_offline() {
    let dir = TempDir::new().unwrap();
    pentrex(&dir)
        .args(["learn", "explain", "sql injection"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SQL Injection"))
        .stdout(predicate::str::contains("Defenses"));

    pentrex(&dir)
        .args(["learn", "tool", "nmap"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Common Flags"))
        .stdout(predicate::str::contains("-sV"));

    pentrex(&dir)
        .args(["learn", "scenario", "web_sql_injection"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SQL Injection on Login Form"))
        .stdout(predicate::str::contains("Lessons"));

    pentrex(&dir)
        .args(["learn", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Quiz domains (21 questions):"))
        .stdout(predicate::str::contains("cryptography (3)"));
}

#[test]
fn unknown_topic_lists_available() {
    let dir = TempDir::new().unwrap();
    pentrex(&dir)
        .args(["learn", "explain", "quantum tunneling"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No explanation for 'quantum tunneling'."))
        .stdout(predicate::str::contains("buffer_overflow"));
}

#[test]
fn empty_notes_and_report() {
    let dir = TempDir::new().unwrap();
    pentrex(&dir)
        .arg("notes")
        .assert()
        .success()
        .stdout(predicate::str::contains("No notes saved yet."));

    pentrex(&dir)
        .arg("report")
        .assert()
        .success()
        .stdout(predicate::str::contains("No findings to report."));
    assert!(!dir.path().join("loot").exists());
}

#[test]
fn notes_and_report_from_saved_findings() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("loot")).unwrap();
    std::fs::write(dir.path().join("loot").join("notes.json"), NOTES).unwrap();

    pentrex(&dir)
        .args(["notes", "--category", "vulnerability"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved Findings (1):"))
        .stdout(predicate::str::contains("outdated openssh"))
        .stdout(predicate::str::contains("ssh open on 22").not());

    pentrex(&dir)
        .args(["report", "--output-dir", "reports"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Report saved:"));

    let report_dir = dir.path().join("reports");
    let reports: Vec<_> = std::fs::read_dir(&report_dir).unwrap().collect();
    assert_eq!(reports.len(), 1);
    let report = std::fs::read_to_string(reports[0].as_ref().unwrap().path()).unwrap();
    assert!(report.starts_with("# Penetration Test Report"));
    assert!(report.contains("### [2025-03-01T14:35] 10.0.0.5"));
}

#[test]
fn notes_file_flag_and_config_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("findings.json"), NOTES).unwrap();
    std::fs::write(
        dir.path().join("pentrex.json"),
        r#"{"notes_file": "findings.json", "target": "10.0.0.5"}"#,
    )
    .unwrap();

    pentrex(&dir)
        .arg("notes")
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved Findings (2):"));

    pentrex(&dir)
        .args(["notes", "--notes-file", "missing.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No notes saved yet."));
}
