//! Crew worker roles

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tools every worker gets
pub const WORKER_TOOLS: [&str; 4] = ["terminal", "nmap_scan", "save_note", "read_notes"];

/// The closed set of specialists the orchestrator can delegate to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerRole {
    Recon,
    Scan,
    Vuln,
    Exploit,
}

impl WorkerRole {
    pub const ALL: [WorkerRole; 4] = [
        WorkerRole::Recon,
        WorkerRole::Scan,
        WorkerRole::Vuln,
        WorkerRole::Exploit,
    ];

    /// Parse the key the orchestrator passes to `delegate_worker`
    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.key() == key)
    }

    pub fn key(&self) -> &'static str {
        match self {
            WorkerRole::Recon => "recon",
            WorkerRole::Scan => "scan",
            WorkerRole::Vuln => "vuln",
            WorkerRole::Exploit => "exploit",
        }
    }

    /// Name used in progress lines
    pub fn display_name(&self) -> &'static str {
        match self {
            WorkerRole::Recon => "ReconWorker",
            WorkerRole::Scan => "ScanWorker",
            WorkerRole::Vuln => "VulnWorker",
            WorkerRole::Exploit => "ExploitWorker",
        }
    }

    /// Comma-separated list of valid keys
    pub fn valid_keys() -> String {
        Self::ALL
            .iter()
            .map(|r| r.key())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for WorkerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
