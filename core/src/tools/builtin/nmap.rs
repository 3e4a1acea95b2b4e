//! Nmap wrapper with named scan profiles

use crate::error::Result;
use crate::tools::utils::{execute_command, truncate_middle, CommandOptions};
use crate::tools::{Tool, ToolCall, ToolResult};
use async_trait::async_trait;
use serde_json::json;

use super::terminal::{OUTPUT_HEAD, OUTPUT_LIMIT, OUTPUT_TAIL};

/// Profile name to nmap flags
pub const SCAN_PROFILES: [(&str, &str); 6] = [
    ("quick", "-sV -T4 --top-ports 100"),
    ("full", "-sV -sC -p- -T4"),
    ("stealth", "-sS -T2 -f"),
    ("udp", "-sU --top-ports 50 -T4"),
    ("vuln", "-sV --script vuln -T4"),
    ("os", "-O -sV -T4"),
];

/// Flags for a profile, falling back to `quick`
pub fn profile_flags(profile: &str) -> &'static str {
    SCAN_PROFILES
        .iter()
        .find(|(name, _)| *name == profile)
        .unwrap_or(&SCAN_PROFILES[0])
        .1
}

/// The nmap command line for a target
pub fn build_command(target: &str, profile: &str, flags: Option<&str>) -> String {
    let scan_flags = flags.unwrap_or_else(|| profile_flags(profile));
    format!("nmap {} {}", scan_flags, target)
}

#[derive(Debug, Clone, Default)]
pub struct NmapScanTool {
    options: CommandOptions,
}

impl NmapScanTool {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Tool for NmapScanTool {
    fn name(&self) -> &str {
        "nmap_scan"
    }

    fn description(&self) -> &str {
        "Run an nmap scan against a target. Profiles: quick, full, stealth, udp, vuln, os. \
         Or provide custom flags."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "target": {
                    "type": "string",
                    "description": "Target IP, hostname, or CIDR range"
                },
                "profile": {
                    "type": "string",
                    "description": "Scan profile: quick, full, stealth, udp, vuln, os. Default: quick"
                },
                "flags": {
                    "type": "string",
                    "description": "Custom nmap flags (overrides profile)"
                }
            },
            "required": ["target"]
        })
    }

    async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let target: String = call.get_parameter("target")?;
        let profile = call
            .get_optional_str("profile")
            .unwrap_or_else(|| "quick".to_string());
        let flags = call.get_optional_str("flags");

        if which::which("nmap").is_err() {
            return Ok(ToolResult::error(
                &call.id,
                "nmap not installed. Install with: sudo apt install nmap",
            ));
        }

        let command = build_command(&target, &profile, flags.as_deref());
        tracing::info!(%command, "starting nmap scan");

        let result = match execute_command(&command, self.options.clone()).await {
            Ok(result) => result,
            Err(e) => return Ok(ToolResult::error(&call.id, e.to_string())),
        };
        if result.timed_out {
            return Ok(ToolResult::error(
                &call.id,
                format!("Scan timed out after {}s", self.options.timeout_seconds),
            ));
        }

        let output = truncate_middle(
            &result.stdout,
            OUTPUT_LIMIT,
            OUTPUT_HEAD,
            OUTPUT_TAIL,
            "\n... [truncated] ...\n",
        );

        Ok(ToolResult::success(
            &call.id,
            json!({
                "command": command,
                "profile": profile,
                "output": if output.is_empty() { "(no output)".to_string() } else { output },
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_command() {
        assert_eq!(
            build_command("10.0.0.5", "vuln", None),
            "nmap -sV --script vuln -T4 10.0.0.5"
        );
        assert_eq!(
            build_command("10.0.0.5", "bogus", None),
            "nmap -sV -T4 --top-ports 100 10.0.0.5"
        );
        assert_eq!(build_command("10.0.0.0/24", "full", Some("-sn")), "nmap -sn 10.0.0.0/24");
    }

    #[tokio::test]
    async fn test_requires_target() {
        assert!(NmapScanTool::new()
            .execute(ToolCall::new("nmap_scan", json!({"profile": "quick"})))
            .await
            .is_err());
    }
}
