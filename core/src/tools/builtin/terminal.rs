//! Shell command tool

use crate::error::Result;
use crate::tools::utils::{execute_command, is_blocked_command, truncate_middle, CommandOptions};
use crate::tools::{Tool, ToolCall, ToolResult};
use async_trait::async_trait;
use serde_json::json;

/// Output longer than this is cut down to its head and tail
pub(crate) const OUTPUT_LIMIT: usize = 8000;
pub(crate) const OUTPUT_HEAD: usize = 4000;
pub(crate) const OUTPUT_TAIL: usize = 2000;

/// Runs shell commands, refusing obviously destructive ones
#[derive(Debug, Clone, Default)]
pub struct TerminalTool {
    options: CommandOptions,
}

impl TerminalTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CommandOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl Tool for TerminalTool {
    fn name(&self) -> &str {
        "terminal"
    }

    fn description(&self) -> &str {
        "Execute a shell command and return output. Use for running pentest tools like nmap, \
         nikto, gobuster, curl, etc. Only use on authorized targets."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "Shell command to execute"
                }
            },
            "required": ["command"]
        })
    }

    async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let command: String = call.get_parameter("command")?;

        if is_blocked_command(&command) {
            tracing::warn!(%command, "blocked command refused");
            return Ok(ToolResult::error(&call.id, "Command blocked for safety reasons."));
        }

        let result = match execute_command(&command, self.options.clone()).await {
            Ok(result) => result,
            Err(e) => return Ok(ToolResult::error(&call.id, e.to_string())),
        };

        if result.timed_out {
            return Ok(ToolResult::error(
                &call.id,
                format!("Command timed out after {}s", self.options.timeout_seconds),
            ));
        }

        let mut output = result.stdout;
        if !result.stderr.is_empty() {
            output.push_str(&format!("\n[stderr] {}", result.stderr));
        }
        let output = truncate_middle(
            &output,
            OUTPUT_LIMIT,
            OUTPUT_HEAD,
            OUTPUT_TAIL,
            "\n\n... [truncated] ...\n\n",
        );

        Ok(ToolResult::success(
            &call.id,
            json!({
                "command": command,
                "exit_code": result.exit_code,
                "output": if output.is_empty() { "(no output)".to_string() } else { output },
            }),
        ))
    }
}
