//! Subprocess execution for the shell-backed tools

use crate::error::Result;
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tokio::time::{timeout, Duration, Instant};

/// Seconds a shell-backed tool may run before it is killed
pub const MAX_COMMAND_TIMEOUT: u64 = 120;

/// Substrings that make a command refuse to run
pub const BLOCKED_COMMANDS: [&str; 5] = [
    "rm -rf /",
    "mkfs",
    "dd if=/dev/zero",
    ":(){ :|:& };:",
    "chmod -r 777 /",
];

/// Command execution options
#[derive(Debug, Clone)]
pub struct CommandOptions {
    pub timeout_seconds: u64,
    pub shell: String,
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: MAX_COMMAND_TIMEOUT,
            shell: "sh".to_string(),
        }
    }
}

/// Command execution result
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
    pub timed_out: bool,
}

/// Run `command` through the shell, killing it when the timeout elapses
pub async fn execute_command(command: &str, options: CommandOptions) -> Result<CommandResult> {
    let start_time = Instant::now();

    let mut cmd = Command::new(&options.shell);
    cmd.arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    // Own process group, so a timeout also reaches background jobs the shell started
    #[cfg(unix)]
    cmd.process_group(0);

    let mut child = cmd.spawn()?;

    let timeout_duration = Duration::from_secs(options.timeout_seconds);
    let result = timeout(timeout_duration, collect_output(&mut child)).await;
    let duration_ms = start_time.elapsed().as_millis() as u64;

    match result {
        Ok(Ok((exit_code, stdout, stderr))) => Ok(CommandResult {
            exit_code,
            stdout,
            stderr,
            duration_ms,
            timed_out: false,
        }),
        Ok(Err(e)) => Err(e),
        Err(_) => {
            kill_process_group(&child).await;
            let _ = child.kill().await;
            tracing::warn!(command, "command timed out after {}s", timeout_duration.as_secs());

            Ok(CommandResult {
                exit_code: -1,
                stdout: String::new(),
                stderr: String::new(),
                duration_ms,
                timed_out: true,
            })
        }
    }
}

#[cfg(unix)]
async fn kill_process_group(child: &Child) {
    let Some(pid) = child.id() else {
        return;
    };
    let status = Command::new("kill")
        .args(["-KILL", "--", &format!("-{}", pid)])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;
    if let Err(e) = status {
        tracing::warn!(pid, "failed to kill process group: {}", e);
    }
}

#[cfg(not(unix))]
async fn kill_process_group(_child: &Child) {}

async fn collect_output(child: &mut Child) -> Result<(i32, String, String)> {
    let mut stdout = child.stdout.take().ok_or("Failed to capture stdout")?;
    let mut stderr = child.stderr.take().ok_or("Failed to capture stderr")?;

    let mut out = Vec::new();
    let mut err = Vec::new();
    let (out_result, err_result) = tokio::join!(
        stdout.read_to_end(&mut out),
        stderr.read_to_end(&mut err)
    );
    out_result?;
    err_result?;

    let status = child.wait().await?;
    Ok((
        status.code().unwrap_or(-1),
        String::from_utf8_lossy(&out).into_owned(),
        String::from_utf8_lossy(&err).into_owned(),
    ))
}

/// Whether the command contains one of the blocked patterns (case-insensitive)
pub fn is_blocked_command(command: &str) -> bool {
    let command_lower = command.trim().to_lowercase();
    BLOCKED_COMMANDS
        .iter()
        .any(|pattern| command_lower.contains(pattern))
}
