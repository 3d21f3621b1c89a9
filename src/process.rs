// ABOUTME: Thin wrapper for running external tools (git, kubectl, docker CLI).
// ABOUTME: Captures exit status and output the way collaborators consume them.

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Output from a local command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Exit code of the command (`None` when killed by a signal).
    pub exit_code: Option<i32>,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Short description of a failed command for error messages.
    pub fn failure_summary(&self) -> String {
        let stderr = self.stderr.trim();
        match (self.exit_code, stderr.is_empty()) {
            (Some(code), true) => format!("exit code {code}"),
            (Some(code), false) => format!("exit code {code}: {stderr}"),
            (None, true) => "terminated by signal".to_string(),
            (None, false) => format!("terminated by signal: {stderr}"),
        }
    }
}

/// Run `program` with `args` and wait for it to finish.
///
/// Spawn failures (missing binary, permissions) are returned as `Err`; a
/// non-zero exit is a successful call with `success() == false`.
pub async fn run<I, S>(program: &str, args: I, cwd: Option<&Path>) -> std::io::Result<CommandOutput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    tracing::debug!(program, "running external command");
    let output = command.output().await?;

    let result = CommandOutput {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    };

    if !result.success() {
        tracing::debug!(program, exit_code = ?result.exit_code, "external command failed");
    }

    Ok(result)
}
