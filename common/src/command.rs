//! Command execution utilities
//!
//! Runs external tools (mongosh) with consistent error handling and logging.

use anyhow::{anyhow, Context, Result};
use std::process::{Output, Stdio};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Result of a command execution.
#[derive(Debug)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl CommandOutput {
    /// Exit code as text, or "signal" if the process was killed.
    pub fn code_display(&self) -> String {
        self.code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string())
    }
}

/// Run a command and return its output.
///
/// Arguments are not logged: they may carry credentials.
/// Use `run_checked` if you want to treat non-zero exit as an error.
#[instrument(skip_all, fields(cmd = %cmd))]
pub async fn run(cmd: &str, args: &[&str]) -> Result<CommandOutput> {
    debug!(argc = args.len(), "Running command");

    let output = Command::new(cmd)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await
        .context(format!("Failed to execute {}", cmd))?;

    Ok(output.into())
}

/// Run a command, writing `input` to its stdin.
///
/// Use this for anything carrying secrets: arguments are visible to every
/// process on the host, stdin is not.
#[instrument(skip_all, fields(cmd = %cmd))]
pub async fn run_with_stdin(cmd: &str, args: &[&str], input: &str) -> Result<CommandOutput> {
    debug!(argc = args.len(), input_len = input.len(), "Running command with stdin");

    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .context(format!("Failed to spawn {}", cmd))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(input.as_bytes())
            .await
            .context(format!("Failed to write stdin of {}", cmd))?;
        // Dropping stdin closes the pipe so the child sees EOF.
    }

    let output = child
        .wait_with_output()
        .await
        .context(format!("Failed to wait for {}", cmd))?;

    Ok(output.into())
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Run a command and return stdout if successful, error otherwise.
///
/// # Example
/// ```ignore
/// let version = run_checked("mongosh", &["--version"]).await?;
/// ```
pub async fn run_checked(cmd: &str, args: &[&str]) -> Result<String> {
    let output = run(cmd, args).await?;
    if output.success {
        Ok(output.stdout)
    } else {
        Err(anyhow!(
            "{} failed (exit {}): {}",
            cmd,
            output.code_display(),
            output.stderr
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_captures_streams_and_code() {
        let output = run("sh", &["-c", "echo out; echo err >&2; exit 3"])
            .await
            .unwrap();
        assert_eq!(output.stdout, "out");
        assert_eq!(output.stderr, "err");
        assert!(!output.success);
        assert_eq!(output.code, Some(3));
        assert_eq!(output.code_display(), "3");
    }

    #[tokio::test]
    async fn test_run_checked_error_includes_stderr() {
        let err = run_checked("sh", &["-c", "echo boom >&2; exit 1"])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "sh failed (exit 1): boom");
    }

    #[tokio::test]
    async fn test_run_with_stdin_keeps_input_out_of_argv() {
        let output = run_with_stdin("sh", &["-c", "cat; echo; echo \"argv=$*\""], "s3cret")
            .await
            .unwrap();
        assert!(output.success);
        assert_eq!(output.stdout, "s3cret\nargv=");
    }

    #[tokio::test]
    async fn test_run_with_stdin_reports_failure() {
        let output = run_with_stdin("sh", &["-c", "cat >/dev/null; echo bad >&2; exit 2"], "x")
            .await
            .unwrap();
        assert!(!output.success);
        assert_eq!(output.stderr, "bad");
        assert_eq!(output.code, Some(2));
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let err = run("/nonexistent/mongosh", &[]).await.unwrap_err();
        assert!(err.to_string().contains("Failed to execute /nonexistent/mongosh"));

        let err = run_with_stdin("/nonexistent/mongosh", &[], "").await.unwrap_err();
        assert!(err.to_string().contains("Failed to spawn /nonexistent/mongosh"));
    }
}
