//! `mongosh` driven as a child process

use super::{classify_rejection, script, AdminShell, ShellError, UserInfo};
use crate::account::AccountRecord;
use crate::config::ConnectionConfig;
use async_trait::async_trait;
use common::command::{run_checked, run_with_stdin, CommandOutput};
use tracing::{debug, info};

/// Runs each command as `mongosh --quiet --host H --port P` with the script
/// on stdin.
///
/// Passwords (account and connect-as) only ever travel through stdin. The
/// script is wrapped by [`script::program`], so a failed `createUser` exits 1.
pub struct Mongosh {
    bin: String,
    connection: ConnectionConfig,
}

impl Mongosh {
    pub fn new(bin: &str, connection: ConnectionConfig) -> Self {
        Self {
            bin: bin.to_string(),
            connection,
        }
    }

    fn args(&self) -> Vec<String> {
        vec![
            "--quiet".to_string(),
            "--host".to_string(),
            self.connection.host.clone(),
            "--port".to_string(),
            self.connection.port.to_string(),
        ]
    }

    /// `mongosh --version`, for the startup log.
    pub async fn version(&self) -> Result<String, ShellError> {
        run_checked(&self.bin, &["--version"])
            .await
            .map_err(|e| ShellError::Spawn(format!("{:#}", e)))
    }

    async fn eval(&self, body: &str) -> Result<CommandOutput, ShellError> {
        let args = self.args();
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let program = script::program(body, self.connection.auth.as_ref());
        run_with_stdin(&self.bin, &args, &program)
            .await
            .map_err(|e| ShellError::Spawn(format!("{:#}", e)))
    }
}

/// Both streams: the wrapped program prints the error on stdout, while
/// mongosh itself reports connection failures and warnings on stderr.
fn failure_message(output: &CommandOutput) -> String {
    let message = [output.stdout.as_str(), output.stderr.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("; ");
    format!("{} (exit {})", message, output.code_display())
}

fn last_line(stdout: &str) -> Option<&str> {
    stdout.lines().map(str::trim).filter(|l| !l.is_empty()).last()
}

#[async_trait]
impl AdminShell for Mongosh {
    async fn ping(&self) -> Result<bool, ShellError> {
        let output = self.eval(script::PING_SCRIPT).await?;
        if !output.success {
            debug!(error = %failure_message(&output), "Ping failed");
        }
        Ok(output.success && last_line(&output.stdout) == Some("1"))
    }

    async fn create_user(
        &self,
        database: &str,
        account: &AccountRecord,
    ) -> Result<(), ShellError> {
        info!(database, username = %account.username, "Creating user");

        let output = self.eval(&script::create_user(database, account)).await?;
        if output.success {
            Ok(())
        } else {
            Err(classify_rejection(
                database,
                &account.username,
                &failure_message(&output),
            ))
        }
    }

    async fn users_info(&self, database: &str) -> Result<Vec<UserInfo>, ShellError> {
        let output = self.eval(&script::users_info(database)).await?;
        if !output.success {
            return Err(ShellError::Rejected {
                database: database.to_string(),
                message: failure_message(&output),
            });
        }

        // Startup warnings may precede the JSON line.
        let line = last_line(&output.stdout)
            .ok_or_else(|| ShellError::Output("empty usersInfo output".to_string()))?;
        serde_json::from_str(line).map_err(|e| ShellError::Output(format!("{}: {}", e, line)))
    }
}
