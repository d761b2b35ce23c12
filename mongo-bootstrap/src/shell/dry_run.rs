//! Shell that renders scripts without running them

use super::{script, AdminShell, ShellError, UserInfo};
use crate::account::AccountRecord;
use async_trait::async_trait;
use tracing::info;

/// Logs what would be sent to the host and reports success.
pub struct DryRun;

#[async_trait]
impl AdminShell for DryRun {
    async fn ping(&self) -> Result<bool, ShellError> {
        Ok(true)
    }

    async fn create_user(
        &self,
        database: &str,
        account: &AccountRecord,
    ) -> Result<(), ShellError> {
        info!(
            database,
            username = %account.username,
            script = %script::create_user_redacted(database, account),
            "Dry run: would create user"
        );
        Ok(())
    }

    async fn users_info(&self, _database: &str) -> Result<Vec<UserInfo>, ShellError> {
        Ok(Vec::new())
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}
