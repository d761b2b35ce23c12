//! Administrative shell seam
//!
//! Everything the bootstrap asks of the database host goes through
//! [`AdminShell`]: a reachability probe, account creation on a database
//! context, and listing the accounts defined on a context.

mod dry_run;
#[cfg(test)]
pub(crate) mod memory;
mod mongosh;
pub mod script;

pub use dry_run::DryRun;
pub use mongosh::Mongosh;

use crate::account::{AccountRecord, RoleBinding};
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Failed to run shell: {0}")]
    Spawn(String),

    #[error("User {username}@{database} already exists")]
    AlreadyExists { username: String, database: String },

    #[error("Host rejected command on {database}: {message}")]
    Rejected { database: String, message: String },

    #[error("Unexpected shell output: {0}")]
    Output(String),
}

/// An account as reported by the host's `usersInfo` command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserInfo {
    pub user: String,
    pub db: String,
    #[serde(default)]
    pub roles: Vec<RoleBinding>,
}

#[async_trait]
pub trait AdminShell: Send + Sync {
    /// Ok(false) when the host does not answer; Err only when the probe itself
    /// could not run.
    async fn ping(&self) -> Result<bool, ShellError>;

    /// Select `database` and create `account` there.
    async fn create_user(&self, database: &str, account: &AccountRecord)
        -> Result<(), ShellError>;

    /// Accounts defined on `database`.
    async fn users_info(&self, database: &str) -> Result<Vec<UserInfo>, ShellError>;

    /// True when `create_user` only renders and never reaches a host.
    fn is_dry_run(&self) -> bool {
        false
    }
}

/// Map a host error message to a [`ShellError`].
pub fn classify_rejection(database: &str, username: &str, message: &str) -> ShellError {
    // MongoServerError 51003: User "name@db" already exists
    if message.contains("already exists") {
        ShellError::AlreadyExists {
            username: username.to_string(),
            database: database.to_string(),
        }
    } else {
        ShellError::Rejected {
            database: database.to_string(),
            message: message.trim().to_string(),
        }
    }
}
