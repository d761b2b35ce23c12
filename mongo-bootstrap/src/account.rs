//! Account records handed to the database host

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named role granted on a specific database.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleBinding {
    pub role: String,
    pub db: String,
}

impl RoleBinding {
    pub fn new(role: &str, db: &str) -> Self {
        Self {
            role: role.to_string(),
            db: db.to_string(),
        }
    }
}

impl fmt::Display for RoleBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.role, self.db)
    }
}

/// Credentials and role bindings for one principal.
///
/// `Debug` never prints the password.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct AccountRecord {
    #[serde(alias = "user")]
    pub username: String,
    #[serde(alias = "pwd")]
    pub password: String,
    pub roles: Vec<RoleBinding>,
}

impl AccountRecord {
    pub fn new(username: &str, password: &str, roles: Vec<RoleBinding>) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            roles,
        }
    }

    /// Qualified principal name, `user@database`.
    ///
    /// The same username on two databases names two different principals.
    pub fn principal(&self, database: &str) -> String {
        format!("{}@{}", self.username, database)
    }
}

impl fmt::Debug for AccountRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountRecord")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("roles", &self.roles)
            .finish()
    }
}
