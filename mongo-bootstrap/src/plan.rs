//! Seed plan: which accounts to create, on which database, in which order
//!
//! The built-in plan seeds the integration service's MongoDB. A YAML file named
//! by `MONGO_BOOTSTRAP_PLAN` replaces it wholesale.

use crate::account::{AccountRecord, RoleBinding};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ADMIN_DATABASE: &str = "admin";
pub const INTEGRATION_DATABASE: &str = "totvs_integration";
pub const BOOTSTRAP_USERNAME: &str = "admin";
pub const BOOTSTRAP_PASSWORD: &str = "totvs123456789";
pub const ROOT_ROLE: &str = "root";
pub const READ_WRITE_ROLE: &str = "readWrite";

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Failed to read plan file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse plan: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// One account creation: the database context it runs against and the record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedStep {
    pub database: String,
    #[serde(flatten)]
    pub account: AccountRecord,
}

impl SeedStep {
    pub fn new(database: &str, account: AccountRecord) -> Self {
        Self {
            database: database.to_string(),
            account,
        }
    }

    pub fn principal(&self) -> String {
        self.account.principal(&self.database)
    }
}

/// Ordered list of account creations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedPlan {
    pub accounts: Vec<SeedStep>,
}

impl SeedPlan {
    /// The two bootstrap accounts: `root` on `admin`, then `readWrite` on
    /// `totvs_integration`.
    pub fn builtin() -> Self {
        Self {
            accounts: vec![
                SeedStep::new(
                    ADMIN_DATABASE,
                    AccountRecord::new(
                        BOOTSTRAP_USERNAME,
                        BOOTSTRAP_PASSWORD,
                        vec![RoleBinding::new(ROOT_ROLE, ADMIN_DATABASE)],
                    ),
                ),
                SeedStep::new(
                    INTEGRATION_DATABASE,
                    AccountRecord::new(
                        BOOTSTRAP_USERNAME,
                        BOOTSTRAP_PASSWORD,
                        vec![RoleBinding::new(READ_WRITE_ROLE, INTEGRATION_DATABASE)],
                    ),
                ),
            ],
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, PlanError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, PlanError> {
        let content = std::fs::read_to_string(path).map_err(|source| PlanError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Plan file if one is configured, built-in plan otherwise.
    pub fn load(path: Option<&str>) -> Result<Self, PlanError> {
        match path {
            Some(path) => Self::from_file(Path::new(path)),
            None => Ok(Self::builtin()),
        }
    }

    /// Index pairs of steps whose accounts use the same password.
    pub fn shared_passwords(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, a) in self.accounts.iter().enumerate() {
            for (j, b) in self.accounts.iter().enumerate().skip(i + 1) {
                if a.account.password == b.account.password {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
