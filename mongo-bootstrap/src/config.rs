//! Bootstrap configuration from environment variables

use anyhow::{Context, Result};
use common::ConfigExt;
use std::time::Duration;

/// Credentials the shell connects with, when the server requires them.
#[derive(Clone)]
pub struct ConnectAuth {
    pub username: String,
    pub password: String,
    pub database: String,
}

/// Where the MongoDB server is.
#[derive(Clone)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub auth: Option<ConnectAuth>,
}

/// Configuration for the bootstrap and verify binaries
pub struct BootstrapConfig {
    pub connection: ConnectionConfig,
    pub mongosh_bin: String,
    pub plan_path: Option<String>,
    pub dry_run: bool,
    /// Zero skips the readiness wait.
    pub wait_timeout: Duration,
    pub wait_interval: Duration,
}

impl ConnectionConfig {
    pub fn from_env() -> Result<Self> {
        let auth = match String::env_optional("MONGO_INITDB_ROOT_USERNAME") {
            Some(username) => Some(ConnectAuth {
                username,
                password: String::env_required("MONGO_INITDB_ROOT_PASSWORD").context(
                    "MONGO_INITDB_ROOT_PASSWORD is required when MONGO_INITDB_ROOT_USERNAME is set",
                )?,
                database: String::env_or("MONGO_AUTH_DATABASE", "admin"),
            }),
            None => None,
        };

        Ok(Self {
            host: String::env_or("MONGO_HOST", "127.0.0.1"),
            port: u16::env_parse("MONGO_PORT", 27017),
            auth,
        })
    }
}

impl BootstrapConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            connection: ConnectionConfig::from_env()?,
            mongosh_bin: String::env_or("MONGOSH_BIN", "mongosh"),
            plan_path: String::env_optional("MONGO_BOOTSTRAP_PLAN"),
            dry_run: bool::env_bool("MONGO_BOOTSTRAP_DRY_RUN", false),
            wait_timeout: Duration::from_secs(u64::env_parse("MONGO_BOOTSTRAP_WAIT_TIMEOUT", 30)),
            wait_interval: Duration::from_secs(u64::env_parse("MONGO_BOOTSTRAP_WAIT_INTERVAL", 1)),
        })
    }
}
