//! Environment variable parsing helpers
//!
//! Every component is configured from its container environment; these helpers
//! keep the defaults and parse rules in one place.

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

/// Extension trait for parsing environment variables.
///
/// Provides convenient methods for reading env vars with defaults, required values,
/// and type parsing.
pub trait ConfigExt {
    /// Get an environment variable with a default value.
    ///
    /// # Example
    /// ```ignore
    /// let host = String::env_or("MONGO_HOST", "127.0.0.1");
    /// ```
    fn env_or(name: &str, default: &str) -> String {
        env::var(name).unwrap_or_else(|_| default.to_string())
    }

    /// Get a required environment variable, returning an error if not set.
    fn env_required(name: &str) -> Result<String> {
        env::var(name).context(format!("{} must be set", name))
    }

    /// Get an environment variable, treating unset and empty the same.
    ///
    /// # Example
    /// ```ignore
    /// let plan = String::env_optional("MONGO_BOOTSTRAP_PLAN");
    /// ```
    fn env_optional(name: &str) -> Option<String> {
        env::var(name).ok().filter(|v| !v.is_empty())
    }

    /// Get an environment variable as a boolean.
    ///
    /// Returns `true` if the value is "true" or "1" (case-insensitive), `false`
    /// for any other value, and `default` when unset.
    fn env_bool(name: &str, default: bool) -> bool {
        env::var(name)
            .map(|v| {
                let v = v.trim().to_lowercase();
                v == "true" || v == "1"
            })
            .unwrap_or(default)
    }

    /// Get an environment variable parsed as a specific type.
    ///
    /// Returns `default` if the variable is not set or fails to parse.
    ///
    /// # Example
    /// ```ignore
    /// let port: u16 = u16::env_parse("MONGO_PORT", 27017);
    /// ```
    fn env_parse<T: FromStr>(name: &str, default: T) -> T {
        env::var(name)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }
}

// Blanket implementation for all types
impl<T> ConfigExt for T {}

/// Container-level environment shared by all components.
pub struct ContainerEnv;

impl ContainerEnv {
    /// Name of this node, as reported in telemetry.
    pub fn node_name() -> String {
        String::env_or("HOSTNAME", "unknown")
    }

    /// Webhook receiving telemetry events, if configured.
    pub fn telemetry_url() -> Option<String> {
        String::env_optional("BOOTSTRAP_TELEMETRY_URL")
    }
}
