//! Shared utilities for the mongo bootstrap components
//!
//! This crate provides common functionality used by every binary in the workspace:
//! - Structured logging initialization
//! - Environment variable parsing helpers
//! - Child process execution
//! - Telemetry for reporting bootstrap events

pub mod command;
pub mod config;
pub mod logging;
pub mod telemetry;

pub use command::{run, run_checked, run_with_stdin, CommandOutput};
pub use config::{ConfigExt, ContainerEnv};
pub use logging::init_logging;
pub use telemetry::{Telemetry, TelemetryEvent};
