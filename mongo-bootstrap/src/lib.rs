//! MongoDB account bootstrap
//!
//! Seeds a MongoDB instance with its administrative accounts once, at
//! container startup, by driving `mongosh`:
//! - [`plan`]: the accounts to create and the databases they live on
//! - [`shell`]: the admin shell seam and its implementations
//! - [`runner`]: ordered, fail-fast execution of a plan
//! - [`bootstrap`]: one reported run, as the binary performs it
//! - [`verify`]: checking a host against a plan

pub mod account;
pub mod bootstrap;
pub mod config;
pub mod plan;
pub mod runner;
pub mod shell;
pub mod verify;

pub use account::{AccountRecord, RoleBinding};
pub use bootstrap::RunError;
pub use config::BootstrapConfig;
pub use plan::{PlanError, SeedPlan, SeedStep};
pub use runner::{run_plan, wait_until_ready, BootstrapError, BootstrapReport, MIN_POLL_INTERVAL};
pub use shell::{AdminShell, DryRun, Mongosh, ShellError};
pub use verify::{verify_plan, Mismatch};
