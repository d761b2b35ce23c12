//! Runs a seed plan against an admin shell
//!
//! Steps run strictly in plan order. The first failure ends the run: later
//! steps are never attempted and nothing is retried.

use crate::plan::SeedPlan;
use crate::shell::{AdminShell, ShellError};
use common::{Telemetry, TelemetryEvent};
use std::time::Duration;
use thiserror::Error;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("MongoDB did not answer within {0:?}")]
    NotReady(Duration),

    #[error("Readiness probe failed: {0}")]
    Probe(#[source] ShellError),

    #[error("Step {step} ({username}@{database}) failed: {source}")]
    Step {
        /// 1-based position in the plan
        step: usize,
        username: String,
        database: String,
        #[source]
        source: ShellError,
    },
}

impl BootstrapError {
    /// Phase name reported in telemetry.
    pub fn phase(&self) -> &'static str {
        match self {
            Self::NotReady(_) | Self::Probe(_) => "wait_ready",
            Self::Step { .. } => "create_account",
        }
    }
}

/// Floor for the readiness poll interval: each ping spawns a shell.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Outcome of a successful run, in plan order.
#[derive(Debug, Default)]
pub struct BootstrapReport {
    /// Principals created on the host.
    pub created: Vec<String>,
    /// Principals a dry run rendered without creating.
    pub rendered: Vec<String>,
}

/// Poll `ping` until the host answers or `timeout` passes.
///
/// A zero timeout skips the wait entirely. A probe that cannot run at all
/// (missing shell binary) fails immediately. `interval` is raised to
/// [`MIN_POLL_INTERVAL`] when shorter.
pub async fn wait_until_ready<S: AdminShell + ?Sized>(
    shell: &S,
    timeout: Duration,
    interval: Duration,
) -> Result<(), BootstrapError> {
    if timeout.is_zero() {
        return Ok(());
    }

    let interval = interval.max(MIN_POLL_INTERVAL);

    let deadline = Instant::now() + timeout;
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        if shell.ping().await.map_err(BootstrapError::Probe)? {
            info!(attempt, "MongoDB is ready");
            return Ok(());
        }

        if Instant::now() + interval > deadline {
            return Err(BootstrapError::NotReady(timeout));
        }

        debug!(attempt, "MongoDB not ready yet");
        sleep(interval).await;
    }
}

/// Create every account of `plan`, in order, stopping at the first failure.
///
/// `AccountCreated` is sent as soon as each account exists, so a run that
/// fails on a later step still reports the accounts it did create.
pub async fn run_plan<S: AdminShell + ?Sized>(
    shell: &S,
    plan: &SeedPlan,
    telemetry: &Telemetry,
) -> Result<BootstrapReport, BootstrapError> {
    let mut report = BootstrapReport::default();

    for (index, step) in plan.accounts.iter().enumerate() {
        shell
            .create_user(&step.database, &step.account)
            .await
            .map_err(|source| BootstrapError::Step {
                step: index + 1,
                username: step.account.username.clone(),
                database: step.database.clone(),
                source,
            })?;

        if shell.is_dry_run() {
            report.rendered.push(step.principal());
            continue;
        }

        info!(principal = %step.principal(), "User created");
        telemetry
            .send(TelemetryEvent::AccountCreated {
                username: step.account.username.clone(),
                database: step.database.clone(),
            })
            .await;
        report.created.push(step.principal());
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::RoleBinding;
    use crate::shell::memory::MemoryShell;
    use crate::shell::{DryRun, UserInfo};

    fn telemetry() -> Telemetry {
        Telemetry::new("mongo-bootstrap", "test".to_string(), None)
    }

    #[tokio::test]
    async fn test_fresh_host_gets_both_accounts() {
        let shell = MemoryShell::new();
        let report = run_plan(&shell, &SeedPlan::builtin(), &telemetry()).await.unwrap();

        assert_eq!(report.created, vec!["admin@admin", "admin@totvs_integration"]);

        let admin = shell.users_info("admin").await.unwrap();
        assert_eq!(
            admin,
            vec![UserInfo {
                user: "admin".to_string(),
                db: "admin".to_string(),
                roles: vec![RoleBinding::new("root", "admin")],
            }]
        );

        let integration = shell.users_info("totvs_integration").await.unwrap();
        assert_eq!(
            integration,
            vec![UserInfo {
                user: "admin".to_string(),
                db: "totvs_integration".to_string(),
                roles: vec![RoleBinding::new("readWrite", "totvs_integration")],
            }]
        );
    }

    #[tokio::test]
    async fn test_second_run_fails_on_first_step() {
        let shell = MemoryShell::new();
        let plan = SeedPlan::builtin();
        run_plan(&shell, &plan, &telemetry()).await.unwrap();

        let err = run_plan(&shell, &plan, &telemetry()).await.unwrap_err();
        match &err {
            BootstrapError::Step {
                step,
                username,
                database,
                source,
            } => {
                assert_eq!(*step, 1);
                assert_eq!(username, "admin");
                assert_eq!(database, "admin");
                assert!(matches!(source, ShellError::AlreadyExists { .. }));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(err.phase(), "create_account");
        assert_eq!(shell.user_count(), 2);
    }

    #[tokio::test]
    async fn test_existing_admin_stops_before_second_step() {
        let shell = MemoryShell::new();
        shell.insert(
            "admin",
            UserInfo {
                user: "admin".to_string(),
                db: "admin".to_string(),
                roles: vec![RoleBinding::new("root", "admin")],
            },
        );

        let err = run_plan(&shell, &SeedPlan::builtin(), &telemetry()).await.unwrap_err();
        assert!(err.to_string().starts_with("Step 1 (admin@admin) failed"));
        assert_eq!(shell.attempts(), vec!["admin@admin"]);
        assert!(shell.users_info("totvs_integration").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejection_on_second_step_keeps_first() {
        let shell = MemoryShell::new().deny("totvs_integration");

        let err = run_plan(&shell, &SeedPlan::builtin(), &telemetry()).await.unwrap_err();
        assert!(matches!(
            err,
            BootstrapError::Step {
                step: 2,
                source: ShellError::Rejected { .. },
                ..
            }
        ));
        assert_eq!(
            shell.attempts(),
            vec!["admin@admin", "admin@totvs_integration"]
        );
        assert_eq!(shell.user_count(), 1);
    }

    #[tokio::test]
    async fn test_dry_run_creates_nothing() {
        let report = run_plan(&DryRun, &SeedPlan::builtin(), &telemetry())
            .await
            .unwrap();
        assert!(report.created.is_empty());
        assert_eq!(report.rendered, vec!["admin@admin", "admin@totvs_integration"]);
    }

    #[tokio::test]
    async fn test_wait_until_ready_polls() {
        let shell = MemoryShell::new().unready_for(2);
        wait_until_ready(&shell, Duration::from_secs(5), Duration::from_millis(5))
            .await
            .unwrap();
        assert_eq!(shell.pings(), 3);
    }

    #[tokio::test]
    async fn test_zero_interval_is_throttled() {
        let shell = MemoryShell::new().unready_for(u32::MAX);
        let err = wait_until_ready(&shell, Duration::from_millis(250), Duration::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, BootstrapError::NotReady(_)));
        // 0ms, ~100ms, ~200ms; a zero interval would spin hundreds of times.
        assert!(shell.pings() <= 4, "pinged {} times", shell.pings());
    }

    #[tokio::test]
    async fn test_wait_until_ready_times_out() {
        let shell = MemoryShell::new().unready_for(u32::MAX);
        let err = wait_until_ready(&shell, Duration::from_millis(150), Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(matches!(err, BootstrapError::NotReady(_)));
        assert_eq!(err.phase(), "wait_ready");
    }

    #[tokio::test]
    async fn test_zero_timeout_skips_wait() {
        let shell = MemoryShell::new().unready_for(u32::MAX);
        wait_until_ready(&shell, Duration::ZERO, Duration::from_secs(1))
            .await
            .unwrap();
    }
}
