//! One bootstrap run: load the plan, wait for the host, create the accounts
//!
//! Every outcome is reported through telemetry; the binary only maps the
//! result to an exit status.

use crate::config::BootstrapConfig;
use crate::plan::{PlanError, SeedPlan};
use crate::runner::{run_plan, wait_until_ready, BootstrapError, BootstrapReport};
use crate::shell::AdminShell;
use common::{Telemetry, TelemetryEvent};
use thiserror::Error;
use tokio::time::Instant;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
}

impl RunError {
    /// Phase name reported in telemetry.
    pub fn phase(&self) -> &'static str {
        match self {
            Self::Plan(_) => "load_plan",
            Self::Bootstrap(e) => e.phase(),
        }
    }
}

/// Event sent when a run stops.
pub fn failure_event(phase: &str, error: &str) -> TelemetryEvent {
    TelemetryEvent::BootstrapFailed {
        phase: phase.to_string(),
        error: error.to_string(),
    }
}

/// Log a failure and send `BootstrapFailed` for it.
pub async fn report_failure(telemetry: &Telemetry, phase: &str, error: &str) {
    error!(phase, error, "Bootstrap failed");
    telemetry.send(failure_event(phase, error)).await;
}

async fn execute<S: AdminShell + ?Sized>(
    shell: &S,
    config: &BootstrapConfig,
    telemetry: &Telemetry,
) -> Result<BootstrapReport, RunError> {
    let plan = SeedPlan::load(config.plan_path.as_deref())?;

    for (a, b) in plan.shared_passwords() {
        warn!(
            first = %plan.accounts[a].principal(),
            second = %plan.accounts[b].principal(),
            "Accounts share the same password"
        );
    }

    info!(
        host = %config.connection.host,
        port = config.connection.port,
        plan = config.plan_path.as_deref().unwrap_or("builtin"),
        "Bootstrap starting"
    );

    telemetry
        .send(TelemetryEvent::BootstrapStarted {
            accounts: plan.len(),
            dry_run: shell.is_dry_run(),
        })
        .await;

    wait_until_ready(shell, config.wait_timeout, config.wait_interval).await?;
    Ok(run_plan(shell, &plan, telemetry).await?)
}

/// Run the bootstrap against `shell` and report the outcome.
pub async fn run<S: AdminShell + ?Sized>(
    shell: &S,
    config: &BootstrapConfig,
    telemetry: &Telemetry,
) -> Result<BootstrapReport, RunError> {
    let start = Instant::now();

    match execute(shell, config, telemetry).await {
        Ok(report) => {
            let duration_ms = start.elapsed().as_millis() as u64;
            telemetry
                .send(TelemetryEvent::BootstrapCompleted {
                    duration_ms,
                    users_created: report.created.clone(),
                })
                .await;
            info!(duration_ms, "Bootstrap completed");
            Ok(report)
        }
        Err(e) => {
            report_failure(telemetry, e.phase(), &e.to_string()).await;
            Err(e)
        }
    }
}
