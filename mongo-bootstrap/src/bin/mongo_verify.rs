//! Checks a MongoDB host against the seed plan
//!
//! Exits 0 when every planned account exists with exactly its planned roles,
//! 1 otherwise.

use common::{init_logging, Telemetry, TelemetryEvent};
use mongo_bootstrap::{verify_plan, wait_until_ready, BootstrapConfig, Mongosh, SeedPlan};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    init_logging("mongo-verify");
    let telemetry = Telemetry::from_env("mongo-verify");

    let config = match BootstrapConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %format!("{:#}", e), "Failed to read configuration");
            std::process::exit(1);
        }
    };

    let plan = match SeedPlan::load(config.plan_path.as_deref()) {
        Ok(p) => p,
        Err(e) => {
            error!(error = %e, "Failed to load plan");
            std::process::exit(1);
        }
    };

    let shell = Mongosh::new(&config.mongosh_bin, config.connection.clone());

    if let Err(e) = wait_until_ready(&shell, config.wait_timeout, config.wait_interval).await {
        error!(error = %e, "MongoDB not reachable");
        std::process::exit(1);
    }

    let mismatches = match verify_plan(&shell, &plan).await {
        Ok(m) => m,
        Err(e) => {
            error!(error = %e, "Failed to list users");
            std::process::exit(1);
        }
    };

    if mismatches.is_empty() {
        telemetry
            .send(TelemetryEvent::VerifyPassed {
                accounts: plan.len(),
            })
            .await;
        info!("All planned accounts present");
        return;
    }

    for mismatch in &mismatches {
        error!(%mismatch, "Account mismatch");
    }

    telemetry
        .send(TelemetryEvent::VerifyFailed {
            mismatches: mismatches.iter().map(ToString::to_string).collect(),
        })
        .await;
    std::process::exit(1);
}
