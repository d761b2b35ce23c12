//! MongoDB account bootstrap
//!
//! Runs ONCE at container startup, from docker-entrypoint-initdb.d.
//! Creates the administrative accounts in plan order and exits non-zero on the
//! first rejection. Running it again against the same data fails on the first
//! account: creation is not idempotent.

use common::{init_logging, Telemetry, TelemetryEvent};
use mongo_bootstrap::bootstrap::{report_failure, run};
use mongo_bootstrap::{BootstrapConfig, DryRun, Mongosh};
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    init_logging("mongo-bootstrap");

    let telemetry = Telemetry::from_env("mongo-bootstrap");

    telemetry
        .send(TelemetryEvent::ComponentStarted {
            component: "mongo-bootstrap".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
        .await;

    let config = match BootstrapConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            report_failure(&telemetry, "read_config", &format!("{:#}", e)).await;
            std::process::exit(1);
        }
    };

    let result = if config.dry_run {
        run(&DryRun, &config, &telemetry).await
    } else {
        let shell = Mongosh::new(&config.mongosh_bin, config.connection.clone());
        match shell.version().await {
            Ok(version) => info!(%version, "Using mongosh"),
            Err(e) => warn!(error = %e, "Could not read mongosh version"),
        }
        run(&shell, &config, &telemetry).await
    };

    if result.is_err() {
        std::process::exit(1);
    }
}
