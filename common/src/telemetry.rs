//! Telemetry for reporting bootstrap events
//!
//! Every event is logged locally. When a webhook is configured, the event is
//! also POSTed there as JSON so a run can be followed from outside the container.

use crate::config::ContainerEnv;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

/// All telemetry events the bootstrap components emit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TelemetryEvent {
    /// Component started
    ComponentStarted { component: String, version: String },

    /// Seed plan is about to run
    BootstrapStarted { accounts: usize, dry_run: bool },

    /// One account was created on its database context
    AccountCreated { username: String, database: String },

    /// Every step of the plan succeeded
    BootstrapCompleted {
        duration_ms: u64,
        users_created: Vec<String>,
    },

    /// Bootstrap stopped; nothing after `phase` was attempted
    BootstrapFailed { phase: String, error: String },

    /// Every planned account was found with its planned roles
    VerifyPassed { accounts: usize },

    /// Planned accounts missing or with different roles
    VerifyFailed { mismatches: Vec<String> },
}

impl TelemetryEvent {
    /// Get the event type name used in logs and webhook payloads.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ComponentStarted { .. } => "COMPONENT_STARTED",
            Self::BootstrapStarted { .. } => "MONGO_BOOTSTRAP_STARTED",
            Self::AccountCreated { .. } => "MONGO_ACCOUNT_CREATED",
            Self::BootstrapCompleted { .. } => "MONGO_BOOTSTRAP_COMPLETED",
            Self::BootstrapFailed { .. } => "MONGO_BOOTSTRAP_FAILED",
            Self::VerifyPassed { .. } => "MONGO_VERIFY_PASSED",
            Self::VerifyFailed { .. } => "MONGO_VERIFY_FAILED",
        }
    }

    /// Convert event to a human-readable message.
    pub fn message(&self) -> String {
        match self {
            Self::ComponentStarted { component, version } => {
                format!("{} v{} started", component, version)
            }
            Self::BootstrapStarted { accounts, dry_run } => {
                format!("Bootstrap started ({} accounts, dry_run={})", accounts, dry_run)
            }
            Self::AccountCreated { username, database } => {
                format!("Created {}@{}", username, database)
            }
            Self::BootstrapCompleted {
                duration_ms,
                users_created,
            } => {
                format!(
                    "Bootstrap completed in {}ms: {}",
                    duration_ms,
                    users_created.join(", ")
                )
            }
            Self::BootstrapFailed { phase, error } => {
                format!("Bootstrap failed during {}: {}", phase, error)
            }
            Self::VerifyPassed { accounts } => {
                format!("Verified {} accounts", accounts)
            }
            Self::VerifyFailed { mismatches } => {
                format!(
                    "Verification found {} mismatches: {}",
                    mismatches.len(),
                    mismatches.join("; ")
                )
            }
        }
    }

    fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::BootstrapFailed { .. } | Self::VerifyFailed { .. }
        )
    }
}

/// Telemetry client for logging events and forwarding them to a webhook.
#[derive(Clone)]
pub struct Telemetry {
    client: Client,
    endpoint: Option<String>,
    node: String,
    component: String,
    run_id: Uuid,
}

impl Telemetry {
    /// Create a new telemetry client from environment variables.
    pub fn from_env(component: &str) -> Self {
        Self::new(component, ContainerEnv::node_name(), ContainerEnv::telemetry_url())
    }

    pub fn new(component: &str, node: String, endpoint: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            endpoint,
            node,
            component: component.to_string(),
            run_id: Uuid::new_v4(),
        }
    }

    /// Identifier shared by every event of this process.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Build the JSON body posted to the webhook.
    pub fn payload(&self, event: &TelemetryEvent) -> Value {
        json!({
            "type": event.event_type(),
            "message": event.message(),
            "component": self.component,
            "node": self.node,
            "runId": self.run_id.to_string(),
            "timestamp": Utc::now().to_rfc3339(),
            "event": event,
        })
    }

    /// Log an event and deliver it to the webhook, if any.
    ///
    /// Delivery errors are logged but never returned: telemetry must not
    /// change the outcome of a bootstrap.
    pub async fn send(&self, event: TelemetryEvent) {
        let event_type = event.event_type();
        let message = event.message();

        if event.is_failure() {
            warn!(event = %event_type, "{}", message);
        } else {
            info!(event = %event_type, "{}", message);
        }

        let Some(endpoint) = &self.endpoint else {
            return;
        };

        match self
            .client
            .post(endpoint)
            .json(&self.payload(&event))
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => {}
            Ok(resp) => {
                warn!("Telemetry got status {}", resp.status());
            }
            Err(e) => {
                warn!("Telemetry send failed: {}", e);
            }
        }
    }
}
