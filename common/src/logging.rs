//! Structured logging initialization
//!
//! Provides consistent logging initialization across all bootstrap components.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format for log lines, selected with `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// Anything other than "json" (case-insensitive) falls back to text.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }

    fn from_env() -> Self {
        std::env::var("LOG_FORMAT")
            .map(|v| Self::parse(&v))
            .unwrap_or(Self::Text)
    }
}

/// Initialize structured logging for a component.
///
/// Logs go to stderr so stdout stays free for shell output. Lines are
/// written synchronously; there is nothing to flush at exit.
///
/// # Example
/// ```ignore
/// init_logging("mongo-bootstrap");
/// info!("Starting up...");
/// ```
pub fn init_logging(component: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);

    match LogFormat::from_env() {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init(),
    }

    tracing::debug!(component, "Logging initialized");
}
