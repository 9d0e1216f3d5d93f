//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the logging subsystem for the CLI
//! - Configure log level from flags and environment
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Explicit level flag wins over `RUST_LOG`
//! - Logs go to stderr so results on stdout stay machine-readable

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither a flag nor `RUST_LOG` is given.
pub const DEFAULT_FILTER: &str = "gateway_playground=info";

/// Build the filter: explicit level first, then `RUST_LOG`, then the default.
pub fn env_filter(level: Option<&str>) -> EnvFilter {
    match level {
        Some(level) => EnvFilter::new(format!("gateway_playground={}", level)),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()),
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(level: Option<&str>) {
    let result = tracing_subscriber::registry()
        .with(env_filter(level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();

    if result.is_ok() {
        tracing::debug!(filter = ?level, "Logging initialized");
    }
}
