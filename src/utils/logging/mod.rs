//! Logging setup
//!
//! One `tracing` subscriber per process, configured from [`LoggingConfig`].
//! `RUST_LOG` overrides the configured level when set.

use crate::config::LoggingConfig;
use crate::utils::error::{PlatformError, Result};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// Fails if a subscriber is already installed or the level directive does not parse.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(directive) if !directive.trim().is_empty() => EnvFilter::try_new(directive),
        _ => EnvFilter::try_new(&config.level),
    }
    .map_err(|e| PlatformError::config(format!("Invalid log level '{}': {}", config.level, e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| PlatformError::internal(format!("Failed to install logger: {}", e)))
}
