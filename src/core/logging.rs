//! Tracing subscriber setup.

use crate::core::config::LoggingConfig;
use crate::core::{Result, RollstatError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable overriding the configured log level.
pub const LOG_LEVEL_ENV: &str = "ROLLSTAT_LOG_LEVEL";

/// Build the filter for the given configuration.
///
/// `RUST_LOG` wins over [`LOG_LEVEL_ENV`], which wins over the config file.
pub fn filter_for(config: &LoggingConfig) -> EnvFilter {
    let level = std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| config.level.as_str().to_string());

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install a global tracing subscriber.
///
/// Fails if a global subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = filter_for(config);

    let fmt_layer = if config.structured {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_line_number(true)
            .compact()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .compact()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| RollstatError::config(format!("Failed to initialize logging: {}", e)))?;

    Ok(())
}
