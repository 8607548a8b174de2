//! Ambient plumbing shared by the metrics engine.
//!
//! Error types, configuration and logging setup live here so the
//! hot-path modules under [`crate::metrics`] stay free of I/O.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{Config, ConfigBuilder, LogLevel, LoggingConfig, RollingConfig};
pub use error::{Result, RollstatError};
