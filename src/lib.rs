//! rollstat - rolling-window event metrics for circuit breakers.
//!
//! rollstat keeps time-bucketed counts of call outcomes (success, failure,
//! timeout, rejection, short-circuit) and running maxima (peak concurrent
//! executions) under heavy concurrent write load, so that a breaker can
//! ask "what was the error rate over the last ten seconds?".
//!
//! # Architecture
//!
//! - `metrics`: striped counters, buckets and the sliding window
//! - `core`: errors, configuration and logging setup
//!
//! # Example
//!
//! ```
//! use rollstat::core::Config;
//! use rollstat::metrics::{HealthCounts, RollingEvent, RollingNumber};
//!
//! fn main() -> rollstat::Result<()> {
//!     let config = Config::new()?;
//!     let rolling: RollingNumber = RollingNumber::new(&config.rolling)?;
//!
//!     rolling.increment(RollingEvent::Success)?;
//!     rolling.increment(RollingEvent::Timeout)?;
//!
//!     let health = HealthCounts::from_rolling(&rolling)?;
//!     assert_eq!(health.error_percentage, 50);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod core;
pub mod metrics;

// Re-export core types for convenience
pub use crate::core::{Config, Result, RollstatError};
