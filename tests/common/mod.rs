//! Common test utilities and fixtures.

#![allow(dead_code)]

use rollstat::core::RollingConfig;
use rollstat::metrics::{Clock, MockClock, RollingEvent, RollingNumber};
use std::sync::Arc;
use std::time::Duration;

/// A rolling number on a mock clock, with the clock kept for driving time.
pub struct Fixture {
    pub clock: Arc<MockClock>,
    pub rolling: Arc<RollingNumber<RollingEvent>>,
}

impl Fixture {
    /// Window of `window_ms` split into `buckets`, clock at zero
    pub fn new(window_ms: u64, buckets: usize) -> Self {
        let clock = Arc::new(MockClock::new(0));
        let config = RollingConfig::new(Duration::from_millis(window_ms), buckets).unwrap();
        let rolling =
            RollingNumber::with_clock(&config, Arc::clone(&clock) as Arc<dyn Clock>).unwrap();

        Self {
            clock,
            rolling: Arc::new(rolling),
        }
    }

    pub fn advance(&self, millis: i64) {
        self.clock.advance_millis(millis);
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new(10_000, 10)
    }
}
