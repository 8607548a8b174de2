//! Rolling error-rate snapshot for circuit-breaker decisions.

use crate::core::Result;
use crate::metrics::event::RollingEvent;
use crate::metrics::rolling::RollingNumber;
use serde::Serialize;

/// Outcomes that count towards request volume
pub const VOLUME_EVENTS: [RollingEvent; 6] = [
    RollingEvent::Success,
    RollingEvent::Failure,
    RollingEvent::Timeout,
    RollingEvent::ThreadPoolRejected,
    RollingEvent::SemaphoreRejected,
    RollingEvent::ShortCircuited,
];

/// Volume and error rate over the rolling window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HealthCounts {
    /// Requests that reached a terminal outcome
    pub total_requests: i64,
    /// Requests that did not succeed
    pub error_count: i64,
    /// `error_count` as a whole percentage of `total_requests`
    pub error_percentage: i64,
}

impl HealthCounts {
    /// Derive the error percentage, 0 when there was no traffic
    pub fn new(total_requests: i64, error_count: i64) -> Self {
        let error_percentage = if total_requests > 0 {
            error_count * 100 / total_requests
        } else {
            0
        };

        Self {
            total_requests,
            error_count,
            error_percentage,
        }
    }

    /// Snapshot the window. Buckets are read one by one, so the counts are
    /// approximate under concurrent writes.
    pub fn from_rolling(rolling: &RollingNumber<RollingEvent>) -> Result<Self> {
        let mut total = 0;
        let mut errors = 0;

        for event in VOLUME_EVENTS {
            let count = rolling.rolling_sum(event)?;
            total += count;
            if event != RollingEvent::Success {
                errors += count;
            }
        }

        Ok(Self::new(total, errors))
    }
}
