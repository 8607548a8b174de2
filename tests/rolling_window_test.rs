//! Sliding window behaviour driven by a mock clock.

mod common;

use common::Fixture;
use pretty_assertions::assert_eq;
use rollstat::metrics::{HealthCounts, RollingEvent};

#[test]
fn test_error_rate_over_window() {
    let fx = Fixture::default();

    for _ in 0..8 {
        fx.rolling.increment(RollingEvent::Success).unwrap();
    }
    fx.advance(1_500);
    fx.rolling.increment(RollingEvent::Failure).unwrap();
    fx.rolling.increment(RollingEvent::Timeout).unwrap();

    let health = HealthCounts::from_rolling(&fx.rolling).unwrap();
    assert_eq!(health.total_requests, 10);
    assert_eq!(health.error_percentage, 20);

    // the successes age out first
    fx.advance(9_000);
    let health = HealthCounts::from_rolling(&fx.rolling).unwrap();
    assert_eq!(health.total_requests, 2);
    assert_eq!(health.error_percentage, 100);

    fx.advance(10_000);
    let health = HealthCounts::from_rolling(&fx.rolling).unwrap();
    assert_eq!(health, HealthCounts::default());
}

#[test]
fn test_bucket_per_second() {
    let fx = Fixture::default();

    for second in 0..10 {
        fx.rolling.add(RollingEvent::Emit, second + 1).unwrap();
        fx.advance(1_000);
    }
    fx.clock.set_millis(9_999);

    assert_eq!(
        fx.rolling.values(RollingEvent::Emit).unwrap(),
        vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10]
    );
    assert_eq!(fx.rolling.rolling_sum(RollingEvent::Emit).unwrap(), 55);
}

#[test]
fn test_partial_roll_keeps_recent_buckets() {
    let fx = Fixture::default();

    fx.rolling.add(RollingEvent::BadRequest, 2).unwrap();
    fx.advance(4_000);
    fx.rolling.add(RollingEvent::BadRequest, 3).unwrap();
    fx.advance(7_000);

    // first bucket ([0s, 1s)) is gone, the one at 4s is not
    assert_eq!(fx.rolling.rolling_sum(RollingEvent::BadRequest).unwrap(), 3);
    assert_eq!(fx.rolling.cumulative_sum(RollingEvent::BadRequest).unwrap(), 5);
    assert_eq!(fx.rolling.live_buckets(), 10);
}

#[test]
fn test_peak_concurrency() {
    let fx = Fixture::default();

    for active in [1, 4, 2] {
        fx.rolling
            .record(RollingEvent::CommandMaxActive, Some(active))
            .unwrap();
    }
    fx.advance(3_000);
    fx.rolling
        .record(RollingEvent::CommandMaxActive, Some(3))
        .unwrap();

    assert_eq!(fx.rolling.rolling_max(RollingEvent::CommandMaxActive).unwrap(), 4);
    assert_eq!(
        fx.rolling
            .value_of_latest_bucket(RollingEvent::CommandMaxActive)
            .unwrap(),
        3
    );

    fx.advance(8_000);
    assert_eq!(fx.rolling.rolling_max(RollingEvent::CommandMaxActive).unwrap(), 3);
    assert_eq!(fx.rolling.cumulative_max(RollingEvent::CommandMaxActive).unwrap(), 4);
}

#[test]
fn test_reset_then_continue() {
    let fx = Fixture::default();

    fx.rolling.add(RollingEvent::Success, 10).unwrap();
    fx.rolling.reset();
    fx.rolling.add(RollingEvent::Success, 1).unwrap();

    assert_eq!(fx.rolling.rolling_sum(RollingEvent::Success).unwrap(), 1);
    assert_eq!(fx.rolling.cumulative_sum(RollingEvent::Success).unwrap(), 11);
}
