//! Many writers against one bucket and one window.

mod common;

use common::Fixture;
use rollstat::metrics::{Bucket, RollingEvent};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use std::thread;

const THREADS: i64 = 64;
const PER_THREAD: i64 = 10_000;

#[test]
fn test_bucket_counter_no_lost_updates() {
    let bucket = Arc::new(Bucket::<RollingEvent>::new(0));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let bucket = Arc::clone(&bucket);
            thread::spawn(move || {
                let counter = bucket.counter(RollingEvent::Success).unwrap();
                for _ in 0..PER_THREAD {
                    counter.increment();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(bucket.get(RollingEvent::Success).unwrap(), THREADS * PER_THREAD);
    // nobody touched the other slots
    assert_eq!(bucket.get(RollingEvent::Failure).unwrap(), 0);
}

#[test]
fn test_bucket_max_converges() {
    let bucket = Arc::new(Bucket::<RollingEvent>::new(0));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let bucket = Arc::clone(&bucket);
            thread::spawn(move || {
                // distinct value per thread, peak in the middle
                let value = if i == THREADS / 2 { 10_000 } else { i };
                bucket
                    .max_updater(RollingEvent::ThreadMaxActive)
                    .unwrap()
                    .update(value);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(bucket.get(RollingEvent::ThreadMaxActive).unwrap(), 10_000);
}

#[test]
fn test_window_writes_across_roll() {
    let fx = Fixture::default();

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let rolling = Arc::clone(&fx.rolling);
            let clock = Arc::clone(&fx.clock);
            thread::spawn(move || {
                for i in 0..5_000 {
                    rolling.increment(RollingEvent::Success).unwrap();
                    if t == 0 && i % 1_000 == 999 {
                        clock.advance_millis(1_000);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // five one-second advances stay well inside a ten-second window
    assert_eq!(fx.rolling.rolling_sum(RollingEvent::Success).unwrap(), 40_000);
    assert_eq!(fx.rolling.cumulative_sum(RollingEvent::Success).unwrap(), 40_000);
}

#[test]
fn test_cumulative_never_exceeds_writes_while_rolling() {
    // one bucket per millisecond, so every step of the writer rolls
    let fx = Fixture::new(10, 10);
    let written = Arc::new(AtomicI64::new(0));
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..3)
        .map(|_| {
            let rolling = Arc::clone(&fx.rolling);
            let written = Arc::clone(&written);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut overcounts = 0;
                while !done.load(Ordering::SeqCst) {
                    let seen = rolling.cumulative_sum(RollingEvent::Success).unwrap();
                    if seen > written.load(Ordering::SeqCst) {
                        overcounts += 1;
                    }
                }
                overcounts
            })
        })
        .collect();

    for _ in 0..50_000 {
        written.fetch_add(1, Ordering::SeqCst);
        fx.rolling.increment(RollingEvent::Success).unwrap();
        fx.advance(1);
    }
    done.store(true, Ordering::SeqCst);

    for reader in readers {
        assert_eq!(reader.join().unwrap(), 0);
    }
    assert_eq!(fx.rolling.cumulative_sum(RollingEvent::Success).unwrap(), 50_000);
}
