//! Sliding window of metrics buckets.
//!
//! The window is a ring of at most `buckets` [`Bucket`]s, each covering
//! `window / buckets` milliseconds. Writers always land in the newest
//! bucket. When the clock passes the end of that bucket, one thread rolls
//! the ring forward: it appends fresh buckets until "now" is covered and
//! evicts the oldest ones into the [`CumulativeSum`].
//!
//! The ring itself is an immutable snapshot behind an [`ArcSwap`], so
//! readers and the write fast path never take a lock. Only the roll
//! holds the `roll_lock`, which keeps bucket creation to one per slice.

use crate::core::{Result, RollingConfig, RollstatError};
use crate::metrics::bucket::Bucket;
use crate::metrics::clock::{Clock, SystemClock};
use crate::metrics::cumulative::CumulativeSum;
use crate::metrics::event::{expect_kind, validate_registry, Aggregation, EventKind, RollingEvent};
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{fence, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Live buckets, oldest first
struct Ring<E: EventKind> {
    buckets: VecDeque<Arc<Bucket<E>>>,
}

impl<E: EventKind> Ring<E> {
    fn empty() -> Self {
        Self {
            buckets: VecDeque::new(),
        }
    }

    fn newest(&self) -> Option<&Arc<Bucket<E>>> {
        self.buckets.back()
    }
}

/// Time-bucketed event counts and maxima over a sliding window.
///
/// ```
/// use rollstat::core::RollingConfig;
/// use rollstat::metrics::{RollingEvent, RollingNumber};
///
/// let rolling: RollingNumber = RollingNumber::new(&RollingConfig::default()).unwrap();
/// rolling.increment(RollingEvent::Success).unwrap();
/// rolling.update_rolling_max(RollingEvent::CommandMaxActive, 3).unwrap();
///
/// assert_eq!(rolling.rolling_sum(RollingEvent::Success).unwrap(), 1);
/// assert_eq!(rolling.rolling_max(RollingEvent::CommandMaxActive).unwrap(), 3);
/// ```
pub struct RollingNumber<E: EventKind = RollingEvent> {
    clock: Arc<dyn Clock>,
    window_ms: i64,
    bucket_size_ms: i64,
    bucket_count: usize,
    ring: ArcSwap<Ring<E>>,
    cumulative: CumulativeSum<E>,
    roll_lock: Mutex<()>,
}

impl<E: EventKind> RollingNumber<E> {
    /// Create a rolling number driven by the system clock
    pub fn new(config: &RollingConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    /// Create a rolling number driven by `clock`.
    ///
    /// Fails if the window shape is invalid or the event registry `E` is
    /// malformed.
    pub fn with_clock(config: &RollingConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        validate_registry::<E>()?;

        tracing::debug!(
            window_ms = config.window_millis(),
            buckets = config.buckets,
            "Created rolling number"
        );

        Ok(Self {
            clock,
            window_ms: config.window_millis(),
            bucket_size_ms: config.bucket_size_millis(),
            bucket_count: config.buckets,
            ring: ArcSwap::from_pointee(Ring::empty()),
            cumulative: CumulativeSum::new(),
            roll_lock: Mutex::new(()),
        })
    }

    /// Total span of the window
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms.unsigned_abs())
    }

    /// Span of a single bucket
    pub fn bucket_size(&self) -> Duration {
        Duration::from_millis(self.bucket_size_ms.unsigned_abs())
    }

    /// Configured number of buckets
    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    /// Buckets physically present in the ring right now
    pub fn live_buckets(&self) -> usize {
        self.ring.load().buckets.len()
    }

    /// Increment a Counter-kind event by one
    pub fn increment(&self, event: E) -> Result<()> {
        self.current_bucket().counter(event)?.increment();
        Ok(())
    }

    /// Add `delta` to a Counter-kind event.
    ///
    /// Counters never decrease, so a negative `delta` fails with
    /// [`RollstatError::InvalidValue`].
    pub fn add(&self, event: E, delta: i64) -> Result<()> {
        if delta < 0 {
            return Err(RollstatError::InvalidValue {
                event: event.name(),
                value: delta,
            });
        }
        self.current_bucket().counter(event)?.add(delta);
        Ok(())
    }

    /// Submit `value` to a MaxUpdater-kind event
    pub fn update_rolling_max(&self, event: E, value: i64) -> Result<()> {
        self.current_bucket().max_updater(event)?.update(value);
        Ok(())
    }

    /// Record one occurrence of `event`, dispatched on its kind.
    ///
    /// Counter-kind events are increased by `value`, or by one when no
    /// value is given. MaxUpdater-kind events require a value.
    pub fn record(&self, event: E, value: Option<i64>) -> Result<()> {
        match event.aggregation() {
            Some(Aggregation::Counter) => self.add(event, value.unwrap_or(1)),
            Some(Aggregation::MaxUpdater) => {
                let value = value.ok_or(RollstatError::MissingValue(event.name()))?;
                self.update_rolling_max(event, value)
            },
            None => Err(RollstatError::UnknownEventType(event.name())),
        }
    }

    /// Sum of a Counter-kind event over the window
    pub fn rolling_sum(&self, event: E) -> Result<i64> {
        expect_kind(event, Aggregation::Counter)?;

        let now = self.clock.now_millis();
        self.current_bucket_at(now);

        let ring = self.ring.load();
        let mut sum = 0i64;
        for bucket in self.in_window(&ring, now) {
            sum = sum.wrapping_add(bucket.counter(event)?.sum());
        }
        Ok(sum)
    }

    /// Maximum of a MaxUpdater-kind event over the window
    pub fn rolling_max(&self, event: E) -> Result<i64> {
        expect_kind(event, Aggregation::MaxUpdater)?;

        let now = self.clock.now_millis();
        self.current_bucket_at(now);

        let ring = self.ring.load();
        let mut max = 0i64;
        for bucket in self.in_window(&ring, now) {
            max = max.max(bucket.max_updater(event)?.max());
        }
        Ok(max)
    }

    /// Per-bucket values of `event` inside the window, oldest first
    pub fn values(&self, event: E) -> Result<Vec<i64>> {
        let now = self.clock.now_millis();
        self.current_bucket_at(now);

        let ring = self.ring.load();
        self.in_window(&ring, now).map(|b| b.get(event)).collect()
    }

    /// Value of `event` in the bucket covering "now"
    pub fn value_of_latest_bucket(&self, event: E) -> Result<i64> {
        self.current_bucket().get(event)
    }

    /// All-time sum of a Counter-kind event: evicted buckets plus every
    /// bucket still in the ring
    pub fn cumulative_sum(&self, event: E) -> Result<i64> {
        expect_kind(event, Aggregation::Counter)?;
        self.current_bucket();

        let mut sum = self.cumulative.get(event)?;
        let ring = self.load_ring_after_cumulative();
        for bucket in ring.buckets.iter() {
            sum = sum.wrapping_add(bucket.counter(event)?.sum());
        }
        Ok(sum)
    }

    /// All-time maximum of a MaxUpdater-kind event
    pub fn cumulative_max(&self, event: E) -> Result<i64> {
        expect_kind(event, Aggregation::MaxUpdater)?;
        self.current_bucket();

        let mut max = self.cumulative.get(event)?;
        let ring = self.load_ring_after_cumulative();
        for bucket in ring.buckets.iter() {
            max = max.max(bucket.max_updater(event)?.max());
        }
        Ok(max)
    }

    /// Drop every live bucket. Their values survive only in the
    /// cumulative totals.
    pub fn reset(&self) {
        let _guard = self.roll_lock.lock();
        let ring = self.ring.swap(Arc::new(Ring::empty()));
        self.fold_evicted(ring.buckets.iter());
        tracing::debug!(evicted = ring.buckets.len(), "Reset rolling number");
    }

    /// The bucket covering "now", rolling the window forward if needed
    pub fn current_bucket(&self) -> Arc<Bucket<E>> {
        self.current_bucket_at(self.clock.now_millis())
    }

    fn current_bucket_at(&self, now: i64) -> Arc<Bucket<E>> {
        if let Some(newest) = self.ring.load().newest() {
            if now < newest.window_start() + self.bucket_size_ms {
                return Arc::clone(newest);
            }
        }

        // Every thread that saw a stale ring queues here; the first one
        // rolls and the rest find the fresh bucket in `roll_to`.
        let _guard = self.roll_lock.lock();
        self.roll_to(now)
    }

    /// Append buckets until one covers `now`. Caller holds `roll_lock`.
    fn roll_to(&self, now: i64) -> Arc<Bucket<E>> {
        let mut buckets = self.ring.load().buckets.clone();

        let mut evicted = Vec::new();
        let mut newest = match buckets.back() {
            Some(newest) if now < newest.window_start() + self.bucket_size_ms => {
                return Arc::clone(newest);
            },
            Some(newest) => Arc::clone(newest),
            None => {
                let bucket = Arc::new(Bucket::new(now));
                buckets.push_back(Arc::clone(&bucket));
                self.ring.store(Arc::new(Ring { buckets }));
                tracing::trace!(window_start = now, "Created first bucket");
                return bucket;
            },
        };

        let gap = now - (newest.window_start() + self.bucket_size_ms);
        if gap > self.window_ms {
            // Nothing in the ring can still be inside the window.
            tracing::debug!(gap_ms = gap, "Window elapsed without writes, starting over");
            evicted.extend(buckets.drain(..));
            newest = Arc::new(Bucket::new(now));
            buckets.push_back(Arc::clone(&newest));
        } else {
            while now >= newest.window_start() + self.bucket_size_ms {
                let next = Arc::new(Bucket::new(newest.window_start() + self.bucket_size_ms));
                buckets.push_back(Arc::clone(&next));
                if buckets.len() > self.bucket_count {
                    evicted.extend(buckets.pop_front());
                }
                newest = next;
            }
            tracing::trace!(window_start = newest.window_start(), "Rolled to new bucket");
        }

        self.ring.store(Arc::new(Ring { buckets }));
        self.fold_evicted(evicted.iter());
        newest
    }

    /// Fold buckets that are no longer in the published ring into the
    /// cumulative totals. Call only after the ring without them is stored.
    fn fold_evicted<'a>(&self, evicted: impl Iterator<Item = &'a Arc<Bucket<E>>>) {
        // pairs with the acquire fence in `load_ring_after_cumulative`
        fence(Ordering::Release);
        for bucket in evicted {
            self.cumulative.add_bucket(bucket);
        }
    }

    /// Load the ring after the cumulative totals have been read. A reader
    /// that saw an evicted bucket's values in the totals then sees a ring
    /// without that bucket.
    fn load_ring_after_cumulative(&self) -> arc_swap::Guard<Arc<Ring<E>>> {
        fence(Ordering::Acquire);
        self.ring.load()
    }

    /// Buckets of `ring` whose slice started less than one window ago
    fn in_window<'a>(
        &self,
        ring: &'a Ring<E>,
        now: i64,
    ) -> impl Iterator<Item = &'a Arc<Bucket<E>>> + 'a {
        let window_ms = self.window_ms;
        ring.buckets
            .iter()
            .filter(move |b| now - b.window_start() < window_ms)
    }
}

impl<E: EventKind> fmt::Debug for RollingNumber<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RollingNumber")
            .field("window_ms", &self.window_ms)
            .field("bucket_size_ms", &self.bucket_size_ms)
            .field("bucket_count", &self.bucket_count)
            .field("live_buckets", &self.live_buckets())
            .finish()
    }
}
