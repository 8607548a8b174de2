//! All-time totals fed by buckets as they leave the window.

use crate::core::Result;
use crate::metrics::bucket::{Bucket, EventSlots};
use crate::metrics::event::{Aggregation, EventKind};

/// Never-evicted aggregate of every bucket that has rolled out of the
/// window. Counters are summed, maxima are max-merged.
pub struct CumulativeSum<E: EventKind> {
    slots: EventSlots<E>,
}

impl<E: EventKind> CumulativeSum<E> {
    /// Totals at zero, maxima at zero
    pub fn new() -> Self {
        Self {
            slots: EventSlots::new(),
        }
    }

    /// Fold a bucket's values into the totals
    pub fn add_bucket(&self, bucket: &Bucket<E>) {
        for &event in E::ALL {
            // Untagged events have no slot anywhere; nothing to carry over.
            let folded = match event.aggregation() {
                Some(Aggregation::Counter) => bucket.counter(event).and_then(|src| {
                    self.slots.counter(event)?.add(src.sum());
                    Ok(())
                }),
                Some(Aggregation::MaxUpdater) => bucket.max_updater(event).and_then(|src| {
                    self.slots.max_updater(event)?.update(src.max());
                    Ok(())
                }),
                None => Ok(()),
            };
            if let Err(e) = folded {
                tracing::warn!(event = event.name(), error = %e, "Skipped folding event into cumulative totals");
            }
        }
        tracing::trace!(window_start = bucket.window_start(), "Folded bucket into cumulative totals");
    }

    /// All-time value for `event`, excluding the live buckets
    pub fn get(&self, event: E) -> Result<i64> {
        self.slots.get(event)
    }
}

impl<E: EventKind> Default for CumulativeSum<E> {
    fn default() -> Self {
        Self::new()
    }
}
