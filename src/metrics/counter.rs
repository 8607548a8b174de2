//! Striped additive counter.

use crate::metrics::striped::Stripes;
use std::fmt;
use std::sync::atomic::Ordering;

/// Write-optimised counter for monotonically increasing counts.
///
/// Uncontended adds go to a single base cell. Once writers collide the
/// value is spread over cache-padded cells and [`sum`](Self::sum) adds
/// them back together. A `sum` racing with an `add` may or may not see
/// it; once all writers are done the sum is exact.
pub struct StripedCounter {
    stripes: Stripes,
}

impl StripedCounter {
    /// Create a counter at zero
    pub fn new() -> Self {
        Self {
            stripes: Stripes::new(0),
        }
    }

    /// Add `delta` to the counter (lock-free). `delta` must not be negative.
    #[inline]
    pub fn add(&self, delta: i64) {
        debug_assert!(delta >= 0, "counters only move forward, got {delta}");

        if let Some(cell) = self.stripes.thread_cell() {
            cell.fetch_add(delta, Ordering::Relaxed);
            return;
        }

        let base = self.stripes.base();
        let current = base.load(Ordering::Relaxed);
        if base
            .compare_exchange(current, current.wrapping_add(delta), Ordering::Relaxed, Ordering::Relaxed)
            .is_err()
        {
            self.stripes.contended_cell().fetch_add(delta, Ordering::Relaxed);
        }
    }

    /// Add one
    #[inline]
    pub fn increment(&self) {
        self.add(1);
    }

    /// Current total across all cells
    pub fn sum(&self) -> i64 {
        self.stripes.fold(i64::wrapping_add)
    }

    /// Alias of [`sum`](Self::sum)
    pub fn value(&self) -> i64 {
        self.sum()
    }

    pub(crate) fn is_striped(&self) -> bool {
        self.stripes.is_striped()
    }
}

impl Default for StripedCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StripedCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripedCounter")
            .field("sum", &self.sum())
            .field("striped", &self.is_striped())
            .finish()
    }
}
