//! Striped running maximum.

use crate::metrics::striped::Stripes;
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

/// Write-optimised tracker of the largest value ever submitted.
///
/// A fresh tracker reports `i64::MIN`. Callers that count things seed it
/// with `update(0)`; [`Bucket`](crate::metrics::Bucket) does so for every
/// slot it allocates.
pub struct MaxUpdater {
    stripes: Stripes,
}

/// Raise `cell` to `value` using compare-and-swap
#[inline]
fn raise(cell: &AtomicI64, value: i64) {
    let mut current = cell.load(Ordering::Relaxed);
    loop {
        if value <= current {
            break;
        }
        match cell.compare_exchange_weak(current, value, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => break,
            Err(x) => current = x,
        }
    }
}

impl MaxUpdater {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self {
            stripes: Stripes::new(i64::MIN),
        }
    }

    /// Submit a candidate maximum (lock-free)
    #[inline]
    pub fn update(&self, candidate: i64) {
        if let Some(cell) = self.stripes.thread_cell() {
            raise(cell, candidate);
            return;
        }

        let base = self.stripes.base();
        let current = base.load(Ordering::Relaxed);
        if candidate <= current {
            return;
        }
        if base
            .compare_exchange(current, candidate, Ordering::Relaxed, Ordering::Relaxed)
            .is_err()
        {
            raise(self.stripes.contended_cell(), candidate);
        }
    }

    /// Largest value submitted so far
    pub fn max(&self) -> i64 {
        self.stripes.fold(i64::max)
    }

    pub(crate) fn is_striped(&self) -> bool {
        self.stripes.is_striped()
    }
}

impl Default for MaxUpdater {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MaxUpdater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaxUpdater")
            .field("max", &self.max())
            .field("striped", &self.is_striped())
            .finish()
    }
}
