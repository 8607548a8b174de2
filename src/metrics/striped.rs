//! Cache-line padded cell arrays shared by the striped primitives.
//!
//! Every striped value starts as a single base cell. The first time two
//! writers collide on it, a power-of-two array of padded cells is
//! allocated and each thread is pinned to one of them through a
//! thread-local probe, so later writes from different threads land on
//! different cache lines.

use crossbeam::utils::CachePadded;
use once_cell::sync::{Lazy, OnceCell};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

/// Stripe count used when the hardware parallelism cannot be queried.
pub const DEFAULT_STRIPES: usize = 8;

/// Upper bound on cells per striped value.
pub const MAX_STRIPES: usize = 64;

static STRIPES: Lazy<usize> = Lazy::new(|| {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(DEFAULT_STRIPES)
        .next_power_of_two()
        .min(MAX_STRIPES)
});

static NEXT_PROBE: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    /// Assigned on the first striped write from a thread.
    static PROBE: usize = NEXT_PROBE.fetch_add(1, Ordering::Relaxed);
}

#[inline]
fn probe() -> usize {
    PROBE.with(|p| *p)
}

/// Number of cells allocated once a striped value becomes contended.
pub fn stripe_count() -> usize {
    *STRIPES
}

pub(crate) struct Stripes {
    base: CachePadded<AtomicI64>,
    cells: OnceCell<Box<[CachePadded<AtomicI64>]>>,
    /// Identity element every cell starts from.
    identity: i64,
}

impl Stripes {
    pub(crate) fn new(identity: i64) -> Self {
        Self {
            base: CachePadded::new(AtomicI64::new(identity)),
            cells: OnceCell::new(),
            identity,
        }
    }

    #[inline]
    pub(crate) fn base(&self) -> &AtomicI64 {
        &self.base
    }

    /// The calling thread's cell, if the cell array exists yet.
    #[inline]
    pub(crate) fn thread_cell(&self) -> Option<&AtomicI64> {
        self.cells
            .get()
            .map(|cells| &*cells[probe() & (cells.len() - 1)])
    }

    /// The calling thread's cell, allocating the cell array on first use.
    pub(crate) fn contended_cell(&self) -> &AtomicI64 {
        let cells = self.cells.get_or_init(|| {
            tracing::trace!(stripes = stripe_count(), "Striping contended value");
            (0..stripe_count())
                .map(|_| CachePadded::new(AtomicI64::new(self.identity)))
                .collect()
        });
        &cells[probe() & (cells.len() - 1)]
    }

    /// Fold the base and every cell with `f`.
    pub(crate) fn fold<F>(&self, f: F) -> i64
    where
        F: Fn(i64, i64) -> i64,
    {
        let mut acc = self.base.load(Ordering::Relaxed);
        if let Some(cells) = self.cells.get() {
            for cell in cells.iter() {
                acc = f(acc, cell.load(Ordering::Relaxed));
            }
        }
        acc
    }

    pub(crate) fn is_striped(&self) -> bool {
        self.cells.get().is_some()
    }
}
