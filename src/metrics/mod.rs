//! Rolling-window event metrics.
//!
//! Layers, bottom up:
//! - [`StripedCounter`] / [`MaxUpdater`]: contention-spreading atomics
//! - [`Bucket`]: one time slice, one slot per event type
//! - [`RollingNumber`]: the sliding ring of buckets plus all-time totals
//!
//! Writes are lock-free except for the moment the window rolls forward.

pub mod bucket;
pub mod clock;
pub mod counter;
pub mod cumulative;
pub mod event;
pub mod health;
pub mod max_updater;
pub mod rolling;
pub mod striped;

pub use bucket::{Bucket, EventSlots};
pub use clock::{Clock, MockClock, SystemClock};
pub use counter::StripedCounter;
pub use cumulative::CumulativeSum;
pub use event::{validate_registry, Aggregation, EventKind, RollingEvent};
pub use health::HealthCounts;
pub use max_updater::MaxUpdater;
pub use rolling::RollingNumber;
