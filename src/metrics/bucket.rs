//! Per-slice event storage.

use crate::core::{Result, RollstatError};
use crate::metrics::counter::StripedCounter;
use crate::metrics::event::{expect_kind, Aggregation, EventKind};
use crate::metrics::max_updater::MaxUpdater;
use std::fmt;
use std::marker::PhantomData;

/// Two sparse arrays indexed by event ordinal.
///
/// Counter-kind ordinals get a [`StripedCounter`], MaxUpdater-kind
/// ordinals a [`MaxUpdater`] seeded at zero. Events tagged with neither
/// or both kinds stay `None` in both arrays. Slots are fixed at construction; only their values change.
pub struct EventSlots<E: EventKind> {
    counters: Box<[Option<StripedCounter>]>,
    max_updaters: Box<[Option<MaxUpdater>]>,
    _events: PhantomData<E>,
}

impl<E: EventKind> EventSlots<E> {
    /// Allocate the slots required by `E`
    pub fn new() -> Self {
        let counters = E::ALL
            .iter()
            .map(|e| (e.aggregation() == Some(Aggregation::Counter)).then(StripedCounter::new))
            .collect();

        let max_updaters = E::ALL
            .iter()
            .map(|e| {
                (e.aggregation() == Some(Aggregation::MaxUpdater)).then(|| {
                    let tracker = MaxUpdater::new();
                    // zero, not i64::MIN, means "nothing observed yet"
                    tracker.update(0);
                    tracker
                })
            })
            .collect();

        for e in E::ALL.iter().filter(|e| e.aggregation().is_none()) {
            tracing::warn!(event = e.name(), "Event type has no aggregation kind");
        }

        Self {
            counters,
            max_updaters,
            _events: PhantomData,
        }
    }

    /// Counter total or running maximum, depending on the event's kind
    pub fn get(&self, event: E) -> Result<i64> {
        match event.aggregation() {
            Some(Aggregation::Counter) => Ok(self.counter(event)?.sum()),
            Some(Aggregation::MaxUpdater) => Ok(self.max_updater(event)?.max()),
            None => Err(RollstatError::UnknownEventType(event.name())),
        }
    }

    /// Counter slot for a Counter-kind event
    pub fn counter(&self, event: E) -> Result<&StripedCounter> {
        expect_kind(event, Aggregation::Counter)?;
        self.counters
            .get(event.ordinal())
            .and_then(Option::as_ref)
            .ok_or(RollstatError::UnknownEventType(event.name()))
    }

    /// Maximum slot for a MaxUpdater-kind event
    pub fn max_updater(&self, event: E) -> Result<&MaxUpdater> {
        expect_kind(event, Aggregation::MaxUpdater)?;
        self.max_updaters
            .get(event.ordinal())
            .and_then(Option::as_ref)
            .ok_or(RollstatError::UnknownEventType(event.name()))
    }
}

impl<E: EventKind> Default for EventSlots<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregated events for one time slice starting at `window_start`.
///
/// A bucket is shared by every writer while it is current. It needs no
/// lock of its own: writers only contend inside the striped primitives.
pub struct Bucket<E: EventKind> {
    window_start: i64,
    slots: EventSlots<E>,
}

impl<E: EventKind> Bucket<E> {
    /// Create an empty bucket for the slice starting at `window_start` (ms)
    pub fn new(window_start: i64) -> Self {
        Self {
            window_start,
            slots: EventSlots::new(),
        }
    }

    /// Start of the slice in milliseconds
    #[inline]
    pub fn window_start(&self) -> i64 {
        self.window_start
    }

    /// Counter total or running maximum, depending on the event's kind.
    ///
    /// Fails with [`RollstatError::UnknownEventType`] if the event is tagged
    /// with neither kind.
    pub fn get(&self, event: E) -> Result<i64> {
        self.slots.get(event)
    }

    /// Write access to a Counter-kind event.
    ///
    /// Fails with [`RollstatError::TypeMismatch`] for a MaxUpdater-kind
    /// event and [`RollstatError::UnknownEventType`] for an untagged one.
    pub fn counter(&self, event: E) -> Result<&StripedCounter> {
        self.slots.counter(event)
    }

    /// Write access to a MaxUpdater-kind event.
    ///
    /// Fails with [`RollstatError::TypeMismatch`] for a Counter-kind event
    /// and [`RollstatError::UnknownEventType`] for an untagged one.
    pub fn max_updater(&self, event: E) -> Result<&MaxUpdater> {
        self.slots.max_updater(event)
    }
}

impl<E: EventKind> fmt::Debug for Bucket<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<_> = E::ALL
            .iter()
            .filter_map(|&e| self.get(e).ok().map(|v| (e.name(), v)))
            .filter(|(_, v)| *v != 0)
            .collect();

        f.debug_struct("Bucket")
            .field("window_start", &self.window_start)
            .field("values", &values)
            .finish()
    }
}
