//! Event type registry.
//!
//! Every event kind is tagged at compile time with how it aggregates:
//! as a running total ([`Aggregation::Counter`]) or as a running maximum
//! ([`Aggregation::MaxUpdater`]). Buckets use the tag to decide which
//! storage slot an ordinal gets.

use crate::core::{Result, RollstatError};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// How an event type is aggregated within a bucket and across buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Aggregation {
    /// Summed: per bucket and across the window
    Counter,
    /// Maxed: per bucket and across the window
    MaxUpdater,
}

impl Aggregation {
    /// Name used in error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregation::Counter => "Counter",
            Aggregation::MaxUpdater => "MaxUpdater",
        }
    }
}

/// A closed set of event types with a static aggregation tag each.
///
/// `ALL` lists every member in ordinal order; `ordinal()` must return the
/// member's index in `ALL`.
pub trait EventKind: Copy + Debug + Send + Sync + 'static {
    /// Every member, ordered by ordinal
    const ALL: &'static [Self];

    /// Dense index into per-bucket slot arrays
    fn ordinal(self) -> usize;

    /// Stable display name
    fn name(self) -> &'static str;

    /// Aggregated as a running total?
    fn is_counter(self) -> bool;

    /// Aggregated as a running maximum?
    fn is_max_updater(self) -> bool;

    /// The single aggregation this type uses, or `None` when the type is
    /// tagged with neither or both.
    #[inline]
    fn aggregation(self) -> Option<Aggregation> {
        match (self.is_counter(), self.is_max_updater()) {
            (true, false) => Some(Aggregation::Counter),
            (false, true) => Some(Aggregation::MaxUpdater),
            _ => None,
        }
    }
}

/// Fail unless `event` aggregates as `expected`.
///
/// Events tagged with neither or both kinds fail with
/// [`RollstatError::UnknownEventType`], the other kind with
/// [`RollstatError::TypeMismatch`].
pub(crate) fn expect_kind<E: EventKind>(event: E, expected: Aggregation) -> Result<()> {
    match event.aggregation() {
        Some(kind) if kind == expected => Ok(()),
        Some(_) => Err(RollstatError::type_mismatch(event.name(), expected.as_str())),
        None => Err(RollstatError::UnknownEventType(event.name())),
    }
}

/// Check that ordinals are dense and every type has exactly one tag.
pub fn validate_registry<E: EventKind>() -> Result<()> {
    for (index, event) in E::ALL.iter().enumerate() {
        if event.ordinal() != index {
            return Err(RollstatError::config(format!(
                "event {} has ordinal {} but is listed at {}",
                event.name(),
                event.ordinal(),
                index
            )));
        }
        if event.aggregation().is_none() {
            return Err(RollstatError::config(format!(
                "event {} must be exactly one of Counter or MaxUpdater",
                event.name()
            )));
        }
    }
    Ok(())
}

/// Outcomes and measurements recorded around a protected call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum RollingEvent {
    /// Call completed normally
    Success,
    /// Call failed with an error
    Failure,
    /// Call exceeded its deadline
    Timeout,
    /// Call rejected by an open circuit
    ShortCircuited,
    /// Call rejected by a saturated thread pool
    ThreadPoolRejected,
    /// Call rejected by a saturated semaphore
    SemaphoreRejected,
    /// Call failed on caller input; not counted as a failure
    BadRequest,
    /// Fallback completed normally
    FallbackSuccess,
    /// Fallback failed with an error
    FallbackFailure,
    /// Fallback rejected for lack of capacity
    FallbackRejection,
    /// Error surfaced to the caller
    ExceptionThrown,
    /// Value emitted by a streaming call
    Emit,
    /// Value emitted by a streaming fallback
    FallbackEmit,
    /// Call run on an isolation thread
    ThreadExecution,
    /// Response served from the request cache
    ResponseFromCache,
    /// Call folded into a collapsed batch
    Collapsed,
    /// Request added to a collapser batch
    CollapserRequestBatched,
    /// Collapser batch executed
    CollapserBatch,
    /// Peak concurrent executions of the command
    CommandMaxActive,
    /// Peak active threads in the isolation pool
    ThreadMaxActive,
}

impl EventKind for RollingEvent {
    const ALL: &'static [Self] = &[
        RollingEvent::Success,
        RollingEvent::Failure,
        RollingEvent::Timeout,
        RollingEvent::ShortCircuited,
        RollingEvent::ThreadPoolRejected,
        RollingEvent::SemaphoreRejected,
        RollingEvent::BadRequest,
        RollingEvent::FallbackSuccess,
        RollingEvent::FallbackFailure,
        RollingEvent::FallbackRejection,
        RollingEvent::ExceptionThrown,
        RollingEvent::Emit,
        RollingEvent::FallbackEmit,
        RollingEvent::ThreadExecution,
        RollingEvent::ResponseFromCache,
        RollingEvent::Collapsed,
        RollingEvent::CollapserRequestBatched,
        RollingEvent::CollapserBatch,
        RollingEvent::CommandMaxActive,
        RollingEvent::ThreadMaxActive,
    ];

    #[inline]
    fn ordinal(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            RollingEvent::Success => "Success",
            RollingEvent::Failure => "Failure",
            RollingEvent::Timeout => "Timeout",
            RollingEvent::ShortCircuited => "ShortCircuited",
            RollingEvent::ThreadPoolRejected => "ThreadPoolRejected",
            RollingEvent::SemaphoreRejected => "SemaphoreRejected",
            RollingEvent::BadRequest => "BadRequest",
            RollingEvent::FallbackSuccess => "FallbackSuccess",
            RollingEvent::FallbackFailure => "FallbackFailure",
            RollingEvent::FallbackRejection => "FallbackRejection",
            RollingEvent::ExceptionThrown => "ExceptionThrown",
            RollingEvent::Emit => "Emit",
            RollingEvent::FallbackEmit => "FallbackEmit",
            RollingEvent::ThreadExecution => "ThreadExecution",
            RollingEvent::ResponseFromCache => "ResponseFromCache",
            RollingEvent::Collapsed => "Collapsed",
            RollingEvent::CollapserRequestBatched => "CollapserRequestBatched",
            RollingEvent::CollapserBatch => "CollapserBatch",
            RollingEvent::CommandMaxActive => "CommandMaxActive",
            RollingEvent::ThreadMaxActive => "ThreadMaxActive",
        }
    }

    #[inline]
    fn is_counter(self) -> bool {
        !self.is_max_updater()
    }

    #[inline]
    fn is_max_updater(self) -> bool {
        matches!(self, RollingEvent::CommandMaxActive | RollingEvent::ThreadMaxActive)
    }
}

impl std::fmt::Display for RollingEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
