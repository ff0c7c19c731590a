//! Outbound evaluator events and per-pass outcomes.
//!
//! The [`ScheduleEvaluator`](super::service::ScheduleEvaluator) emits
//! [`BrewEvent`]s through the [`EventSink`](super::ports::EventSink) port
//! as a brew progresses, and returns an [`Outcome`] from every
//! `evaluate` call.

use chrono::NaiveDateTime;

use crate::brew::BrewType;

/// Milestones of a due brew.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrewEvent {
    /// A marker's time has passed; actuation begins.
    Due {
        brew: BrewType,
        scheduled: NaiveDateTime,
    },

    /// The last init is stale; the init pulse is about to run.
    Initializing(BrewType),

    /// The relay is being held for `secs`.
    Brewing { brew: BrewType, secs: u64 },

    /// Brew completed and its marker was retired.
    Finished(BrewType),

    /// The pass for this type aborted.
    Failed { brew: BrewType, reason: String },
}

/// What one `evaluate(type)` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Duration is zero or absent; nothing was touched.
    NotConfigured,
    /// No marker for this type.
    NoMarker,
    /// Marker content is not a valid timestamp; marker left in place.
    Malformed,
    /// Scheduled time is still in the future; marker left in place.
    NotDue(NaiveDateTime),
    /// Another evaluation of this type holds the lock.
    Busy,
    /// Brew ran and the marker was retired.
    Brewed { initialized: bool },
    /// Actuation or store failure; see the log.
    Failed,
}

impl Outcome {
    pub fn brewed(&self) -> bool {
        matches!(self, Self::Brewed { .. })
    }
}
