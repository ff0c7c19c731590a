//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ScheduleEvaluator (domain)
//! ```
//!
//! Driven adapters (relay, marker files, clock, event sinks) implement
//! these traits. The [`ScheduleEvaluator`](super::service::ScheduleEvaluator)
//! consumes them via generics, so the domain core never touches a file or
//! a GPIO pin directly.
//!
//! ## Store contract
//!
//! The alarm, init and config stores are shared with an external writer
//! running in another process. Every single-key write MUST be atomic: a
//! reader sees either the old content or the new content, never a prefix.

use core::time::Duration;
use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::brew::BrewType;
use crate::config::BrewDurations;
use crate::error::{ActuatorError, Error, StoreError};

use super::events::BrewEvent;

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists brew durations.
pub trait ConfigPort {
    /// Load durations. Fails open: a missing or unreadable store yields
    /// [`BrewDurations::default()`] rather than an error.
    fn load(&self) -> BrewDurations;

    /// Validate and persist durations.
    fn save(&self, durations: &BrewDurations) -> Result<(), Error>;
}

// ───────────────────────────────────────────────────────────────
// Alarm port (driven adapter: domain ↔ pending-brew markers)
// ───────────────────────────────────────────────────────────────

/// One optional marker per [`BrewType`], holding the scheduled time.
pub trait AlarmPort {
    fn exists(&self, brew: BrewType) -> bool;

    /// Read the scheduled time. [`StoreError::NotFound`] when absent,
    /// [`StoreError::Parse`] when the content is malformed.
    fn read(&self, brew: BrewType) -> Result<NaiveDateTime, StoreError>;

    /// Delete the marker. `Ok(())` if it was already gone.
    fn retire(&self, brew: BrewType) -> Result<(), StoreError>;

    /// Replace every existing marker (all types) with a single new one.
    fn arm(&self, brew: BrewType, at: NaiveDateTime) -> Result<(), StoreError>;

    /// Where the marker lives, for log context.
    fn location(&self, brew: BrewType) -> PathBuf;

    /// Delete every marker.
    fn retire_all(&self) -> Result<(), StoreError> {
        for brew in BrewType::ALL {
            self.retire(brew)?;
        }
        Ok(())
    }

    /// First present marker in [`BrewType::ALL`] order.
    fn pending(&self) -> Option<(BrewType, Result<NaiveDateTime, StoreError>)> {
        BrewType::ALL
            .into_iter()
            .find(|b| self.exists(*b))
            .map(|b| (b, self.read(b)))
    }
}

// ───────────────────────────────────────────────────────────────
// Init record port (driven adapter: domain ↔ last-init timestamp)
// ───────────────────────────────────────────────────────────────

pub trait InitRecordPort {
    /// Last recorded initialisation, or `None` when unknown (absent or
    /// unparsable record). `None` is infinitely stale.
    fn last_init(&self) -> Option<NaiveDateTime>;

    /// Overwrite the record.
    fn record_init(&self, at: NaiveDateTime) -> Result<(), StoreError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → brew relay)
// ───────────────────────────────────────────────────────────────

/// The only capability that touches physical I/O. Both operations block
/// for their full duration and cannot be cancelled.
pub trait ActuatorPort {
    /// Record the init time, then pulse the relay low → high → low.
    fn run_init_sequence(&mut self) -> Result<(), ActuatorError>;

    /// Energize the relay for `duration`, then de-energize.
    fn brew(&mut self, duration: Duration) -> Result<(), ActuatorError>;

    /// Best-effort de-energize, used after a fault.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Local wall-clock time, as markers are written in it.
pub trait ClockPort {
    fn now(&self) -> NaiveDateTime;
}

// ───────────────────────────────────────────────────────────────
// Lock port (serialises passes that may drive the relay)
// ───────────────────────────────────────────────────────────────

/// Mutual exclusion over the shared relay, across overlapping ticks and
/// across brew types.
///
/// The guard releases the lock when dropped.
pub trait LockPort {
    type Guard;

    /// Take the lock for a pass of `brew`. `Ok(None)` when any other pass
    /// holds it.
    fn try_acquire(&self, brew: BrewType) -> Result<Option<Self::Guard>, StoreError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The evaluator emits structured [`BrewEvent`]s through this port.
pub trait EventSink {
    fn emit(&mut self, event: &BrewEvent);
}
