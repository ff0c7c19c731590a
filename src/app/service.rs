//! Scheduling evaluator: the hexagonal core.
//!
//! [`ScheduleEvaluator`] turns a due alarm marker into exactly one brew.
//! It holds no state between calls: every pass re-reads the config, the
//! marker and the init record, so a restart mid-schedule loses nothing.
//!
//! ```text
//!  ConfigPort ─┐                              ┌──▶ ActuatorPort
//!  AlarmPort  ─┼──▶ ┌──────────────────────┐ ─┤
//!  InitRecord ─┤    │  ScheduleEvaluator   │  └──▶ EventSink
//!  ClockPort  ─┘    │ due · init · retire  │
//!  LockPort   ────▶ └──────────────────────┘
//! ```
//!
//! Per type, per tick:
//!
//! ```text
//! NoMarker ──(external arm)──▶ Pending ──(due)──▶ [Initializing] ──▶ Brewing ──▶ NoMarker
//! ```
//!
//! `Pending` is the only state that survives a tick. A malformed marker
//! stays `Pending` until an operator fixes or cancels it.

use core::time::Duration;

use chrono::NaiveDateTime;
use embedded_hal::delay::DelayNs;
use log::{debug, error, info, warn};

use crate::brew::BrewType;
use crate::config::{millis, EngineTiming};
use crate::error::{Error, StoreError};

use super::events::{BrewEvent, Outcome};
use super::ports::{
    ActuatorPort, AlarmPort, ClockPort, ConfigPort, EventSink, InitRecordPort, LockPort,
};

// ───────────────────────────────────────────────────────────────
// ScheduleEvaluator
// ───────────────────────────────────────────────────────────────

pub struct ScheduleEvaluator<C, A, I, L, K> {
    config: C,
    alarms: A,
    init: I,
    locks: L,
    clock: K,
    timing: EngineTiming,
}

impl<C, A, I, L, K> ScheduleEvaluator<C, A, I, L, K>
where
    C: ConfigPort,
    A: AlarmPort,
    I: InitRecordPort,
    L: LockPort,
    K: ClockPort,
{
    pub fn new(config: C, alarms: A, init: I, locks: L, clock: K, timing: EngineTiming) -> Self {
        Self {
            config,
            alarms,
            init,
            locks,
            clock,
            timing,
        }
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Evaluate every brew type in [`BrewType::ALL`] order.
    ///
    /// A failure in one type never prevents the next from running.
    pub fn tick(
        &self,
        hw: &mut impl ActuatorPort,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> Vec<(BrewType, Outcome)> {
        BrewType::ALL
            .into_iter()
            .map(|brew| (brew, self.evaluate(brew, hw, delay, sink)))
            .collect()
    }

    /// Run one evaluation pass for `brew`. Never fails: every error is
    /// logged and folded into the returned [`Outcome`].
    pub fn evaluate(
        &self,
        brew: BrewType,
        hw: &mut impl ActuatorPort,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> Outcome {
        // 1. Duration must be configured.
        let Some(duration) = self.config.load().duration_for(brew) else {
            if self.alarms.exists(brew) {
                warn!("duration for {} is not configured, skipping", brew.config_key());
            } else {
                debug!("duration for {} is not configured", brew.config_key());
            }
            return Outcome::NotConfigured;
        };

        // 2. Nothing scheduled.
        if !self.alarms.exists(brew) {
            debug!("{}: no marker", brew);
            return Outcome::NoMarker;
        }

        // Held for the rest of the pass.
        let _guard = match self.locks.try_acquire(brew) {
            Ok(Some(guard)) => guard,
            Ok(None) => {
                info!("{}: relay busy with another pass, skipping", brew);
                return Outcome::Busy;
            }
            Err(e) => {
                error!("{}: could not take relay lock: {}", brew, e);
                return Outcome::Failed;
            }
        };

        match self.run_pass(brew, duration, hw, delay, sink) {
            Ok(outcome) => outcome,
            Err(e) => {
                hw.all_off();
                error!(
                    "error processing {} ({}): {}",
                    self.alarms.location(brew).display(),
                    brew,
                    e
                );
                sink.emit(&BrewEvent::Failed {
                    brew,
                    reason: e.to_string(),
                });
                Outcome::Failed
            }
        }
    }

    /// Whether an init pulse is required before brewing at `now`.
    pub fn init_is_stale(&self, now: NaiveDateTime) -> bool {
        match self.init.last_init() {
            None => {
                debug!("no usable init record, init required");
                true
            }
            Some(last) => now.signed_duration_since(last) > stale_window(self.timing.init_stale_after),
        }
    }

    // ── Internal ──────────────────────────────────────────────

    /// Read, due-check, optional init, brew, retire.
    fn run_pass(
        &self,
        brew: BrewType,
        duration: Duration,
        hw: &mut impl ActuatorPort,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> Result<Outcome, Error> {
        let scheduled = match self.alarms.read(brew) {
            Ok(ts) => ts,
            // Removed by the external writer since `exists`.
            Err(StoreError::NotFound(_)) => return Ok(Outcome::NoMarker),
            Err(e @ StoreError::Parse { .. }) => {
                error!("{}: {}; leaving marker in place", brew, e);
                return Ok(Outcome::Malformed);
            }
            Err(e) => return Err(e.into()),
        };

        let now = self.clock.now();
        if scheduled > now {
            debug!("{}: scheduled for {}, not due", brew, scheduled);
            return Ok(Outcome::NotDue(scheduled));
        }

        info!("time for: {}", brew.marker_file());
        sink.emit(&BrewEvent::Due { brew, scheduled });

        let initialized = self.init_is_stale(now);
        if initialized {
            sink.emit(&BrewEvent::Initializing(brew));
            hw.run_init_sequence()?;
            delay.delay_ms(millis(self.timing.post_init_settle));
        }

        sink.emit(&BrewEvent::Brewing {
            brew,
            secs: duration.as_secs(),
        });
        hw.brew(duration)?;

        self.alarms.retire(brew)?;
        info!("{}: finished, enjoy", brew);
        sink.emit(&BrewEvent::Finished(brew));

        Ok(Outcome::Brewed { initialized })
    }
}

fn stale_window(d: Duration) -> chrono::TimeDelta {
    chrono::TimeDelta::from_std(d).unwrap_or(chrono::TimeDelta::MAX)
}
