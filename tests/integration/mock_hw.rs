//! Mock hardware for integration tests.
//!
//! Records every relay level, delay and actuator call so tests can assert
//! on the full command history without touching GPIO or sleeping.

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;
use std::time::Duration;

use brewtimer::app::events::BrewEvent;
use brewtimer::app::ports::{ActuatorPort, ClockPort, EventSink};
use brewtimer::error::ActuatorError;
use chrono::{NaiveDate, NaiveDateTime};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};

/// 2024-05-06 07:00:00, the "now" every scenario runs at.
pub fn morning() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 6)
        .unwrap()
        .and_hms_opt(7, 0, 0)
        .unwrap()
}

// ── RecordingPin ──────────────────────────────────────────────

/// Relay line that records every level written. `true` is high.
#[derive(Clone, Default)]
pub struct RecordingPin {
    pub levels: Rc<RefCell<Vec<bool>>>,
}

impl RecordingPin {
    pub fn history(&self) -> Vec<bool> {
        self.levels.borrow().clone()
    }
}

impl ErrorType for RecordingPin {
    type Error = Infallible;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.levels.borrow_mut().push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.levels.borrow_mut().push(true);
        Ok(())
    }
}

// ── RecordingDelay ────────────────────────────────────────────

/// Returns immediately, recording each requested wait in ms.
#[derive(Clone, Default)]
pub struct RecordingDelay {
    pub waits: Rc<RefCell<Vec<u32>>>,
}

impl RecordingDelay {
    pub fn history(&self) -> Vec<u32> {
        self.waits.borrow().clone()
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.waits.borrow_mut().push(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.waits.borrow_mut().push(ms);
    }
}

// ── FixedClock ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl ClockPort for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

// ── MockActuator ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    Init,
    Brew(Duration),
    AllOff,
}

/// Actuator that records calls and can be told to fail the init pulse or
/// brews of a given length.
#[derive(Default)]
pub struct MockActuator {
    pub calls: Vec<ActuatorCall>,
    pub fail_brew_of: Option<Duration>,
    pub fail_init: bool,
}

#[allow(dead_code)]
impl MockActuator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_brew_of(secs: u64) -> Self {
        Self {
            fail_brew_of: Some(Duration::from_secs(secs)),
            ..Self::default()
        }
    }

    pub fn failing_init() -> Self {
        Self {
            fail_init: true,
            ..Self::default()
        }
    }
}

impl ActuatorPort for MockActuator {
    fn run_init_sequence(&mut self) -> Result<(), ActuatorError> {
        self.calls.push(ActuatorCall::Init);
        if self.fail_init {
            return Err(ActuatorError::GpioWriteFailed);
        }
        Ok(())
    }

    fn brew(&mut self, duration: Duration) -> Result<(), ActuatorError> {
        self.calls.push(ActuatorCall::Brew(duration));
        if self.fail_brew_of == Some(duration) {
            return Err(ActuatorError::GpioWriteFailed);
        }
        Ok(())
    }

    fn all_off(&mut self) {
        self.calls.push(ActuatorCall::AllOff);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<BrewEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &BrewEvent) {
        self.events.push(event.clone());
    }
}
