//! Host time adapters.
//!
//! - [`SystemClock`]: local wall-clock time for due-checks and the init
//!   record. Markers carry no timezone, so comparisons happen in local
//!   time, second resolution.
//! - [`SystemDelay`]: blocking [`DelayNs`] over `std::thread::sleep`,
//!   used for relay holds and the post-init settle.

use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use embedded_hal::delay::DelayNs;

use crate::app::ports::ClockPort;
use crate::timestamp;

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now(&self) -> NaiveDateTime {
        timestamp::truncate(Local::now().naive_local())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemDelay;

impl DelayNs for SystemDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
