//! Brew relay driver.
//!
//! A single digital output switches the machine's brew contact. High
//! energizes the relay, low releases it.
//!
//! ## Safety contract
//!
//! This driver is a dumb actuator: it will hold the relay for whatever it
//! is told. Deciding *whether* to brew, and serialising callers, is the
//! evaluator's job.
//!
//! ## Dual-target design
//!
//! Generic over [`OutputPin`] and [`DelayNs`]: a real GPIO line and
//! `thread::sleep` on the Pi, recording mocks on the host.

use core::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error as _, OutputPin};
use log::{debug, warn};

use crate::config::{millis, EngineTiming};
use crate::error::ActuatorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    Released,
    Energized,
}

pub struct RelayDriver<P, D> {
    pin: P,
    delay: D,
    state: RelayState,
    pulse_low: Duration,
    pulse_high: Duration,
}

impl<P: OutputPin, D: DelayNs> RelayDriver<P, D> {
    pub fn new(pin: P, delay: D, timing: &EngineTiming) -> Self {
        Self {
            pin,
            delay,
            state: RelayState::Released,
            pulse_low: timing.pulse_low,
            pulse_high: timing.pulse_high,
        }
    }

    pub fn energize(&mut self) -> Result<(), ActuatorError> {
        self.pin.set_high().map_err(|e| {
            warn!("relay: set_high failed ({:?})", e.kind());
            ActuatorError::GpioWriteFailed
        })?;
        self.state = RelayState::Energized;
        Ok(())
    }

    pub fn release(&mut self) -> Result<(), ActuatorError> {
        self.pin.set_low().map_err(|e| {
            warn!("relay: set_low failed ({:?})", e.kind());
            ActuatorError::GpioWriteFailed
        })?;
        self.state = RelayState::Released;
        Ok(())
    }

    /// Energize, block for `duration`, release.
    pub fn hold(&mut self, duration: Duration) -> Result<(), ActuatorError> {
        debug!("relay: holding for {:?}", duration);
        if let Err(e) = self.energize() {
            let _ = self.release();
            return Err(e);
        }
        self.delay.delay_ms(millis(duration));
        self.release()
    }

    /// Low, wait, short high, low. The machine reads this as reset/prime.
    pub fn pulse_init(&mut self) -> Result<(), ActuatorError> {
        self.release()?;
        self.delay.delay_ms(millis(self.pulse_low));
        if let Err(e) = self.energize() {
            let _ = self.release();
            return Err(e);
        }
        self.delay.delay_ms(millis(self.pulse_high));
        self.release()
    }

    pub fn state(&self) -> RelayState {
        self.state
    }

    pub fn is_energized(&self) -> bool {
        matches!(self.state, RelayState::Energized)
    }
}
