//! Hardware adapter: bridges the relay driver to the domain port.
//!
//! Owns the [`RelayDriver`] and exposes it through [`ActuatorPort`].
//! This is the only module that touches the brew relay. It also owns the
//! write side of the init record, since recording the init time is part
//! of running the init sequence.

use core::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::{error, info, warn};

use crate::app::ports::{ActuatorPort, ClockPort, InitRecordPort};
use crate::drivers::relay::RelayDriver;
use crate::error::ActuatorError;

/// Concrete adapter combining the relay with the init record.
pub struct HardwareAdapter<P, D, I, K> {
    relay: RelayDriver<P, D>,
    init: I,
    clock: K,
}

impl<P, D, I, K> HardwareAdapter<P, D, I, K>
where
    P: OutputPin,
    D: DelayNs,
    I: InitRecordPort,
    K: ClockPort,
{
    pub fn new(relay: RelayDriver<P, D>, init: I, clock: K) -> Self {
        Self { relay, init, clock }
    }

    pub fn relay(&self) -> &RelayDriver<P, D> {
        &self.relay
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<P, D, I, K> ActuatorPort for HardwareAdapter<P, D, I, K>
where
    P: OutputPin,
    D: DelayNs,
    I: InitRecordPort,
    K: ClockPort,
{
    fn run_init_sequence(&mut self) -> Result<(), ActuatorError> {
        info!("initialising machine");
        // Recorded before the pulse: an interrupted pulse still counts as
        // an init attempt and is not retried within the stale window.
        if let Err(e) = self.init.record_init(self.clock.now()) {
            warn!("could not record init time: {}", e);
        }
        self.relay.pulse_init()
    }

    fn brew(&mut self, duration: Duration) -> Result<(), ActuatorError> {
        info!("making coffee for {}s...", duration.as_secs());
        self.relay.hold(duration)
    }

    fn all_off(&mut self) {
        if let Err(e) = self.relay.release() {
            error!("relay release failed: {}", e);
        }
    }
}
