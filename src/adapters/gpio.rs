//! Relay GPIO line.
//!
//! - **`feature = "rpi"`**: a BCM-numbered output claimed through
//!   `rppal`.
//! - **simulation**: [`SimulatedPin`] logs every level change. Used with
//!   `--simulate`, or always when built without `rpi`.
//!
//! The line is claimed on first write, not at construction: a tick that
//! finds nothing due must not touch a relay another process is holding.

use core::fmt;

use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};
use log::{error, info};

/// In-memory stand-in for the relay line.
#[derive(Debug)]
pub struct SimulatedPin {
    bcm: u8,
    high: bool,
}

impl SimulatedPin {
    pub fn new(bcm: u8) -> Self {
        Self { bcm, high: false }
    }

    pub fn is_high(&self) -> bool {
        self.high
    }

    fn set(&mut self, high: bool) {
        if self.high != high {
            info!(
                "relay(sim): GPIO{} -> {}",
                self.bcm,
                if high { "HIGH" } else { "LOW" }
            );
        }
        self.high = high;
    }
}

/// The relay line could not be claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinError {
    bcm: u8,
}

impl fmt::Display for PinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO{} unavailable", self.bcm)
    }
}

impl embedded_hal::digital::Error for PinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

enum Line {
    Simulated(SimulatedPin),
    #[cfg(feature = "rpi")]
    Gpio(rppal::gpio::OutputPin),
}

/// The relay output the binary drives.
pub struct RelayPin {
    bcm: u8,
    simulate: bool,
    line: Option<Line>,
}

impl RelayPin {
    pub fn new(bcm: u8, simulate: bool) -> Self {
        Self {
            bcm,
            simulate,
            line: None,
        }
    }

    pub fn simulated(bcm: u8) -> Self {
        Self::new(bcm, true)
    }

    pub fn is_claimed(&self) -> bool {
        self.line.is_some()
    }

    /// Level of a simulated line; `None` for real or unclaimed lines.
    pub fn simulated_level(&self) -> Option<bool> {
        match &self.line {
            Some(Line::Simulated(pin)) => Some(pin.is_high()),
            _ => None,
        }
    }

    fn line(&mut self) -> Result<&mut Line, PinError> {
        if self.line.is_none() {
            self.line = Some(self.claim()?);
        }
        self.line.as_mut().ok_or(PinError { bcm: self.bcm })
    }

    fn claim(&self) -> Result<Line, PinError> {
        if self.simulate {
            return Ok(Line::Simulated(SimulatedPin::new(self.bcm)));
        }
        self.claim_gpio()
    }

    #[cfg(feature = "rpi")]
    fn claim_gpio(&self) -> Result<Line, PinError> {
        let bcm = self.bcm;
        let pin = rppal::gpio::Gpio::new()
            .and_then(|gpio| gpio.get(bcm))
            .map_err(|e| {
                error!("GPIO{} unavailable: {}", bcm, e);
                PinError { bcm }
            })?;
        info!("relay claimed on GPIO{}", bcm);
        Ok(Line::Gpio(pin.into_output_low()))
    }

    #[cfg(not(feature = "rpi"))]
    fn claim_gpio(&self) -> Result<Line, PinError> {
        error!(
            "built without GPIO support, simulating relay on GPIO{}",
            self.bcm
        );
        Ok(Line::Simulated(SimulatedPin::new(self.bcm)))
    }
}

impl ErrorType for RelayPin {
    type Error = PinError;
}

impl OutputPin for RelayPin {
    fn set_low(&mut self) -> Result<(), PinError> {
        match self.line()? {
            Line::Simulated(pin) => pin.set(false),
            #[cfg(feature = "rpi")]
            Line::Gpio(pin) => pin.set_low(),
        }
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), PinError> {
        match self.line()? {
            Line::Simulated(pin) => pin.set(true),
            #[cfg(feature = "rpi")]
            Line::Gpio(pin) => pin.set_high(),
        }
        Ok(())
    }
}
