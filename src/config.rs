//! Brew configuration parameters.
//!
//! [`BrewDurations`] is the persisted, user-editable part (JSON on disk).
//! [`EngineTiming`] holds the fixed machine timings the evaluator and
//! relay driver work with.

use core::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::brew::BrewType;
use crate::error::Error;

/// Longest brew a stored config may request.
pub const MAX_BREW_SECS: u32 = 600;

/// How long each brew type keeps the relay energized.
///
/// A zero entry means "not configured": the evaluator skips that type
/// instead of running a 0-second brew. A key missing from an otherwise
/// valid file deserialises to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrewDurations {
    #[serde(default)]
    pub coffee_duration_seconds: u32,
    #[serde(default)]
    pub espresso_duration_seconds: u32,
}

impl Default for BrewDurations {
    fn default() -> Self {
        Self {
            coffee_duration_seconds: 38,
            espresso_duration_seconds: 20,
        }
    }
}

impl BrewDurations {
    pub fn seconds(&self, brew: BrewType) -> u32 {
        match brew {
            BrewType::Coffee => self.coffee_duration_seconds,
            BrewType::Espresso => self.espresso_duration_seconds,
        }
    }

    /// Configured duration, or `None` when the entry is zero.
    pub fn duration_for(&self, brew: BrewType) -> Option<Duration> {
        match self.seconds(brew) {
            0 => None,
            secs => Some(Duration::from_secs(u64::from(secs))),
        }
    }

    /// Cap every entry at [`MAX_BREW_SECS`]. Applied on load, so a
    /// hand-edited file can never hold the relay longer than a saved one.
    pub fn clamped(self) -> Self {
        let cap = |brew: BrewType| {
            let secs = self.seconds(brew);
            if secs > MAX_BREW_SECS {
                warn!(
                    "{} = {} exceeds {}s, clamping",
                    brew.config_key(),
                    secs,
                    MAX_BREW_SECS
                );
                MAX_BREW_SECS
            } else {
                secs
            }
        };
        Self {
            coffee_duration_seconds: cap(BrewType::Coffee),
            espresso_duration_seconds: cap(BrewType::Espresso),
        }
    }

    /// Range check applied before anything is persisted.
    pub fn validate(&self) -> Result<(), Error> {
        if !(1..=MAX_BREW_SECS).contains(&self.coffee_duration_seconds) {
            return Err(Error::Config("coffee_duration_seconds must be between 1 and 600"));
        }
        if !(1..=MAX_BREW_SECS).contains(&self.espresso_duration_seconds) {
            return Err(Error::Config("espresso_duration_seconds must be between 1 and 600"));
        }
        Ok(())
    }
}

/// Fixed machine timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineTiming {
    /// An init older than this is stale and must be redone before brewing.
    pub init_stale_after: Duration,
    /// Warm-up wait between the init pulse and the brew.
    pub post_init_settle: Duration,
    /// Relay low time at the start of the init pulse.
    pub pulse_low: Duration,
    /// Relay high time in the middle of the init pulse.
    pub pulse_high: Duration,
    /// Age at which another process's evaluation lock is considered dead.
    pub lock_stale_after: Duration,
}

impl Default for EngineTiming {
    fn default() -> Self {
        Self {
            init_stale_after: Duration::from_secs(5 * 60),
            post_init_settle: Duration::from_secs(35),
            pulse_low: Duration::from_millis(1000),
            pulse_high: Duration::from_millis(500),
            // Must exceed `longest_pass`.
            lock_stale_after: Duration::from_secs(15 * 60),
        }
    }
}

impl EngineTiming {
    /// Upper bound on one evaluation pass: init pulse, settle and the
    /// longest brew a loaded config can request.
    pub fn longest_pass(&self) -> Duration {
        self.pulse_low
            + self.pulse_high
            + self.post_init_settle
            + Duration::from_secs(u64::from(MAX_BREW_SECS))
    }
}

/// Milliseconds for a `DelayNs` call, saturating.
pub(crate) fn millis(d: Duration) -> u32 {
    u32::try_from(d.as_millis()).unwrap_or(u32::MAX)
}
