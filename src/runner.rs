//! Fixed-interval tick loop.
//!
//! Stands in for cron when the controller runs as a long-lived service:
//! one evaluation pass per interval, measured start to start. A pass that
//! brews can outlast the interval; the next tick then starts immediately
//! rather than queuing up missed ones.
//!
//! ```text
//!  ┌──────────┐  interval  ┌──────────┐  interval  ┌──────────┐
//!  │  tick 1  │───────────▶│  tick 2  │───────────▶│  tick 3  │ ...
//!  └──────────┘            └──────────┘            └──────────┘
//!        evaluate(coffee) → evaluate(espresso)
//! ```

use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::config::millis;

pub struct TickLoop {
    interval: Duration,
    /// Stop after this many ticks; `None` runs forever.
    max_ticks: Option<u64>,
}

impl TickLoop {
    pub fn new(interval: Duration, max_ticks: Option<u64>) -> Self {
        Self {
            interval,
            max_ticks,
        }
    }

    /// Run `on_tick` every interval. Returns the number of ticks run.
    pub fn run(&self, delay: &mut impl DelayNs, mut on_tick: impl FnMut(u64)) -> u64 {
        info!(
            "tick loop: every {}s{}",
            self.interval.as_secs(),
            self.max_ticks
                .map(|n| format!(", {} ticks", n))
                .unwrap_or_default()
        );

        let mut count = 0;
        loop {
            if self.max_ticks.is_some_and(|max| count >= max) {
                return count;
            }
            count += 1;

            let started = Instant::now();
            on_tick(count);
            let elapsed = started.elapsed();

            if self.max_ticks.is_some_and(|max| count >= max) {
                return count;
            }
            match self.interval.checked_sub(elapsed) {
                Some(rest) if !rest.is_zero() => delay.delay_ms(millis(rest)),
                _ => warn!(
                    "tick {} took {}s, longer than the {}s interval",
                    count,
                    elapsed.as_secs(),
                    self.interval.as_secs()
                ),
            }
        }
    }
}
