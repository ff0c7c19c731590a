//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing evaluator events to the process
//! logger (stderr or the `--log-file` target).

use log::{error, info};

use crate::app::events::BrewEvent;
use crate::app::ports::EventSink;
use crate::timestamp;

/// Adapter that logs every [`BrewEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &BrewEvent) {
        match event {
            BrewEvent::Due { brew, scheduled } => {
                info!("DUE   | {} | scheduled={}", brew, timestamp::format(*scheduled));
            }
            BrewEvent::Initializing(brew) => {
                info!("INIT  | {} | init stale, pulsing relay", brew);
            }
            BrewEvent::Brewing { brew, secs } => {
                info!("BREW  | {} | {}s", brew, secs);
            }
            BrewEvent::Finished(brew) => {
                info!("DONE  | {} | marker retired", brew);
            }
            BrewEvent::Failed { brew, reason } => {
                error!("FAIL  | {} | {}", brew, reason);
            }
        }
    }
}
