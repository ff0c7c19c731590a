//! Per-thread log capture for unit tests.

use std::sync::{Mutex, OnceLock};
use std::thread::{self, ThreadId};

use log::{Level, LevelFilter, Log, Metadata, Record};

struct Capture(Mutex<Vec<(ThreadId, Level, String)>>);

impl Log for Capture {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut lines) = self.0.lock() {
            lines.push((thread::current().id(), record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static CAPTURE: OnceLock<Capture> = OnceLock::new();

fn capture() -> &'static Capture {
    CAPTURE.get_or_init(|| Capture(Mutex::new(Vec::new())))
}

/// Install the capture (once per test binary) and forget this thread's
/// earlier lines.
pub fn start() {
    let _ = log::set_logger(capture());
    log::set_max_level(LevelFilter::Trace);
    let me = thread::current().id();
    capture().0.lock().unwrap().retain(|(t, _, _)| *t != me);
}

/// Lines logged by this thread at `level` or more severe.
pub fn at_least(level: Level) -> Vec<String> {
    let me = thread::current().id();
    capture()
        .0
        .lock()
        .unwrap()
        .iter()
        .filter(|(t, l, _)| *t == me && *l <= level)
        .map(|(_, _, line)| line.clone())
        .collect()
}
