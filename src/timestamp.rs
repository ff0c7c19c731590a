//! Text format shared by alarm markers and the init record.
//!
//! Local wall-clock time, second resolution, no timezone:
//! `YYYY-MM-DD HH:MM:SS`.

use chrono::{NaiveDateTime, Timelike};

pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse marker content. Surrounding whitespace (a trailing newline from
/// `echo` is common) is ignored.
pub fn parse(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), FORMAT).ok()
}

pub fn format(ts: NaiveDateTime) -> String {
    ts.format(FORMAT).to_string()
}

/// Drop sub-second precision so a value survives a format/parse cycle.
pub fn truncate(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_nanosecond(0).unwrap_or(ts)
}
