//! Alarm marker files.
//!
//! Implements [`AlarmPort`] with one text file per brew type
//! (`coffee.alarm`, `espresso.alarm`) in the state directory, each
//! holding a single `YYYY-MM-DD HH:MM:SS` line.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use log::info;

use crate::app::ports::AlarmPort;
use crate::brew::BrewType;
use crate::error::StoreError;
use crate::timestamp;

use super::fs::{atomic_write, read_text, remove_if_exists};

pub struct FileAlarmStore {
    dir: PathBuf,
}

impl FileAlarmStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl AlarmPort for FileAlarmStore {
    fn exists(&self, brew: BrewType) -> bool {
        self.location(brew).is_file()
    }

    fn read(&self, brew: BrewType) -> Result<NaiveDateTime, StoreError> {
        let path = self.location(brew);
        let content = read_text(&path)?;
        timestamp::parse(&content).ok_or(StoreError::Parse {
            path,
            content: content.trim().to_owned(),
        })
    }

    fn retire(&self, brew: BrewType) -> Result<(), StoreError> {
        remove_if_exists(&self.location(brew))
    }

    fn arm(&self, brew: BrewType, at: NaiveDateTime) -> Result<(), StoreError> {
        self.retire_all()?;
        atomic_write(&self.location(brew), timestamp::format(at).as_bytes())?;
        info!("{} timer set for {}", brew, timestamp::format(at));
        Ok(())
    }

    fn location(&self, brew: BrewType) -> PathBuf {
        self.dir.join(brew.marker_file())
    }
}
