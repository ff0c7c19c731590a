//! Init record file.
//!
//! Implements [`InitRecordPort`] as a single `init` file in the state
//! directory holding the time of the last init pulse, in marker format.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use log::{debug, error, warn};

use crate::app::ports::InitRecordPort;
use crate::error::StoreError;
use crate::timestamp;

use super::fs::{atomic_write, read_text};

const INIT_FILE: &str = "init";

pub struct FileInitTracker {
    path: PathBuf,
}

impl FileInitTracker {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(INIT_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl InitRecordPort for FileInitTracker {
    fn last_init(&self) -> Option<NaiveDateTime> {
        match read_text(&self.path) {
            Ok(content) => {
                let parsed = timestamp::parse(&content);
                if parsed.is_none() {
                    warn!(
                        "error parsing time from {}, assuming none",
                        self.path.display()
                    );
                }
                parsed
            }
            Err(StoreError::NotFound(_)) => {
                debug!("no init record at {}", self.path.display());
                None
            }
            Err(e) => {
                error!("reading last init time: {}, assuming none", e);
                None
            }
        }
    }

    fn record_init(&self, at: NaiveDateTime) -> Result<(), StoreError> {
        atomic_write(&self.path, timestamp::format(at).as_bytes())
    }
}
