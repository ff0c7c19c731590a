//! JSON config adapter.
//!
//! Implements [`ConfigPort`] over `config.json` in the state directory.
//!
//! - Load fails open: no file means built-in defaults, an unreadable or
//!   malformed file is logged and also yields defaults. Entries above the
//!   brew limit are clamped.
//! - Save validates every field before anything touches the disk, then
//!   replaces the file atomically.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;

use crate::app::ports::ConfigPort;
use crate::config::BrewDurations;
use crate::error::{Error, StoreError};

use super::fs::{atomic_write, read_text};

const CONFIG_FILE: &str = "config.json";

pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(CONFIG_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn try_load(&self) -> Result<BrewDurations, StoreError> {
        let text = read_text(&self.path)?;
        serde_json::from_str(&text).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }
}

impl ConfigPort for JsonConfigStore {
    fn load(&self) -> BrewDurations {
        match self.try_load() {
            Ok(durations) => durations.clamped(),
            Err(StoreError::NotFound(_)) => {
                debug!("no stored config at {}, using defaults", self.path.display());
                BrewDurations::default()
            }
            Err(e) => {
                warn!("config unreadable ({}), using defaults", e);
                BrewDurations::default()
            }
        }
    }

    fn save(&self, durations: &BrewDurations) -> Result<(), Error> {
        durations.validate()?;

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        durations
            .serialize(&mut ser)
            .map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            })?;

        atomic_write(&self.path, &buf)?;
        info!(
            "configuration updated: coffee={}s espresso={}s",
            durations.coffee_duration_seconds, durations.espresso_duration_seconds
        );
        Ok(())
    }
}
