//! Relay lock file.
//!
//! Implements [`LockPort`] with a single `relay.lock` created via
//! `create_new`. Both brew types drive the same relay line, so one pass of
//! any type excludes every other pass, in this process or an overlapping
//! cron tick.
//!
//! The file records the holder's pid and brew type. A lock is evicted only
//! when it is older than `stale_after` *and* its holder is not a running
//! brewtimer process; a slow pass that is still alive keeps its lock.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::LockPort;
use crate::brew::BrewType;
use crate::error::StoreError;

use super::fs::remove_if_exists;

const LOCK_FILE: &str = "relay.lock";

#[derive(Debug, Serialize, Deserialize)]
struct LockRecord {
    pid: u32,
    brew: BrewType,
}

pub struct FileLocks {
    path: PathBuf,
    stale_after: Duration,
}

/// Removes its lock file when dropped.
#[derive(Debug)]
pub struct LockGuard {
    path: PathBuf,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Err(e) = remove_if_exists(&self.path) {
            warn!("failed to release {}: {}", self.path.display(), e);
        }
    }
}

impl FileLocks {
    pub fn new(dir: impl Into<PathBuf>, stale_after: Duration) -> Self {
        Self {
            path: dir.into().join(LOCK_FILE),
            stale_after,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn holder(&self) -> Option<LockRecord> {
        std::fs::read(&self.path)
            .ok()
            .and_then(|b| serde_json::from_slice(&b).ok())
    }

    fn age(&self) -> Option<Duration> {
        std::fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|t| SystemTime::now().duration_since(t).ok())
    }

    /// Whether an existing lock may be removed.
    fn evictable(&self) -> bool {
        let Some(age) = self.age() else {
            // Vanished between the failed create and now.
            return true;
        };
        if age <= self.stale_after {
            return false;
        }
        match self.holder() {
            Some(record) if holder_alive(record.pid) == Some(true) => {
                warn!(
                    "{} held {}s by live {} pass (pid {}), not evicting",
                    self.path.display(),
                    age.as_secs(),
                    record.brew,
                    record.pid
                );
                false
            }
            holder => {
                warn!(
                    "evicting stale lock {} (holder {:?})",
                    self.path.display(),
                    holder.map(|r| r.pid)
                );
                true
            }
        }
    }
}

/// `Some(true)` when `pid` is a running instance of this executable.
/// A pid reused by some other program counts as dead.
#[cfg(target_os = "linux")]
fn holder_alive(pid: u32) -> Option<bool> {
    let proc_dir = Path::new("/proc").join(pid.to_string());
    if !proc_dir.exists() {
        return Some(false);
    }
    match (std::fs::read_link(proc_dir.join("exe")), std::env::current_exe()) {
        (Ok(theirs), Ok(ours)) => Some(theirs == ours),
        // Process exists but cannot be inspected.
        _ => Some(true),
    }
}

#[cfg(not(target_os = "linux"))]
fn holder_alive(_pid: u32) -> Option<bool> {
    None
}

impl LockPort for FileLocks {
    type Guard = LockGuard;

    fn try_acquire(&self, brew: BrewType) -> Result<Option<LockGuard>, StoreError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
        }
        let path = &self.path;

        for attempt in 0..2 {
            match OpenOptions::new().write(true).create_new(true).open(path) {
                Ok(mut file) => {
                    let record = LockRecord {
                        pid: std::process::id(),
                        brew,
                    };
                    let guard = LockGuard { path: path.clone() };
                    let json = serde_json::to_vec(&record).map_err(|source| StoreError::Json {
                        path: path.clone(),
                        source,
                    })?;
                    file.write_all(&json).map_err(|e| StoreError::io(path, e))?;
                    return Ok(Some(guard));
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    if attempt == 0 && self.evictable() {
                        remove_if_exists(path)?;
                        continue;
                    }
                    debug!(
                        "{}: relay held by {:?}",
                        brew,
                        self.holder().map(|r| r.brew)
                    );
                    return Ok(None);
                }
                Err(e) => return Err(StoreError::io(path, e)),
            }
        }
        Ok(None)
    }
}
