//! Unified error types for the brew controller.
//!
//! Every fallible store or actuator operation funnels into [`Error`], so
//! the evaluator can contain a failure to the brew type it happened in.

use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum Error {
    /// An on-disk store could not be read or written.
    #[error("store: {0}")]
    Store(#[from] StoreError),
    /// The relay could not be driven.
    #[error("actuator: {0}")]
    Actuator(#[from] ActuatorError),
    /// A duration configuration failed range validation.
    #[error("config: {0}")]
    Config(&'static str),
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum StoreError {
    /// Requested marker or record does not exist.
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),
    /// File content is not a `YYYY-MM-DD HH:MM:SS` timestamp.
    #[error("malformed timestamp {content:?} in {}", path.display())]
    Parse { path: PathBuf, content: String },
    /// Generic I/O failure on a store file.
    #[error("I/O on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// JSON (de)serialisation failure.
    #[error("JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            return Self::NotFound(path.into());
        }
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActuatorError {
    /// Claiming or driving the relay pin failed.
    #[error("GPIO write failed")]
    GpioWriteFailed,
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

pub type Result<T> = core::result::Result<T, Error>;
