//! Run checkpoint for the video-metadata harvester.
//!
//! The checkpoint is a single UTC timestamp. It is read once when a run
//! starts and written once when the run completes; nothing touches it in
//! between, so a crashed run re-covers the same window next time.

use std::io::ErrorKind;
use std::path::Path;

use chrono::{DateTime, Utc};
use ytwatch_core::parse_utc_timestamp;

use crate::error::StoreError;
use crate::sink::{ensure_parent, partial_path};

/// What was found in the checkpoint file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckpointRead {
    Found(DateTime<Utc>),
    Absent,
    Unparsable(String),
}

impl CheckpointRead {
    /// The cutoff to filter against; `now` when the file was absent or bad.
    #[must_use]
    pub fn cutoff_or(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            CheckpointRead::Found(ts) => *ts,
            CheckpointRead::Absent | CheckpointRead::Unparsable(_) => now,
        }
    }
}

/// Reads the checkpoint at `path`.
///
/// # Errors
///
/// Returns [`StoreError::Io`] for any I/O failure other than the file not
/// existing.
pub fn read_checkpoint(path: impl AsRef<Path>) -> Result<CheckpointRead, StoreError> {
    let path = path.as_ref();
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(CheckpointRead::Absent),
        Err(e) => return Err(StoreError::io(path, e)),
    };

    let trimmed = raw.trim();
    match parse_utc_timestamp(trimmed) {
        Ok(ts) => Ok(CheckpointRead::Found(ts)),
        Err(_) => {
            tracing::warn!(
                path = %path.display(),
                raw = trimmed,
                "checkpoint is not a valid timestamp"
            );
            Ok(CheckpointRead::Unparsable(trimmed.to_owned()))
        }
    }
}

/// Overwrites the checkpoint with `ts`.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file cannot be written or renamed.
pub fn write_checkpoint(path: impl AsRef<Path>, ts: DateTime<Utc>) -> Result<(), StoreError> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let staging = partial_path(path);
    std::fs::write(&staging, ts.to_rfc3339()).map_err(|e| StoreError::io(&staging, e))?;
    std::fs::rename(&staging, path).map_err(|e| StoreError::io(path, e))
}
