//! Error types for the watch subsystem.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from watch-session operations.
///
/// Only root-level problems and caller misuse surface here. Registration
/// failures for individual subdirectories degrade that subtree's
/// observability and are logged, never returned.
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Failed to initialize watcher: {reason}")]
    InitFailed { reason: String },

    #[error("Watch root {root} does not exist or is not a directory")]
    RootNotFound { root: PathBuf },

    #[error("Cannot watch root {root}: {reason}")]
    RootWatchFailed { root: PathBuf, reason: String },

    #[error("Session is already watching {root}")]
    AlreadyWatching { root: PathBuf },
}

impl From<notify::Error> for WatchError {
    fn from(e: notify::Error) -> Self {
        WatchError::InitFailed {
            reason: e.to_string(),
        }
    }
}
