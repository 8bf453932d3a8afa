//! Startup recovery: load the dump, then replay the journal, then (and only
//! then) let the caller start accepting client connections.

use std::fmt;
use std::path::Path;

use crate::commands;
use crate::dump::loader::{self, LoadError};
use crate::journal::{Journal, ReplayError};
use crate::keyspace::Keyspace;

/// Fatal startup error. Per spec.md §7, both variants refuse to start the
/// process rather than serve from partially-recovered state.
#[derive(Debug)]
pub enum RecoveryError {
    Dump(LoadError),
    Journal(ReplayError),
}

impl fmt::Display for RecoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryError::Dump(e) => write!(f, "dump recovery failed: {e}"),
            RecoveryError::Journal(e) => write!(f, "journal replay failed: {e}"),
        }
    }
}

impl std::error::Error for RecoveryError {}

impl From<LoadError> for RecoveryError {
    fn from(e: LoadError) -> Self {
        RecoveryError::Dump(e)
    }
}

impl From<ReplayError> for RecoveryError {
    fn from(e: ReplayError) -> Self {
        RecoveryError::Journal(e)
    }
}

/// Loads `dump_path` into `keyspace`, then replays `journal_path` on top of
/// it by dispatching each frame through the same command handlers a live
/// client would hit. The dump supplies the large periodic state; the
/// journal supplies mutations since the last successful rename.
pub fn run(dump_path: &Path, journal_path: &Path, keyspace: &Keyspace) -> Result<(), RecoveryError> {
    loader::load(dump_path, keyspace)?;
    Journal::replay(journal_path, |frame| {
        if let Some((name, args)) = frame.as_command() {
            commands::dispatch(&name, &args, keyspace);
        }
    })?;
    Ok(())
}
