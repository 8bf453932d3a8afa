//! Append-only journal of mutating commands, in wire-frame form.
//!
//! Opened once for append at startup; every accepted mutation is re-framed
//! and appended before the command takes effect in the keyspace (spec.md
//! §5's ordering guarantee). Replay re-parses the file from the front and
//! hands each frame to a caller-supplied handler, which is the same
//! dispatch path a live client request would take.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::wire::{Frame, FrameError};

/// Fatal, per-command error: the mutation is refused rather than applied
/// without durability (spec.md §7).
#[derive(Debug)]
pub struct JournalIoError(pub io::Error);

impl fmt::Display for JournalIoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "journal write failed: {}", self.0)
    }
}

impl std::error::Error for JournalIoError {}

/// Errors encountered while replaying an existing journal file at startup.
#[derive(Debug)]
pub enum ReplayError {
    Io(io::Error),
    Frame(FrameError),
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayError::Io(e) => write!(f, "i/o error replaying journal: {e}"),
            ReplayError::Frame(e) => write!(f, "malformed journal frame: {e}"),
        }
    }
}

impl std::error::Error for ReplayError {}

impl From<io::Error> for ReplayError {
    fn from(e: io::Error) -> Self {
        ReplayError::Io(e)
    }
}

impl From<FrameError> for ReplayError {
    fn from(e: FrameError) -> Self {
        ReplayError::Frame(e)
    }
}

/// A handle on the append-only journal file, kept open for the life of the
/// process. There is exactly one writer; the dispatcher serializes appends
/// before applying the command to the keyspace.
pub struct Journal {
    path: PathBuf,
    file: File,
}

impl Journal {
    /// Opens `path` for append, creating it if absent.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Journal { path, file })
    }

    /// Appends `frame`'s wire encoding and flushes to the kernel.
    ///
    /// A failure here is fatal for the command that triggered it (spec.md
    /// §7): the caller must not apply the mutation to the keyspace.
    pub fn append(&mut self, frame: &Frame) -> Result<(), JournalIoError> {
        let bytes = frame.to_bytes();
        self.file.write_all(&bytes).map_err(JournalIoError)?;
        self.file.flush().map_err(JournalIoError)?;
        Ok(())
    }

    /// Replays every frame in the journal from offset 0, calling `handler`
    /// for each. Used once at startup, before the acceptor starts.
    pub fn replay(path: impl AsRef<Path>, mut handler: impl FnMut(Frame)) -> Result<(), ReplayError> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        let mut reader = BufReader::new(file);
        loop {
            match Frame::decode(&mut reader) {
                Ok(frame) => handler(frame),
                Err(FrameError::Eof) => break,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// The path this journal was opened from, for diagnostics.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Empties the journal file in place. Called only once a dump cycle's
    /// rename has succeeded, so every mutation the journal held is now
    /// represented in the snapshot; after this, the journal again carries
    /// only mutations since that rename (spec.md §4.6).
    ///
    /// Append-mode writes always target the current end of file, so no seek
    /// is needed here — the next `append` lands at offset 0.
    pub fn reset(&mut self) -> io::Result<()> {
        self.file.set_len(0)?;
        self.file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn append_then_replay_recovers_frames() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("database.aof");

        let mut journal = Journal::open(&path).unwrap();
        let set_a = Frame::command("SET", &[b"a".to_vec(), b"1".to_vec()]);
        let set_b = Frame::command("SET", &[b"b".to_vec(), b"2".to_vec()]);
        journal.append(&set_a).unwrap();
        journal.append(&set_b).unwrap();
        drop(journal);

        let mut replayed = Vec::new();
        Journal::replay(&path, |f| replayed.push(f)).unwrap();
        assert_eq!(replayed, vec![set_a, set_b]);
    }

    #[test]
    fn replay_of_missing_file_is_a_noop() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("does-not-exist.aof");
        let mut calls = 0;
        Journal::replay(&path, |_| calls += 1).unwrap();
        assert_eq!(calls, 0);
    }

    #[test]
    fn reset_empties_the_file_and_further_appends_start_fresh() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("database.aof");

        let mut journal = Journal::open(&path).unwrap();
        journal.append(&Frame::command("SET", &[b"a".to_vec(), b"1".to_vec()])).unwrap();
        journal.reset().unwrap();

        let mut replayed = Vec::new();
        Journal::replay(&path, |f| replayed.push(f)).unwrap();
        assert!(replayed.is_empty());

        let set_b = Frame::command("SET", &[b"b".to_vec(), b"2".to_vec()]);
        journal.append(&set_b).unwrap();
        drop(journal);

        let mut replayed = Vec::new();
        Journal::replay(&path, |f| replayed.push(f)).unwrap();
        assert_eq!(replayed, vec![set_b]);
    }

    #[test]
    fn reopening_an_existing_journal_appends_rather_than_truncates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("database.aof");

        let mut first = Journal::open(&path).unwrap();
        first.append(&Frame::command("SET", &[b"a".to_vec(), b"1".to_vec()])).unwrap();
        drop(first);

        let mut second = Journal::open(&path).unwrap();
        second.append(&Frame::command("SET", &[b"b".to_vec(), b"2".to_vec()])).unwrap();
        drop(second);

        let mut replayed = Vec::new();
        Journal::replay(&path, |f| replayed.push(f)).unwrap();
        assert_eq!(replayed.len(), 2);
    }
}
