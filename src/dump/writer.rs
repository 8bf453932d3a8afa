//! Periodic snapshot writer.
//!
//! A long-lived worker thread wakes on a `crossbeam_channel` ticker
//! (mirroring how the teacher crate's thread pool used
//! `crossbeam_channel::bounded` as a coordination primitive), writes the
//! whole keyspace to a freshly-truncated temp file, and renames it onto the
//! canonical dump path on success. `shutdown` closes the tick source and
//! waits for any in-flight cycle to finish its rename before the thread
//! exits — no fire-and-forget.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, select, tick, Sender};

use crate::config;
use crate::displaylevel;
use crate::dump::format::{self, Entry};
use crate::journal::Journal;
use crate::keyspace::Keyspace;

/// Non-fatal I/O failure during a dump cycle (spec.md §7): the previous dump
/// remains canonical since the rename never happened, and the caller just
/// logs and waits for the next tick.
#[derive(Debug)]
pub struct DumpIoError(pub io::Error);

impl fmt::Display for DumpIoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dump cycle failed: {}", self.0)
    }
}

impl std::error::Error for DumpIoError {}

impl From<io::Error> for DumpIoError {
    fn from(e: io::Error) -> Self {
        DumpIoError(e)
    }
}

/// Runs one complete snapshot cycle: strings, then lists, then sets, then
/// hashes, each under its own mapping guard, released before the next
/// mapping starts. Writes to `database_temp.rdb` and renames onto
/// `database.rdb` only on full success, then resets `journal` to empty —
/// its contents are now fully represented by the snapshot that just became
/// canonical (spec.md §4.6).
pub fn write_now(data_dir: &Path, keyspace: &Keyspace, journal: &Mutex<Journal>) -> Result<(), DumpIoError> {
    let temp_path = data_dir.join(config::DUMP_TEMP_FILE_NAME);
    let final_path = data_dir.join(config::DUMP_FILE_NAME);

    let mut buf = Vec::new();
    format::write_header(&mut buf);
    buf.push(format::SECTION_START);
    buf.extend_from_slice(&crate::codec::encode_length(format::DB_NUMBER));

    {
        let strings = keyspace.strings.lock().unwrap();
        for (key, value) in strings.iter() {
            format::write_entry(&mut buf, &Entry::String { key: key.to_vec(), value: value.to_vec() });
        }
    }
    {
        let lists = keyspace.lists.lock().unwrap();
        for (key, values) in lists.iter() {
            format::write_entry(&mut buf, &Entry::List { key: key.to_vec(), values });
        }
    }
    {
        let sets = keyspace.sets.lock().unwrap();
        for (key, members) in sets.iter() {
            // `Sets::srem` can leave a zero-member set behind; the writer
            // suppresses it rather than round-tripping an empty entry.
            if members.is_empty() {
                continue;
            }
            let members: Vec<Vec<u8>> = members.into_iter().map(|m| m.to_vec()).collect();
            format::write_entry(&mut buf, &Entry::Set { key: key.to_vec(), members });
        }
    }
    {
        let hashes = keyspace.hashes.lock().unwrap();
        for (key, fields) in hashes.iter() {
            if fields.is_empty() {
                continue;
            }
            let fields: Vec<(Vec<u8>, Vec<u8>)> =
                fields.into_iter().map(|(f, v)| (f.to_vec(), v.to_vec())).collect();
            format::write_entry(&mut buf, &Entry::Hash { key: key.to_vec(), fields });
        }
    }

    buf.push(format::EOF);

    let mut file = File::create(&temp_path)?;
    file.write_all(&buf)?;
    file.sync_all()?;
    drop(file);
    fs::rename(&temp_path, &final_path)?;
    journal.lock().unwrap().reset()?;
    Ok(())
}

/// The background dump task's handle. Dropping this without calling
/// [`DumpWriter::shutdown`] leaves the worker thread detached and running;
/// always shut it down explicitly on the way out.
pub struct DumpWriter {
    shutdown_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl DumpWriter {
    /// Spawns the worker thread, ticking every `interval`. `journal` is the
    /// same handle the acceptor serializes appends through; each cycle
    /// resets it after a successful rename.
    pub fn start(
        data_dir: PathBuf,
        keyspace: Arc<Keyspace>,
        journal: Arc<Mutex<Journal>>,
        interval: Duration,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);
        let handle = thread::spawn(move || {
            let ticker = tick(interval);
            loop {
                select! {
                    recv(ticker) -> _ => {
                        if let Err(e) = write_now(&data_dir, &keyspace, &journal) {
                            displaylevel!(1, "{}\n", e);
                        }
                    }
                    recv(shutdown_rx) -> _ => break,
                }
            }
        });
        DumpWriter {
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    /// Stops the ticker and blocks until the worker thread exits. Any cycle
    /// already in flight completes (including its rename) before this
    /// returns.
    pub fn shutdown(mut self) {
        self.shutdown_tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
