//! Loads a snapshot file into a fresh [`Keyspace`] at startup.
//!
//! If the file is absent or empty, a fresh `magic || version || eof` dump is
//! written and the keyspace is left empty — this is scenario 6 of spec.md
//! §8 (a zero-byte `database.rdb` is not an error).

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::codec::decode_length;
use crate::dump::format::{self, DumpError, Entry};
use crate::keyspace::Keyspace;

/// Fatal startup error: a malformed or unrecoverable dump file. Per spec.md
/// §7, partial recovery is never acceptable — the process refuses to start.
#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    Format(DumpError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "i/o error reading dump file: {e}"),
            LoadError::Format(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        LoadError::Io(e)
    }
}

impl From<DumpError> for LoadError {
    fn from(e: DumpError) -> Self {
        LoadError::Format(e)
    }
}

/// Reads `path` and applies every entry to `keyspace`. Creates an empty,
/// well-formed dump file if `path` doesn't exist or is zero bytes.
pub fn load(path: &Path, keyspace: &Keyspace) -> Result<(), LoadError> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    if bytes.is_empty() {
        let mut fresh = Vec::new();
        format::write_header(&mut fresh);
        fresh.push(format::EOF);
        fs::write(path, &fresh)?;
        return Ok(());
    }

    let mut pos = format::read_header(&bytes)?;
    loop {
        let tag = *bytes.get(pos).ok_or(DumpError::UnexpectedEof)?;
        if tag == format::EOF {
            break;
        }
        if tag == format::SECTION_START {
            pos += 1;
            let (_db_number, consumed) = decode_length(&bytes[pos..])?;
            pos += consumed;
            continue;
        }
        let (entry, consumed) = format::read_entry(&bytes[pos..])?;
        pos += consumed;
        apply(keyspace, entry);
    }
    Ok(())
}

fn apply(keyspace: &Keyspace, entry: Entry) {
    match entry {
        Entry::String { key, value } => keyspace.set(&key, value),
        Entry::List { key, values } => {
            if !values.is_empty() {
                keyspace.rpush(&key, values);
            }
        }
        Entry::Set { key, members } => {
            keyspace.sadd(&key, members);
        }
        Entry::Hash { key, fields } => {
            for (field, value) in fields {
                keyspace.hset(&key, &field, value);
            }
        }
    }
}
