//! Grammar constants and per-kind entry encode/decode for the snapshot file.
//!
//! ```text
//! dump        := magic version (dbsection)* eof
//! magic       := "REDIS"              (5 bytes, ASCII)
//! version     := "0001"               (4 bytes, ASCII)
//! dbsection   := 0xFE db_number entry*
//! db_number   := length               (currently always encodes 1)
//! entry       := kind key payload
//! kind        := length               (0=string, 1=list, 2=set, 4=hash)
//! eof         := 0xFF
//! ```
//!
//! `0xFE` and `0xFF` numerically collide with length-tag bytes (both have
//! their top two bits set, same as the reserved-high-bits corner of the
//! 32-bit length form). The loader disambiguates by only checking for these
//! sentinels at the outer frame boundary — right after a complete entry or
//! right after the header — never mid-entry.

use std::fmt;

use crate::codec::{decode_bytes, decode_length, decode_value, encode_bytes, encode_length, encode_value, CodecError};

pub const MAGIC: &[u8; 5] = b"REDIS";
pub const VERSION: &[u8; 4] = b"0001";
pub const SECTION_START: u8 = 0xFE;
pub const EOF: u8 = 0xFF;
pub const DB_NUMBER: u64 = 1;

pub const KIND_STRING: u64 = 0;
pub const KIND_LIST: u64 = 1;
pub const KIND_SET: u64 = 2;
pub const KIND_HASH: u64 = 4;

/// One decoded `(kind, key, payload)` triple from a db section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    String { key: Vec<u8>, value: Vec<u8> },
    List { key: Vec<u8>, values: Vec<Vec<u8>> },
    Set { key: Vec<u8>, members: Vec<Vec<u8>> },
    Hash { key: Vec<u8>, fields: Vec<(Vec<u8>, Vec<u8>)> },
}

/// Errors decoding a dump file. Maps onto spec.md §7's `RecoveryError`:
/// every variant here is fatal and refuses startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DumpError {
    BadMagic,
    BadVersion,
    UnsupportedKind(u64),
    Codec(CodecError),
    UnexpectedEof,
}

impl fmt::Display for DumpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DumpError::BadMagic => write!(f, "dump file magic does not match \"REDIS\""),
            DumpError::BadVersion => write!(f, "dump file version does not match \"0001\""),
            DumpError::UnsupportedKind(k) => write!(f, "unsupported entry kind {k}"),
            DumpError::Codec(e) => write!(f, "dump codec error: {e}"),
            DumpError::UnexpectedEof => write!(f, "dump file truncated mid-entry"),
        }
    }
}

impl std::error::Error for DumpError {}

impl From<CodecError> for DumpError {
    fn from(e: CodecError) -> Self {
        DumpError::Codec(e)
    }
}

/// Appends the header (`magic || version`) to `out`.
pub fn write_header(out: &mut Vec<u8>) {
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(VERSION);
}

/// Checks and consumes a header from the front of `buf`, returning the
/// number of bytes consumed.
pub fn read_header(buf: &[u8]) -> Result<usize, DumpError> {
    let magic = buf.get(0..5).ok_or(DumpError::UnexpectedEof)?;
    if magic != MAGIC {
        return Err(DumpError::BadMagic);
    }
    let version = buf.get(5..9).ok_or(DumpError::UnexpectedEof)?;
    if version != VERSION {
        return Err(DumpError::BadVersion);
    }
    Ok(9)
}

/// Appends one entry's `kind key payload` encoding to `out`.
pub fn write_entry(out: &mut Vec<u8>, entry: &Entry) {
    match entry {
        Entry::String { key, value } => {
            out.extend_from_slice(&encode_length(KIND_STRING));
            out.extend_from_slice(&encode_bytes(key));
            out.extend_from_slice(&encode_value(value));
        }
        Entry::List { key, values } => {
            out.extend_from_slice(&encode_length(KIND_LIST));
            out.extend_from_slice(&encode_bytes(key));
            out.extend_from_slice(&encode_length(values.len() as u64));
            for v in values {
                out.extend_from_slice(&encode_bytes(v));
            }
        }
        Entry::Set { key, members } => {
            out.extend_from_slice(&encode_length(KIND_SET));
            out.extend_from_slice(&encode_bytes(key));
            out.extend_from_slice(&encode_length(members.len() as u64));
            for m in members {
                out.extend_from_slice(&encode_bytes(m));
            }
        }
        Entry::Hash { key, fields } => {
            out.extend_from_slice(&encode_length(KIND_HASH));
            out.extend_from_slice(&encode_bytes(key));
            out.extend_from_slice(&encode_length((fields.len() * 2) as u64));
            for (f, v) in fields {
                out.extend_from_slice(&encode_bytes(f));
                out.extend_from_slice(&encode_bytes(v));
            }
        }
    }
}

/// Decodes one entry from the front of `buf` (the `kind` length has not yet
/// been consumed by the caller). Returns the entry and total bytes consumed.
pub fn read_entry(buf: &[u8]) -> Result<(Entry, usize), DumpError> {
    let (kind, mut pos) = decode_length(buf)?;
    let (key, n) = decode_bytes(&buf[pos..])?;
    pos += n;
    match kind {
        KIND_STRING => {
            let (value, n) = decode_value(&buf[pos..])?;
            pos += n;
            Ok((Entry::String { key, value }, pos))
        }
        KIND_LIST => {
            let (count, n) = decode_length(&buf[pos..])?;
            pos += n;
            let mut values = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let (v, n) = decode_bytes(&buf[pos..])?;
                pos += n;
                values.push(v);
            }
            Ok((Entry::List { key, values }, pos))
        }
        KIND_SET => {
            let (count, n) = decode_length(&buf[pos..])?;
            pos += n;
            let mut members = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let (m, n) = decode_bytes(&buf[pos..])?;
                pos += n;
                members.push(m);
            }
            Ok((Entry::Set { key, members }, pos))
        }
        KIND_HASH => {
            let (field_count, n) = decode_length(&buf[pos..])?;
            pos += n;
            let pairs = field_count as usize / 2;
            let mut fields = Vec::with_capacity(pairs);
            for _ in 0..pairs {
                let (f, n) = decode_bytes(&buf[pos..])?;
                pos += n;
                let (v, n) = decode_bytes(&buf[pos..])?;
                pos += n;
                fields.push((f, v));
            }
            Ok((Entry::Hash { key, fields }, pos))
        }
        other => Err(DumpError::UnsupportedKind(other)),
    }
}
