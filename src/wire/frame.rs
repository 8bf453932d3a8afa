//! `Frame`: the tagged value every client request/response and every
//! journaled command is built from.
//!
//! The encoding is a line protocol modeled on a widely known cache server's
//! request format: a one-byte tag, a CRLF-terminated header, and for bulk
//! strings a CRLF-terminated payload. This must be byte-exact — the journal
//! replays commands by re-parsing exactly what the dispatcher received.

use std::fmt;
use std::io::{self, BufRead, Write};

/// A request/response value in the wire protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Simple(String),
    Error(String),
    Integer(i64),
    Bulk(Vec<u8>),
    Null,
    Array(Vec<Frame>),
}

/// Errors raised while parsing a frame off the wire (or out of the journal).
#[derive(Debug)]
pub enum FrameError {
    Io(io::Error),
    /// The line didn't end in `\r\n` where the protocol requires it.
    MissingCrlf,
    /// The tag byte wasn't one of `+-:$_*`.
    UnknownTag(u8),
    /// A length/count header wasn't a valid decimal integer.
    InvalidInteger,
    /// Connection closed with nothing to read.
    Eof,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::Io(e) => write!(f, "i/o error reading frame: {e}"),
            FrameError::MissingCrlf => write!(f, "frame line missing CRLF terminator"),
            FrameError::UnknownTag(b) => write!(f, "unknown frame tag byte {b:#04x}"),
            FrameError::InvalidInteger => write!(f, "frame header is not a valid integer"),
            FrameError::Eof => write!(f, "end of input while reading a frame"),
        }
    }
}

impl std::error::Error for FrameError {}

impl From<io::Error> for FrameError {
    fn from(e: io::Error) -> Self {
        FrameError::Io(e)
    }
}

impl Frame {
    /// Writes the byte-exact wire encoding of this frame to `out`.
    pub fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Frame::Simple(s) => {
                out.push(b'+');
                out.extend_from_slice(s.as_bytes());
                out.extend_from_slice(b"\r\n");
            }
            Frame::Error(s) => {
                out.push(b'-');
                out.extend_from_slice(s.as_bytes());
                out.extend_from_slice(b"\r\n");
            }
            Frame::Integer(n) => {
                out.push(b':');
                out.extend_from_slice(n.to_string().as_bytes());
                out.extend_from_slice(b"\r\n");
            }
            Frame::Bulk(b) => {
                out.push(b'$');
                out.extend_from_slice(b.len().to_string().as_bytes());
                out.extend_from_slice(b"\r\n");
                out.extend_from_slice(b);
                out.extend_from_slice(b"\r\n");
            }
            Frame::Null => {
                out.extend_from_slice(b"_\r\n");
            }
            Frame::Array(items) => {
                out.push(b'*');
                out.extend_from_slice(items.len().to_string().as_bytes());
                out.extend_from_slice(b"\r\n");
                for item in items {
                    item.encode(out);
                }
            }
        }
    }

    /// Convenience wrapper around [`Frame::encode`] for callers that just
    /// want the bytes (the journal; tests).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode(&mut out);
        out
    }

    /// Reads one frame from `r`. Used by both the connection handler and the
    /// journal replayer.
    pub fn decode(r: &mut impl BufRead) -> Result<Frame, FrameError> {
        let line = read_line(r)?;
        let (tag, rest) = line.split_first().ok_or(FrameError::Eof)?;
        match tag {
            b'+' => Ok(Frame::Simple(String::from_utf8_lossy(rest).into_owned())),
            b'-' => Ok(Frame::Error(String::from_utf8_lossy(rest).into_owned())),
            b':' => Ok(Frame::Integer(parse_i64(rest)?)),
            b'_' => Ok(Frame::Null),
            b'$' => {
                let len = parse_i64(rest)?;
                if len < 0 {
                    return Ok(Frame::Null);
                }
                let mut buf = vec![0u8; len as usize];
                r.read_exact(&mut buf)?;
                let mut crlf = [0u8; 2];
                r.read_exact(&mut crlf)?;
                if crlf != *b"\r\n" {
                    return Err(FrameError::MissingCrlf);
                }
                Ok(Frame::Bulk(buf))
            }
            b'*' => {
                let count = parse_i64(rest)?;
                let mut items = Vec::with_capacity(count.max(0) as usize);
                for _ in 0..count.max(0) {
                    items.push(Frame::decode(r)?);
                }
                Ok(Frame::Array(items))
            }
            other => Err(FrameError::UnknownTag(*other)),
        }
    }

    /// Interprets an `Array` of `Bulk` frames as a command line: the
    /// uppercased command name and its raw argument bytes. This is the only
    /// shape a real client request takes in this protocol.
    pub fn as_command(&self) -> Option<(String, Vec<Vec<u8>>)> {
        let Frame::Array(items) = self else {
            return None;
        };
        let mut parts = items.iter();
        let Frame::Bulk(name) = parts.next()? else {
            return None;
        };
        let name = String::from_utf8_lossy(name).to_uppercase();
        let mut args = Vec::with_capacity(items.len().saturating_sub(1));
        for item in parts {
            match item {
                Frame::Bulk(b) => args.push(b.clone()),
                _ => return None,
            }
        }
        Some((name, args))
    }

    /// Builds the command-line `Array` shape from a name and raw arguments —
    /// the inverse of [`Frame::as_command`]. Used to re-frame a command for
    /// the journal.
    pub fn command(name: &str, args: &[Vec<u8>]) -> Frame {
        let mut items = Vec::with_capacity(args.len() + 1);
        items.push(Frame::Bulk(name.as_bytes().to_vec()));
        items.extend(args.iter().cloned().map(Frame::Bulk));
        Frame::Array(items)
    }
}

fn read_line(r: &mut impl BufRead) -> Result<Vec<u8>, FrameError> {
    let mut line = Vec::new();
    let n = r.read_until(b'\n', &mut line)?;
    if n == 0 {
        return Err(FrameError::Eof);
    }
    if line.len() < 2 || &line[line.len() - 2..] != b"\r\n" {
        return Err(FrameError::MissingCrlf);
    }
    line.truncate(line.len() - 2);
    Ok(line)
}

fn parse_i64(bytes: &[u8]) -> Result<i64, FrameError> {
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(FrameError::InvalidInteger)
}

/// Writes `frame` to `w` and flushes. Shared by the connection handler and
/// anything else that needs to hand a reply straight to a socket.
pub fn write_frame(w: &mut impl Write, frame: &Frame) -> io::Result<()> {
    w.write_all(&frame.to_bytes())?;
    w.flush()
}
