//! Variable-width length encoding.
//!
//! A length is a non-negative integer encoded using the two most-significant
//! bits of its first byte as a type tag:
//!
//! - `00xxxxxx`             — 6-bit length (0..63), 1 byte total.
//! - `01xxxxxx yyyyyyyy`    — 14-bit length (0..16383), 2 bytes total.
//! - `10000000 uuuuuuuu...` — 32-bit length in the following 4 bytes (big-endian), 5 bytes total.
//!   The low 6 bits of the tag byte are reserved and written as zero; a
//!   loader must not rely on them being zero.
//! - `11tttttt ...`         — not a length: an inline integer value. See
//!   [`crate::codec::value`].

use std::fmt;

const TAG_MASK: u8 = 0b1100_0000;
const TAG_6BIT: u8 = 0b0000_0000;
const TAG_14BIT: u8 = 0b0100_0000;
const TAG_32BIT: u8 = 0b1000_0000;
pub(crate) const TAG_INLINE_INT: u8 = 0b1100_0000;

const MAX_6BIT: u64 = 0x3F; // 63
const MAX_14BIT: u64 = 0x3FFF; // 16383
const MAX_32BIT: u64 = u32::MAX as u64;

/// Errors raised while decoding a length, byte string, or value field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// Fewer bytes were available than the tag byte promised.
    UnexpectedEof,
    /// The reserved inline-integer width (`t` in `11tttttt`) was neither 0, 1, nor 2.
    ReservedIntegerWidth(u8),
    /// A length exceeds what this encoding (or the caller's `usize`) can represent.
    LengthTooLarge,
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::UnexpectedEof => write!(f, "unexpected end of input while decoding"),
            CodecError::ReservedIntegerWidth(t) => {
                write!(f, "reserved inline-integer width tag {t}")
            }
            CodecError::LengthTooLarge => write!(f, "length exceeds representable range"),
        }
    }
}

impl std::error::Error for CodecError {}

/// Encodes `n` using the shortest of the three length forms that fits.
///
/// Panics if `n` exceeds `u32::MAX`; the format has no representation above
/// 32 bits and no caller in this crate produces such a length.
pub fn encode_length(n: u64) -> Vec<u8> {
    if n <= MAX_6BIT {
        vec![TAG_6BIT | (n as u8)]
    } else if n <= MAX_14BIT {
        let n = n as u16;
        vec![TAG_14BIT | ((n >> 8) as u8), (n & 0xFF) as u8]
    } else if n <= MAX_32BIT {
        let mut out = Vec::with_capacity(5);
        out.push(TAG_32BIT);
        out.extend_from_slice(&(n as u32).to_be_bytes());
        out
    } else {
        panic!("length {n} exceeds the 32-bit range this format supports");
    }
}

/// Decodes a length from the front of `buf`.
///
/// Returns the decoded value and the number of bytes consumed. Rejects
/// `11tttttt` tags outright — callers that might see an inline integer in
/// this position (there are none in this format; see [`crate::codec::value`])
/// must dispatch before calling this function.
pub fn decode_length(buf: &[u8]) -> Result<(u64, usize), CodecError> {
    let tag = *buf.first().ok_or(CodecError::UnexpectedEof)?;
    match tag & TAG_MASK {
        TAG_6BIT => Ok(((tag & 0x3F) as u64, 1)),
        TAG_14BIT => {
            let lo = *buf.get(1).ok_or(CodecError::UnexpectedEof)?;
            let hi6 = (tag & 0x3F) as u64;
            Ok(((hi6 << 8) | lo as u64, 2))
        }
        TAG_32BIT => {
            let bytes = buf.get(1..5).ok_or(CodecError::UnexpectedEof)?;
            let n = u32::from_be_bytes(bytes.try_into().unwrap());
            Ok((n as u64, 5))
        }
        _ => Err(CodecError::LengthTooLarge),
    }
}
