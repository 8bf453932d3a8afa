//! Value fields — used only for string-typed top-level values.
//!
//! A value field is either a byte string (see [`crate::codec::bytestring`])
//! or an inline integer: `11tttttt` followed by `t`'s width in raw big-endian
//! bytes (`t=0` → i8, `t=1` → i16, `t=2` → i32). Other `t` values are
//! reserved and a decoder must reject them.
//!
//! This form must never appear where a pure length is expected (keys, member
//! counts) — the inline-integer tag numerically overlaps the reserved
//! high bits of the 32-bit length tag, and disambiguation depends entirely on
//! which field the caller is decoding.

use super::bytestring::{decode_bytes, encode_bytes};
use super::length::{CodecError, TAG_INLINE_INT};

/// Encodes a string value, preferring the smallest inline-integer form when
/// `s` is valid UTF-8 that parses as a signed integer fitting in 8/16/32
/// bits; falls back to a byte string otherwise.
pub fn encode_value(s: &[u8]) -> Vec<u8> {
    if let Some(text) = std::str::from_utf8(s).ok() {
        if let Ok(n) = text.parse::<i64>() {
            if let Ok(n8) = i8::try_from(n) {
                return vec![TAG_INLINE_INT, n8 as u8];
            }
            if let Ok(n16) = i16::try_from(n) {
                let mut out = vec![TAG_INLINE_INT | 1];
                out.extend_from_slice(&n16.to_be_bytes());
                return out;
            }
            if let Ok(n32) = i32::try_from(n) {
                let mut out = vec![TAG_INLINE_INT | 2];
                out.extend_from_slice(&n32.to_be_bytes());
                return out;
            }
        }
    }
    encode_bytes(s)
}

/// Decodes a value field from the front of `buf`, materializing an inline
/// integer to its decimal text representation.
pub fn decode_value(buf: &[u8]) -> Result<(Vec<u8>, usize), CodecError> {
    let tag = *buf.first().ok_or(CodecError::UnexpectedEof)?;
    if tag & 0b1100_0000 != TAG_INLINE_INT {
        return decode_bytes(buf);
    }
    let width = tag & 0x3F;
    match width {
        0 => {
            let b = *buf.get(1).ok_or(CodecError::UnexpectedEof)?;
            Ok(((b as i8).to_string().into_bytes(), 2))
        }
        1 => {
            let bytes = buf.get(1..3).ok_or(CodecError::UnexpectedEof)?;
            let n = i16::from_be_bytes(bytes.try_into().unwrap());
            Ok((n.to_string().into_bytes(), 3))
        }
        2 => {
            let bytes = buf.get(1..5).ok_or(CodecError::UnexpectedEof)?;
            let n = i32::from_be_bytes(bytes.try_into().unwrap());
            Ok((n.to_string().into_bytes(), 5))
        }
        other => Err(CodecError::ReservedIntegerWidth(other)),
    }
}
