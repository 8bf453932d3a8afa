//! Byte strings: a length prefix (one of the three length forms) followed by
//! exactly that many raw bytes.

use super::length::{decode_length, encode_length, CodecError};

/// Encodes `bytes` as a length-prefixed byte string.
pub fn encode_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut out = encode_length(bytes.len() as u64);
    out.extend_from_slice(bytes);
    out
}

/// Decodes a length-prefixed byte string from the front of `buf`.
///
/// Returns the decoded bytes (copied) and the total number of bytes consumed
/// (length prefix + payload).
pub fn decode_bytes(buf: &[u8]) -> Result<(Vec<u8>, usize), CodecError> {
    let (len, prefix_len) = decode_length(buf)?;
    let len = len as usize;
    let payload = buf
        .get(prefix_len..prefix_len + len)
        .ok_or(CodecError::UnexpectedEof)?;
    Ok((payload.to_vec(), prefix_len + len))
}
