//! Length and value encoding — the binary contract the journal and the
//! snapshot writer/loader both build on.
//!
//! Ported to a single pair of pure, allocation-light functions per concern:
//! no I/O, no locking, fully round-trippable. This is the part of the
//! on-disk format that must never drift between the writer and the loader.

pub mod bytestring;
pub mod length;
pub mod value;

pub use bytestring::{decode_bytes, encode_bytes};
pub use length::{decode_length, encode_length, CodecError};
pub use value::{decode_value, encode_value};
