//! The client-facing wire protocol.
//!
//! This module is deliberately minimal: the durability engine only needs a
//! `Frame` type it can serialize byte-exactly into the command journal, and
//! a parser good enough to read one request off a connection. Pipelining,
//! inline commands, and malformed-input hardening are not attempted.

pub mod frame;

pub use frame::{write_frame, Frame, FrameError};
