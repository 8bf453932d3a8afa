//! `rekv`: a single-node, in-memory key-value store with a crash-recoverable
//! durability engine — an append-only command journal plus a periodic
//! binary snapshot.
//!
//! The store itself ([`keyspace::Keyspace`]) and the binary codec it's
//! persisted with ([`codec`]) are the load-bearing pieces. The wire
//! protocol ([`wire`]), command dispatch ([`commands`]), and TCP acceptor
//! (`rekvd`'s `main`) exist only to make the crate runnable end-to-end and
//! are intentionally thin.

pub mod cli;
pub mod codec;
pub mod commands;
pub mod config;
pub mod dump;
pub mod journal;
pub mod keyspace;
pub mod recovery;
pub mod wire;

pub use journal::Journal;
pub use keyspace::Keyspace;
pub use recovery::RecoveryError;
pub use wire::Frame;
