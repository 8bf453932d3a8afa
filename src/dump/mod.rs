//! The binary snapshot: a self-describing file holding the entire keyspace,
//! written periodically by [`writer::DumpWriter`] and read once at startup
//! by [`loader::load`].

pub mod format;
pub mod loader;
pub mod writer;

pub use format::{DumpError, Entry};
pub use loader::load;
pub use writer::DumpWriter;
