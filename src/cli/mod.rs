//! Command-line surface: argument parsing (`args`) and the verbosity global
//! the rest of the crate logs through (`constants`).

pub mod args;
pub mod constants;

pub use args::Cli;
