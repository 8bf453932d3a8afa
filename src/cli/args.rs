//! Command-line argument parsing for `rekvd`, via `clap`'s derive API.

use std::path::PathBuf;

use clap::Parser;

use crate::config;

/// Single-node in-memory key-value store with journal + snapshot durability.
#[derive(Parser, Debug)]
#[command(name = crate::cli::constants::PROGRAM_NAME, version, about)]
pub struct Cli {
    /// Working directory holding database.rdb, database_temp.rdb, and database.aof.
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// TCP port to accept client connections on.
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Seconds between snapshot cycles.
    #[arg(long, value_name = "SECS")]
    pub dump_interval_secs: Option<u64>,

    /// Increase verbosity. Repeatable (-v, -vv, -vvv).
    #[arg(short, long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(config::data_dir_from_env()))
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or_else(config::port_from_env)
    }

    pub fn dump_interval(&self) -> std::time::Duration {
        match self.dump_interval_secs {
            Some(secs) => std::time::Duration::from_secs(secs),
            None => config::dump_interval_from_env(),
        }
    }

    /// Maps `-v` repetitions onto the `displaylevel!` scale, starting from
    /// the default (2, "normal").
    pub fn display_level(&self) -> u32 {
        2 + self.verbose as u32
    }
}
