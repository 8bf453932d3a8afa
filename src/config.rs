//! Runtime configuration constants.
//!
//! Named constants with environment-variable overrides, read once at process
//! start by [`crate::cli`]. Nothing here is read mid-run; a running process
//! keeps whatever values it started with.

use std::time::Duration;

/// How often the dump writer runs a snapshot cycle.
/// Overridable with `REKV_DUMP_INTERVAL_SECS`.
pub const DUMP_INTERVAL_DEFAULT: Duration = Duration::from_secs(20);

/// Default TCP port for the client-facing listener.
/// Overridable with `REKV_PORT`.
pub const DEFAULT_PORT: u16 = 6380;

/// Default working directory holding the dump and journal files.
/// Overridable with `REKV_DATA_DIR`.
pub const DEFAULT_DATA_DIR: &str = ".";

/// Canonical snapshot file name.
pub const DUMP_FILE_NAME: &str = "database.rdb";

/// Name of the freshly-truncated snapshot written during a dump cycle, renamed
/// onto [`DUMP_FILE_NAME`] on success.
pub const DUMP_TEMP_FILE_NAME: &str = "database_temp.rdb";

/// Append-only mutating-command journal file name.
pub const JOURNAL_FILE_NAME: &str = "database.aof";

/// Reads `REKV_DUMP_INTERVAL_SECS`, falling back to [`DUMP_INTERVAL_DEFAULT`].
pub fn dump_interval_from_env() -> Duration {
    std::env::var("REKV_DUMP_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(DUMP_INTERVAL_DEFAULT)
}

/// Reads `REKV_PORT`, falling back to [`DEFAULT_PORT`].
pub fn port_from_env() -> u16 {
    std::env::var("REKV_PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Reads `REKV_DATA_DIR`, falling back to [`DEFAULT_DATA_DIR`].
pub fn data_dir_from_env() -> String {
    std::env::var("REKV_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_interval_default_is_twenty_seconds() {
        assert_eq!(DUMP_INTERVAL_DEFAULT, Duration::from_secs(20));
    }

    #[test]
    fn file_names_match_external_interface_layout() {
        assert_eq!(DUMP_FILE_NAME, "database.rdb");
        assert_eq!(DUMP_TEMP_FILE_NAME, "database_temp.rdb");
        assert_eq!(JOURNAL_FILE_NAME, "database.aof");
    }
}
