//! Verbosity global and the `displaylevel!` macro family.
//!
//! There is no logging crate dependency here; output goes straight to
//! stderr gated on a crate-level atomic verbosity, the same mechanism the
//! teacher crate's CLI used for its own diagnostics.

use std::sync::atomic::{AtomicU32, Ordering};

pub const PROGRAM_NAME: &str = "rekvd";

// 0 = no output; 1 = errors only; 2 = normal (downgradable); 3 = non-downgradable; 4 = verbose
static DISPLAY_LEVEL: AtomicU32 = AtomicU32::new(2);

/// Returns the current display level.
#[inline]
pub fn display_level() -> u32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

/// Sets the display level. `-v` repeated on the command line raises it.
#[inline]
pub fn set_display_level(level: u32) {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
}

/// Conditionally print to stderr at or above `level`.
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::cli::constants::display_level() >= $level {
            eprint!($($arg)*);
        }
    };
}
