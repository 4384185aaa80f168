//! Progress Mode - controls progress bar display
//!
//! Quiet mode hides progress bars process-wide (e.g. when stdout carries
//! machine-readable output or the user passed `--quiet`).

use std::sync::atomic::{AtomicBool, Ordering};

static QUIET_MODE: AtomicBool = AtomicBool::new(false);

pub fn enable_quiet_mode() {
    QUIET_MODE.store(true, Ordering::Relaxed);
}

#[cfg(test)]
fn disable_quiet_mode() {
    QUIET_MODE.store(false, Ordering::Relaxed);
}

pub fn is_quiet_mode() -> bool {
    QUIET_MODE.load(Ordering::Relaxed)
}

#[macro_export]
macro_rules! quiet_eprintln {
    ($($arg:tt)*) => {
        if !$crate::progress_mode::is_quiet_mode() {
            eprintln!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_mode_toggle() {
        enable_quiet_mode();
        assert!(is_quiet_mode());
        disable_quiet_mode();
        assert!(!is_quiet_mode());
    }
}
