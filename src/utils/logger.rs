//! Logging utilities using the tracing framework

use std::fmt::Display;
use tracing_subscriber::EnvFilter;

/// Map the `-v` count to a tracing level filter
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",  // Default: only warnings and errors
        1 => "info",  // -v: info level
        2 => "debug", // -vv: debug level
        _ => "trace", // -vvv: trace level
    }
}

/// Install the global subscriber. Logs go to stderr so stdout only carries reports.
pub fn init(verbose: u8) {
    let filter = if verbose == 0 {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    } else {
        EnvFilter::new(level_for_verbosity(verbose))
    };

    // A second init (e.g. from tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log an informational message (wrapper around tracing::info)
pub fn log_info<T: Display>(msg: T) {
    tracing::info!("{}", msg);
}

/// Log a debug message (wrapper around tracing::debug)
pub fn log_debug<T: Display>(msg: T) {
    tracing::debug!("{}", msg);
}

/// Log a warning message (wrapper around tracing::warn)
pub fn log_warn<T: Display>(msg: T) {
    tracing::warn!("{}", msg);
}

/// Log an error message (wrapper around tracing::error)
pub fn log_error<T: Display>(msg: T) {
    tracing::error!("{}", msg);
}

/// Macro for convenient info logging
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::utils::logger::log_info(format!($($arg)*))
    };
}

/// Macro for convenient debug logging
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::utils::logger::log_debug(format!($($arg)*))
    };
}

/// Macro for convenient warning logging
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::utils::logger::log_warn(format!($($arg)*))
    };
}

/// Macro for convenient error logging
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::utils::logger::log_error(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_functions() {
        // These should not panic
        log_info("Test info message");
        log_debug("Test debug message");
        log_warn("Test warning message");
        log_error("Test error message");
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level_for_verbosity(0), "warn");
        assert_eq!(level_for_verbosity(1), "info");
        assert_eq!(level_for_verbosity(2), "debug");
        assert_eq!(level_for_verbosity(7), "trace");
    }

    #[test]
    fn test_init_twice() {
        init(2);
        init(0);
    }
}
