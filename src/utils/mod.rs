//! Utility modules for xpk

pub mod dryrun;
pub mod errors;
pub mod logger;
pub mod prereqs;
pub mod progress;
pub mod prompt;
pub mod table;

// Re-export commonly used items
pub use errors::{XpkError, display_error_and_exit, enhance_error};
pub use logger::{log_error, log_info, log_warn};
pub use prereqs::{CommonPrereqs, Prerequisite};
pub use prompt::confirm;
pub use table::{OutputFormat, write_report};
