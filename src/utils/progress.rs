//! Progress indicators for long-running operations

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a spinner for indeterminate operations.
/// A hidden bar is returned when progress output is disabled.
pub fn create_spinner(message: &str, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(
            style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Helper to run a function with a spinner and show result
pub fn with_spinner_result<F, T, E>(
    message: &str,
    success_msg: &str,
    enabled: bool,
    f: F,
) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E>,
    E: std::fmt::Display,
{
    let pb = create_spinner(message, enabled);
    match f() {
        Ok(result) => {
            pb.finish_with_message(format!("✓ {}", success_msg));
            Ok(result)
        }
        Err(e) => {
            pb.finish_with_message(format!("✗ Failed: {}", e));
            Err(e)
        }
    }
}
