//! Dry-run mode utilities

use colored::Colorize;

/// Log a dry-run action
pub fn log_action(action: &str) {
    println!("  {} {}", "[DRY RUN]".cyan().bold(), action);
}

/// Execute function only if not in dry-run mode.
/// Returns Ok(()) in dry-run mode without executing.
pub fn exec_unless_dry_run<F>(dry_run: bool, action_desc: &str, f: F) -> anyhow::Result<()>
where
    F: FnOnce() -> anyhow::Result<()>,
{
    if dry_run {
        log_action(action_desc);
        Ok(())
    } else {
        f()
    }
}

/// Render a command line for display, quoting arguments as a shell would
pub fn describe_command(program: &str, args: &[&str]) -> String {
    let mut words = Vec::with_capacity(args.len() + 1);
    words.push(program);
    words.extend_from_slice(args);
    shell_words::join(words)
}
