//! User-facing diagnostics.
//!
//! Standard output is reserved for the version string, so everything here
//! writes to standard error.

use console::style;

/// Render an error line with a red `ERROR:` prefix.
pub fn format_error(message: &str) -> String {
    format!("{} {}", style("ERROR:").red().bold(), message)
}

/// Render usage text, separated from the error above it by a blank line.
pub fn format_usage(usage: &str) -> String {
    format!("\n{}", usage.trim_end())
}

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{}", format_error(message));
}

/// Print usage text after a command-line error.
pub fn display_usage(usage: &str) {
    eprintln!("{}", format_usage(usage));
}
