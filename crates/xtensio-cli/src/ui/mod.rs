//! Terminal status output.
//!
//! Everything here writes to stderr so that stdout stays clean for
//! `xtensio inspect` output and the bundler's stats.

mod format;
mod messages;
mod spinner;

pub use format::{format_duration, print_build_summary, print_tool_output};
pub use messages::{error, info, success};
pub use spinner::Spinner;

/// Check if running in a CI environment.
pub fn is_ci() -> bool {
    ["CI", "GITHUB_ACTIONS", "GITLAB_CI", "CIRCLECI", "TRAVIS"]
        .iter()
        .any(|var| std::env::var_os(var).is_some())
}

/// Check if color output should be enabled.
///
/// Respects NO_COLOR and FORCE_COLOR, falls back to terminal detection.
pub fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::user_attended_stderr()
}

/// Apply the color decision to `console`. `owo-colors` output is plain ANSI.
pub fn init_colors() {
    let enabled = should_use_color();
    console::set_colors_enabled(enabled);
    console::set_colors_enabled_stderr(enabled);
}

/// Whether animated output (spinners) should be drawn.
pub fn is_interactive() -> bool {
    !is_ci() && console::user_attended_stderr()
}
