//! Formatting for durations and build summaries.

use console::Term;
use owo_colors::OwoColorize;
use std::path::Path;
use std::time::Duration;
use xtensio_config::BuildConfig;

/// Format a duration as `50ms`, `1.50s` or `1m 30s`.
///
/// ```
/// use std::time::Duration;
/// use xtensio_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{total_ms}ms")
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Print the entries of an assembled configuration to stderr.
pub fn print_build_summary(config: &BuildConfig, root: &Path) {
    let width = (Term::stderr().size().1 as usize).min(80);

    eprintln!("\n{}", "Entries".bold().underline());
    eprintln!("{}", "─".repeat(width));
    for (name, source) in &config.entry {
        let shown = source.strip_prefix(root).unwrap_or(source);
        eprintln!(
            "  {} {} {}",
            "▸".blue(),
            name.bright_white().bold(),
            shown.display().dimmed()
        );
    }
    eprintln!("{}", "─".repeat(width));
    eprintln!(
        "  {} {} → {}",
        "Output:".bold(),
        config.output.filename,
        config.output.path.display().green()
    );
}

/// Echo captured tool output (the bundler's stats) to stdout.
pub fn print_tool_output(output: &str) {
    let trimmed = output.trim_end();
    if !trimmed.is_empty() {
        println!("{trimmed}");
    }
}
