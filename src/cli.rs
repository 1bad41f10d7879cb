//! Shared console output helpers for splicefuse binaries.

use std::time::{Duration, Instant};

use colored::Colorize;

use crate::diagnostics::{Diagnostics, Severity};

pub fn banner(subtitle: &str) {
    eprintln!();
    eprintln!("{} {}", "splicefuse".bold().cyan(), subtitle.dimmed());
    eprintln!();
}

pub fn section(title: &str) {
    let bar = "─".repeat(50);
    eprintln!("{} {}", title.bold().blue(), bar.dimmed());
}

pub fn kv(key: &str, value: &str) {
    eprintln!("  {:<20} {}", key.dimmed(), value);
}

pub fn success(msg: &str) {
    eprintln!("  {} {}", "✓".green().bold(), msg);
}

pub fn warning(msg: &str) {
    eprintln!("  {} {}", "⚠".yellow(), msg.yellow());
}

pub fn detail(msg: &str) {
    eprintln!("    {}", msg.dimmed());
}

/// Print collected diagnostics: warnings always, debug/info only when verbose.
pub fn report_diagnostics(diagnostics: &Diagnostics, verbose: bool) {
    let min = if verbose {
        Severity::Debug
    } else {
        Severity::Warning
    };
    for diagnostic in diagnostics.at_least(min) {
        match diagnostic.severity {
            Severity::Warning => warning(&diagnostic.to_string()),
            Severity::Info | Severity::Debug => detail(&diagnostic.to_string()),
        }
    }
}

/// Formats a duration as HH:MM:SS.d (tenths of a second).
#[must_use]
pub fn format_elapsed(d: Duration) -> String {
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    let tenths = d.subsec_millis() / 100;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{tenths}")
}

pub fn print_summary(start: Instant, warnings: usize) {
    eprintln!();
    eprintln!(
        "{}  {}\n{}  {}",
        "Time".dimmed(),
        format_elapsed(start.elapsed()).bold(),
        "Warnings".dimmed(),
        warnings.to_string().bold(),
    );
    eprintln!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_elapsed_basic() {
        assert_eq!(format_elapsed(Duration::from_millis(4400)), "00:00:04.4");
        assert_eq!(format_elapsed(Duration::from_secs(61)), "00:01:01.0");
        assert_eq!(format_elapsed(Duration::from_secs(3661)), "01:01:01.0");
    }
}
