//! Formatting utilities for sizes, durations, and build summaries.

use crate::pipeline::StepReport;
use console::Term;
use owo_colors::OwoColorize;
use std::time::Duration;

/// Human-readable byte count (`B`, `KB`, `MB`, `GB`).
///
/// ```
/// use fob_pipeline::ui::format_size;
///
/// assert_eq!(format_size(500), "500 B");
/// assert_eq!(format_size(1536), "1.50 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", size as u64, UNITS[unit_idx])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

/// Human-readable duration: `ms` below a second, seconds below a minute,
/// then `Xm Ys`.
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{}m {}s", mins, secs)
    }
}

/// Print the per-step summary of a build to stderr.
///
/// Failed steps are listed in red with their error; successful steps show
/// how many files they wrote, the bytes written and the time taken.
pub fn print_build_summary(reports: &[StepReport]) {
    let term = Term::stderr();
    let width = term.size().1 as usize;

    eprintln!("\n{}", "Build Summary".bold().underline());
    eprintln!("{}", "─".repeat(width.min(80)));

    for report in reports {
        let dur_str = format!("({})", format_duration(report.duration));
        match &report.failure {
            None => eprintln!(
                "  {} {} {} {} {}",
                "▸".blue(),
                report.step.bright_white().bold(),
                format!("{} file(s)", report.files_written).dimmed(),
                format_size(report.bytes_written).dimmed(),
                dur_str.dimmed()
            ),
            Some(failure) => eprintln!(
                "  {} {} {} {}",
                "✗".red(),
                report.step.red().bold(),
                failure.red(),
                dur_str.dimmed()
            ),
        }
    }

    eprintln!("{}", "─".repeat(width.min(80)));

    let total_size: u64 = reports.iter().map(|r| r.bytes_written).sum();
    let total_time: Duration = reports.iter().map(|r| r.duration).sum();

    eprintln!(
        "  {} {} in {}",
        "Total:".bold(),
        format_size(total_size).green(),
        format_duration(total_time).green()
    );
}
