//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Generate
//!
//! Progress counters overwrite themselves on one terminal line per phase:
//!
//! ```text
//!   Loading image / video    3 of 12
//!   Generating               5 of 9
//!   Writing HTML body        9 of 9
//! trip.alb → trip.html (9 blocks)
//! ```
//!
//! followed, when anything degraded, by a warning count. The warnings
//! themselves are logged as they happen.
//!
//! ## Make template
//!
//! ```text
//! Wrote pics.alb (14 media files)
//!     Stylesheet: default.css
//! ```
//!
//! # Architecture
//!
//! Each message has a `format_*` function (returns `String` or `Vec<String>`)
//! for testability and a `print_*` wrapper that writes to the terminal.
//! Format functions are pure: no I/O, no side effects.

use crate::generate::Generated;
use crate::template::WrittenTemplate;
use crate::types::Progress;
use std::io::Write;
use std::path::Path;

// ============================================================================
// Progress
// ============================================================================

/// One progress counter line, without line terminator.
pub fn format_progress(event: &Progress) -> String {
    let (label, done, total) = match *event {
        Progress::Encoded { done, total } => ("Loading image / video", done, total),
        Progress::Assembled { done, total } => ("Generating", done, total),
        Progress::Written { done, total } => ("Writing HTML body", done, total),
    };
    format!("  {label:<22}{done:>4} of {total:<4}")
}

/// Whether `event` is the last of its phase.
pub fn is_phase_end(event: &Progress) -> bool {
    match *event {
        Progress::Encoded { done, total }
        | Progress::Assembled { done, total }
        | Progress::Written { done, total } => done == total,
    }
}

/// Redraw the progress line on stderr, ending it when the phase completes.
pub fn print_progress(event: &Progress) {
    let mut err = std::io::stderr().lock();
    let end = if is_phase_end(event) { "\n" } else { "" };
    write!(err, "\r{}{end}", format_progress(event)).ok();
    err.flush().ok();
}

// ============================================================================
// Summaries
// ============================================================================

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn plural(count: usize, one: &str, many: &str) -> String {
    format!("{count} {}", if count == 1 { one } else { many })
}

pub fn format_generate_summary(album: &Path, generated: &Generated) -> Vec<String> {
    let mut lines = vec![format!(
        "{} \u{2192} {} ({})",
        file_name(album),
        file_name(&generated.output),
        plural(generated.fragments, "block", "blocks")
    )];
    if !generated.warnings.is_empty() {
        lines.push(format!(
            "    {}",
            plural(generated.warnings.len(), "warning", "warnings")
        ));
    }
    lines
}

pub fn print_generate_summary(album: &Path, generated: &Generated) {
    for line in format_generate_summary(album, generated) {
        println!("{}", line);
    }
}

pub fn format_template_summary(written: &WrittenTemplate) -> Vec<String> {
    let mut lines = vec![format!(
        "Wrote {} ({})",
        file_name(&written.output),
        plural(written.media, "media file", "media files")
    )];
    if let Some(css) = &written.stylesheet {
        lines.push(format!("    Stylesheet: {}", file_name(css)));
    }
    lines
}

pub fn print_template_summary(written: &WrittenTemplate) {
    for line in format_template_summary(written) {
        println!("{}", line);
    }
}
