//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! Failures are logged when they happen; the lines here are the summary
//! printed once the run is over.
//!
//! ## Index
//!
//! ```text
//! / → index.html (written, 3 entries)
//! /docs → docs/index.html (unchanged, 1 entry)
//! /locked → locked/index.html (failed: Permission denied (os error 13))
//!
//! Total processed files and directories: 4
//! Total index.html files generated: 1
//! ```
//!
//! ## Clean
//!
//! ```text
//! Removed docs/index.html
//! Removed index.html
//!
//! Total index.html files removed: 2
//! ```

use crate::clean::CleanReport;
use crate::filter::INDEX_FILENAME;
use crate::index::{IndexReport, PageOutcome, PageStatus};
use std::path::Path;

fn status_label(status: &PageStatus) -> String {
    match status {
        PageStatus::Written => "written".to_string(),
        PageStatus::Unchanged => "unchanged".to_string(),
        PageStatus::Kept => "kept existing".to_string(),
        PageStatus::Failed(msg) => format!("failed: {msg}"),
    }
}

fn entry_count(n: usize) -> String {
    if n == 1 {
        "1 entry".to_string()
    } else {
        format!("{n} entries")
    }
}

fn page_line(page: &PageOutcome) -> String {
    let target = if page.dir.is_empty() {
        INDEX_FILENAME.to_string()
    } else {
        format!("{}/{}", page.dir, INDEX_FILENAME)
    };
    match &page.status {
        PageStatus::Failed(_) => format!(
            "/{} \u{2192} {} ({})",
            page.dir,
            target,
            status_label(&page.status)
        ),
        status => format!(
            "/{} \u{2192} {} ({}, {})",
            page.dir,
            target,
            status_label(status),
            entry_count(page.entries)
        ),
    }
}

/// Format the index run: one line per visited directory, then totals.
pub fn format_index_output(report: &IndexReport) -> Vec<String> {
    let mut lines: Vec<String> = report.pages.iter().map(page_line).collect();

    let stats = &report.stats;
    lines.push(String::new());
    lines.push(format!(
        "Total processed files and directories: {}",
        stats.directories + stats.files
    ));
    lines.push(format!(
        "Total index.html files generated: {}",
        stats.generated
    ));
    let failed = report.failed().count();
    if failed > 0 {
        lines.push(format!("Failed to write {failed} index.html files"));
    }
    lines
}

/// Print index output to stdout.
pub fn print_index_output(report: &IndexReport) {
    for line in format_index_output(report) {
        println!("{}", line);
    }
}

/// Format a cleanup sweep. Paths are shown relative to `root`.
pub fn format_clean_output(report: &CleanReport, root: &Path) -> Vec<String> {
    let rel = |p: &Path| {
        p.strip_prefix(root)
            .unwrap_or(p)
            .to_string_lossy()
            .into_owned()
    };

    let mut lines: Vec<String> = report
        .removed
        .iter()
        .map(|p| format!("Removed {}", rel(p)))
        .collect();
    for (path, err) in &report.failed {
        lines.push(format!("Could not remove {}: {}", rel(path), err));
    }

    lines.push(String::new());
    lines.push(format!(
        "Total index.html files removed: {}",
        report.removed.len()
    ));
    lines
}

/// Print cleanup output to stdout.
pub fn print_clean_output(report: &CleanReport, root: &Path) {
    for line in format_clean_output(report, root) {
        println!("{}", line);
    }
}
