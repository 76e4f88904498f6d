//! CLI output formatting for the build and validate commands.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every device is its semantic identity (positional index and display
//! name) with the source file shown as secondary context via an indented
//! `Source:` line. The output reads as a catalog inventory while still
//! letting users trace each entry back to its file.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Devices
//! 001 OnePlus 7 (2 ROMs, 3 links)
//!     Source: GM1900.json
//! 002 KB2000 (0 ROMs, 0 links)
//!     Source: KB2000.json
//!
//! Skipped
//!     broken.json
//!
//! Outputs
//!     data/devices.json
//!     data/<code>.json (2 files)
//!     index.html
//!     .nojekyll
//!
//! Built 2 devices, 2 ROMs, 3 links → docs
//! ```
//!
//! ## Validate
//!
//! ```text
//! 001 GM1900.json: OnePlus 7 (2 ROMs, 3 links)
//! 002 HD1900.json: OnePlus 7T (1 ROM, 1 link)
//!     ROM 2: missing 'version'
//! 003 KB2000.json: invalid, missing 'name'
//!
//! Summary
//!     Valid files: 2
//!     Invalid files: 1
//!     Devices: 2
//!     ROMs: 3
//!     Links: 4
//!
//! 1 invalid file
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::emit::{DATA_DIR, INDEX_FILE};
use crate::pipeline::{BuildSummary, NOJEKYLL_FILE, PAGE_FILE};
use crate::types::display_name;
use crate::validate::{FileReport, FileVerdict, RomDefect, RomIssue, ValidationReport};

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}

/// `(2 ROMs, 3 links)`
fn counts(roms: usize, links: usize) -> String {
    format!(
        "({}, {})",
        plural(roms, "ROM", "ROMs"),
        plural(links, "link", "links")
    )
}

/// Format an entity header: positional index + title + counts.
///
/// ```text
/// 001 OnePlus 7 (2 ROMs, 3 links)
/// ```
fn entity_header(index: usize, title: &str, roms: usize, links: usize) -> String {
    format!("{} {} {}", format_index(index), title, counts(roms, links))
}

// ============================================================================
// Build output
// ============================================================================

/// Format the result of a full build.
pub fn format_build_output(summary: &BuildSummary) -> Vec<String> {
    let mut lines = Vec::new();
    let catalog = &summary.catalog;

    lines.push("Devices".to_string());
    for (i, device) in catalog.devices.iter().enumerate() {
        let name = display_name(Some(device.name.as_str()), &device.code);
        lines.push(entity_header(i + 1, name, device.rom_count, device.link_count));
        lines.push(format!("{}Source: {}.json", indent(1), device.code));
    }
    if catalog.devices.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }

    if !catalog.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        // The reason was already logged when the file was skipped.
        for (file, _) in &catalog.skipped {
            lines.push(format!("{}{}", indent(1), file));
        }
    }

    lines.push(String::new());
    lines.push("Outputs".to_string());
    lines.push(format!("{}{}/{}", indent(1), DATA_DIR, INDEX_FILE));
    lines.push(format!(
        "{}{}/<code>.json ({})",
        indent(1),
        DATA_DIR,
        plural(summary.emitted.details.len(), "file", "files")
    ));
    lines.push(format!("{}{}", indent(1), PAGE_FILE));
    lines.push(format!("{}{}", indent(1), NOJEKYLL_FILE));

    lines.push(String::new());
    lines.push(format!(
        "Built {}, {}, {} → {}",
        plural(summary.aggregate.devices, "device", "devices"),
        plural(summary.aggregate.roms, "ROM", "ROMs"),
        plural(summary.aggregate.links, "link", "links"),
        summary.output_dir.display()
    ));
    lines
}

pub fn print_build_output(summary: &BuildSummary) {
    for line in format_build_output(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Validate output
// ============================================================================

/// Format a validation report: one entry per file, then totals and verdict.
pub fn format_validation_report(report: &ValidationReport) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, file) in report.files.iter().enumerate() {
        lines.push(file_line(i + 1, file));
        for issue in &file.rom_issues {
            lines.push(format!("{}{}", indent(1), rom_issue_line(issue)));
        }
    }
    if report.files.is_empty() {
        lines.push("No device files found".to_string());
    }

    let totals = &report.totals;
    lines.push(String::new());
    lines.push("Summary".to_string());
    lines.push(format!("{}Valid files: {}", indent(1), totals.valid_files));
    lines.push(format!("{}Invalid files: {}", indent(1), totals.invalid_files));
    lines.push(format!("{}Devices: {}", indent(1), totals.devices));
    lines.push(format!("{}ROMs: {}", indent(1), totals.roms));
    lines.push(format!("{}Links: {}", indent(1), totals.links));

    lines.push(String::new());
    if report.is_valid() {
        lines.push("All files valid".to_string());
    } else {
        lines.push(plural(totals.invalid_files, "invalid file", "invalid files"));
    }
    lines
}

pub fn print_validation_report(report: &ValidationReport) {
    for line in format_validation_report(report) {
        println!("{}", line);
    }
}

fn file_line(index: usize, file: &FileReport) -> String {
    let detail = match &file.verdict {
        FileVerdict::Valid {
            name,
            valid_roms,
            links,
        } => format!("{} {}", name, counts(*valid_roms, *links)),
        FileVerdict::ParseFailed(reason) => format!("invalid JSON: {reason}"),
        FileVerdict::NameMissing => "invalid, missing 'name'".to_string(),
        FileVerdict::RomsMissing => "invalid, missing 'roms' or not an array".to_string(),
        FileVerdict::NoValidRoms => "invalid, no valid ROM entries".to_string(),
    };
    format!("{} {}: {}", format_index(index), file.file, detail)
}

fn rom_issue_line(issue: &RomIssue) -> String {
    let what = match issue.defect {
        RomDefect::MissingVersion => "missing 'version'",
        RomDefect::MissingLinks => "missing 'links' or not an array",
    };
    format!("ROM {}: {}", issue.position, what)
}

// ============================================================================
// Tests
// ============================================================================
