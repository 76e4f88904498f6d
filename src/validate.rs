//! Device record validation.
//!
//! A standalone pass over the input directory that checks every `*.json`
//! file against the expected record shape and reports all defects, instead of
//! stopping at the first one. It does not share results with the build.
//!
//! ## Per-File Verdicts
//!
//! ```text
//! Unchecked ─┬─ ParseFailed    not valid JSON
//!            ├─ NameMissing    no display name
//!            ├─ RomsMissing    `roms` absent or not an array
//!            ├─ NoValidRoms    every ROM entry failed its checks (or none exist)
//!            └─ Valid          at least one ROM entry passed
//! ```
//!
//! Each ROM entry needs a `version` and a `links` array. A failing entry is
//! reported as a [`RomDefect`] but only invalidates the file when no entry
//! passes. Fields count as present the way a loose JSON reader sees them:
//! absent, `null`, `false`, `0` and `""` are all missing.
//!
//! The report is invalid when any file is; the CLI turns that into exit code 1.

use crate::load::{self, LoadError};
use serde_json::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidateError {
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Why one ROM entry failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RomDefect {
    MissingVersion,
    MissingLinks,
}

/// A failed ROM entry, by 1-based position in `roms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RomIssue {
    pub position: usize,
    pub defect: RomDefect,
}

/// Terminal state of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileVerdict {
    ParseFailed(String),
    NameMissing,
    RomsMissing,
    NoValidRoms,
    Valid {
        name: String,
        valid_roms: usize,
        links: usize,
    },
}

impl FileVerdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, FileVerdict::Valid { .. })
    }
}

/// Verdict plus the ROM-level issues found on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub file: String,
    pub verdict: FileVerdict,
    pub rom_issues: Vec<RomIssue>,
}

/// Results for a whole directory, in sorted filename order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub files: Vec<FileReport>,
    pub totals: ValidationTotals,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationTotals {
    pub valid_files: usize,
    pub invalid_files: usize,
    /// Same as `valid_files`: one device per valid file.
    pub devices: usize,
    /// ROM entries that passed their checks, in valid files.
    pub roms: usize,
    /// Links of ROM entries that passed their checks.
    pub links: usize,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.totals.invalid_files == 0
    }

    fn push(&mut self, report: FileReport) {
        match &report.verdict {
            FileVerdict::Valid {
                valid_roms, links, ..
            } => {
                self.totals.valid_files += 1;
                self.totals.devices += 1;
                self.totals.roms += valid_roms;
                self.totals.links += links;
            }
            _ => self.totals.invalid_files += 1,
        }
        self.files.push(report);
    }
}

/// Validate every `*.json` file in `input_dir`.
///
/// Only a missing directory is an error; every file-level problem ends up in
/// the report.
pub fn validate_dir(input_dir: &Path, name_field: &str) -> Result<ValidationReport, ValidateError> {
    let mut report = ValidationReport::default();
    for path in load::list_json_files(input_dir)? {
        let file = load::file_label(&path);
        let file_report = match fs::read_to_string(&path) {
            Ok(content) => check_record(&file, &content, name_field),
            Err(e) => FileReport {
                file,
                verdict: FileVerdict::ParseFailed(e.to_string()),
                rom_issues: Vec::new(),
            },
        };
        report.push(file_report);
    }
    Ok(report)
}

/// Check one file's contents.
pub fn check_record(file: &str, content: &str, name_field: &str) -> FileReport {
    let mut rom_issues = Vec::new();
    let verdict = classify(content, name_field, &mut rom_issues);
    FileReport {
        file: file.to_string(),
        verdict,
        rom_issues,
    }
}

fn classify(content: &str, name_field: &str, rom_issues: &mut Vec<RomIssue>) -> FileVerdict {
    let record: Value = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(e) => return FileVerdict::ParseFailed(e.to_string()),
    };

    let Some(name) = record.get(name_field).filter(|v| is_present(v)) else {
        return FileVerdict::NameMissing;
    };

    let Some(roms) = record.get("roms").and_then(Value::as_array) else {
        return FileVerdict::RomsMissing;
    };

    let mut valid_roms = 0;
    let mut links = 0;
    for (i, rom) in roms.iter().enumerate() {
        let position = i + 1;
        if !rom.get("version").is_some_and(is_present) {
            rom_issues.push(RomIssue {
                position,
                defect: RomDefect::MissingVersion,
            });
            continue;
        }
        let Some(rom_links) = rom.get("links").and_then(Value::as_array) else {
            rom_issues.push(RomIssue {
                position,
                defect: RomDefect::MissingLinks,
            });
            continue;
        };
        valid_roms += 1;
        links += rom_links.len();
    }

    if valid_roms == 0 {
        return FileVerdict::NoValidRoms;
    }

    FileVerdict::Valid {
        name: match name {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
        valid_roms,
        links,
    }
}

/// Loose presence test: absent, `null`, `false`, `0` and `""` are missing.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
