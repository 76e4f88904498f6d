//! Device record loading.
//!
//! First step of the build. Lists every `*.json` file directly inside the
//! input directory, in sorted filename order, and turns each one into a
//! [`LoadOutcome`]:
//!
//! - `Loaded`: the file parsed and became a [`DeviceSummary`]
//! - `Skipped`: the file could not be read or parsed; the reason is kept
//!
//! A bad file never aborts the run. Only a missing input directory does.
//! [`Catalog::from_outcomes`] reduces the outcomes into the device list plus
//! running totals, logging every skipped file on the way.
//!
//! ## Record Shape
//!
//! ```json
//! {
//!   "name": "OnePlus 7 Pro",
//!   "roms": [
//!     { "version": "OxygenOS 10.0.1", "links": ["https://..."] }
//!   ]
//! }
//! ```
//!
//! `roms` may be absent (no ROMs). The name key is configurable because
//! older data uses `model`; a missing or blank name falls back to the code.

use crate::types::{DeviceSummary, RomEntry};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Input directory not found: {0}")]
    MissingInputDir(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of loading one device file.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(DeviceSummary),
    Skipped { file: String, reason: String },
}

/// Devices that loaded, files that did not, and the running totals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub devices: Vec<DeviceSummary>,
    pub skipped: Vec<(String, String)>,
    pub total_roms: usize,
    pub total_links: usize,
}

impl Catalog {
    /// Reduce per-file outcomes, keeping their order.
    pub fn from_outcomes(outcomes: Vec<LoadOutcome>) -> Self {
        let mut catalog = Catalog::default();
        for outcome in outcomes {
            match outcome {
                LoadOutcome::Loaded(device) => {
                    catalog.total_roms += device.rom_count;
                    catalog.total_links += device.link_count;
                    catalog.devices.push(device);
                }
                LoadOutcome::Skipped { file, reason } => {
                    log::error!("Skipping {file}: {reason}");
                    catalog.skipped.push((file, reason));
                }
            }
        }
        catalog
    }
}

/// Load every device record in `input_dir`.
pub fn load_catalog(input_dir: &Path, name_field: &str) -> Result<Catalog, LoadError> {
    let outcomes = load_records(input_dir, name_field)?;
    Ok(Catalog::from_outcomes(outcomes))
}

/// Load each `*.json` file in `input_dir` into an outcome, sorted by filename.
pub fn load_records(input_dir: &Path, name_field: &str) -> Result<Vec<LoadOutcome>, LoadError> {
    let files = list_json_files(input_dir)?;
    Ok(files
        .iter()
        .map(|path| load_record(path, name_field))
        .collect())
}

/// List the `*.json` files directly inside `dir`, sorted by filename.
///
/// Shared with the validator so both passes see the same files in the same order.
pub fn list_json_files(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::MissingInputDir(dir.to_path_buf()));
    }

    let entries = fs::read_dir(dir)?.map(|entry| entry.map(|e| e.path()));
    Ok(select_json_files(dir, entries))
}

/// Keep the `*.json` files among `entries`, sorted. Unreadable entries are
/// logged and left out.
fn select_json_files(
    dir: &Path,
    entries: impl IntoIterator<Item = std::io::Result<PathBuf>>,
) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = entries
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                log::warn!("Unreadable entry in {}: {e}", dir.display());
                None
            }
        })
        .filter(|p| {
            p.is_file()
                && p.file_name()
                    .map(|n| n.to_string_lossy().ends_with(".json"))
                    .unwrap_or(false)
        })
        .collect();

    files.sort();
    files
}

/// Filename of `path` as a display string.
pub(crate) fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Device code: the filename with its `.json` extension stripped.
pub fn device_code(path: &Path) -> String {
    let label = file_label(path);
    label
        .strip_suffix(".json")
        .map(str::to_string)
        .unwrap_or(label)
}

fn load_record(path: &Path, name_field: &str) -> LoadOutcome {
    let file = file_label(path);
    let skipped = |reason: String| LoadOutcome::Skipped {
        file: file.clone(),
        reason,
    };

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => return skipped(e.to_string()),
    };

    match parse_record(&device_code(path), &content, name_field) {
        Ok(device) => LoadOutcome::Loaded(device),
        Err(reason) => skipped(reason),
    }
}

/// Parse one record's JSON text into a summary, or the reason it was rejected.
fn parse_record(code: &str, content: &str, name_field: &str) -> Result<DeviceSummary, String> {
    let value: Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
    let Value::Object(record) = value else {
        return Err("expected a JSON object".to_string());
    };

    let name = record.get(name_field).and_then(Value::as_str);

    let roms: Vec<RomEntry> = match record.get("roms") {
        None | Some(Value::Null) => Vec::new(),
        Some(roms) => {
            Vec::<RomEntry>::deserialize(roms).map_err(|e| format!("invalid 'roms': {e}"))?
        }
    };

    Ok(DeviceSummary::new(code, name, roms))
}
