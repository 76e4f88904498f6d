//! Catalog JSON emission.
//!
//! Writes the data files the page reads at runtime:
//!
//! ```text
//! docs/
//! └── data/
//!     ├── devices.json     # index: code, name, romCount, linkCount per device
//!     ├── GM1900.json      # detail: code, name, roms
//!     └── HD1900.json
//! ```
//!
//! The index drops `roms` to stay small; details drop the counts because the
//! page derives them. Output is pretty-printed with fixed key order and no
//! timestamps, so an unchanged input rebuilds to byte-identical files.

use crate::types::{DeviceDetail, DeviceSummary, IndexEntry};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DATA_DIR: &str = "data";
pub const INDEX_FILE: &str = "devices.json";

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Files written by one emission, relative to the output root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitReport {
    pub index: PathBuf,
    pub details: Vec<PathBuf>,
}

/// Write the index and one detail file per device under `output_dir/data/`.
///
/// Creates the directory tree when missing. Any failed write aborts the run.
pub fn emit_catalog(devices: &[DeviceSummary], output_dir: &Path) -> Result<EmitReport, EmitError> {
    let data_dir = output_dir.join(DATA_DIR);
    fs::create_dir_all(&data_dir).map_err(|source| EmitError::Io {
        path: data_dir.clone(),
        source,
    })?;

    let index: Vec<IndexEntry> = devices.iter().map(DeviceSummary::index_entry).collect();
    write_json(&data_dir.join(INDEX_FILE), &index)?;
    log::debug!("Wrote {} ({} devices)", INDEX_FILE, index.len());

    let mut details = Vec::with_capacity(devices.len());
    for device in devices {
        let file = detail_file_name(&device.code);
        if file == INDEX_FILE {
            log::warn!("Device code '{}' collides with the index file; detail not written", device.code);
            continue;
        }
        write_json(&data_dir.join(&file), &device.detail())?;
        log::debug!("Wrote {file}");
        details.push(Path::new(DATA_DIR).join(file));
    }

    Ok(EmitReport {
        index: Path::new(DATA_DIR).join(INDEX_FILE),
        details,
    })
}

/// Detail filename for a device code.
pub fn detail_file_name(code: &str) -> String {
    format!("{code}.json")
}

/// Read back a written `devices.json`.
pub fn read_index(output_dir: &Path) -> Result<Vec<IndexEntry>, EmitError> {
    read_json(&output_dir.join(DATA_DIR).join(INDEX_FILE))
}

/// Read back a written detail file.
pub fn read_detail(output_dir: &Path, code: &str) -> Result<DeviceDetail, EmitError> {
    read_json(&output_dir.join(DATA_DIR).join(detail_file_name(code)))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), EmitError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|source| EmitError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, EmitError> {
    let content = fs::read_to_string(path).map_err(|source| EmitError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}
