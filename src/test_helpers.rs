//! Shared test utilities for the rom-catalog test suite.
//!
//! Provides fixture setup, record writers and lookup helpers that work with
//! loader output (`Catalog`, `DeviceSummary`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let catalog = load_catalog(tmp.path(), "name").unwrap();
//!
//! let device = find_device(&catalog, "GM1900");
//! assert_eq!(device.name, "OnePlus 7");
//! assert_eq!(device_codes(&catalog), vec!["GM1900", "HD1900", "KB2000", "LE2110"]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::load::Catalog;
use crate::types::DeviceSummary;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/data/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/data");
    for entry in std::fs::read_dir(&fixtures).unwrap() {
        let path = entry.unwrap().path();
        if path.is_file() {
            std::fs::copy(&path, tmp.path().join(path.file_name().unwrap())).unwrap();
        }
    }
    tmp
}

/// Write `<code>.json` with the given raw contents into `dir`.
pub fn write_device(dir: &Path, code: &str, json: &str) {
    std::fs::write(dir.join(format!("{code}.json")), json).unwrap();
}

// =========================================================================
// Catalog lookups: panic with a clear message on miss
// =========================================================================

/// Find a device by code. Panics if not found.
pub fn find_device<'a>(catalog: &'a Catalog, code: &str) -> &'a DeviceSummary {
    catalog
        .devices
        .iter()
        .find(|d| d.code == code)
        .unwrap_or_else(|| {
            let codes = device_codes(catalog);
            panic!("device '{code}' not found. Available: {codes:?}")
        })
}

/// All device codes in catalog order.
pub fn device_codes(catalog: &Catalog) -> Vec<&str> {
    catalog.devices.iter().map(|d| d.code.as_str()).collect()
}
