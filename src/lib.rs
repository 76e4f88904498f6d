//! # ROM Catalog
//!
//! A static site generator for device firmware download catalogs.
//! A directory of per-device JSON records is the data source: each file
//! becomes a device, its ROM versions and download links become a searchable
//! catalog page backed by small JSON files.
//!
//! # Architecture: One-Shot Pipeline
//!
//! Every build is a single pass over the input directory:
//!
//! ```text
//! 1. Load       data/*.json    →  Catalog            (records → device summaries)
//! 2. Aggregate  Catalog        →  CatalogAggregate   (device, ROM, link totals)
//! 3. Emit       Catalog        →  docs/data/         (index + per-device detail JSON)
//! 4. Render     Catalog + agg  →  docs/index.html    (searchable page)
//! ```
//!
//! Nothing is cached between runs. A build over unchanged input rewrites
//! byte-identical files, so the output directory can be committed and served
//! as-is (GitHub Pages, any static host).
//!
//! Validation is a separate entry point over the same input directory. It
//! does not feed the build; it reports every defect it finds and signals
//! failure through the exit code.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`load`] | Reads device records, one `LoadOutcome` per file, reduced into a `Catalog` |
//! | [`aggregate`] | Pure totals over device summaries |
//! | [`emit`] | Writes `data/devices.json` and `data/<code>.json` |
//! | [`render`] | Renders the catalog page with Maud |
//! | [`pipeline`] | Runs load → aggregate → emit → render |
//! | [`validate`] | Per-file schema checks with per-ROM defects |
//! | [`serve`] | Local preview server for the output tree |
//! | [`config`] | `catalog.toml` loading, validation, merging, and CSS generation |
//! | [`types`] | Device records, summaries, and the emitted JSON shapes |
//! | [`output`] | CLI output formatting for build and validate reports |
//!
//! # Design Decisions
//!
//! ## Best-Effort Builds
//!
//! A malformed device file is logged and skipped; the rest of the catalog is
//! still published. Only a missing input directory or an unwritable output
//! aborts a build. Skips are plain values (`LoadOutcome::Skipped`) collected
//! alongside loaded devices, and logging happens when that list is reduced.
//!
//! ## Lenient Loader, Strict Validator
//!
//! The loader treats a missing `roms` or `links` as empty and a missing name
//! as the device code. The validator treats the same gaps as defects. Run
//! `rom-catalog validate` in CI to keep the data clean; run `build` to publish
//! whatever is usable.
//!
//! ## Split Index and Detail Files
//!
//! The index carries only codes, names and counts, so the page stays light
//! with hundreds of devices. Full ROM and link lists are fetched per device
//! when the user opens one.

pub mod aggregate;
pub mod config;
pub mod emit;
pub mod load;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod serve;
pub mod types;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;

/// Version shown by `--version` and in the page's generator tag.
///
/// The package version on a release tag, otherwise `dev@<short hash>`.
pub fn version_string() -> String {
    if env!("CATALOG_RELEASE_TAG") == "true" {
        return env!("CARGO_PKG_VERSION").to_string();
    }
    match env!("CATALOG_GIT_HASH") {
        "" => "dev@unknown".to_string(),
        hash => format!("dev@{hash}"),
    }
}
