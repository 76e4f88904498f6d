//! Full build: load → aggregate → emit → render.
//!
//! ```text
//! data/*.json  →  Catalog  →  CatalogAggregate
//!                    │
//!                    ├─→ docs/data/devices.json, docs/data/<code>.json
//!                    ├─→ docs/index.html
//!                    └─→ docs/.nojekyll
//! ```
//!
//! Each run reads fresh from disk and overwrites its outputs; nothing is
//! carried between runs.

use crate::aggregate::CatalogAggregate;
use crate::config::CatalogConfig;
use crate::emit::{self, EmitError, EmitReport};
use crate::load::{self, Catalog, LoadError};
use crate::render;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

pub const PAGE_FILE: &str = "index.html";
pub const NOJEKYLL_FILE: &str = ".nojekyll";

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Emit(#[from] EmitError),
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What one build produced.
#[derive(Debug)]
pub struct BuildSummary {
    pub catalog: Catalog,
    pub aggregate: CatalogAggregate,
    pub emitted: EmitReport,
    pub output_dir: PathBuf,
}

/// Run the whole build described by `config`.
///
/// `generator` is written into the page's generator meta tag.
pub fn build(config: &CatalogConfig, generator: &str) -> Result<BuildSummary, BuildError> {
    let catalog = load::load_catalog(&config.input_dir, &config.records.name_field)?;
    let aggregate = CatalogAggregate::from_devices(&catalog.devices);

    let output_dir = config.output_dir.clone();
    let write = |name: &str, contents: &[u8]| {
        let path = output_dir.join(name);
        fs::write(&path, contents).map_err(|source| BuildError::Io { path, source })
    };

    let emitted = emit::emit_catalog(&catalog.devices, &output_dir)?;

    let page = render::render_page(&catalog.devices, &aggregate, config, generator);
    write(PAGE_FILE, page.into_string().as_bytes())?;
    log::debug!("Wrote {PAGE_FILE}");

    write(NOJEKYLL_FILE, b"")?;

    Ok(BuildSummary {
        catalog,
        aggregate,
        emitted,
        output_dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn config_for(input: &std::path::Path, output: &std::path::Path) -> CatalogConfig {
        CatalogConfig::default().with_overrides(
            Some(input.to_path_buf()),
            Some(output.to_path_buf()),
            None,
        )
    }

    #[test]
    fn build_writes_full_output_tree() {
        let data = setup_fixtures();
        let out = TempDir::new().unwrap();
        let summary = build(&config_for(data.path(), out.path()), "test").unwrap();

        assert!(out.path().join("index.html").is_file());
        assert!(out.path().join(".nojekyll").is_file());
        assert!(out.path().join("data/devices.json").is_file());
        for device in &summary.catalog.devices {
            assert!(out.path().join(format!("data/{}.json", device.code)).is_file());
        }
        assert_eq!(std::fs::read(out.path().join(".nojekyll")).unwrap(), b"");
    }

    #[test]
    fn build_creates_missing_output_dir() {
        let data = setup_fixtures();
        let out = TempDir::new().unwrap();
        let nested = out.path().join("site/public");
        build(&config_for(data.path(), &nested), "test").unwrap();
        assert!(nested.join("index.html").is_file());
    }

    #[test]
    fn build_aggregate_matches_catalog_totals() {
        let data = setup_fixtures();
        let out = TempDir::new().unwrap();
        let summary = build(&config_for(data.path(), out.path()), "test").unwrap();

        assert_eq!(summary.aggregate.devices, summary.catalog.devices.len());
        assert_eq!(summary.aggregate.roms, summary.catalog.total_roms);
        assert_eq!(summary.aggregate.links, summary.catalog.total_links);
    }

    #[test]
    fn missing_input_dir_aborts_build() {
        let out = TempDir::new().unwrap();
        let result = build(&config_for(&out.path().join("missing"), out.path()), "test");
        assert!(matches!(
            result,
            Err(BuildError::Load(LoadError::MissingInputDir(_)))
        ));
        assert!(!out.path().join("index.html").exists());
    }

    #[test]
    fn empty_input_dir_builds_empty_catalog() {
        let data = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let summary = build(&config_for(data.path(), out.path()), "test").unwrap();

        assert_eq!(summary.aggregate, CatalogAggregate::default());
        assert_eq!(
            std::fs::read_to_string(out.path().join("data/devices.json")).unwrap(),
            "[]"
        );
    }

    #[test]
    fn model_name_field_is_honored() {
        let data = TempDir::new().unwrap();
        write_device(data.path(), "GM1900", r#"{"model": "OnePlus 7", "roms": []}"#);
        let out = TempDir::new().unwrap();

        let mut config = config_for(data.path(), out.path());
        config.records.name_field = "model".to_string();
        build(&config, "test").unwrap();

        let index = emit::read_index(out.path()).unwrap();
        assert_eq!(index[0].name, "OnePlus 7");
    }
}
