//! End-to-end build and validate tests over real directories.
//!
//! Drives the public pipeline API for the catalog scenarios and the compiled
//! binary for the validate exit status.

use rom_catalog::aggregate::CatalogAggregate;
use rom_catalog::config::CatalogConfig;
use rom_catalog::emit::{self, read_detail, read_index};
use rom_catalog::pipeline;
use rom_catalog::types::IndexEntry;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/data")
}

fn config_for(input: &Path, output: &Path) -> CatalogConfig {
    CatalogConfig::default().with_overrides(
        Some(input.to_path_buf()),
        Some(output.to_path_buf()),
        None,
    )
}

fn write(dir: &Path, file: &str, json: &str) {
    fs::write(dir.join(file), json).unwrap();
}

/// Every file under `root`, relative path → bytes, sorted.
fn snapshot(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else {
                let rel = path.strip_prefix(root).unwrap().to_path_buf();
                files.push((rel, fs::read(&path).unwrap()));
            }
        }
    }
    files.sort();
    files
}

#[test]
fn two_device_scenario() {
    let data = TempDir::new().unwrap();
    write(
        data.path(),
        "AAA.json",
        r#"{"name": "Device A", "roms": [{"version": "v1", "links": ["http://x/1"]}]}"#,
    );
    write(data.path(), "BBB.json", r#"{"roms": []}"#);
    let out = TempDir::new().unwrap();

    let summary = pipeline::build(&config_for(data.path(), out.path()), "test").unwrap();

    let index = read_index(out.path()).unwrap();
    assert_eq!(
        index,
        vec![
            IndexEntry {
                code: "AAA".into(),
                name: "Device A".into(),
                rom_count: 1,
                link_count: 1,
            },
            IndexEntry {
                code: "BBB".into(),
                name: "BBB".into(),
                rom_count: 0,
                link_count: 0,
            },
        ]
    );

    let aaa = read_detail(out.path(), "AAA").unwrap();
    assert_eq!(aaa.roms.len(), 1);
    assert_eq!(aaa.roms[0].links, vec!["http://x/1".to_string()]);

    let bbb = read_detail(out.path(), "BBB").unwrap();
    assert_eq!(bbb.name, "BBB");
    assert!(bbb.roms.is_empty());

    assert_eq!(
        summary.aggregate,
        CatalogAggregate {
            devices: 2,
            roms: 1,
            links: 1,
        }
    );
}

#[test]
fn index_json_uses_camel_case_keys() {
    let data = TempDir::new().unwrap();
    write(data.path(), "AAA.json", r#"{"name": "A", "roms": []}"#);
    let out = TempDir::new().unwrap();
    pipeline::build(&config_for(data.path(), out.path()), "test").unwrap();

    let raw = fs::read_to_string(out.path().join(emit::DATA_DIR).join(emit::INDEX_FILE)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let row = &value[0];
    assert_eq!(row["romCount"], 0);
    assert_eq!(row["linkCount"], 0);
    assert!(row.get("roms").is_none());
}

#[test]
fn malformed_file_is_skipped_among_valid_ones() {
    let data = TempDir::new().unwrap();
    write(data.path(), "AAA.json", r#"{"name": "A", "roms": []}"#);
    write(data.path(), "BAD.json", r#"{"name": "Bad", "roms": ["#);
    write(data.path(), "CCC.json", r#"{"name": "C"}"#);
    let out = TempDir::new().unwrap();

    let summary = pipeline::build(&config_for(data.path(), out.path()), "test").unwrap();

    assert_eq!(summary.catalog.skipped.len(), 1);
    assert_eq!(summary.catalog.skipped[0].0, "BAD.json");

    let codes: Vec<String> = read_index(out.path())
        .unwrap()
        .into_iter()
        .map(|e| e.code)
        .collect();
    assert_eq!(codes, vec!["AAA", "CCC"]);
    assert!(!out.path().join("data/BAD.json").exists());
}

#[test]
fn written_files_reproduce_build_totals() {
    let out = TempDir::new().unwrap();
    let summary = pipeline::build(&config_for(&fixtures(), out.path()), "test").unwrap();

    let index = read_index(out.path()).unwrap();
    assert_eq!(CatalogAggregate::from_index(&index), summary.aggregate);

    for entry in &index {
        let detail = read_detail(out.path(), &entry.code).unwrap();
        assert_eq!(detail.name, entry.name);
        assert_eq!(detail.roms.len(), entry.rom_count);
        let links: usize = detail.roms.iter().map(|r| r.links.len()).sum();
        assert_eq!(links, entry.link_count);
    }
}

#[test]
fn rebuild_is_byte_identical() {
    let out = TempDir::new().unwrap();
    let config = config_for(&fixtures(), out.path());

    pipeline::build(&config, "test").unwrap();
    let first = snapshot(out.path());
    pipeline::build(&config, "test").unwrap();
    let second = snapshot(out.path());

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn missing_input_dir_fails_build() {
    let out = TempDir::new().unwrap();
    let missing = out.path().join("no-data");
    assert!(pipeline::build(&config_for(&missing, out.path()), "test").is_err());
}

// ===========================================================================
// Binary: validate exit status
// ===========================================================================

fn run_validate(data: &Path) -> std::process::Output {
    let cwd = TempDir::new().unwrap();
    Command::new(env!("CARGO_BIN_EXE_rom-catalog"))
        .current_dir(cwd.path())
        .arg("validate")
        .arg("--data")
        .arg(data)
        .output()
        .unwrap()
}

#[test]
fn validate_exits_zero_when_all_valid() {
    let data = TempDir::new().unwrap();
    write(
        data.path(),
        "AAA.json",
        r#"{"name": "A", "roms": [{"version": "v1", "links": ["http://x/1"]}]}"#,
    );
    let output = run_validate(data.path());
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("All files valid"));
}

#[test]
fn validate_exits_one_with_full_report() {
    let output = run_validate(&fixtures());
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    // Files after the first invalid one are still reported.
    assert!(stdout.contains("broken.json: invalid JSON"));
    assert!(stdout.contains("KB2000.json: invalid, missing 'name'"));
    assert!(stdout.contains("LE2110.json: OnePlus 9 Pro"));
    assert!(stdout.contains("2 invalid files"));
}

#[test]
fn build_command_writes_site() {
    let out = TempDir::new().unwrap();
    let cwd = TempDir::new().unwrap();
    let status = Command::new(env!("CARGO_BIN_EXE_rom-catalog"))
        .current_dir(cwd.path())
        .arg("build")
        .arg("--data")
        .arg(fixtures())
        .arg("--output")
        .arg(out.path())
        .status()
        .unwrap();
    assert!(status.success());
    assert!(out.path().join("index.html").is_file());
    assert!(out.path().join(".nojekyll").is_file());
}
