//! Catalog data shapes shared by the loader, emitter, renderer and tests.
//!
//! The on-disk input is one JSON file per device. The build derives a
//! [`DeviceSummary`] per file and writes two output shapes from it:
//!
//! ```text
//! data/devices.json   [IndexEntry, ...]   code, name, romCount, linkCount
//! data/<code>.json    DeviceDetail        code, name, roms
//! ```
//!
//! Output keys are camelCase because the page script reads them directly.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One firmware build: a version label and its download links.
///
/// Reading is lenient: a missing or `null` field is empty, a non-string
/// version (`10`) keeps its JSON text, and non-array `links` count as none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RomEntry {
    #[serde(default, deserialize_with = "lenient_version")]
    pub version: String,
    #[serde(default, deserialize_with = "lenient_links")]
    pub links: Vec<String>,
}

fn lenient_version<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

fn lenient_links<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// A loaded device with its derived counts.
///
/// Built once per loader pass and never mutated afterwards; use
/// [`DeviceSummary::new`] so the counts always match `roms`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSummary {
    /// Filename without the `.json` extension.
    pub code: String,
    /// Display name, already resolved to `code` when the record had none.
    pub name: String,
    pub roms: Vec<RomEntry>,
    pub rom_count: usize,
    pub link_count: usize,
}

impl DeviceSummary {
    pub fn new(code: impl Into<String>, name: Option<&str>, roms: Vec<RomEntry>) -> Self {
        let code = code.into();
        let name = display_name(name, &code).to_string();
        let rom_count = roms.len();
        let link_count = roms.iter().map(|r| r.links.len()).sum();
        Self {
            code,
            name,
            roms,
            rom_count,
            link_count,
        }
    }

    pub fn index_entry(&self) -> IndexEntry {
        IndexEntry {
            code: self.code.clone(),
            name: display_name(Some(self.name.as_str()), &self.code).to_string(),
            rom_count: self.rom_count,
            link_count: self.link_count,
        }
    }

    pub fn detail(&self) -> DeviceDetail {
        DeviceDetail {
            code: self.code.clone(),
            name: display_name(Some(self.name.as_str()), &self.code).to_string(),
            roms: self.roms.clone(),
        }
    }
}

/// Resolve the name shown for a device: the name when non-blank, else the code.
pub fn display_name<'a>(name: Option<&'a str>, code: &'a str) -> &'a str {
    match name {
        Some(n) if !n.trim().is_empty() => n,
        _ => code,
    }
}

/// Row of the condensed `devices.json` index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub code: String,
    pub name: String,
    pub rom_count: usize,
    pub link_count: usize,
}

/// Contents of a per-device `<code>.json` detail file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDetail {
    pub code: String,
    pub name: String,
    pub roms: Vec<RomEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rom(version: &str, links: &[&str]) -> RomEntry {
        RomEntry {
            version: version.to_string(),
            links: links.iter().map(|l| l.to_string()).collect(),
        }
    }

    #[test]
    fn counts_follow_roms() {
        let summary = DeviceSummary::new(
            "GM1900",
            Some("OnePlus 7"),
            vec![rom("10.0.1", &["a", "b"]), rom("10.0.2", &["c"])],
        );
        assert_eq!(summary.rom_count, 2);
        assert_eq!(summary.link_count, 3);
    }

    #[test]
    fn missing_name_falls_back_to_code() {
        let summary = DeviceSummary::new("GM1900", None, vec![]);
        assert_eq!(summary.name, "GM1900");
    }

    #[test]
    fn blank_name_falls_back_to_code() {
        let summary = DeviceSummary::new("GM1900", Some("   "), vec![]);
        assert_eq!(summary.name, "GM1900");
    }

    #[test]
    fn index_entry_uses_camel_case_keys() {
        let entry = DeviceSummary::new("A", Some("Device A"), vec![rom("v1", &["x"])]).index_entry();
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"code": "A", "name": "Device A", "romCount": 1, "linkCount": 1})
        );
    }

    #[test]
    fn detail_omits_counts() {
        let detail = DeviceSummary::new("A", None, vec![]).detail();
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json, serde_json::json!({"code": "A", "name": "A", "roms": []}));
    }

    #[test]
    fn rom_entry_null_fields_are_empty() {
        let entry: RomEntry =
            serde_json::from_str(r#"{"version": null, "links": null}"#).unwrap();
        assert_eq!(entry.version, "");
        assert!(entry.links.is_empty());
    }

    #[test]
    fn rom_entry_numeric_version_keeps_its_text() {
        let entry: RomEntry = serde_json::from_str(r#"{"version": 10, "links": ["y"]}"#).unwrap();
        assert_eq!(entry.version, "10");
        assert_eq!(entry.links, vec!["y".to_string()]);
    }

    #[test]
    fn rom_entry_non_array_links_count_as_none() {
        let entry: RomEntry =
            serde_json::from_str(r#"{"version": "v1", "links": "http://x"}"#).unwrap();
        assert!(entry.links.is_empty());
    }

    #[test]
    fn rom_entry_defaults_missing_fields() {
        let entry: RomEntry = serde_json::from_str(r#"{"version": "v2"}"#).unwrap();
        assert_eq!(entry.version, "v2");
        assert!(entry.links.is_empty());
    }
}
