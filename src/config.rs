//! Catalog configuration.
//!
//! Handles loading, validating, and merging `catalog.toml`. Stock defaults are
//! overridden by the user file, and command-line flags override both.
//!
//! ## Config File Location
//!
//! `catalog.toml` is read from the working directory, or from the path given
//! with `--config`. Without a file, stock defaults apply:
//!
//! ```toml
//! input_dir = "data"        # Device JSON files
//! output_dir = "docs"       # Generated site
//! preview_port = 3000       # Port for `rom-catalog serve`
//!
//! [records]
//! name_field = "name"       # Key holding the display name ("model" in older data)
//!
//! [site]
//! title = "ROM Catalog"
//! tagline = "Firmware downloads by device"
//!
//! [colors.light]
//! background = "#f4f5fb"
//! surface = "#ffffff"
//! text = "#1c1d29"
//! text_muted = "#62647a"
//! accent = "#5b5fe0"
//! border = "#dfe1ee"
//!
//! [colors.dark]
//! background = "#0f1020"
//! surface = "#1a1b30"
//! text = "#ecedf7"
//! text_muted = "#9c9eb8"
//! accent = "#8b8ff5"
//! border = "#2c2e4a"
//! ```
//!
//! ## Partial Configuration
//!
//! The file is sparse; override only what you need:
//!
//! ```toml
//! [records]
//! name_field = "model"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "catalog.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Config file not found: {0}")]
    Missing(PathBuf),
}

/// Catalog configuration, passed explicitly to every stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Directory holding one `<code>.json` per device.
    pub input_dir: PathBuf,
    /// Root of the generated site.
    pub output_dir: PathBuf,
    /// Port the preview server listens on.
    pub preview_port: u16,
    /// How device records are read.
    pub records: RecordsConfig,
    /// Page text.
    pub site: SiteConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("docs"),
            preview_port: 3000,
            records: RecordsConfig::default(),
            site: SiteConfig::default(),
            colors: ColorConfig::default(),
        }
    }
}

impl CatalogConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.preview_port == 0 {
            return Err(ConfigError::Validation(
                "preview_port must be non-zero".into(),
            ));
        }
        if self.records.name_field.trim().is_empty() {
            return Err(ConfigError::Validation(
                "records.name_field must not be empty".into(),
            ));
        }
        if self.site.title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.title must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Apply command-line overrides on top of the loaded values.
    pub fn with_overrides(
        mut self,
        input_dir: Option<PathBuf>,
        output_dir: Option<PathBuf>,
        preview_port: Option<u16>,
    ) -> Self {
        if let Some(dir) = input_dir {
            self.input_dir = dir;
        }
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        if let Some(port) = preview_port {
            self.preview_port = port;
        }
        self
    }
}

/// Device record reading settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecordsConfig {
    /// JSON key holding the device display name.
    pub name_field: String,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            name_field: "name".to_string(),
        }
    }
}

/// Text shown in the page header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Page title and main heading.
    pub title: String,
    /// Line under the heading. Empty hides it.
    pub tagline: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "ROM Catalog".to_string(),
            tagline: "Firmware downloads by device".to_string(),
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme.
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Page background.
    pub background: String,
    /// Cards, modal and search box.
    pub surface: String,
    /// Primary text color.
    pub text: String,
    /// Secondary text (device codes, labels, stats captions).
    pub text_muted: String,
    /// Buttons and highlights.
    pub accent: String,
    /// Border color.
    pub border: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#f4f5fb".to_string(),
            surface: "#ffffff".to_string(),
            text: "#1c1d29".to_string(),
            text_muted: "#62647a".to_string(),
            accent: "#5b5fe0".to_string(),
            border: "#dfe1ee".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0f1020".to_string(),
            surface: "#1a1b30".to_string(),
            text: "#ecedf7".to_string(),
            text_muted: "#9c9eb8".to_string(),
            accent: "#8b8ff5".to_string(),
            border: "#2c2e4a".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// The base layer that user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(CatalogConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<CatalogConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: CatalogConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Parse TOML text as a config overlay.
pub fn parse_config(content: &str) -> Result<CatalogConfig, ConfigError> {
    let value: toml::Value = toml::from_str(content)?;
    resolve_config(Some(value))
}

/// Load the catalog config.
///
/// With an explicit `path` the file must exist. Without one, `catalog.toml`
/// in `dir` is used when present and stock defaults otherwise.
pub fn load_config(path: Option<&Path>, dir: &Path) -> Result<CatalogConfig, ConfigError> {
    let config_path = match path {
        Some(p) if !p.is_file() => return Err(ConfigError::Missing(p.to_path_buf())),
        Some(p) => p.to_path_buf(),
        None => {
            let default_path = dir.join(CONFIG_FILE);
            if !default_path.is_file() {
                return resolve_config(None);
            }
            default_path
        }
    };
    let content = fs::read_to_string(&config_path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock `catalog.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# ROM Catalog Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Command-line flags (--data, --output, --port) override these values.
# Unknown keys will cause an error.

# Directory holding one <device-code>.json file per device.
input_dir = "data"

# Root of the generated site (index.html, data/, .nojekyll).
output_dir = "docs"

# Port used by `rom-catalog serve`.
preview_port = 3000

# ---------------------------------------------------------------------------
# Device records
# ---------------------------------------------------------------------------
[records]
# JSON key holding the display name. Older data files use "model".
# When the key is missing or empty, the device code is shown instead.
name_field = "name"

# ---------------------------------------------------------------------------
# Page text
# ---------------------------------------------------------------------------
[site]
title = "ROM Catalog"

# Line under the heading. Set to "" to hide it.
tagline = "Firmware downloads by device"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#f4f5fb"
surface = "#ffffff"       # Cards, modal, search box
text = "#1c1d29"
text_muted = "#62647a"    # Device codes, captions
accent = "#5b5fe0"        # Buttons, highlights
border = "#dfe1ee"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#0f1020"
surface = "#1a1b30"
text = "#ecedf7"
text_muted = "#9c9eb8"
accent = "#8b8ff5"
border = "#2c2e4a"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-surface: {light_surface};
    --color-text: {light_text};
    --color-text-muted: {light_text_muted};
    --color-accent: {light_accent};
    --color-border: {light_border};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --color-bg: {dark_bg};
        --color-surface: {dark_surface};
        --color-text: {dark_text};
        --color-text-muted: {dark_text_muted};
        --color-accent: {dark_accent};
        --color-border: {dark_border};
    }}
}}"#,
        light_bg = colors.light.background,
        light_surface = colors.light.surface,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_accent = colors.light.accent,
        light_border = colors.light.border,
        dark_bg = colors.dark.background,
        dark_surface = colors.dark.surface,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_accent = colors.dark.accent,
        dark_border = colors.dark.border,
    )
}
