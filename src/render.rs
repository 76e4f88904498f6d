//! HTML page rendering.
//!
//! Produces the single `index.html` of the catalog site. The page is fully
//! usable without any data fetch for browsing: device cards and statistics are
//! rendered at build time from the loaded devices. The embedded script adds:
//!
//! - **Search**: case-insensitive substring match on device code and name
//! - **Details**: fetches `data/<code>.json` when a card's button is pressed
//!   and lists each ROM version with its download links
//! - **Copy**: per-link copy-to-clipboard buttons
//! - **Stats refresh**: re-reads `data/devices.json` to update the counters
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: base styles (colors injected from config)
//! - `static/catalog.js`: search, detail modal, clipboard
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! All interpolated device data is escaped.

use crate::aggregate::CatalogAggregate;
use crate::config::{self, CatalogConfig};
use crate::emit::{DATA_DIR, INDEX_FILE};
use crate::types::{DeviceSummary, display_name};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/catalog.js");

/// Render the full catalog page.
pub fn render_page(
    devices: &[DeviceSummary],
    aggregate: &CatalogAggregate,
    config: &CatalogConfig,
    generator: &str,
) -> Markup {
    let color_css = config::generate_color_css(&config.colors);
    let css = format!("{}\n\n{}", color_css, CSS_STATIC);

    let content = html! {
        div.container {
            (page_header(&config.site.title, &config.site.tagline, aggregate))
            div.search-box {
                input.search-input id="searchInput" type="search"
                    placeholder="Search by device name or code"
                    autocomplete="off" aria-label="Search devices";
            }
            div.devices-grid id="devicesGrid" {
                @for device in devices {
                    (device_card(device))
                }
                p class="empty-state" id="emptyState" hidden[!devices.is_empty()] {
                    "No devices match your search."
                }
            }
        }
        (loading_overlay())
        (device_modal())
        script { (PreEscaped(JS)) }
    };

    base_document(&config.site.title, &css, generator, content)
}

/// Renders the base HTML document structure.
///
/// The body carries the data URLs the script fetches, so they follow the
/// emitter's layout instead of being repeated in the script.
fn base_document(title: &str, css: &str, generator: &str, content: Markup) -> Markup {
    let index_url = format!("./{DATA_DIR}/{INDEX_FILE}");
    let detail_base = format!("./{DATA_DIR}/");

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="generator" content=(generator);
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body data-index-url=(index_url) data-detail-base=(detail_base) {
                (content)
            }
        }
    }
}

/// Title, tagline and the three catalog counters.
fn page_header(title: &str, tagline: &str, aggregate: &CatalogAggregate) -> Markup {
    html! {
        header.header {
            h1 { (title) }
            @if !tagline.is_empty() {
                p.tagline { (tagline) }
            }
            div.stats-bar {
                (stat("deviceCount", aggregate.devices, "Devices"))
                (stat("romCount", aggregate.roms, "ROM versions"))
                (stat("linkCount", aggregate.links, "Download links"))
            }
        }
    }
}

fn stat(id: &str, value: usize, label: &str) -> Markup {
    html! {
        div.stat-item {
            span class="stat-number" id=(id) { (value) }
            span.stat-label { (label) }
        }
    }
}

/// One device card. Search matches against `data-code` and `data-name`.
fn device_card(device: &DeviceSummary) -> Markup {
    let name = display_name(Some(device.name.as_str()), &device.code);

    html! {
        div class="device-card" data-code=(device.code) data-name=(name) {
            div.device-name { (name) }
            div.device-code { (device.code) }
            div.device-stats {
                (plural(device.rom_count, "ROM", "ROMs")) " · " (plural(device.link_count, "link", "links"))
            }
            button.load-button type="button" data-code=(device.code) data-name=(name) {
                "View ROMs"
            }
        }
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}

fn loading_overlay() -> Markup {
    html! {
        div.loading-modal id="loadingModal" {
            div.loading-content {
                div.loading-spinner {}
                div { "Loading device data…" }
            }
        }
    }
}

/// Empty detail dialog, filled by the script from the device's detail file.
fn device_modal() -> Markup {
    html! {
        div.modal-overlay id="deviceModal" {
            div.modal-content role="dialog" aria-modal="true" aria-labelledby="modalTitle" {
                div.modal-header {
                    h2 id="modalTitle" {}
                    p id="modalCode" {}
                    button.modal-close id="modalClose" type="button" title="Close" { "×" }
                }
                div.modal-body id="modalBody" {}
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
