//! Catalog-wide totals.

use crate::types::{DeviceSummary, IndexEntry};

/// Totals over every device in one build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogAggregate {
    pub devices: usize,
    pub roms: usize,
    pub links: usize,
}

impl CatalogAggregate {
    /// Sum the per-device counts. Order of `devices` does not matter.
    pub fn from_devices(devices: &[DeviceSummary]) -> Self {
        devices.iter().fold(Self::default(), |acc, d| Self {
            devices: acc.devices + 1,
            roms: acc.roms + d.rom_count,
            links: acc.links + d.link_count,
        })
    }

    /// Recompute totals from a written `devices.json` index.
    pub fn from_index(entries: &[IndexEntry]) -> Self {
        entries.iter().fold(Self::default(), |acc, e| Self {
            devices: acc.devices + 1,
            roms: acc.roms + e.rom_count,
            links: acc.links + e.link_count,
        })
    }
}
