//! Flat directory over the area catalogue.

use std::collections::HashMap;

use crate::types::{Catalogue, RegionEntry};

/// Read-only directory of forecast zones, built once from the catalogue.
#[derive(Debug, Clone, Default)]
pub struct AreaDirectory {
    entries: Vec<RegionEntry>,
    by_zone: HashMap<String, usize>,
}

impl AreaDirectory {
    /// Flatten the catalogue hierarchy (center → office → zone) into entries.
    ///
    /// Offices or zones referenced by a parent but missing from their own
    /// section are skipped; the catalogue occasionally lists children that
    /// are not class10 zones.
    pub fn from_catalogue(catalogue: &Catalogue) -> Self {
        let mut entries = Vec::new();
        for center in catalogue.centers.values() {
            for office_code in &center.children {
                let Some(office) = catalogue.offices.get(office_code) else {
                    tracing::debug!("office {} missing from catalogue", office_code);
                    continue;
                };
                for zone_code in &office.children {
                    let Some(zone) = catalogue.class10s.get(zone_code) else {
                        continue;
                    };
                    entries.push(RegionEntry {
                        zone_code: zone_code.clone(),
                        zone_name: zone.name.clone(),
                        office_code: office_code.clone(),
                        office_name: office.name.clone(),
                    });
                }
            }
        }
        Self::from_entries(entries)
    }

    /// Build a directory from already-flattened entries (e.g. the store's
    /// catalogue cache). Duplicate zone codes keep the first entry.
    pub fn from_entries(entries: Vec<RegionEntry>) -> Self {
        let mut directory = Self {
            entries: Vec::with_capacity(entries.len()),
            by_zone: HashMap::with_capacity(entries.len()),
        };
        for entry in entries {
            if directory.by_zone.contains_key(&entry.zone_code) {
                continue;
            }
            directory
                .by_zone
                .insert(entry.zone_code.clone(), directory.entries.len());
            directory.entries.push(entry);
        }
        directory
    }

    /// Look up one zone by its code.
    pub fn lookup(&self, zone_code: &str) -> Option<&RegionEntry> {
        self.by_zone.get(zone_code).map(|&i| &self.entries[i])
    }

    /// All entries in catalogue order.
    pub fn entries(&self) -> &[RegionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
