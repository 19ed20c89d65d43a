use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Raw area catalogue document.
///
/// `BTreeMap` keys keep iteration deterministic; the JSON object order is
/// not otherwise preserved. Sections beyond the three consumed here
/// (`class15s`, `class20s`, …) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalogue {
    #[serde(default)]
    pub centers: BTreeMap<String, Center>,
    #[serde(default)]
    pub offices: BTreeMap<String, Office>,
    #[serde(default)]
    pub class10s: BTreeMap<String, Zone>,
}

/// Macro-region grouping of forecast offices.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Center {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub children: Vec<String>,
}

/// Forecast office; its code names the fetchable forecast document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Office {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub children: Vec<String>,
}

/// Fine-grained forecast zone (class10).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Zone {
    #[serde(default)]
    pub name: String,
}

/// One zone with its owning office, immutable once loaded.
///
/// The office code is the key for fetching the forecast document; the zone
/// code is the preferred key into the document's series areas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionEntry {
    pub zone_code: String,
    pub zone_name: String,
    pub office_code: String,
    pub office_name: String,
}
