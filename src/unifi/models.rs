//! Typed view of the `mca-dump` document
//!
//! Only the keys the queries rely on are typed; everything else is carried
//! through untouched in flattened maps.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level `mca-dump` output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApDocument {
    /// Absent when the device is not an access point
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vap_table: Option<Vec<VapEntry>>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// One configured virtual AP (SSID)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VapEntry {
    #[serde(default)]
    pub essid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sta_table: Option<Vec<StationRecord>>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl VapEntry {
    pub fn stations(&self) -> &[StationRecord] {
        self.sta_table.as_deref().unwrap_or_default()
    }

    pub fn matches_ssid(&self, ssids: &[&str]) -> bool {
        self.essid
            .as_deref()
            .is_some_and(|essid| ssids.contains(&essid))
    }
}

/// One associated client device. Attributes other than `mac` (rssi, rates,
/// hostname, ...) are firmware dependent and kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    pub mac: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl StationRecord {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
}
