//! UniFi access point integration module
//!
//! - `client`: `mca-dump` retrieval and the SSID / client queries
//! - `models`: typed schema of the `mca-dump` document

pub mod client;
pub mod models;

pub use client::{UnifiAp, MCA_DUMP_COMMAND};
pub use models::{ApDocument, StationRecord, VapEntry};
