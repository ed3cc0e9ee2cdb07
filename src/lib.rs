//! unifi-ap - UniFi access point client
//!
//! Connects to an access point over SSH, runs `mca-dump`, and reports the
//! configured SSIDs and the connected stations.
//!
//! ```rust,no_run
//! use unifi_ap::{ConnectionParams, UnifiAp};
//!
//! # async fn run() -> unifi_ap::Result<()> {
//! let ap = UnifiAp::new(ConnectionParams::new("192.168.1.20", "admin").with_password("secret"));
//! let ssids = ap.get_ssids().await?;
//! let guests = ap.get_clients(Some(&["Guest"])).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod ssh;
pub mod unifi;

pub use crate::config::{Config, ConnectionParams};
pub use crate::error::{ApError, Result, TransportError};
pub use crate::unifi::{ApDocument, StationRecord, UnifiAp, VapEntry};
