//! UniFi access point client
//!
//! Every query runs `mca-dump` over a fresh SSH session and projects the
//! parsed document. Nothing is cached between calls.

use std::collections::{HashMap, HashSet};

use crate::config::ConnectionParams;
use crate::error::{ApError, Result};
use crate::ssh::{OpenSshTransport, RemoteSession, RemoteTransport, SessionGuard};
use crate::unifi::models::{ApDocument, StationRecord, VapEntry};

/// Diagnostic command dumping the access point's internal state as JSON
pub const MCA_DUMP_COMMAND: &str = "mca-dump";

pub struct UnifiAp<T: RemoteTransport = OpenSshTransport> {
    params: ConnectionParams,
    transport: T,
}

impl UnifiAp<OpenSshTransport> {
    pub fn new(params: ConnectionParams) -> Self {
        Self::with_transport(params, OpenSshTransport::new())
    }
}

impl<T: RemoteTransport> UnifiAp<T> {
    pub fn with_transport(params: ConnectionParams, transport: T) -> Self {
        Self { params, transport }
    }

    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    /// Run `mca-dump` and parse its output.
    ///
    /// The session is closed on every path, including a failed connect.
    /// Shape checks beyond the JSON schema are left to the callers.
    pub async fn fetch(&self) -> Result<ApDocument> {
        let mut session = SessionGuard::new(self.transport.open_session());

        tracing::debug!(
            "[UnifiAp] Fetching {} from {}:{}",
            MCA_DUMP_COMMAND,
            self.params.host,
            self.params.port
        );

        let output = match Self::run(&mut session, &self.params).await {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!("[UnifiAp] {} unreachable: {}", self.params.host, e);
                return Err(e);
            }
        };

        let text = String::from_utf8(output)?;
        let document: ApDocument = serde_json::from_str(&text)?;
        Ok(document)
    }

    async fn run(
        session: &mut SessionGuard<T::Session>,
        params: &ConnectionParams,
    ) -> Result<Vec<u8>> {
        session.connect(params).await?;
        let output = session.exec(MCA_DUMP_COMMAND).await?;
        Ok(output)
    }

    /// All configured SSIDs. An entry without `essid` contributes `None`.
    ///
    /// The whole document is validated first, so a station without `mac`
    /// anywhere in it fails this call with [`ApError::Data`] as well.
    pub async fn get_ssids(&self) -> Result<HashSet<Option<String>>> {
        let document = self.fetch().await?;
        let vaps = document.vap_table.ok_or_else(|| {
            ApError::Data(
                "device did not return any vap_table data - is it an accesspoint?".to_string(),
            )
        })?;

        let ssids: HashSet<Option<String>> = vaps.into_iter().map(|vap| vap.essid).collect();

        tracing::info!(
            "[UnifiAp] {} reports {} SSIDs",
            self.params.host,
            ssids.len()
        );
        Ok(ssids)
    }

    /// Connected stations keyed by mac, limited to `for_ssids` when given and
    /// non-empty. A mac seen under several SSIDs keeps the last record.
    pub async fn get_clients(
        &self,
        for_ssids: Option<&[&str]>,
    ) -> Result<HashMap<String, StationRecord>> {
        let document = self.fetch().await?;
        let vaps = document.vap_table.ok_or_else(|| {
            ApError::Data("device did not return any vap_table - is it an accesspoint?".to_string())
        })?;

        let clients = collect_clients(vaps, for_ssids.unwrap_or_default());

        tracing::info!(
            "[UnifiAp] {} reports {} clients",
            self.params.host,
            clients.len()
        );
        Ok(clients)
    }
}

fn collect_clients(vaps: Vec<VapEntry>, for_ssids: &[&str]) -> HashMap<String, StationRecord> {
    let mut clients = HashMap::new();

    for vap in vaps {
        if !for_ssids.is_empty() && !vap.matches_ssid(for_ssids) {
            continue;
        }
        for station in vap.sta_table.unwrap_or_default() {
            clients.insert(station.mac.clone(), station);
        }
    }

    clients
}
