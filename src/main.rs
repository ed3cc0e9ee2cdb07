//! unifi-ap - query a UniFi access point over SSH
//!
//! Connection settings come from `config/default.*`, `UNIFI_AP__*`
//! environment variables, or the command line, in increasing precedence.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use unifi_ap::{Config, ConnectionParams, UnifiAp};

#[derive(Parser)]
#[command(name = "unifi-ap", about = "Query a UniFi access point over SSH", version)]
struct Cli {
    /// Configuration file (defaults to config/default.*)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    host: Option<String>,

    #[arg(long, global = true)]
    username: Option<String>,

    #[arg(long, global = true, env = "UNIFI_AP_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[arg(long, global = true)]
    key_file: Option<PathBuf>,

    #[arg(long, global = true)]
    port: Option<u16>,

    /// Seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// List configured SSIDs
    Ssids,
    /// List connected clients keyed by mac
    Clients {
        /// Only clients of this SSID (repeatable)
        #[arg(long = "ssid")]
        ssids: Vec<String>,
    },
}

impl Cli {
    fn connection_params(&self) -> anyhow::Result<ConnectionParams> {
        let loaded = match &self.config {
            Some(path) => Config::load_from(path)
                .with_context(|| format!("failed to load {}", path.display()))
                .map(|c| c.connection),
            None => Config::load()
                .context("no connection configured")
                .map(|c| c.connection),
        };

        let mut params = match (loaded, &self.host, &self.username) {
            (Ok(params), _, _) => params,
            (Err(e), Some(host), Some(username)) if self.config.is_none() => {
                tracing::warn!("Ignoring configuration, using command line only: {:#}", e);
                ConnectionParams::new(host.clone(), username.clone())
            }
            (Err(e), _, _) => return Err(e.context("pass --host and --username or a config file")),
        };

        if let Some(host) = &self.host {
            params.host = host.clone();
        }
        if let Some(username) = &self.username {
            params.username = username.clone();
        }
        if let Some(password) = &self.password {
            params.password = Some(password.clone());
        }
        if let Some(key_file) = &self.key_file {
            params.key_file = Some(key_file.clone());
        }
        if let Some(port) = self.port {
            params.port = port;
        }
        if let Some(timeout) = self.timeout {
            params.timeout = timeout;
        }
        Ok(params)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr, results to stdout
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "unifi_ap=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let params = cli.connection_params()?;
    tracing::debug!("Connecting to {}@{}:{}", params.username, params.host, params.port);

    let ap = UnifiAp::new(params);

    let output = match &cli.command {
        Cmd::Ssids => {
            let ssids: BTreeSet<Option<String>> = ap.get_ssids().await?.into_iter().collect();
            serde_json::to_string_pretty(&ssids)?
        }
        Cmd::Clients { ssids } => {
            let filter: Vec<&str> = ssids.iter().map(String::as_str).collect();
            let clients = ap.get_clients(Some(filter.as_slice())).await?;
            let sorted: BTreeMap<_, _> = clients.into_iter().collect();
            serde_json::to_string_pretty(&sorted)?
        }
    };

    println!("{}", output);
    Ok(())
}
