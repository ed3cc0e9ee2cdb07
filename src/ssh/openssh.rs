//! OpenSSH-backed transport
//!
//! Uses `tokio::process::Command` with the system `ssh` client, wrapped in
//! `sshpass` when a password is configured. Host keys are never checked.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};

use super::{RemoteSession, RemoteTransport};
use crate::config::ConnectionParams;
use crate::error::TransportError;

/// ssh reserves exit status 255 for its own failures
const SSH_ERROR_STATUS: i32 = 255;
/// sshpass reserves 1..=6 (bad args, runtime error, unknown prompt,
/// incorrect password, unknown host key)
const SSHPASS_ERROR_STATUSES: std::ops::RangeInclusive<i32> = 1..=6;

/// Program paths used to reach the access point
#[derive(Debug, Clone)]
pub struct OpenSshTransport {
    ssh: PathBuf,
    sshpass: PathBuf,
}

impl Default for OpenSshTransport {
    fn default() -> Self {
        Self {
            ssh: PathBuf::from("ssh"),
            sshpass: PathBuf::from("sshpass"),
        }
    }
}

impl OpenSshTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use explicit `ssh` / `sshpass` binaries instead of looking them up on PATH
    pub fn with_programs(ssh: impl Into<PathBuf>, sshpass: impl Into<PathBuf>) -> Self {
        Self {
            ssh: ssh.into(),
            sshpass: sshpass.into(),
        }
    }
}

impl RemoteTransport for OpenSshTransport {
    type Session = OpenSshSession;

    fn open_session(&self) -> OpenSshSession {
        OpenSshSession {
            programs: self.clone(),
            params: None,
            child: None,
        }
    }
}

/// A session is the set of resolved connection parameters plus the `ssh`
/// child process of the command in flight. ssh authenticates when the
/// command runs, so `connect` only resolves and checks credentials.
#[derive(Debug, Default)]
pub struct OpenSshSession {
    programs: OpenSshTransport,
    params: Option<ConnectionParams>,
    child: Option<Child>,
}

impl OpenSshSession {
    fn build_command(&self, params: &ConnectionParams, remote_command: &str) -> Command {
        let mut cmd = match &params.password {
            Some(password) => {
                let mut cmd = Command::new(&self.programs.sshpass);
                cmd.env("SSHPASS", password)
                    .arg("-e")
                    .arg(&self.programs.ssh);
                cmd
            }
            None => {
                let mut cmd = Command::new(&self.programs.ssh);
                cmd.arg("-o").arg("BatchMode=yes");
                cmd
            }
        };

        cmd.arg("-o")
            .arg("StrictHostKeyChecking=no")
            .arg("-o")
            .arg("UserKnownHostsFile=/dev/null")
            .arg("-o")
            .arg("LogLevel=ERROR")
            .arg("-o")
            .arg(format!("ConnectTimeout={}", params.timeout));

        if let Some(key_file) = &params.key_file {
            cmd.arg("-o").arg("IdentitiesOnly=yes").arg("-i").arg(key_file);
        }

        cmd.arg("-p")
            .arg(params.port.to_string())
            .arg(format!("{}@{}", params.username, params.host))
            .arg(remote_command);

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    /// Exit statuses that mean the transport failed rather than the remote command
    fn is_transport_failure(via_sshpass: bool, code: Option<i32>) -> bool {
        match code {
            Some(SSH_ERROR_STATUS) => true,
            Some(code) => via_sshpass && SSHPASS_ERROR_STATUSES.contains(&code),
            // killed by a signal
            None => true,
        }
    }
}

#[async_trait]
impl RemoteSession for OpenSshSession {
    async fn connect(&mut self, params: &ConnectionParams) -> Result<(), TransportError> {
        if let Some(key_file) = &params.key_file {
            if !tokio::fs::try_exists(key_file).await.unwrap_or(false) {
                return Err(TransportError::KeyFileNotFound(key_file.clone()));
            }
        }

        tracing::debug!(
            "[OpenSsh] Session prepared for {}@{}:{}",
            params.username,
            params.host,
            params.port
        );
        self.params = Some(params.clone());
        Ok(())
    }

    async fn exec(&mut self, command: &str) -> Result<Vec<u8>, TransportError> {
        let params = self.params.as_ref().ok_or(TransportError::NotConnected)?;
        let via_sshpass = params.password.is_some();
        let timeout = params.timeout;

        let mut cmd = self.build_command(params, command);
        let program = cmd.as_std().get_program().to_string_lossy().into_owned();
        let child = cmd.spawn().map_err(|source| TransportError::Spawn {
            program: program.clone(),
            source,
        })?;
        let child = self.child.insert(child);

        let (Some(mut stdout), Some(mut stderr)) = (child.stdout.take(), child.stderr.take())
        else {
            return Err(TransportError::Io(std::io::Error::other(
                "ssh stdio was not captured",
            )));
        };

        let run = async {
            let mut out = Vec::new();
            let mut err = Vec::new();
            tokio::try_join!(stdout.read_to_end(&mut out), stderr.read_to_end(&mut err))?;
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((status, out, err))
        };

        let (status, out, err) = match tokio::time::timeout(Duration::from_secs(timeout), run).await
        {
            Ok(result) => result?,
            Err(_) => {
                tracing::debug!("[OpenSsh] `{}` timed out after {}s", command, timeout);
                return Err(TransportError::Timeout(timeout));
            }
        };
        self.child = None;

        if Self::is_transport_failure(via_sshpass, status.code()) {
            let stderr = String::from_utf8_lossy(&err).trim().to_string();
            let message = if stderr.is_empty() {
                format!("{} exited with {}", program, status)
            } else {
                stderr
            };
            return Err(TransportError::Ssh(message));
        }

        if !status.success() {
            // Left to the caller: the output may still parse
            tracing::debug!("[OpenSsh] `{}` exited with {}", command, status);
        }

        Ok(out)
    }

    fn close(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.start_kill() {
                tracing::debug!("[OpenSsh] Kill of ssh process failed: {}", e);
            }
        }
        if self.params.take().is_some() {
            tracing::debug!("[OpenSsh] Session closed");
        }
    }
}
