//! Remote command execution over SSH
//!
//! - `RemoteTransport`: hands out fresh sessions
//! - `RemoteSession`: connect / exec / close against one host
//! - `SessionGuard`: closes its session when dropped
//! - `openssh`: transport backed by the system `ssh` binary

pub mod openssh;

use std::ops::{Deref, DerefMut};

use async_trait::async_trait;

use crate::config::ConnectionParams;
use crate::error::TransportError;

pub use openssh::{OpenSshSession, OpenSshTransport};

/// One authenticated remote shell session
#[async_trait]
pub trait RemoteSession: Send {
    /// Establish the session. Host keys are accepted without verification.
    async fn connect(&mut self, params: &ConnectionParams) -> Result<(), TransportError>;

    /// Run `command` and return its stdout, read to completion
    async fn exec(&mut self, command: &str) -> Result<Vec<u8>, TransportError>;

    /// Release the session. Must be idempotent and safe before `connect`.
    fn close(&mut self);
}

pub trait RemoteTransport: Send + Sync {
    type Session: RemoteSession;

    fn open_session(&self) -> Self::Session;
}

/// Owns a session for one scope and closes it on drop
pub struct SessionGuard<S: RemoteSession> {
    session: S,
}

impl<S: RemoteSession> SessionGuard<S> {
    pub fn new(session: S) -> Self {
        Self { session }
    }
}

impl<S: RemoteSession> Deref for SessionGuard<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.session
    }
}

impl<S: RemoteSession> DerefMut for SessionGuard<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.session
    }
}

impl<S: RemoteSession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        self.session.close();
    }
}
