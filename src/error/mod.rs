//! Error handling module

use std::path::PathBuf;
use std::string::FromUtf8Error;

use thiserror::Error;

/// Errors surfaced by [`crate::UnifiAp`] queries.
///
/// Only two kinds exist: the access point could not be reached, or what it
/// returned was unusable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Data error: {0}")]
    Data(String),
}

impl ApError {
    pub fn is_connection(&self) -> bool {
        matches!(self, ApError::Connection(_))
    }

    pub fn is_data(&self) -> bool {
        matches!(self, ApError::Data(_))
    }

    /// Underlying diagnostic message without the kind prefix
    pub fn message(&self) -> &str {
        match self {
            ApError::Connection(msg) | ApError::Data(msg) => msg,
        }
    }
}

impl From<TransportError> for ApError {
    fn from(e: TransportError) -> Self {
        ApError::Connection(e.to_string())
    }
}

impl From<serde_json::Error> for ApError {
    fn from(e: serde_json::Error) -> Self {
        ApError::Data(e.to_string())
    }
}

impl From<FromUtf8Error> for ApError {
    fn from(e: FromUtf8Error) -> Self {
        ApError::Data(e.to_string())
    }
}

/// Failures of the remote command transport
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("key file not found: {}", .0.display())]
    KeyFileNotFound(PathBuf),

    #[error("failed to spawn {program}: {source} (is {program} installed?)")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("timed out after {0}s")]
    Timeout(u64),

    #[error("ssh failed: {0}")]
    Ssh(String),

    #[error("session is not connected")]
    NotConnected,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ApError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_maps_to_connection() {
        let err: ApError = TransportError::Timeout(30).into();
        assert!(err.is_connection());
        assert_eq!(err.message(), "timed out after 30s");
    }

    #[test]
    fn test_key_file_message_names_path() {
        let err: ApError = TransportError::KeyFileNotFound(PathBuf::from("/nope/id_rsa")).into();
        assert_eq!(err, ApError::Connection("key file not found: /nope/id_rsa".to_string()));
    }

    #[test]
    fn test_json_error_maps_to_data() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let expected = parse_err.to_string();
        let err: ApError = parse_err.into();
        assert!(err.is_data());
        assert_eq!(err.message(), expected);
    }

    #[test]
    fn test_utf8_error_maps_to_data() {
        let utf8_err = String::from_utf8(vec![0xff, 0xfe]).unwrap_err();
        let err: ApError = utf8_err.into();
        assert!(err.is_data());
    }

    #[test]
    fn test_display_carries_kind() {
        let err = ApError::Data("bad".to_string());
        assert_eq!(err.to_string(), "Data error: bad");
    }
}
