//! Error types for clamgate-core.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for daemon operations.
pub type Result<T> = std::result::Result<T, ClamdError>;

/// Errors that can occur while talking to clamd.
#[derive(Error, Debug)]
pub enum ClamdError {
    /// The configured daemon address could not be parsed.
    #[error("invalid clamd address '{address}': {reason}")]
    InvalidAddress {
        /// Address as given.
        address: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Connection to the daemon failed.
    #[error("failed to connect to clamd at {address}: {source}")]
    Connect {
        /// Address that was dialed.
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Connection did not complete within the connect timeout.
    #[error("timed out connecting to clamd at {address} after {timeout:?}")]
    ConnectTimeout {
        /// Address that was dialed.
        address: String,
        /// Connect timeout in effect.
        timeout: Duration,
    },

    /// Command exchange did not complete within the command timeout.
    #[error("clamd command {command} timed out after {timeout:?}")]
    CommandTimeout {
        /// Command name.
        command: &'static str,
        /// Command timeout in effect.
        timeout: Duration,
    },

    /// I/O failure on an established connection.
    #[error("clamd I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The daemon answered with an `ERROR` line.
    #[error("clamd reported an error: {0}")]
    Daemon(String),

    /// The daemon reply could not be understood.
    #[error("malformed clamd reply: {0:?}")]
    MalformedReply(String),

    /// The daemon reply exceeded the reply size cap.
    #[error("clamd reply exceeded {limit} bytes")]
    ReplyTooLarge {
        /// Cap in bytes.
        limit: usize,
    },
}

impl ClamdError {
    pub(crate) fn invalid_address(address: &str, reason: impl Into<String>) -> Self {
        ClamdError::InvalidAddress {
            address: address.to_string(),
            reason: reason.into(),
        }
    }
}
