//! Startup error types

use thiserror::Error;

/// Errors that stop the gateway from starting or serving
#[derive(Debug, Error)]
pub enum ServerError {
    /// The daemon client could not be constructed
    #[error("failed to create ClamAV client: {0}")]
    Clamd(#[from] clamgate_core::ClamdError),

    /// Failed to bind to the specified address
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP server stopped with an error
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
