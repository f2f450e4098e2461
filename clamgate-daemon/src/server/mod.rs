//! HTTP server for the gateway.
//!
//! Provides:
//! - Health and version probes of the daemon
//! - Text and file scanning
//! - Static assets for the browser client
//! - CORS on every response

mod cors;
mod error;
mod http;
pub mod state;

pub use cors::cors_middleware;
pub use error::ApiError;
pub use http::{
    create_router, FileScanResponse, PingResponse, TextScanResponse, VersionResponse,
    MAX_UPLOAD_BYTES,
};
pub use state::{AppState, Deadlines};
