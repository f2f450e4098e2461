//! clamgate-daemon - HTTP gateway in front of a ClamAV daemon.
//!
//! Callers submit raw text or an uploaded file; the gateway forwards the
//! payload to clamd and relays back a JSON verdict. The daemon client is
//! built once at startup and shared read-only by every request.

pub mod config;
mod error;
pub mod server;

use std::sync::Arc;

use axum::Router;
use clamgate_core::{ClamdClient, Scanner};
use tokio::net::TcpListener;

pub use config::{Cli, GatewayConfig};
pub use error::ServerError;
pub use server::{create_router, AppState, Deadlines, MAX_UPLOAD_BYTES};

/// The HTTP gateway
pub struct Gateway {
    config: GatewayConfig,
    state: AppState,
}

impl Gateway {
    /// Create a gateway talking to the clamd at the configured address
    pub fn new(config: GatewayConfig) -> Self {
        let client = ClamdClient::from_address(config.clamd_address.clone());
        Self::with_scanner(config, Arc::new(client))
    }

    /// Create a gateway over any scanner (for testing)
    pub fn with_scanner(config: GatewayConfig, scanner: Arc<dyn Scanner>) -> Self {
        let state = AppState::new(scanner).with_deadlines(config.deadlines);
        Self { config, state }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn router(&self) -> Router {
        create_router(self.state.clone(), &self.config.static_dir)
    }

    /// Run the gateway, binding to the configured address
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = self.config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ServerError::Bind {
                addr: addr.clone(),
                source: e,
            })?;

        tracing::info!("Starting server on {}", addr);
        self.run_with_listener(listener).await
    }

    /// Run the gateway on an already bound listener
    pub async fn run_with_listener(self, listener: TcpListener) -> Result<(), ServerError> {
        tracing::info!("ClamAV daemon address: {}", self.config.clamd_address);

        axum::serve(listener, self.router())
            .await
            .map_err(ServerError::Serve)
    }
}
