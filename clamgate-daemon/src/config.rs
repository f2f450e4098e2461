//! Gateway configuration from command-line flags and environment.
//!
//! Every flag can also be set through an environment variable, which is how
//! the gateway is usually configured inside a container:
//!
//! ```text
//! CLAMD_ADDRESS=clamd:3310 PORT=8080 clamgate-daemon
//! ```
//!
//! Values are resolved once at startup and never change afterwards.

use std::path::PathBuf;

use clamgate_core::ClamdAddress;
use clap::Parser;

use crate::error::ServerError;
use crate::server::Deadlines;

/// Daemon address used when `CLAMD_ADDRESS` is not set.
pub const DEFAULT_CLAMD_ADDRESS: &str = "clamd:3310";

/// Port used when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 8080;

/// HTTP gateway in front of a ClamAV daemon
#[derive(Parser, Debug, Clone)]
#[command(name = "clamgate-daemon")]
#[command(about = "HTTP gateway in front of a ClamAV daemon")]
#[command(version)]
pub struct Cli {
    /// clamd address, `host:port` or `unix:/path/to/clamd.sock`
    #[arg(long, env = "CLAMD_ADDRESS", default_value = DEFAULT_CLAMD_ADDRESS)]
    pub clamd_address: String,

    /// HTTP port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Directory served under /static/
    #[arg(long, env = "STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Resolved gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub clamd_address: ClamdAddress,
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub deadlines: Deadlines,
}

impl GatewayConfig {
    /// Address the HTTP listener binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl TryFrom<Cli> for GatewayConfig {
    type Error = ServerError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let clamd_address = ClamdAddress::parse(&cli.clamd_address)?;

        Ok(Self {
            clamd_address,
            host: cli.host,
            port: cli.port,
            static_dir: cli.static_dir,
            deadlines: Deadlines::default(),
        })
    }
}
