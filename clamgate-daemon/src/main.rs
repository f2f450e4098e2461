//! clamgate daemon - HTTP front-end for ClamAV.
//!
//! A single binary that provides:
//! - `GET /ping` and `GET /version` probes of clamd
//! - `POST /scan/text` and `POST /scan/file` scanning
//! - Static assets for the browser client under `/static/`

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use clamgate_daemon::{Cli, Gateway, GatewayConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = GatewayConfig::try_from(cli).context("Failed to create server")?;
    info!("Static assets: {:?}", config.static_dir);

    Gateway::new(config).run().await?;
    Ok(())
}

/// Initialize logging; `RUST_LOG` overrides the default filter.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        "debug,hyper=info"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).compact())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}
