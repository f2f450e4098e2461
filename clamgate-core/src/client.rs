//! Async clamd client.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::debug;

use crate::address::ClamdAddress;
use crate::error::{ClamdError, Result};
use crate::protocol::{self, Command};
use crate::scanner::Scanner;
use crate::types::ScanResult;

/// Default time allowed to establish a connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default time allowed for a command exchange once connected.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for a clamd instance.
///
/// Holds no connection: every operation dials the daemon, runs one command
/// and hangs up. Clones share nothing mutable, so a single client can serve
/// any number of concurrent requests.
#[derive(Debug, Clone)]
pub struct ClamdClient {
    address: ClamdAddress,
    connect_timeout: Duration,
    command_timeout: Duration,
}

impl ClamdClient {
    /// Create a client for `address` with the default timeouts.
    pub fn new(address: &str) -> Result<Self> {
        Ok(Self::from_address(ClamdAddress::parse(address)?))
    }

    pub fn from_address(address: ClamdAddress) -> Self {
        Self {
            address,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    pub fn address(&self) -> &ClamdAddress {
        &self.address
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn command_timeout(&self) -> Duration {
        self.command_timeout
    }

    /// Run one command on a fresh connection and return the raw reply.
    async fn execute(&self, command: Command<'_>) -> Result<String> {
        debug!("clamd {} -> {}", command.name(), self.address);

        match &self.address {
            ClamdAddress::Tcp { host, port } => {
                let connect = TcpStream::connect((host.as_str(), *port));
                let stream = self.bounded_connect(connect).await?;
                stream.set_nodelay(true)?;
                self.exchange(stream, command).await
            }
            #[cfg(unix)]
            ClamdAddress::Unix(path) => {
                let connect = tokio::net::UnixStream::connect(path);
                let stream = self.bounded_connect(connect).await?;
                self.exchange(stream, command).await
            }
            #[cfg(not(unix))]
            ClamdAddress::Unix(_) => Err(ClamdError::invalid_address(
                &self.address.to_string(),
                "unix sockets are not supported on this platform",
            )),
        }
    }

    async fn bounded_connect<F, S>(&self, connect: F) -> Result<S>
    where
        F: std::future::Future<Output = std::io::Result<S>>,
    {
        match tokio::time::timeout(self.connect_timeout, connect).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(source)) => Err(ClamdError::Connect {
                address: self.address.to_string(),
                source,
            }),
            Err(_) => Err(ClamdError::ConnectTimeout {
                address: self.address.to_string(),
                timeout: self.connect_timeout,
            }),
        }
    }

    async fn exchange<S>(&self, mut stream: S, command: Command<'_>) -> Result<String>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let roundtrip = async {
            protocol::write_command(&mut stream, command).await?;
            protocol::read_reply(&mut stream).await
        };

        tokio::time::timeout(self.command_timeout, roundtrip)
            .await
            .map_err(|_| ClamdError::CommandTimeout {
                command: command.name(),
                timeout: self.command_timeout,
            })?
    }
}

#[async_trait]
impl Scanner for ClamdClient {
    async fn ping(&self) -> Result<bool> {
        let reply = self.execute(Command::Ping).await?;
        Ok(protocol::parse_ping(&reply))
    }

    async fn version(&self) -> Result<String> {
        let reply = self.execute(Command::Version).await?;
        protocol::parse_version(&reply)
    }

    async fn scan(&self, data: Bytes) -> Result<Vec<ScanResult>> {
        let reply = self.execute(Command::Instream(&data)).await?;
        debug!("clamd INSTREAM ({} bytes) <- {:?}", data.len(), reply);
        protocol::parse_scan_reply(&reply)
    }
}
