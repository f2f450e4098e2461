//! Daemon address parsing.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{ClamdError, Result};

const UNIX_PREFIX: &str = "unix:";

/// Where clamd listens.
///
/// Parsed without any name resolution, so a daemon that is not up yet (or a
/// host that only resolves inside a container network) does not block startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClamdAddress {
    /// TCP `host:port`.
    Tcp { host: String, port: u16 },
    /// Unix domain socket path, written as `unix:/path/to/clamd.sock`.
    Unix(PathBuf),
}

impl ClamdAddress {
    pub fn parse(address: &str) -> Result<Self> {
        let address = address.trim();

        if let Some(path) = address.strip_prefix(UNIX_PREFIX) {
            if path.is_empty() {
                return Err(ClamdError::invalid_address(address, "empty socket path"));
            }
            return Ok(ClamdAddress::Unix(PathBuf::from(path)));
        }

        let (host, port) = address
            .rsplit_once(':')
            .ok_or_else(|| ClamdError::invalid_address(address, "expected host:port"))?;

        // Bracketed IPv6 literal, e.g. [::1]:3310
        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);

        if host.is_empty() {
            return Err(ClamdError::invalid_address(address, "missing host"));
        }
        if host.contains(':') && !address.starts_with('[') {
            return Err(ClamdError::invalid_address(
                address,
                "IPv6 hosts must be bracketed",
            ));
        }

        let port: u16 = port
            .parse()
            .map_err(|_| ClamdError::invalid_address(address, format!("invalid port '{}'", port)))?;
        if port == 0 {
            return Err(ClamdError::invalid_address(address, "port must be non-zero"));
        }

        Ok(ClamdAddress::Tcp {
            host: host.to_string(),
            port,
        })
    }
}

impl FromStr for ClamdAddress {
    type Err = ClamdError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ClamdAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClamdAddress::Tcp { host, port } if host.contains(':') => {
                write!(f, "[{}]:{}", host, port)
            }
            ClamdAddress::Tcp { host, port } => write!(f, "{}:{}", host, port),
            ClamdAddress::Unix(path) => write!(f, "{}{}", UNIX_PREFIX, path.display()),
        }
    }
}
