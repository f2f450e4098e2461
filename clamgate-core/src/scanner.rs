//! The operations the gateway needs from a scanning daemon.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;
use crate::types::ScanResult;

/// A scanning daemon, seen as three operations.
///
/// Implementations must be safe to call concurrently from many requests.
#[async_trait]
pub trait Scanner: Send + Sync {
    /// Health probe. `Ok(false)` means the daemon answered, but not as expected.
    async fn ping(&self) -> Result<bool>;

    /// Engine and signature database version string.
    async fn version(&self) -> Result<String>;

    /// Scan one payload. Results are in the order the daemon reported them.
    async fn scan(&self, data: Bytes) -> Result<Vec<ScanResult>>;
}
