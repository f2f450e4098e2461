//! clamgate core - talking to the ClamAV daemon.
//!
//! This crate provides:
//! - Daemon address parsing (`host:port` or `unix:/path`)
//! - An async clamd client speaking the null-terminated command protocol
//! - The [`ScanResult`] verdict type shared with the HTTP gateway
//! - The [`Scanner`] trait the gateway depends on
//!
//! # Usage
//!
//! ```rust,no_run
//! use clamgate_core::{ClamdClient, Scanner};
//!
//! # async fn run() -> clamgate_core::Result<()> {
//! let client = ClamdClient::new("127.0.0.1:3310")?;
//! if client.ping().await? {
//!     let results = client.scan(bytes::Bytes::from_static(b"hello")).await?;
//!     assert!(results.iter().all(|r| r.is_clean()));
//! }
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]

pub mod address;
pub mod client;
pub mod error;
pub mod protocol;
pub mod scanner;
pub mod types;

pub use address::ClamdAddress;
pub use client::ClamdClient;
pub use error::{ClamdError, Result};
pub use scanner::Scanner;
pub use types::{ScanResult, CLEAN_STATUS};
