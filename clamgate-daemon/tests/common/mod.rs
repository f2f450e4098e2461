//! Shared test utilities for clamgate-daemon integration tests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use clamgate_core::{ClamdAddress, ClamdError, ScanResult, Scanner};
use clamgate_daemon::{Deadlines, GatewayConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const TEST_VERSION: &str = "ClamAV 1.3.1/27400/Tue Sep 17 08:35:19 2024";

/// How the in-memory scanner answers.
#[derive(Clone)]
pub enum Behavior {
    /// Every payload is clean
    Clean,
    /// Every payload is infected with this signature
    Infected(&'static str),
    /// Every call fails as if the daemon were down
    Unreachable,
    /// Every call takes this long before answering clean
    Slow(Duration),
}

/// In-memory scanner that counts calls and remembers payloads
pub struct MockScanner {
    behavior: Behavior,
    calls: AtomicUsize,
    payloads: Mutex<Vec<Bytes>>,
}

impl MockScanner {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicUsize::new(0),
            payloads: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn payloads(&self) -> Vec<Bytes> {
        self.payloads.lock().unwrap().clone()
    }

    async fn answer<T>(&self, clean: T, infected: T) -> clamgate_core::Result<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Clean => Ok(clean),
            Behavior::Infected(_) => Ok(infected),
            Behavior::Unreachable => Err(ClamdError::Connect {
                address: "clamd:3310".to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "connection refused",
                ),
            }),
            Behavior::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(clean)
            }
        }
    }
}

#[async_trait]
impl Scanner for MockScanner {
    async fn ping(&self) -> clamgate_core::Result<bool> {
        self.answer(true, true).await
    }

    async fn version(&self) -> clamgate_core::Result<String> {
        self.answer(TEST_VERSION.to_string(), TEST_VERSION.to_string())
            .await
    }

    async fn scan(&self, data: Bytes) -> clamgate_core::Result<Vec<ScanResult>> {
        self.payloads.lock().unwrap().push(data);
        let signature = match &self.behavior {
            Behavior::Infected(signature) => *signature,
            _ => "",
        };
        self.answer(
            vec![ScanResult::new("stream", "OK")],
            vec![ScanResult::found("stream", signature)],
        )
        .await
    }
}

/// Gateway config pointing at a placeholder daemon and the given static dir
pub fn test_config(static_dir: &Path) -> GatewayConfig {
    GatewayConfig {
        clamd_address: ClamdAddress::parse("clamd:3310").unwrap(),
        host: "127.0.0.1".to_string(),
        port: 0,
        static_dir: static_dir.to_path_buf(),
        deadlines: Deadlines::default(),
    }
}

/// Build a multipart/form-data body with a single part.
///
/// Returns the content type (with boundary) and the encoded body.
pub fn multipart_body(field: &str, filename: Option<&str>, content: &[u8]) -> (String, Vec<u8>) {
    const BOUNDARY: &str = "clamgate-test-boundary";

    let disposition = match filename {
        Some(filename) => format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        ),
        None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", field),
    };

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(disposition.as_bytes());
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}

/// Minimal clamd on an ephemeral port: PING, VERSION and INSTREAM
/// (payloads containing `EICAR` are reported as infected).
pub async fn spawn_fake_clamd() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut command = Vec::new();
                loop {
                    match stream.read_u8().await {
                        Ok(0) => break,
                        Ok(byte) => command.push(byte),
                        Err(_) => return,
                    }
                }

                let reply = match command.as_slice() {
                    b"zPING" => "PONG".to_string(),
                    b"zVERSION" => TEST_VERSION.to_string(),
                    b"zINSTREAM" => {
                        let mut payload = Vec::new();
                        loop {
                            let len = match stream.read_u32().await {
                                Ok(len) => len as usize,
                                Err(_) => return,
                            };
                            if len == 0 {
                                break;
                            }
                            let mut chunk = vec![0u8; len];
                            if stream.read_exact(&mut chunk).await.is_err() {
                                return;
                            }
                            payload.extend_from_slice(&chunk);
                        }
                        if payload.windows(5).any(|w| w == b"EICAR") {
                            "stream: Eicar-Test-Signature FOUND".to_string()
                        } else {
                            "stream: OK".to_string()
                        }
                    }
                    _ => "UNKNOWN COMMAND".to_string(),
                };

                let _ = stream.write_all(format!("{}\0", reply).as_bytes()).await;
            });
        }
    });

    addr
}
