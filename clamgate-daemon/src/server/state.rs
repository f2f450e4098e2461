//! Shared application state for the server.

use std::sync::Arc;
use std::time::Duration;

use clamgate_core::Scanner;

/// Per-endpoint bounds on a daemon call, measured from request arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadlines {
    pub ping: Duration,
    pub version: Duration,
    pub scan_text: Duration,
    pub scan_file: Duration,
}

impl Default for Deadlines {
    fn default() -> Self {
        Self {
            ping: Duration::from_secs(5),
            version: Duration::from_secs(5),
            scan_text: Duration::from_secs(30),
            scan_file: Duration::from_secs(60),
        }
    }
}

/// Shared application state.
///
/// Built once at startup and only read afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Daemon the gateway forwards to
    pub scanner: Arc<dyn Scanner>,
    /// Bounds on each daemon call
    pub deadlines: Deadlines,
}

impl AppState {
    pub fn new(scanner: Arc<dyn Scanner>) -> Self {
        Self {
            scanner,
            deadlines: Deadlines::default(),
        }
    }

    pub fn with_deadlines(mut self, deadlines: Deadlines) -> Self {
        self.deadlines = deadlines;
        self
    }
}
