//! Scan verdict types.

use serde::Serialize;

/// Status clamd reports for an item with no detection.
pub const CLEAN_STATUS: &str = "OK";

/// Status clamd reports for an item with a detection.
pub const FOUND_STATUS: &str = "FOUND";

/// One scanned item's verdict.
///
/// `clean` is derived from `status` at construction and cannot be set on its
/// own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    filename: String,
    status: String,
    clean: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    signature: Option<String>,
}

impl ScanResult {
    pub fn new(filename: impl Into<String>, status: impl Into<String>) -> Self {
        let status = status.into();
        Self {
            filename: filename.into(),
            clean: status == CLEAN_STATUS,
            status,
            signature: None,
        }
    }

    /// A `FOUND` verdict carrying the detected signature name.
    pub fn found(filename: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            signature: Some(signature.into()),
            ..Self::new(filename, FOUND_STATUS)
        }
    }

    /// Replace the reported filename, keeping the verdict.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_clean(&self) -> bool {
        self.clean
    }

    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }
}
