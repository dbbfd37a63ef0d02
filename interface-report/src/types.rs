//! Core types for the interface report library
//!
//! This module defines the error type shared by every stage of report generation,
//! along with the fixed field names and sentinel values the report relies on.

use std::path::PathBuf;

/// Result type for report operations
pub type Result<T> = std::result::Result<T, ReportError>;

/// Attribute key holding the MAC address in parsed `show interfaces` output
pub const MAC_ADDRESS_FIELD: &str = "mac_address";

/// Value written in place of a MAC address for interfaces that have none
pub const NOT_AVAILABLE: &str = "N/A";

/// Errors that can occur while collecting details or producing a report
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Malformed input at '{path}': expected {expected}")]
    MalformedInput { path: String, expected: String },

    #[error("Malformed report: {0}")]
    MalformedReport(String),

    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("No captured output for device '{device}' at {path:?}")]
    CaptureNotFound { device: String, path: PathBuf },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportError {
    pub(crate) fn malformed(path: impl Into<String>, expected: impl Into<String>) -> Self {
        ReportError::MalformedInput {
            path: path.into(),
            expected: expected.into(),
        }
    }
}
