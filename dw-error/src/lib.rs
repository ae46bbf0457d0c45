//! Unified error handling for Driftwatch
//!
//! This crate provides a single error type used across all Driftwatch components.
//! It uses thiserror for ergonomic error definitions with proper Display and Error trait impls.

use std::io;
use std::path::PathBuf;

/// Result type alias using DriftwatchError
pub type Result<T> = std::result::Result<T, DriftwatchError>;

/// Unified error type for all Driftwatch operations
#[derive(thiserror::Error, Debug)]
pub enum DriftwatchError {
    // ============================================================================
    // I/O and Traversal Errors
    // ============================================================================
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Failed to walk directory {path}: {source}")]
    DirWalk {
        path: PathBuf,
        source: io::Error,
    },

    // ============================================================================
    // Lookup Errors
    // ============================================================================
    #[error("Scan job not found: {0}")]
    JobNotFound(String),

    #[error("No baseline recorded for host: {0}")]
    BaselineNotFound(String),

    // ============================================================================
    // Scan Execution Errors
    // ============================================================================
    #[error("Scan failed: {0}")]
    Scan(String),

    #[error("Scan worker terminated abnormally: {0}")]
    ScanWorker(String),

    // ============================================================================
    // Validation Errors
    // ============================================================================
    #[error("Invalid host id {host_id:?}: {reason}")]
    InvalidHostId {
        host_id: String,
        reason: String,
    },

    #[error("Invalid scan path {path:?}: {reason}")]
    InvalidScanPath {
        path: String,
        reason: String,
    },

    // ============================================================================
    // Serialization Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Generic(String),
}

impl DriftwatchError {
    /// Create a generic error from a string
    pub fn generic(msg: impl Into<String>) -> Self {
        Self::Generic(msg.into())
    }

    /// Create a scan execution error from a string
    pub fn scan(msg: impl Into<String>) -> Self {
        Self::Scan(msg.into())
    }

    /// Create an invalid host id error
    pub fn invalid_host_id(host_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidHostId {
            host_id: host_id.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid scan path error
    pub fn invalid_scan_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidScanPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for the structured not-found variants (unknown job, unknown baseline)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::JobNotFound(_) | Self::BaselineNotFound(_))
    }
}

// Allow converting from String to DriftwatchError
impl From<String> for DriftwatchError {
    fn from(s: String) -> Self {
        Self::Generic(s)
    }
}

// Allow converting from &str to DriftwatchError
impl From<&str> for DriftwatchError {
    fn from(s: &str) -> Self {
        Self::Generic(s.to_string())
    }
}
