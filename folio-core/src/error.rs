//! Error types for Folio Core
//!
//! Layout, playback and navigation never fail: malformed input and stale state
//! are normalized to safe defaults. These errors only surface from settings
//! handling, book input parsing and raw key/value store access.

use thiserror::Error;

/// Result type alias using FolioError
pub type Result<T> = std::result::Result<T, FolioError>;

/// Top-level error type for all Folio operations
#[derive(Debug, Error)]
pub enum FolioError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur while reading book input
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid book JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Book has no chapters")]
    NoChapters,
}

/// Errors in reader settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Malformed config file: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors that occur during key/value storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Backend error: {0}")]
    BackendError(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}
