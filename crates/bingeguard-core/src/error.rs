//! Core error types for bingeguard-core.
//!
//! Storage failures are always propagated to the caller of the affected
//! operation; a silently dropped write would corrupt accrual. Missing
//! records are not errors (they decode as `None` at the storage layer).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for bingeguard-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persisted-store errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Settings-related errors
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Errors from the persisted key-value namespaces.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to read a record file
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a record file
    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Record exists but could not be decoded
    #[error("Failed to decode {path}: {message}")]
    DecodeFailed { path: PathBuf, message: String },

    /// Record could not be encoded for persistence
    #[error("Failed to encode record: {0}")]
    EncodeFailed(String),
}

/// Errors raised when reading or updating the synced settings record.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Unknown settings key
    #[error("Unknown settings key: {0}")]
    UnknownKey(String),

    /// Invalid settings value
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
