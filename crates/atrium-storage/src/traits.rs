//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Flat key/value file store whose objects are served under a public prefix
///
/// Keys are single file names: no separators, never `.` or `..`.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` under `key` and return the public path it is served at.
    /// An existing object with the same key is replaced.
    async fn put(&self, key: &str, content_type: &str, data: Bytes) -> StorageResult<String>;

    /// Remove an object. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Public path for a key, without touching the backend
    fn public_path(&self, key: &str) -> String;

    /// Check that the backend accepts writes
    async fn health_check(&self) -> StorageResult<()>;
}
