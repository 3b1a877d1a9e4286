//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use sunshade_core::{ErrorMetadata, LogLevel};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Object already exists: {0}")]
    AlreadyExists(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ErrorMetadata for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            StorageError::UploadFailed(_) => "UPLOAD_FAILED",
            StorageError::AlreadyExists(_) => "OBJECT_EXISTS",
            StorageError::DownloadFailed(_) => "DOWNLOAD_FAILED",
            StorageError::NotFound(_) => "NOT_FOUND",
            StorageError::InvalidKey(_) => "INVALID_KEY",
            StorageError::BackendError(_) => "STORAGE_ERROR",
            StorageError::IoError(_) => "IO_ERROR",
            StorageError::ConfigError(_) => "STORAGE_CONFIG_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StorageError::UploadFailed(_)
                | StorageError::AlreadyExists(_)
                | StorageError::BackendError(_)
                | StorageError::IoError(_)
        )
    }

    fn client_message(&self) -> String {
        match self {
            StorageError::ConfigError(_) | StorageError::InvalidKey(_) => {
                "Image storage is not configured correctly".to_string()
            }
            other => other.to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            StorageError::ConfigError(_) | StorageError::InvalidKey(_) => LogLevel::Error,
            _ => LogLevel::Warn,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Object attributes stored alongside the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectOptions {
    pub content_type: String,
    pub cache_control: Option<String>,
}

impl ObjectOptions {
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            cache_control: None,
        }
    }

    pub fn with_cache_control(mut self, cache_control: impl Into<String>) -> Self {
        self.cache_control = Some(cache_control.into());
        self
    }
}

/// Storage abstraction trait
///
/// All storage backends (object store, local filesystem) must implement this trait.
/// Writes are create-only: `put_new` fails with [`StorageError::AlreadyExists`]
/// instead of replacing an existing object.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `data` under `storage_key` if and only if no object exists there.
    async fn put_new(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        options: &ObjectOptions,
    ) -> StorageResult<()>;

    /// Download a file by its storage key
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Check if a file exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Publicly resolvable URL for a storage key
    fn public_url(&self, storage_key: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
