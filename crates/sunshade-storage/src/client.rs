//! Attachment store client
//!
//! Reads a picked file, names it, writes it create-only and hands back the
//! public URL. One attempt per call; failures come back as [`UploadError`].

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use sunshade_core::{Config, ErrorMetadata, LogLevel};
use thiserror::Error;

use crate::content_type;
use crate::keys::KeyGenerator;
use crate::traits::{ObjectOptions, Storage, StorageError};

/// Failure to upload a single attachment
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Failed to read {uri}: {message}")]
    ReadFailed { uri: String, message: String },

    #[error("Unsupported attachment URI: {0}")]
    UnsupportedUri(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ErrorMetadata for UploadError {
    fn error_code(&self) -> &'static str {
        match self {
            UploadError::ReadFailed { .. } => "ATTACHMENT_UNREADABLE",
            UploadError::UnsupportedUri(_) => "ATTACHMENT_UNSUPPORTED",
            UploadError::Storage(e) => e.error_code(),
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            UploadError::Storage(e) => e.is_recoverable(),
            _ => false,
        }
    }

    fn client_message(&self) -> String {
        match self {
            UploadError::ReadFailed { .. } => "The image could not be read".to_string(),
            UploadError::UnsupportedUri(_) => "This kind of file cannot be attached".to_string(),
            UploadError::Storage(e) => e.client_message(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            UploadError::Storage(e) => e.log_level(),
            _ => LogLevel::Warn,
        }
    }
}

/// Anything that can turn a local attachment into a public URL.
#[async_trait]
pub trait AttachmentUploader: Send + Sync {
    async fn upload(&self, local_uri: &str) -> Result<String, UploadError>;
}

/// Uploads attachments to the configured storage backend.
pub struct AttachmentStoreClient {
    storage: Arc<dyn Storage>,
    keys: KeyGenerator,
    cache_control: String,
}

impl AttachmentStoreClient {
    pub fn new(
        storage: Arc<dyn Storage>,
        key_prefix: impl Into<String>,
        cache_control: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            keys: KeyGenerator::new(key_prefix),
            cache_control: cache_control.into(),
        }
    }

    pub fn from_config(storage: Arc<dyn Storage>, config: &Config) -> Self {
        Self::new(
            storage,
            config.attachment_key_prefix(),
            config.attachment_cache_control(),
        )
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Upload one local file and return its public URL.
    pub async fn upload(&self, local_uri: &str) -> Result<String, UploadError> {
        let path = local_path(local_uri)?;
        let data = tokio::fs::read(&path)
            .await
            .map_err(|e| UploadError::ReadFailed {
                uri: local_uri.to_string(),
                message: e.to_string(),
            })?;

        let detected = content_type::detect(&data);
        let key = self.keys.next_key(detected.extension);
        let options =
            ObjectOptions::new(detected.content_type).with_cache_control(self.cache_control.clone());

        self.storage.put_new(&key, data, &options).await?;

        let url = self.storage.public_url(&key);
        tracing::debug!(
            local_uri = %local_uri,
            key = %key,
            content_type = detected.content_type,
            "Attachment stored"
        );
        Ok(url)
    }
}

#[async_trait]
impl AttachmentUploader for AttachmentStoreClient {
    async fn upload(&self, local_uri: &str) -> Result<String, UploadError> {
        AttachmentStoreClient::upload(self, local_uri).await
    }
}

/// Resolve a plain path or `file://` URI to a filesystem path.
fn local_path(local_uri: &str) -> Result<PathBuf, UploadError> {
    if let Some(path) = local_uri.strip_prefix("file://") {
        return Ok(PathBuf::from(path));
    }
    match local_uri.split_once("://") {
        Some(_) => Err(UploadError::UnsupportedUri(local_uri.to_string())),
        None if local_uri.is_empty() => Err(UploadError::UnsupportedUri(local_uri.to_string())),
        None => Ok(PathBuf::from(local_uri)),
    }
}
