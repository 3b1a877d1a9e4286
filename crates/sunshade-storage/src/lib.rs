//! Sunshade Storage Library
//!
//! Attachment storage for report forms: the `Storage` trait with an
//! object-store backend (S3-compatible or in-memory) and a local filesystem
//! backend, plus the `AttachmentStoreClient` that turns a picked file into a
//! public URL.
//!
//! # Storage key format
//!
//! Attachments are written under `{prefix}/{timestamp_micros}.{extension}`,
//! e.g. `attachments/1718000000123456.jpg`. Keys must not contain `..` or a
//! leading `/`. Every backend writes create-only: an existing key is never
//! overwritten.

pub mod client;
pub mod content_type;
pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use client::{AttachmentStoreClient, AttachmentUploader, UploadError};
pub use factory::create_storage;
pub use keys::KeyGenerator;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use sunshade_core::StorageBackend;
pub use traits::{ObjectOptions, Storage, StorageError, StorageResult};
