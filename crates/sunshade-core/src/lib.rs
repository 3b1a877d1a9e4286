//! Sunshade Core Library
//!
//! This crate provides the domain models, error metadata, configuration and
//! validation shared by the storage, notification and form crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod session;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{ErrorMetadata, LogLevel};
pub use models::{
    AttachmentPolicy, AttachmentStatus, AttachmentUpload, FieldDefinition, FieldValues,
    FormDefinition, SubmissionRequest, SubmissionResult, UploadBatchResult, UploadFailure,
};
pub use session::{SessionReader, StaticSession};
pub use storage_types::StorageBackend;
pub use validation::{validate_required, ValidationError};
