//! Domain models

pub mod attachment;
pub mod form;
pub mod submission;

pub use attachment::{AttachmentStatus, AttachmentUpload, UploadBatchResult, UploadFailure};
pub use form::{AttachmentPolicy, FieldDefinition, FormDefinition};
pub use submission::{FieldValues, SubmissionRequest, SubmissionResult};
