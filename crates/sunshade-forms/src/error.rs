//! Form errors

use sunshade_core::{ErrorMetadata, LogLevel, ValidationError};
use thiserror::Error;

use crate::uploader::TooManyAttachments;

/// The notification endpoint did not accept the report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Report dispatch failed: {message}")]
pub struct DispatchError {
    /// Endpoint error text, or the generic failure message.
    pub message: String,
}

/// Errors returned by [`FormController`](crate::FormController) operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    TooManyAttachments(#[from] TooManyAttachments),

    #[error("Form '{0}' does not take attachments")]
    AttachmentsNotSupported(String),

    #[error("Attachments are still uploading")]
    UploadInProgress,

    #[error("A submission is already in progress")]
    SubmitInProgress,

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl ErrorMetadata for FormError {
    fn error_code(&self) -> &'static str {
        match self {
            FormError::Validation(e) => e.error_code(),
            FormError::TooManyAttachments(e) => e.error_code(),
            FormError::AttachmentsNotSupported(_) => "ATTACHMENTS_NOT_SUPPORTED",
            FormError::UploadInProgress => "UPLOAD_IN_PROGRESS",
            FormError::SubmitInProgress => "SUBMIT_IN_PROGRESS",
            FormError::Dispatch(_) => "DISPATCH_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FormError::UploadInProgress | FormError::SubmitInProgress | FormError::Dispatch(_)
        )
    }

    fn client_message(&self) -> String {
        match self {
            FormError::Validation(e) => e.client_message(),
            FormError::TooManyAttachments(e) => e.client_message(),
            FormError::AttachmentsNotSupported(_) => {
                "This form does not take images.".to_string()
            }
            FormError::UploadInProgress => {
                "Please wait until all images have finished uploading.".to_string()
            }
            FormError::SubmitInProgress => "The report is already being sent.".to_string(),
            FormError::Dispatch(e) => e.message.clone(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            FormError::Dispatch(_) => LogLevel::Warn,
            FormError::AttachmentsNotSupported(_) => LogLevel::Warn,
            _ => LogLevel::Debug,
        }
    }
}
