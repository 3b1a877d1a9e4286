//! Report forms
//!
//! One generalized controller drives every report screen: a
//! [`FormDefinition`](sunshade_core::FormDefinition) says which fields exist,
//! which are required and which category label the notification carries. The
//! controller validates, uploads attachments one at a time through the
//! [`AttachmentBatchUploader`] and hands the finished report to a
//! [`Dispatch`](sunshade_notify::Dispatch) implementation.

pub mod attachments;
pub mod catalog;
pub mod controller;
pub mod error;
pub mod uploader;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use attachments::AttachmentList;
pub use catalog::{builtin_forms, find_builtin};
pub use controller::{FormController, FormState, SubmissionReceipt};
pub use error::{DispatchError, FormError};
pub use uploader::{AttachmentBatchUploader, TooManyAttachments, UploadEvent};
