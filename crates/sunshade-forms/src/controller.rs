//! Generalized form controller
//!
//! Drives one report form through `Editing → Validating → (Uploading) →
//! Submitting → Editing | SubmittedOk`. Everything screen-specific comes from
//! the [`FormDefinition`]; the sender name comes from the injected
//! [`SessionReader`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use sunshade_core::constants::{DEFAULT_SUCCESS_MESSAGE, GENERIC_DISPATCH_FAILURE};
use sunshade_core::{
    validate_required, AttachmentUpload, ErrorMetadata, FieldValues, FormDefinition,
    SessionReader, SubmissionRequest, UploadBatchResult, ValidationError,
};
use sunshade_notify::Dispatch;
use sunshade_storage::AttachmentUploader;
use tokio::sync::{mpsc, RwLock};

use crate::attachments::AttachmentList;
use crate::error::{DispatchError, FormError};
use crate::uploader::{AttachmentBatchUploader, UploadEvent};

/// Lifecycle state of a form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormState {
    Editing,
    Validating,
    Uploading,
    Submitting,
    SubmittedOk,
}

/// What the user sees after a successful submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    pub message: String,
    pub attachment_count: usize,
    pub request: SubmissionRequest,
}

fn lock_state(state: &Mutex<FormState>) -> MutexGuard<'_, FormState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks one operation as running.
///
/// Dropping it clears the flag and, if the form is still in one of the states
/// the operation owns, puts it back to `Editing`. This also runs when the
/// caller drops the operation's future half-way.
struct Busy<'a> {
    flag: &'a AtomicBool,
    state: &'a Mutex<FormState>,
    owns: &'static [FormState],
}

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        let mut state = lock_state(self.state);
        if self.owns.contains(&*state) {
            *state = FormState::Editing;
        }
        drop(state);
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Controller for one form instance.
pub struct FormController {
    definition: FormDefinition,
    session: Arc<dyn SessionReader>,
    dispatcher: Arc<dyn Dispatch>,
    uploader: Option<Arc<dyn AttachmentUploader>>,
    upload_events: Option<mpsc::UnboundedSender<UploadEvent>>,
    values: RwLock<FieldValues>,
    attachments: AttachmentList,
    state: Mutex<FormState>,
    uploading: AtomicBool,
    submitting: AtomicBool,
}

impl FormController {
    pub fn new(
        definition: FormDefinition,
        session: Arc<dyn SessionReader>,
        dispatcher: Arc<dyn Dispatch>,
    ) -> Self {
        let values = FieldValues::blank(definition.labels());
        Self {
            definition,
            session,
            dispatcher,
            uploader: None,
            upload_events: None,
            values: RwLock::new(values),
            attachments: AttachmentList::new(),
            state: Mutex::new(FormState::Editing),
            uploading: AtomicBool::new(false),
            submitting: AtomicBool::new(false),
        }
    }

    /// Uploader used for the form's attachment section.
    pub fn with_attachment_uploader(mut self, uploader: Arc<dyn AttachmentUploader>) -> Self {
        self.uploader = Some(uploader);
        self
    }

    pub fn with_upload_events(mut self, events: mpsc::UnboundedSender<UploadEvent>) -> Self {
        self.upload_events = Some(events);
        self
    }

    pub fn definition(&self) -> &FormDefinition {
        &self.definition
    }

    pub fn state(&self) -> FormState {
        *lock_state(&self.state)
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading.load(Ordering::SeqCst)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    pub async fn values(&self) -> FieldValues {
        self.values.read().await.clone()
    }

    pub fn attachments(&self) -> &AttachmentList {
        &self.attachments
    }

    fn set_state(&self, state: FormState) {
        *lock_state(&self.state) = state;
    }

    /// Set a declared field. Editing a submitted form starts a new report.
    /// Refused with `SubmitInProgress` while a submit runs.
    pub async fn set_field(&self, label: &str, value: impl Into<String>) -> Result<(), FormError> {
        if self.definition.find_field(label).is_none() {
            return Err(ValidationError::UnknownField(label.to_string()).into());
        }

        // Checked under the write lock; submit raises its flag before reading
        // the values, so an accepted edit is always part of the report.
        let mut values = self.values.write().await;
        if self.submitting.load(Ordering::SeqCst) {
            return Err(FormError::SubmitInProgress);
        }
        values.set(label, value);
        drop(values);

        let mut state = lock_state(&self.state);
        if *state == FormState::SubmittedOk {
            *state = FormState::Editing;
        }
        Ok(())
    }

    /// Admit and upload a batch of picked files.
    ///
    /// Returns once every admitted file has settled. Individual upload
    /// failures are reported in the result, not as an error.
    pub async fn add_attachments(&self, uris: Vec<String>) -> Result<UploadBatchResult, FormError> {
        let uploader = match (&self.definition.attachments, &self.uploader) {
            (Some(_), Some(uploader)) => uploader.clone(),
            _ => {
                return Err(FormError::AttachmentsNotSupported(
                    self.definition.id.clone(),
                ))
            }
        };

        if self.uploading.swap(true, Ordering::SeqCst) {
            return Err(FormError::UploadInProgress);
        }
        let _uploading = Busy {
            flag: &self.uploading,
            state: &self.state,
            owns: &[FormState::Uploading],
        };
        if self.submitting.load(Ordering::SeqCst) {
            return Err(FormError::SubmitInProgress);
        }

        let mut batch = AttachmentBatchUploader::new(uploader, self.definition.attachment_cap());
        if let Some(ref events) = self.upload_events {
            batch = batch.with_events(events.clone());
        }

        self.set_state(FormState::Uploading);
        let result = batch.add_and_upload(&self.attachments, uris).await;
        self.set_state(FormState::Editing);

        let result = result?;
        if !result.all_succeeded() {
            tracing::warn!(
                form = %self.definition.id,
                failed = result.failed(),
                attempted = result.attempted,
                "Some attachments failed to upload"
            );
        }
        Ok(result)
    }

    /// Remove the first attachment picked from `local_uri`.
    ///
    /// Allowed while a batch uploads, refused while a submit runs.
    pub async fn remove_attachment(
        &self,
        local_uri: &str,
    ) -> Result<Option<AttachmentUpload>, FormError> {
        if self.submitting.load(Ordering::SeqCst) {
            return Err(FormError::SubmitInProgress);
        }
        Ok(self.attachments.remove(local_uri).await)
    }

    /// Empty every field, drop all attachments and return to `Editing`.
    pub async fn reset(&self) {
        self.values.write().await.clear_values();
        self.attachments.clear().await;
        self.set_state(FormState::Editing);
    }

    /// Validate, build the request and dispatch it.
    ///
    /// On success the form is reset; on any failure the entered data stays.
    pub async fn submit(&self) -> Result<SubmissionReceipt, FormError> {
        if self.submitting.swap(true, Ordering::SeqCst) {
            return Err(FormError::SubmitInProgress);
        }
        let _submitting = Busy {
            flag: &self.submitting,
            state: &self.state,
            owns: &[FormState::Validating, FormState::Submitting],
        };
        if self.uploading.load(Ordering::SeqCst) {
            return Err(FormError::UploadInProgress);
        }

        self.set_state(FormState::Validating);
        let values = self.values.read().await.clone();
        if let Err(e) = validate_required(&self.definition, &values) {
            tracing::debug!(
                form = %self.definition.id,
                error_code = e.error_code(),
                error = %e,
                "Form validation failed"
            );
            self.set_state(FormState::Editing);
            return Err(e.into());
        }

        self.set_state(FormState::Submitting);
        let request = SubmissionRequest::new(
            self.session.current_user_name(),
            self.definition.category.clone(),
            values,
            self.attachments.succeeded_urls().await,
        );
        let result = self.dispatcher.send(&request).await;

        if !result.success {
            self.set_state(FormState::Editing);
            let message = result
                .error_message
                .unwrap_or_else(|| GENERIC_DISPATCH_FAILURE.to_string());
            tracing::warn!(form = %self.definition.id, error = %message, "Report not sent");
            return Err(DispatchError { message }.into());
        }

        self.values.write().await.clear_values();
        self.attachments.clear().await;
        self.set_state(FormState::SubmittedOk);

        tracing::info!(
            form = %self.definition.id,
            category = %self.definition.category,
            attachments = request.attachment_urls().len(),
            "Report submitted"
        );

        Ok(SubmissionReceipt {
            message: self
                .definition
                .success_message
                .clone()
                .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string()),
            attachment_count: request.attachment_urls().len(),
            request,
        })
    }
}
