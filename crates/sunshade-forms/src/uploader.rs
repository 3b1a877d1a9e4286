//! Attachment batch uploader
//!
//! Admits a batch against the per-submission cap, then uploads it strictly one
//! file at a time in selection order. A failed file does not stop the batch.

use std::sync::Arc;

use sunshade_core::{
    AttachmentUpload, ErrorMetadata, LogLevel, UploadBatchResult, UploadFailure,
};
use sunshade_storage::AttachmentUploader;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::attachments::AttachmentList;

/// Failure message for entries whose batch was dropped before they settled.
const UPLOAD_CANCELLED: &str = "Upload cancelled";

/// The batch would push the form over its attachment cap.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Too many attachments: {existing} attached, {requested} requested, limit is {cap}")]
pub struct TooManyAttachments {
    pub existing: usize,
    pub requested: usize,
    pub cap: usize,
}

impl ErrorMetadata for TooManyAttachments {
    fn error_code(&self) -> &'static str {
        "TOO_MANY_ATTACHMENTS"
    }

    fn is_recoverable(&self) -> bool {
        false
    }

    fn client_message(&self) -> String {
        format!(
            "You can attach at most {} images ({} already attached).",
            self.cap, self.existing
        )
    }

    fn log_level(&self) -> LogLevel {
        LogLevel::Debug
    }
}

/// Progress notifications for front-ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    /// Entry appended as `Pending`; thumbnails can render now.
    Admitted { id: Uuid, local_uri: String },
    /// Upload of the entry began.
    Started { id: Uuid, local_uri: String },
    /// Upload settled; carries the entry in its final state.
    Finished(AttachmentUpload),
}

/// Uploads admitted attachments sequentially through an [`AttachmentUploader`].
#[derive(Clone)]
pub struct AttachmentBatchUploader {
    uploader: Arc<dyn AttachmentUploader>,
    cap: usize,
    events: Option<mpsc::UnboundedSender<UploadEvent>>,
}

impl AttachmentBatchUploader {
    pub fn new(uploader: Arc<dyn AttachmentUploader>, cap: usize) -> Self {
        Self {
            uploader,
            cap,
            events: None,
        }
    }

    pub fn with_events(mut self, events: mpsc::UnboundedSender<UploadEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    fn emit(&self, event: UploadEvent) {
        if let Some(ref events) = self.events {
            // A dropped receiver only means nobody is watching.
            let _ = events.send(event);
        }
    }

    /// Admit `new_uris` into `list` and upload them one by one.
    ///
    /// The whole batch is rejected, before anything is uploaded, when
    /// `list.len() + new_uris.len()` exceeds the cap.
    pub async fn add_and_upload(
        &self,
        list: &AttachmentList,
        new_uris: Vec<String>,
    ) -> Result<UploadBatchResult, TooManyAttachments> {
        let admitted = list.admit(&new_uris, self.cap).await.map_err(|e| {
            tracing::debug!(
                existing = e.existing,
                requested = e.requested,
                cap = e.cap,
                "Attachment batch rejected"
            );
            e
        })?;

        for (id, local_uri) in &admitted {
            self.emit(UploadEvent::Admitted {
                id: *id,
                local_uri: local_uri.clone(),
            });
        }

        Ok(self.upload_admitted(list, admitted).await)
    }

    async fn upload_admitted(
        &self,
        list: &AttachmentList,
        admitted: Vec<(Uuid, String)>,
    ) -> UploadBatchResult {
        let start = std::time::Instant::now();
        let mut result = UploadBatchResult::default();
        let mut unsettled = Unsettled {
            list,
            ids: admitted.iter().map(|(id, _)| *id).collect(),
            settled: 0,
        };

        for (id, local_uri) in admitted {
            if list.update(id, |e| e.mark_uploading()).await.is_none() {
                tracing::debug!(local_uri = %local_uri, "Attachment removed before upload, skipping");
                unsettled.settled += 1;
                continue;
            }
            self.emit(UploadEvent::Started {
                id,
                local_uri: local_uri.clone(),
            });
            result.attempted += 1;

            let outcome = self.uploader.upload(&local_uri).await;
            let entry = match outcome {
                Ok(ref url) => list.update(id, |e| e.mark_succeeded(url.clone())).await,
                Err(ref e) => {
                    tracing::warn!(
                        error = %e,
                        error_code = e.error_code(),
                        local_uri = %local_uri,
                        "Attachment upload failed"
                    );
                    let message = e.to_string();
                    list.update(id, |entry| entry.mark_failed(message)).await
                }
            };
            unsettled.settled += 1;

            match entry {
                Some(entry) => {
                    match outcome {
                        Ok(_) => result.succeeded += 1,
                        Err(e) => result.failures.push(UploadFailure {
                            local_uri: local_uri.clone(),
                            message: e.to_string(),
                        }),
                    }
                    self.emit(UploadEvent::Finished(entry));
                }
                None => {
                    result.discarded += 1;
                    tracing::debug!(local_uri = %local_uri, "Attachment removed during upload")
                }
            }
        }

        tracing::info!(
            attempted = result.attempted,
            succeeded = result.succeeded,
            failed = result.failed(),
            discarded = result.discarded,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Attachment batch finished"
        );

        result
    }
}

/// Entries of a running batch that have not settled yet. If the batch future
/// is dropped mid-way they are marked failed instead of staying `Pending` or
/// `Uploading` forever.
struct Unsettled<'a> {
    list: &'a AttachmentList,
    ids: Vec<Uuid>,
    settled: usize,
}

impl Drop for Unsettled<'_> {
    fn drop(&mut self) {
        let remaining = &self.ids[self.settled.min(self.ids.len())..];
        if !remaining.is_empty() {
            tracing::warn!(remaining = remaining.len(), "Attachment batch abandoned");
            self.list.abandon(remaining, UPLOAD_CANCELLED);
        }
    }
}
