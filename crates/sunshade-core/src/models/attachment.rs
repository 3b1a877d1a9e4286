use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upload progress of a picked attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentStatus {
    Pending,
    Uploading,
    Succeeded,
    Failed,
}

/// A picked file and the state of its upload.
///
/// `remote_url` is set exactly when the status is [`AttachmentStatus::Succeeded`];
/// the fields are private so the transitions below are the only way to change it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentUpload {
    id: Uuid,
    local_uri: String,
    status: AttachmentStatus,
    remote_url: Option<String>,
    error: Option<String>,
}

impl AttachmentUpload {
    pub fn pending(local_uri: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            local_uri: local_uri.into(),
            status: AttachmentStatus::Pending,
            remote_url: None,
            error: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn local_uri(&self) -> &str {
        &self.local_uri
    }

    pub fn status(&self) -> AttachmentStatus {
        self.status
    }

    pub fn remote_url(&self) -> Option<&str> {
        self.remote_url.as_deref()
    }

    /// Failure message of the last upload attempt, if it failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn mark_uploading(&mut self) {
        self.status = AttachmentStatus::Uploading;
        self.remote_url = None;
        self.error = None;
    }

    pub fn mark_succeeded(&mut self, remote_url: impl Into<String>) {
        self.status = AttachmentStatus::Succeeded;
        self.remote_url = Some(remote_url.into());
        self.error = None;
    }

    pub fn mark_failed(&mut self, message: impl Into<String>) {
        self.status = AttachmentStatus::Failed;
        self.remote_url = None;
        self.error = Some(message.into());
    }
}

/// One attachment that could not be uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadFailure {
    pub local_uri: String,
    pub message: String,
}

/// Outcome of one admitted batch.
///
/// Entries the user removed before their turn are not counted as attempted.
/// Entries removed while their upload was running count as attempted and
/// `discarded`, but never as succeeded or failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadBatchResult {
    pub attempted: usize,
    pub succeeded: usize,
    pub failures: Vec<UploadFailure>,
    pub discarded: usize,
}

impl UploadBatchResult {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Attempted uploads whose entry is still attached.
    pub fn kept(&self) -> usize {
        self.attempted.saturating_sub(self.discarded)
    }

    pub fn all_succeeded(&self) -> bool {
        self.succeeded == self.kept()
    }

    /// Short user-facing summary, e.g. "2 of 3 images uploaded, 1 failed".
    pub fn summary(&self) -> String {
        if self.all_succeeded() {
            format!("{} of {} images uploaded", self.succeeded, self.kept())
        } else {
            format!(
                "{} of {} images uploaded, {} failed",
                self.succeeded,
                self.kept(),
                self.failed()
            )
        }
    }
}
