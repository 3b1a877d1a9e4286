//! Mock attachment uploader

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sunshade_storage::{AttachmentUploader, StorageError, UploadError};
use tokio::sync::{Notify, Semaphore};

/// Records every upload and returns `https://cdn.example.com/{local_uri}`.
///
/// URIs registered with [`MockUploader::failing`] fail. A gated uploader
/// blocks each upload until [`MockUploader::release`] hands out a permit.
#[derive(Clone, Default)]
pub struct MockUploader {
    fail: Arc<HashSet<String>>,
    calls: Arc<Mutex<Vec<String>>>,
    gate: Option<Arc<Semaphore>>,
    started: Arc<Notify>,
}

impl MockUploader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, local_uri: &str) -> Self {
        let mut fail = (*self.fail).clone();
        fail.insert(local_uri.to_string());
        self.fail = Arc::new(fail);
        self
    }

    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Wait until an upload has started.
    pub async fn wait_started(&self) {
        self.started.notified().await;
    }

    pub fn release(&self, permits: usize) {
        if let Some(ref gate) = self.gate {
            gate.add_permits(permits);
        }
    }
}

#[async_trait]
impl AttachmentUploader for MockUploader {
    async fn upload(&self, local_uri: &str) -> Result<String, UploadError> {
        self.calls.lock().unwrap().push(local_uri.to_string());
        self.started.notify_one();

        if let Some(ref gate) = self.gate {
            gate.acquire().await.unwrap().forget();
        }

        if self.fail.contains(local_uri) {
            return Err(UploadError::Storage(StorageError::UploadFailed(format!(
                "simulated failure for {}",
                local_uri
            ))));
        }
        Ok(format!("https://cdn.example.com/{}", local_uri))
    }
}
