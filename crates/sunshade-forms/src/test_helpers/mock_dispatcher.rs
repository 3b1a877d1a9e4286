//! Mock notification dispatcher

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sunshade_core::{SubmissionRequest, SubmissionResult};
use sunshade_notify::Dispatch;
use tokio::sync::{Notify, Semaphore};

/// Records every request and answers with a scripted result.
#[derive(Clone)]
pub struct MockDispatcher {
    result: Arc<Mutex<SubmissionResult>>,
    requests: Arc<Mutex<Vec<SubmissionRequest>>>,
    gate: Option<Arc<Semaphore>>,
    started: Arc<Notify>,
}

impl MockDispatcher {
    pub fn succeeding() -> Self {
        Self::answering(SubmissionResult::ok())
    }

    pub fn failing(message: &str) -> Self {
        Self::answering(SubmissionResult::failed(message))
    }

    fn answering(result: SubmissionResult) -> Self {
        Self {
            result: Arc::new(Mutex::new(result)),
            requests: Arc::new(Mutex::new(Vec::new())),
            gate: None,
            started: Arc::new(Notify::new()),
        }
    }

    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    pub fn answer_with(&self, result: SubmissionResult) {
        *self.result.lock().unwrap() = result;
    }

    pub fn requests(&self) -> Vec<SubmissionRequest> {
        self.requests.lock().unwrap().clone()
    }

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
impl Dispatch for MockDispatcher {
    async fn send(&self, request: &SubmissionRequest) -> SubmissionResult {
        self.requests.lock().unwrap().push(request.clone());
        self.started.notify_one();

        if let Some(ref gate) = self.gate {
            gate.acquire().await.unwrap().forget();
        }

        self.result.lock().unwrap().clone()
    }
}
