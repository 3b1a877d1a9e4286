//! Notification dispatcher for submitted reports.
//!
//! Posts a [`SubmissionRequest`] as JSON to the mail endpoint and maps its
//! `{ success, data?, error? }` answer to a [`SubmissionResult`]. The endpoint
//! formats and sends the email; this crate only speaks the wire contract.
//! Single attempt, no client-side timeout.

pub mod response;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use sunshade_core::constants::GENERIC_DISPATCH_FAILURE;
use sunshade_core::{Config, SubmissionRequest, SubmissionResult};

pub use response::EmailEndpointResponse;

/// Authentication strategy for the endpoint.
#[derive(Clone, Debug)]
pub enum Auth {
    /// `Authorization: Bearer {token}`
    Bearer(String),
}

/// Sends a finished report somewhere and says whether it was accepted.
#[async_trait]
pub trait Dispatch: Send + Sync {
    async fn send(&self, request: &SubmissionRequest) -> SubmissionResult;
}

/// HTTP client for the mail endpoint.
#[derive(Clone, Debug)]
pub struct NotificationDispatcher {
    client: Client,
    endpoint_url: String,
    auth: Option<Auth>,
}

impl NotificationDispatcher {
    pub fn new(endpoint_url: impl Into<String>, auth: Option<Auth>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint_url: endpoint_url.into(),
            auth,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let auth = config
            .notify_api_token()
            .map(|token| Auth::Bearer(token.to_string()));
        Self::new(config.notify_endpoint_url(), auth)
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Some(Auth::Bearer(token)) => {
                request.header("Authorization", format!("Bearer {}", token))
            }
            None => request,
        }
    }

    /// Post the request and interpret the answer. Never fails: transport and
    /// parse errors become a generic failure result.
    pub async fn send(&self, request: &SubmissionRequest) -> SubmissionResult {
        let start = std::time::Instant::now();
        match self.post(request).await {
            Ok(result) => {
                if result.success {
                    tracing::info!(
                        category = %request.category(),
                        attachments = request.attachment_urls().len(),
                        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                        "Report notification sent"
                    );
                } else {
                    tracing::warn!(
                        category = %request.category(),
                        error = result.error_message.as_deref().unwrap_or_default(),
                        "Notification endpoint rejected report"
                    );
                }
                result
            }
            Err(e) => {
                tracing::error!(
                    error = %format!("{:#}", e),
                    endpoint = %self.endpoint_url,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Report notification failed"
                );
                SubmissionResult::failed(GENERIC_DISPATCH_FAILURE)
            }
        }
    }

    async fn post(&self, request: &SubmissionRequest) -> Result<SubmissionResult> {
        let http_request = self.client.post(&self.endpoint_url).json(request);
        let http_request = self.apply_auth(http_request);

        let response = http_request
            .send()
            .await
            .context("Failed to send request")?;

        // Failures are reported in the body, whatever the status.
        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        let parsed: EmailEndpointResponse = serde_json::from_str(&body).with_context(|| {
            format!("Unexpected response from notification endpoint (status {})", status)
        })?;

        Ok(parsed.into_result())
    }
}

#[async_trait]
impl Dispatch for NotificationDispatcher {
    async fn send(&self, request: &SubmissionRequest) -> SubmissionResult {
        NotificationDispatcher::send(self, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;
    use sunshade_core::FieldValues;

    fn request() -> SubmissionRequest {
        let mut fields = FieldValues::new();
        fields.set("Customer", "Jane Roe");
        fields.set("Damage", "Torn fabric");
        SubmissionRequest::new(
            "Max Field",
            "Damage report",
            fields,
            vec![
                "https://cdn.example.com/a.jpg".to_string(),
                "https://cdn.example.com/b.jpg".to_string(),
            ],
        )
    }

    #[tokio::test]
    async fn posts_json_and_maps_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/email")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "senderName": "Max Field",
                "type": "Damage report",
                "data": { "Customer": "Jane Roe", "Damage": "Torn fabric" },
                "imageUrls": ["https://cdn.example.com/a.jpg", "https://cdn.example.com/b.jpg"]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true,"data":{"id":"email_123"}}"#)
            .create_async()
            .await;

        let dispatcher =
            NotificationDispatcher::new(format!("{}/api/email", server.url()), None).unwrap();
        let result = dispatcher.send(&request()).await;

        mock.assert_async().await;
        assert_eq!(result, SubmissionResult::ok());
    }

    #[tokio::test]
    async fn endpoint_error_is_returned_verbatim() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/email")
            .with_status(200)
            .with_body(r#"{"success":false,"error":"X"}"#)
            .create_async()
            .await;

        let dispatcher =
            NotificationDispatcher::new(format!("{}/api/email", server.url()), None).unwrap();
        let result = dispatcher.send(&request()).await;

        assert_eq!(
            result,
            SubmissionResult {
                success: false,
                error_message: Some("X".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn error_status_with_contract_body_uses_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/email")
            .with_status(500)
            .with_body(r#"{"success":false,"error":"Mail provider unavailable"}"#)
            .create_async()
            .await;

        let dispatcher =
            NotificationDispatcher::new(format!("{}/api/email", server.url()), None).unwrap();
        let result = dispatcher.send(&request()).await;

        assert_eq!(
            result.error_message.as_deref(),
            Some("Mail provider unavailable")
        );
    }

    #[tokio::test]
    async fn garbage_body_maps_to_generic_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/email")
            .with_status(502)
            .with_body("<html>Bad gateway</html>")
            .create_async()
            .await;

        let dispatcher =
            NotificationDispatcher::new(format!("{}/api/email", server.url()), None).unwrap();
        let result = dispatcher.send(&request()).await;

        assert_eq!(result, SubmissionResult::failed(GENERIC_DISPATCH_FAILURE));
    }

    #[tokio::test]
    async fn unreachable_endpoint_maps_to_generic_failure() {
        let dispatcher =
            NotificationDispatcher::new("http://127.0.0.1:1/api/email", None).unwrap();
        let result = dispatcher.send(&request()).await;

        assert!(!result.success);
        assert_eq!(
            result.error_message.as_deref(),
            Some(GENERIC_DISPATCH_FAILURE)
        );
    }

    #[tokio::test]
    async fn sends_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/email")
            .match_header("authorization", "Bearer s3cret")
            .with_status(200)
            .with_body(r#"{"success":true}"#)
            .create_async()
            .await;

        let dispatcher = NotificationDispatcher::new(
            format!("{}/api/email", server.url()),
            Some(Auth::Bearer("s3cret".to_string())),
        )
        .unwrap();
        let result = dispatcher.send(&request()).await;

        mock.assert_async().await;
        assert!(result.success);
    }
}
