//! End-to-end report pipeline: local storage, real store client, real
//! dispatcher against a mock mail endpoint.

use std::sync::Arc;

use mockito::Matcher;
use serde_json::json;
use sunshade_core::StaticSession;
use sunshade_forms::{find_builtin, FormController, FormError, FormState};
use sunshade_notify::NotificationDispatcher;
use sunshade_storage::{AttachmentStoreClient, LocalStorage, Storage};

const JPEG: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];

struct Pipeline {
    form: FormController,
    storage: Arc<dyn Storage>,
    _root: tempfile::TempDir,
    picks: tempfile::TempDir,
}

async fn pipeline(endpoint: String) -> Pipeline {
    let root = tempfile::tempdir().unwrap();
    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(root.path(), "http://files.example.com".to_string())
            .await
            .unwrap(),
    );
    let client = AttachmentStoreClient::new(storage.clone(), "attachments", "3600");
    let dispatcher = NotificationDispatcher::new(endpoint, None).unwrap();

    let form = FormController::new(
        find_builtin("damage", 5).unwrap(),
        Arc::new(StaticSession::new("Max Field")),
        Arc::new(dispatcher),
    )
    .with_attachment_uploader(Arc::new(client));

    Pipeline {
        form,
        storage,
        _root: root,
        picks: tempfile::tempdir().unwrap(),
    }
}

impl Pipeline {
    fn pick(&self, name: &str) -> String {
        let path = self.picks.path().join(name);
        std::fs::write(&path, JPEG).unwrap();
        path.to_string_lossy().into_owned()
    }

    async fn fill(&self) {
        self.form.set_field("Customer name", "Jane Roe").await.unwrap();
        self.form.set_field("Phone", "555-0100").await.unwrap();
        self.form.set_field("Address", "Main St 1").await.unwrap();
        self.form
            .set_field("Damage description", "Torn fabric")
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn uploads_then_dispatches_and_resets() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/email")
        .match_body(Matcher::PartialJson(json!({
            "senderName": "Max Field",
            "type": "Damage report",
            "data": { "Customer name": "Jane Roe", "Damage description": "Torn fabric" }
        })))
        .with_status(200)
        .with_body(r#"{"success":true,"data":{"id":"email_1"}}"#)
        .create_async()
        .await;
    let p = pipeline(format!("{}/api/email", server.url())).await;
    p.fill().await;

    let picks = vec![p.pick("a.jpg"), p.pick("b.jpg"), "/no/such/photo.jpg".to_string()];
    let batch = p.form.add_attachments(picks).await.unwrap();
    assert_eq!(batch.attempted, 3);
    assert_eq!(batch.succeeded, 2);

    let urls = p.form.attachments().succeeded_urls().await;
    for url in &urls {
        assert!(url.starts_with("http://files.example.com/attachments/"));
        assert!(url.ends_with(".jpg"));
        let key = url.trim_start_matches("http://files.example.com/");
        assert_eq!(p.storage.download(key).await.unwrap(), JPEG.to_vec());
    }

    let receipt = p.form.submit().await.unwrap();

    mock.assert_async().await;
    assert_eq!(receipt.request.attachment_urls(), urls.as_slice());
    assert_eq!(receipt.message, "Your damage report has been sent.");
    assert_eq!(p.form.state(), FormState::SubmittedOk);
    assert!(p.form.attachments().is_empty().await);
}

#[tokio::test]
async fn endpoint_failure_keeps_the_report() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/email")
        .with_status(200)
        .with_body(r#"{"success":false,"error":"Daily sending quota exceeded"}"#)
        .create_async()
        .await;
    let p = pipeline(format!("{}/api/email", server.url())).await;
    p.fill().await;
    p.form
        .add_attachments(vec![p.pick("a.jpg")])
        .await
        .unwrap();

    let err = p.form.submit().await.unwrap_err();

    assert!(matches!(err, FormError::Dispatch(ref e) if e.message == "Daily sending quota exceeded"));
    assert_eq!(p.form.state(), FormState::Editing);
    assert_eq!(
        p.form.values().await.get("Customer name"),
        Some("Jane Roe")
    );
    assert_eq!(p.form.attachments().succeeded_urls().await.len(), 1);
}
