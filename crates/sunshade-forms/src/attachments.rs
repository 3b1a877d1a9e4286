//! Attachment list shared between a form and its uploads

use std::sync::Arc;

use sunshade_core::{AttachmentStatus, AttachmentUpload};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::uploader::TooManyAttachments;

/// Attachments of one form, in selection order.
///
/// Cloning yields another handle to the same list, so the user can remove an
/// entry while its batch is still uploading. Each entry carries its own URL
/// slot, which keeps the display list and the URL list index-aligned.
#[derive(Clone, Default)]
pub struct AttachmentList {
    entries: Arc<RwLock<Vec<AttachmentUpload>>>,
}

impl AttachmentList {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn snapshot(&self) -> Vec<AttachmentUpload> {
        self.entries.read().await.clone()
    }

    /// URL slot of every entry, same length and order as the list.
    pub async fn remote_urls(&self) -> Vec<Option<String>> {
        self.entries
            .read()
            .await
            .iter()
            .map(|e| e.remote_url().map(String::from))
            .collect()
    }

    /// URLs of the successful uploads, in selection order.
    pub async fn succeeded_urls(&self) -> Vec<String> {
        self.entries
            .read()
            .await
            .iter()
            .filter(|e| e.status() == AttachmentStatus::Succeeded)
            .filter_map(|e| e.remote_url().map(String::from))
            .collect()
    }

    /// Remove the first entry picked from `local_uri`, whatever its status.
    pub async fn remove(&self, local_uri: &str) -> Option<AttachmentUpload> {
        let mut entries = self.entries.write().await;
        let index = entries.iter().position(|e| e.local_uri() == local_uri)?;
        Some(entries.remove(index))
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Append `Pending` entries for `uris` unless the list would exceed `cap`.
    /// The check and the append happen under one lock.
    pub(crate) async fn admit(
        &self,
        uris: &[String],
        cap: usize,
    ) -> Result<Vec<(Uuid, String)>, TooManyAttachments> {
        let mut entries = self.entries.write().await;
        if entries.len() + uris.len() > cap {
            return Err(TooManyAttachments {
                existing: entries.len(),
                requested: uris.len(),
                cap,
            });
        }

        let admitted = uris
            .iter()
            .map(|uri| {
                let entry = AttachmentUpload::pending(uri.clone());
                let admitted = (entry.id(), uri.clone());
                entries.push(entry);
                admitted
            })
            .collect();
        Ok(admitted)
    }

    /// Apply `f` to the entry with `id` and return its new state, or `None`
    /// if the user removed it in the meantime.
    pub(crate) async fn update<F>(&self, id: Uuid, f: F) -> Option<AttachmentUpload>
    where
        F: FnOnce(&mut AttachmentUpload),
    {
        let mut entries = self.entries.write().await;
        let entry = entries.iter_mut().find(|e| e.id() == id)?;
        f(entry);
        Some(entry.clone())
    }

    /// Mark entries of a dropped batch as failed so none stays `Pending` or
    /// `Uploading`. Callable from `Drop`; when the lock is contended the
    /// update runs on the current runtime instead.
    pub(crate) fn abandon(&self, ids: &[Uuid], message: &'static str) {
        if ids.is_empty() {
            return;
        }
        let ids = ids.to_vec();
        let mark = move |entries: &mut Vec<AttachmentUpload>| {
            for entry in entries.iter_mut().filter(|e| ids.contains(&e.id())) {
                entry.mark_failed(message);
            }
        };

        match self.entries.try_write() {
            Ok(mut entries) => mark(&mut *entries),
            Err(_) => match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    let entries = self.entries.clone();
                    handle.spawn(async move { mark(&mut *entries.write().await) });
                }
                Err(_) => tracing::warn!("Could not mark abandoned attachments, no runtime"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uris(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn admit_appends_pending_entries_in_order() {
        let list = AttachmentList::new();
        let admitted = list.admit(&uris(&["/a.jpg", "/b.jpg"]), 5).await.unwrap();

        assert_eq!(admitted.len(), 2);
        let snapshot = list.snapshot().await;
        assert_eq!(snapshot[0].local_uri(), "/a.jpg");
        assert_eq!(snapshot[1].local_uri(), "/b.jpg");
        assert!(snapshot
            .iter()
            .all(|e| e.status() == AttachmentStatus::Pending));
    }

    #[tokio::test]
    async fn admit_over_cap_leaves_list_untouched() {
        let list = AttachmentList::new();
        list.admit(&uris(&["/a.jpg", "/b.jpg", "/c.jpg"]), 5)
            .await
            .unwrap();

        let err = list
            .admit(&uris(&["/d.jpg", "/e.jpg", "/f.jpg"]), 5)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            TooManyAttachments {
                existing: 3,
                requested: 3,
                cap: 5
            }
        );
        assert_eq!(list.len().await, 3);
    }

    #[tokio::test]
    async fn remove_keeps_url_slots_aligned() {
        let list = AttachmentList::new();
        let admitted = list
            .admit(&uris(&["/a.jpg", "/b.jpg", "/c.jpg"]), 5)
            .await
            .unwrap();
        list.update(admitted[0].0, |e| e.mark_succeeded("https://cdn/a.jpg"))
            .await;
        list.update(admitted[1].0, |e| e.mark_failed("boom")).await;
        list.update(admitted[2].0, |e| e.mark_succeeded("https://cdn/c.jpg"))
            .await;

        let removed = list.remove("/b.jpg").await.unwrap();
        assert_eq!(removed.status(), AttachmentStatus::Failed);

        let snapshot = list.snapshot().await;
        let urls = list.remote_urls().await;
        assert_eq!(snapshot.len(), urls.len());
        assert_eq!(
            urls,
            vec![
                Some("https://cdn/a.jpg".to_string()),
                Some("https://cdn/c.jpg".to_string())
            ]
        );
        assert_eq!(snapshot[1].local_uri(), "/c.jpg");
    }

    #[tokio::test]
    async fn remove_takes_exactly_one_duplicate() {
        let list = AttachmentList::new();
        list.admit(&uris(&["/a.jpg", "/a.jpg"]), 5).await.unwrap();

        assert!(list.remove("/a.jpg").await.is_some());
        assert_eq!(list.len().await, 1);
        assert!(list.remove("/missing.jpg").await.is_none());
        assert_eq!(list.len().await, 1);
    }

    #[tokio::test]
    async fn abandon_fails_only_listed_entries() {
        let list = AttachmentList::new();
        let admitted = list
            .admit(&uris(&["/a.jpg", "/b.jpg", "/c.jpg"]), 5)
            .await
            .unwrap();
        list.update(admitted[0].0, |e| e.mark_succeeded("https://cdn/a.jpg"))
            .await;
        list.update(admitted[1].0, |e| e.mark_uploading()).await;

        list.abandon(&[admitted[1].0, admitted[2].0], "Upload cancelled");

        let snapshot = list.snapshot().await;
        assert_eq!(snapshot[0].status(), AttachmentStatus::Succeeded);
        assert_eq!(snapshot[1].status(), AttachmentStatus::Failed);
        assert_eq!(snapshot[2].error(), Some("Upload cancelled"));
    }

    #[tokio::test]
    async fn update_of_removed_entry_is_none() {
        let list = AttachmentList::new();
        let admitted = list.admit(&uris(&["/a.jpg"]), 5).await.unwrap();
        list.remove("/a.jpg").await;

        let updated = list
            .update(admitted[0].0, |e| e.mark_succeeded("https://cdn/a.jpg"))
            .await;
        assert!(updated.is_none());
        assert!(list.succeeded_urls().await.is_empty());
    }
}
