//! Storage key generation for attachments.
//!
//! Key format: `{prefix}/{timestamp_micros}.{extension}`, or
//! `{timestamp_micros}.{extension}` when the prefix is empty.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

use crate::traits::{StorageError, StorageResult};

/// Timestamp-based key generator.
///
/// Timestamps handed out by one generator are strictly increasing, so two
/// uploads started within the same microsecond still get different keys.
#[derive(Debug)]
pub struct KeyGenerator {
    prefix: String,
    last_micros: AtomicI64,
}

impl KeyGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().trim_matches('/').to_string(),
            last_micros: AtomicI64::new(0),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Next key for a file with the given extension (without the dot).
    pub fn next_key(&self, extension: &str) -> String {
        let stamp = self.next_timestamp();
        let extension = extension.trim_start_matches('.');
        if self.prefix.is_empty() {
            format!("{}.{}", stamp, extension)
        } else {
            format!("{}/{}.{}", self.prefix, stamp, extension)
        }
    }

    fn next_timestamp(&self) -> i64 {
        let now = Utc::now().timestamp_micros();
        let mut last = self.last_micros.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last + 1);
            match self.last_micros.compare_exchange_weak(
                last,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(current) => last = current,
            }
        }
    }
}

/// Reject keys that could escape the bucket or storage directory.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() || storage_key.contains("..") || storage_key.starts_with('/') {
        return Err(StorageError::InvalidKey(storage_key.to_string()));
    }
    Ok(())
}
