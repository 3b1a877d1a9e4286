//! Configuration module
//!
//! Storage, attachment and notification settings, read from the environment
//! (after loading `.env`) and validated once at startup.

use std::env;

use crate::constants::{
    DEFAULT_ATTACHMENT_CACHE_CONTROL, DEFAULT_ATTACHMENT_KEY_PREFIX, DEFAULT_MAX_ATTACHMENTS,
};
use crate::storage_types::StorageBackend;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    environment: String,
    // Storage configuration
    storage_backend: StorageBackend,
    s3_bucket: Option<String>,
    s3_region: Option<String>,
    s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, Supabase, etc.)
    s3_public_base_url: Option<String>,
    aws_region: Option<String>,
    local_storage_path: Option<String>,
    local_storage_base_url: Option<String>,
    // Attachments
    attachment_key_prefix: String,
    attachment_cache_control: String,
    max_attachments: usize,
    // Notification endpoint
    notify_endpoint_url: String,
    notify_api_token: Option<String>,
    sender_name: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(s) => s.parse::<StorageBackend>()?,
            None => StorageBackend::S3,
        };

        let max_attachments = match var("MAX_ATTACHMENTS") {
            Some(s) => s
                .trim()
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("MAX_ATTACHMENTS must be a positive number"))?,
            None => DEFAULT_MAX_ATTACHMENTS,
        };

        let config = Config {
            environment,
            storage_backend,
            s3_bucket: var("S3_BUCKET"),
            s3_region: var("S3_REGION"),
            s3_endpoint: var("S3_ENDPOINT"),
            s3_public_base_url: var("S3_PUBLIC_BASE_URL"),
            aws_region: var("AWS_REGION"),
            local_storage_path: var("LOCAL_STORAGE_PATH"),
            local_storage_base_url: var("LOCAL_STORAGE_BASE_URL"),
            attachment_key_prefix: var("ATTACHMENT_KEY_PREFIX")
                .map(|s| s.trim().trim_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_ATTACHMENT_KEY_PREFIX.to_string()),
            attachment_cache_control: var("ATTACHMENT_CACHE_CONTROL")
                .unwrap_or_else(|| DEFAULT_ATTACHMENT_CACHE_CONTROL.to_string()),
            max_attachments,
            notify_endpoint_url: var("NOTIFY_ENDPOINT_URL")
                .ok_or_else(|| anyhow::anyhow!("NOTIFY_ENDPOINT_URL must be set"))?,
            notify_api_token: var("NOTIFY_API_TOKEN"),
            sender_name: var("SENDER_NAME"),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_attachments == 0 {
            return Err(anyhow::anyhow!("MAX_ATTACHMENTS must be at least 1"));
        }

        if !(self.notify_endpoint_url.starts_with("http://")
            || self.notify_endpoint_url.starts_with("https://"))
        {
            return Err(anyhow::anyhow!(
                "NOTIFY_ENDPOINT_URL must be an http(s) URL"
            ));
        }

        if self.attachment_key_prefix.contains("..") {
            return Err(anyhow::anyhow!(
                "ATTACHMENT_KEY_PREFIX must not contain '..'"
            ));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
            StorageBackend::Memory => {}
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.s3_endpoint.as_deref()
    }

    pub fn s3_public_base_url(&self) -> Option<&str> {
        self.s3_public_base_url.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.aws_region.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.local_storage_base_url.as_deref()
    }

    pub fn attachment_key_prefix(&self) -> &str {
        &self.attachment_key_prefix
    }

    pub fn attachment_cache_control(&self) -> &str {
        &self.attachment_cache_control
    }

    pub fn max_attachments(&self) -> usize {
        self.max_attachments
    }

    pub fn notify_endpoint_url(&self) -> &str {
        &self.notify_endpoint_url
    }

    pub fn notify_api_token(&self) -> Option<&str> {
        self.notify_api_token.as_deref()
    }

    pub fn sender_name(&self) -> Option<&str> {
        self.sender_name.as_deref()
    }
}
