//! Blob storage
//!
//! Objects are written with a single HTTP PUT (idempotent overwrite) to
//! `{endpoint}/{zone}/{key}` with an `AccessKey` header, and served publicly
//! from `{cdn_base}/{key}`. Nothing here retries; callers decide.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use thiserror::Error;

use feedgen_common::config::StorageConfig;

/// Blob storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Storage rejected upload with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Storage not configured: {0}")]
    NotConfigured(String),
}

/// Write-only object store returning public URLs
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `body` under `key`, replacing any previous object; returns its public URL
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<String, StorageError>;
}

/// Join path pieces with single slashes, ignoring empty pieces
pub fn join_paths(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim_matches('/'))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Bunny-style storage zone client
pub struct BunnyStorage {
    http_client: reqwest::Client,
    zone_url: Url,
    api_key: String,
    cdn_base: String,
}

impl BunnyStorage {
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let required = |value: &Option<String>, name: &str| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or_else(|| StorageError::NotConfigured(format!("storage.{} is required", name)))
        };
        let zone = required(&config.zone, "zone")?;
        let api_key = required(&config.api_key, "api_key")?;
        let cdn_base = required(&config.cdn_base, "cdn_base")?;

        let endpoint = config.storage_endpoint();
        let mut zone_url = Url::parse(&endpoint)
            .map_err(|e| StorageError::NotConfigured(format!("invalid storage endpoint {}: {}", endpoint, e)))?;
        zone_url
            .path_segments_mut()
            .map_err(|_| StorageError::NotConfigured(format!("storage endpoint cannot have a path: {}", endpoint)))?
            .pop_if_empty()
            .push(&zone);

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StorageError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            zone_url,
            api_key,
            cdn_base: cdn_base.trim_end_matches('/').to_string(),
        })
    }

    /// Storage API URL for an object key
    pub fn object_url(&self, key: &str) -> Url {
        let mut url = self.zone_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.extend(key.split('/').filter(|s| !s.is_empty()));
        }
        url
    }

    /// Public CDN URL for an object key
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.cdn_base, join_paths(&[key]))
    }
}

#[async_trait]
impl BlobStore for BunnyStorage {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<String, StorageError> {
        let url = self.object_url(key);
        let size = body.len();

        tracing::debug!(key = %key, bytes = size, "Uploading object");

        let response = self
            .http_client
            .put(url)
            .header("AccessKey", &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| StorageError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let public_url = self.public_url(key);
        tracing::info!(key = %key, bytes = size, url = %public_url, "Uploaded object");
        Ok(public_url)
    }
}
