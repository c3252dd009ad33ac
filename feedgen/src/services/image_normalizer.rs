//! Thumbnail validation and re-hosting
//!
//! A candidate URL is accepted when its path ends in `.jpg`, `.jpeg`, `.png`
//! or `.webp` and the URL mentions neither "error" nor "placeholder".
//!
//! In passthrough mode an accepted URL is used as-is. In rehost mode the
//! image is downloaded (bounded retry), cover-fit to the target size with a
//! centered crop, re-encoded (PNG stays PNG, everything else becomes JPEG) and
//! uploaded to blob storage under `{image_path}/{record_id}.{png|jpg}`.
//!
//! Every failure means "no image" for that record; callers never abort a run
//! because of one.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::ImageFormat;
use reqwest::Url;
use thiserror::Error;

use feedgen_common::config::{ImageConfig, ImageMode, TomlConfig};
use feedgen_common::{retry_with_policy, RetryPolicy};

use super::blob_store::{join_paths, BlobStore, StorageError};

const ACCEPTED_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".webp"];
const REJECTED_SUBSTRINGS: &[&str] = &["error", "placeholder"];

/// Image step errors (per record, never fatal for the run)
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Rejected image URL {0}: {1}")]
    InvalidUrl(String, &'static str),

    #[error("Image fetch failed: {0}")]
    Fetch(String),

    #[error("Image fetch returned status {0}")]
    Status(u16),

    #[error("Not an image (content type {0})")]
    NotAnImage(String),

    #[error("Image decode failed: {0}")]
    Decode(String),

    #[error("Image encode failed: {0}")]
    Encode(String),

    #[error("Record has no id to key the image by")]
    MissingRecordId,

    #[error("Image upload failed: {0}")]
    Upload(#[from] StorageError),
}

/// Turns a record's thumbnail URL into the URL published in the feed
#[async_trait]
pub trait ImageResolver: Send + Sync {
    async fn resolve(&self, record_id: &str, candidate: &str) -> Result<String, ImageError>;
}

/// Check URL shape; returns the parsed URL when acceptable
pub fn validate_image_url(candidate: &str) -> Result<Url, ImageError> {
    let invalid = |reason| ImageError::InvalidUrl(candidate.to_string(), reason);

    let lowered = candidate.to_lowercase();
    if REJECTED_SUBSTRINGS.iter().any(|s| lowered.contains(s)) {
        return Err(invalid("looks like an error or placeholder image"));
    }

    let url = Url::parse(candidate.trim()).map_err(|_| invalid("not a valid URL"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("unsupported scheme"));
    }

    let path = url.path().to_lowercase();
    if !ACCEPTED_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        return Err(invalid("unsupported image extension"));
    }

    Ok(url)
}

/// Publishes the source URL unchanged once it passes validation
#[derive(Debug, Clone, Default)]
pub struct PassthroughImages;

#[async_trait]
impl ImageResolver for PassthroughImages {
    async fn resolve(&self, _record_id: &str, candidate: &str) -> Result<String, ImageError> {
        validate_image_url(candidate)?;
        Ok(candidate.to_string())
    }
}

/// Re-encoded image ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedImage {
    pub bytes: Vec<u8>,
    pub extension: &'static str,
    pub content_type: &'static str,
}

/// Cover-fit `source` bytes to `width`×`height`, centered crop
///
/// PNG input is written back as PNG; any other decodable input becomes JPEG.
pub fn normalize_image(source: &[u8], settings: &ImageConfig) -> Result<NormalizedImage, ImageError> {
    let format = image::guess_format(source).map_err(|e| ImageError::Decode(e.to_string()))?;
    let decoded = image::load_from_memory(source).map_err(|e| ImageError::Decode(e.to_string()))?;
    let resized = decoded.resize_to_fill(settings.width, settings.height, FilterType::Lanczos3);

    let mut bytes = Vec::new();
    if format == ImageFormat::Png {
        resized
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| ImageError::Encode(e.to_string()))?;
        Ok(NormalizedImage {
            bytes,
            extension: "png",
            content_type: "image/png",
        })
    } else {
        // JPEG has no alpha channel
        let rgb = resized.to_rgb8();
        JpegEncoder::new_with_quality(&mut bytes, settings.jpeg_quality)
            .encode_image(&rgb)
            .map_err(|e| ImageError::Encode(e.to_string()))?;
        Ok(NormalizedImage {
            bytes,
            extension: "jpg",
            content_type: "image/jpeg",
        })
    }
}

/// Downloads, resizes and re-uploads thumbnails
pub struct ImageRehoster {
    http_client: reqwest::Client,
    store: Arc<dyn BlobStore>,
    retry: RetryPolicy,
    settings: ImageConfig,
    image_path: String,
}

impl ImageRehoster {
    pub fn new(
        store: Arc<dyn BlobStore>,
        retry: RetryPolicy,
        settings: ImageConfig,
        image_path: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ImageError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ImageError::Fetch(e.to_string()))?;

        Ok(Self {
            http_client,
            store,
            retry,
            settings,
            image_path: image_path.into(),
        })
    }

    async fn fetch_once(&self, url: &Url) -> Result<(String, Vec<u8>), ImageError> {
        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ImageError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImageError::Fetch(e.to_string()))?;

        Ok((content_type, bytes.to_vec()))
    }
}

#[async_trait]
impl ImageResolver for ImageRehoster {
    async fn resolve(&self, record_id: &str, candidate: &str) -> Result<String, ImageError> {
        let url = validate_image_url(candidate)?;
        if record_id.is_empty() {
            return Err(ImageError::MissingRecordId);
        }

        let (content_type, bytes) =
            retry_with_policy("image fetch", &self.retry, || self.fetch_once(&url)).await?;

        if !content_type.to_ascii_lowercase().starts_with("image/") {
            return Err(ImageError::NotAnImage(content_type));
        }

        let settings = self.settings.clone();
        let normalized = tokio::task::spawn_blocking(move || normalize_image(&bytes, &settings))
            .await
            .map_err(|e| ImageError::Encode(e.to_string()))??;

        let key = join_paths(&[
            &self.image_path,
            &format!("{}.{}", record_id, normalized.extension),
        ]);

        tracing::debug!(
            record_id = %record_id,
            key = %key,
            bytes = normalized.bytes.len(),
            "Re-hosting thumbnail"
        );

        Ok(self
            .store
            .put(&key, normalized.bytes, normalized.content_type)
            .await?)
    }
}

/// Build the resolver for the configured image mode
///
/// `store` is only needed (and required) in rehost mode.
pub fn resolver_from_config(
    config: &TomlConfig,
    store: Option<Arc<dyn BlobStore>>,
) -> Result<Arc<dyn ImageResolver>, ImageError> {
    match config.pipeline.image_mode {
        ImageMode::Passthrough => Ok(Arc::new(PassthroughImages)),
        ImageMode::Rehost => {
            let store = store.ok_or_else(|| {
                StorageError::NotConfigured("image re-hosting needs blob storage".to_string())
            })?;
            let rehoster = ImageRehoster::new(
                store,
                config.pipeline.image_retry.policy(),
                config.pipeline.image.clone(),
                config.storage.image_path.clone(),
                Duration::from_secs(config.storage.timeout_secs),
            )?;
            Ok(Arc::new(rehoster))
        }
    }
}
