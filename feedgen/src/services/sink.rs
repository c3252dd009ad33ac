//! Feed document output
//!
//! Two destinations: a local file, or an object in blob storage. The writer
//! reports where the document ended up (file path or public URL).

use std::path::PathBuf;
use std::sync::Arc;

use feedgen_common::{time, Error};

use super::blob_store::{join_paths, BlobStore};
use crate::error::SinkError;

pub const FEED_CONTENT_TYPE: &str = "application/json";

/// Where a feed document goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    File(PathBuf),
    /// Object key inside the storage zone
    Remote(String),
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Destination::File(path) => write!(f, "file {}", path.display()),
            Destination::Remote(key) => write!(f, "remote {}", key),
        }
    }
}

/// Trimmed brand id, checked for use as part of a file name or object key
///
/// Ids with path separators or `..` would place the feed outside its folder.
pub fn checked_brand_id(raw: &str) -> feedgen_common::Result<&str> {
    let brand_id = raw.trim();
    if brand_id.is_empty() {
        return Err(Error::InvalidInput("brand id is empty".to_string()));
    }
    if brand_id.contains(['/', '\\']) || brand_id.contains("..") {
        return Err(Error::InvalidInput(format!(
            "brand id {:?} must not contain '/', '\\' or '..'",
            brand_id
        )));
    }
    Ok(brand_id)
}

/// `{brand_id}_roku_feed.json`, or `{brand_id}_roku_feed_{epoch_ms}.json`
pub fn feed_filename(brand_id: &str, timestamped: bool) -> String {
    if timestamped {
        format!("{}_roku_feed_{}.json", brand_id, time::now_millis())
    } else {
        format!("{}_roku_feed.json", brand_id)
    }
}

/// Remote destination for a brand's feed under the configured storage folder
pub fn remote_destination(storage_path: &str, brand_id: &str, timestamped: bool) -> Destination {
    Destination::Remote(join_paths(&[storage_path, &feed_filename(brand_id, timestamped)]))
}

/// Writes serialized documents to their destination
#[derive(Clone, Default)]
pub struct SinkWriter {
    store: Option<Arc<dyn BlobStore>>,
}

impl SinkWriter {
    pub fn new(store: Option<Arc<dyn BlobStore>>) -> Self {
        Self { store }
    }

    /// Persist `document`; returns the file path or public URL
    pub async fn write(&self, document: Vec<u8>, destination: &Destination) -> Result<String, SinkError> {
        match destination {
            Destination::File(path) => {
                let file_error = |source| SinkError::File {
                    path: path.display().to_string(),
                    source,
                };

                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent).await.map_err(file_error)?;
                }
                tokio::fs::write(path, &document).await.map_err(file_error)?;

                tracing::info!(path = %path.display(), bytes = document.len(), "Feed written");
                Ok(path.display().to_string())
            }
            Destination::Remote(key) => {
                let store = self.store.as_ref().ok_or(SinkError::StorageNotConfigured)?;
                Ok(store.put(key, document, FEED_CONTENT_TYPE).await?)
            }
        }
    }
}
