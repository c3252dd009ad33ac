//! Local JSON file source, for offline runs
//!
//! The file holds a content API response body (`{"data": [...]}`).

use std::path::PathBuf;

use async_trait::async_trait;

use super::{records_from_body, RecordSource, SourceError};
use crate::models::FetchedRecords;

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl RecordSource for FileSource {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn fetch_records(&self, brand_id: &str) -> Result<FetchedRecords, SourceError> {
        let content = tokio::fs::read(&self.path).await.map_err(|e| SourceError::Io {
            path: self.path.display().to_string(),
            source: e,
        })?;

        let body: serde_json::Value =
            serde_json::from_slice(&content).map_err(|e| SourceError::Parse(e.to_string()))?;

        let fetched = records_from_body(body)?;
        tracing::info!(
            brand_id = %brand_id,
            path = %self.path.display(),
            records = fetched.records.len(),
            "Loaded content records from file"
        );
        Ok(fetched)
    }
}
