//! Content record sources
//!
//! A source yields the raw records for one brand. Three backends exist:
//! the content API, an Airtable-style table, and a local JSON file.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use feedgen_common::config::{SourceKind, TomlConfig};

use crate::models::FetchedRecords;

pub mod airtable;
pub mod api;
pub mod file;

pub use airtable::AirtableSource;
pub use api::ContentApiSource;
pub use file::FileSource;

/// Source errors (all fatal for the run)
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Read {path} failed: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Source not configured: {0}")]
    NotConfigured(String),
}

/// Something that lists raw content records
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    async fn fetch_records(&self, brand_id: &str) -> Result<FetchedRecords, SourceError>;
}

/// Build the source selected by `source.kind`
pub fn source_from_config(config: &TomlConfig) -> Result<Arc<dyn RecordSource>, SourceError> {
    let source = &config.source;
    Ok(match source.kind {
        SourceKind::Api => Arc::new(ContentApiSource::new(source)?),
        SourceKind::Airtable => Arc::new(AirtableSource::new(source)?),
        SourceKind::File => {
            let path = source.file.clone().ok_or_else(|| {
                SourceError::NotConfigured("source.file is required for kind = \"file\"".to_string())
            })?;
            Arc::new(FileSource::new(path))
        }
    })
}

/// Pull the `data` array out of a content-listing body
pub(crate) fn records_from_body(body: serde_json::Value) -> Result<FetchedRecords, SourceError> {
    match body {
        serde_json::Value::Object(mut obj) => match obj.remove("data") {
            Some(serde_json::Value::Array(items)) => Ok(crate::models::decode_records(items)),
            Some(other) => Err(SourceError::UnexpectedShape(format!(
                "expected array at data, got {}",
                json_kind(&other)
            ))),
            None => Err(SourceError::UnexpectedShape("missing data field".to_string())),
        },
        other => Err(SourceError::UnexpectedShape(format!(
            "expected object body, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
