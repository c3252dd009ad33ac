//! Airtable-style tabular source
//!
//! Rows are listed page by page (`offset` continuation token) and their
//! fields renamed into the content API record shape, so decoding stays in
//! one place.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::{Map, Value};

use feedgen_common::config::SourceConfig;

use super::{RecordSource, SourceError};
use crate::models::{decode_records, FetchedRecords};

/// Upper bound on pages per run, in case the service keeps returning offsets
const MAX_PAGES: usize = 1000;

/// Table column → record field, first present column wins
const FIELD_MAP: &[(&str, &[&str])] = &[
    ("_id", &["video_id"]),
    ("title", &["video_title"]),
    ("shortDescription", &["video_description"]),
    ("longDescription", &["long_description"]),
    ("createdAt", &["releaseDate"]),
    ("ageRating", &["ageRating", "contentRating"]),
    ("duration", &["durationInSeconds"]),
    ("isLiveStream", &["isLiveStream"]),
    ("type", &["type"]),
    ("genres", &["genres", "genre"]),
];

#[derive(Debug, Deserialize)]
struct ListPage {
    #[serde(default)]
    records: Vec<Row>,
    offset: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Row {
    #[serde(default)]
    fields: Map<String, Value>,
}

pub struct AirtableSource {
    http_client: reqwest::Client,
    table_url: Url,
    token: String,
    page_size: u32,
}

impl AirtableSource {
    pub fn new(config: &SourceConfig) -> Result<Self, SourceError> {
        let airtable = &config.airtable;
        let base_id = airtable
            .base_id
            .as_deref()
            .ok_or_else(|| SourceError::NotConfigured("source.airtable.base_id".to_string()))?;
        let table = airtable
            .table
            .as_deref()
            .ok_or_else(|| SourceError::NotConfigured("source.airtable.table".to_string()))?;
        let token = airtable
            .token
            .clone()
            .ok_or_else(|| SourceError::NotConfigured("source.airtable.token".to_string()))?;

        let mut table_url = Url::parse(&airtable.api_url).map_err(|e| {
            SourceError::NotConfigured(format!("invalid airtable api_url {}: {}", airtable.api_url, e))
        })?;
        table_url
            .path_segments_mut()
            .map_err(|_| SourceError::NotConfigured(format!("api_url cannot have a path: {}", airtable.api_url)))?
            .pop_if_empty()
            .extend([base_id, table]);

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SourceError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            table_url,
            token,
            page_size: airtable.page_size,
        })
    }

    async fn fetch_page(&self, offset: Option<&str>) -> Result<ListPage, SourceError> {
        let mut url = self.table_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("pageSize", &self.page_size.to_string());
            if let Some(offset) = offset {
                query.append_pair("offset", offset);
            }
        }

        let response = self
            .http_client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SourceError::Api(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))
    }
}

#[async_trait]
impl RecordSource for AirtableSource {
    fn name(&self) -> &'static str {
        "airtable"
    }

    /// The table holds a single brand's catalog; `brand_id` only labels logs
    async fn fetch_records(&self, brand_id: &str) -> Result<FetchedRecords, SourceError> {
        let mut rows = Vec::new();
        let mut offset: Option<String> = None;

        for page_number in 1..=MAX_PAGES {
            let page = self.fetch_page(offset.as_deref()).await?;
            tracing::debug!(page = page_number, rows = page.records.len(), "Fetched table page");

            rows.extend(page.records.into_iter().map(|row| row_to_record(row.fields)));

            match page.offset {
                Some(next) => offset = Some(next),
                None => {
                    offset = None;
                    break;
                }
            }
        }

        if offset.is_some() {
            tracing::warn!(max_pages = MAX_PAGES, "Stopped paging table, results truncated");
        }

        let fetched = decode_records(rows);
        tracing::info!(
            brand_id = %brand_id,
            records = fetched.records.len(),
            undecodable = fetched.undecodable,
            "Fetched table rows"
        );
        Ok(fetched)
    }
}

/// Rename table columns into the content API record shape
fn row_to_record(mut fields: Map<String, Value>) -> Value {
    let mut record = Map::new();

    for (target, columns) in FIELD_MAP {
        if let Some(value) = columns.iter().find_map(|column| fields.remove(*column)) {
            record.insert((*target).to_string(), value);
        }
    }

    if let Some(url) = fields.remove("thumbnail_url") {
        record.insert("landscapeThumbnail".to_string(), url);
    }

    Value::Object(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawRecord;
    use feedgen_common::config::AirtableConfig;
    use serde_json::json;

    #[test]
    fn test_row_mapping() {
        let fields = json!({
            "video_id": "rec1",
            "video_title": "Opening Ceremony",
            "video_description": "Live from the stadium",
            "contentRating": "PG",
            "durationInSeconds": 5400,
            "isLiveStream": true,
            "genre": "Sports, Olympics",
            "thumbnail_url": "https://cdn.example.com/open.png",
            "stream_url": "https://stream.example.com/x.m3u8"
        });
        let Value::Object(fields) = fields else { unreachable!() };

        let record: RawRecord = serde_json::from_value(row_to_record(fields)).unwrap();
        assert_eq!(record.id.as_deref(), Some("rec1"));
        assert_eq!(record.title.as_deref(), Some("Opening Ceremony"));
        assert_eq!(record.rating.as_deref(), Some("PG"));
        assert_eq!(record.duration_secs, Some(5400.0));
        assert!(record.is_live_stream);
        assert_eq!(record.genre_tags, vec!["Sports", "Olympics"]);
        assert_eq!(record.thumbnail_url.as_deref(), Some("https://cdn.example.com/open.png"));
    }

    #[test]
    fn test_age_rating_column_preferred() {
        let Value::Object(fields) = json!({"ageRating": "R", "contentRating": "G"}) else {
            unreachable!()
        };
        let record: RawRecord = serde_json::from_value(row_to_record(fields)).unwrap();
        assert_eq!(record.rating.as_deref(), Some("R"));
    }

    #[test]
    fn test_missing_settings_rejected() {
        let config = SourceConfig {
            airtable: AirtableConfig {
                base_id: Some("app1".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(AirtableSource::new(&config), Err(SourceError::NotConfigured(_))));
    }

    #[test]
    fn test_table_name_encoded() {
        let config = SourceConfig {
            airtable: AirtableConfig {
                base_id: Some("appX".to_string()),
                table: Some("Live Olympics TV".to_string()),
                token: Some("k".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let source = AirtableSource::new(&config).unwrap();
        assert_eq!(
            source.table_url.as_str(),
            "https://api.airtable.com/v0/appX/Live%20Olympics%20TV"
        );
    }
}
