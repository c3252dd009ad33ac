//! Content API source
//!
//! `GET {base_url}/brands/{brand_id}/contents?limit={limit}` with a bearer
//! token. The body must carry the records as an array under `data`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;

use feedgen_common::config::SourceConfig;

use super::{records_from_body, RecordSource, SourceError};
use crate::models::FetchedRecords;

const USER_AGENT: &str = concat!("feedgen/", env!("CARGO_PKG_VERSION"));

/// Content-listing API client
pub struct ContentApiSource {
    http_client: reqwest::Client,
    base_url: Url,
    api_token: Option<String>,
    limit: u32,
}

impl ContentApiSource {
    pub fn new(config: &SourceConfig) -> Result<Self, SourceError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let base_url = Url::parse(&config.base_url).map_err(|e| {
            SourceError::NotConfigured(format!("invalid source.base_url {}: {}", config.base_url, e))
        })?;

        if config.api_token.is_none() {
            tracing::warn!("No source API token configured, requests will be unauthenticated");
        }

        Ok(Self {
            http_client,
            base_url,
            api_token: config.api_token.clone(),
            limit: config.limit,
        })
    }

    /// Listing URL for a brand; the id is percent-encoded as one path segment
    pub fn listing_url(&self, brand_id: &str) -> Result<Url, SourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::NotConfigured(format!("base URL cannot have a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["brands", brand_id, "contents"]);
        url.query_pairs_mut()
            .append_pair("limit", &self.limit.to_string());
        Ok(url)
    }
}

#[async_trait]
impl RecordSource for ContentApiSource {
    fn name(&self) -> &'static str {
        "content-api"
    }

    async fn fetch_records(&self, brand_id: &str) -> Result<FetchedRecords, SourceError> {
        let url = self.listing_url(brand_id)?;

        tracing::debug!(brand_id = %brand_id, url = %url, "Fetching content listing");

        let mut request = self.http_client.get(url);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SourceError::Api(status.as_u16(), error_text));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        let fetched = records_from_body(body)?;

        tracing::info!(
            brand_id = %brand_id,
            records = fetched.records.len(),
            undecodable = fetched.undecodable,
            "Fetched content records"
        );

        Ok(fetched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(base_url: &str) -> ContentApiSource {
        ContentApiSource::new(&SourceConfig {
            base_url: base_url.to_string(),
            api_token: Some("t".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_listing_url() {
        let url = source("https://backend.example.com/api").listing_url("685b8e").unwrap();
        assert_eq!(
            url.as_str(),
            "https://backend.example.com/api/brands/685b8e/contents?limit=1000"
        );
    }

    #[test]
    fn test_listing_url_trailing_slash_and_encoding() {
        let url = source("https://backend.example.com/api/").listing_url("a b/c").unwrap();
        assert_eq!(
            url.as_str(),
            "https://backend.example.com/api/brands/a%20b%2Fc/contents?limit=1000"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = ContentApiSource::new(&SourceConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(SourceError::NotConfigured(_))));
    }
}
