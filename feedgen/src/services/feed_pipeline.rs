//! Feed generation pipeline
//!
//! fetch → per-record transform (image work concurrent, one future per
//! record) → assemble → serialize → write. Source and sink failures abort the
//! run; per-record problems are absorbed and counted in the run report.

use std::sync::Arc;

use futures::future::join_all;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use feedgen_common::config::TomlConfig;
use feedgen_common::feed::{AssetImage, Feed, FeedDefaults};

use super::blob_store::BlobStore;
use super::image_normalizer::{resolver_from_config, ImageResolver};
use super::sink::{Destination, SinkWriter};
use super::source::{source_from_config, RecordSource};
use crate::error::PipelineError;
use crate::models::RawRecord;
use crate::transform::{
    classifier_from_config, feed, AssetBuilder, AssetInputs, DescriptionSanitizer,
    DurationPolicy, GenreClassifier, RatingMapper,
};

/// Counts for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub brand_id: String,
    /// Payload entries received, decodable or not
    pub records_fetched: usize,
    /// Entries that were not record objects
    pub records_undecodable: usize,
    /// Decoded records left out of the feed (image failure with dropping enabled)
    pub records_dropped: usize,
    /// Records whose thumbnail was rejected (kept or dropped)
    pub images_rejected: usize,
    pub assets_emitted: usize,
}

impl RunReport {
    /// Fetched entries that did not become assets
    pub fn dropped_total(&self) -> usize {
        self.records_undecodable + self.records_dropped
    }
}

/// Assembled feed plus its run report
#[derive(Debug, Clone)]
pub struct GeneratedFeed {
    pub feed: Feed,
    pub report: RunReport,
}

/// Result of writing a feed
#[derive(Debug, Clone)]
pub struct PublishedFeed {
    /// File path or public URL
    pub location: String,
    pub report: RunReport,
}

enum ImageOutcome {
    Absent,
    Accepted(String),
    Rejected,
}

pub struct FeedPipeline {
    source: Arc<dyn RecordSource>,
    images: Arc<dyn ImageResolver>,
    genres: Arc<dyn GenreClassifier>,
    ratings: RatingMapper,
    descriptions: DescriptionSanitizer,
    builder: AssetBuilder,
    defaults: FeedDefaults,
    drop_on_image_failure: bool,
    sink: SinkWriter,
}

impl FeedPipeline {
    /// Pipeline with collaborators supplied by the caller and the rest built from `config`
    pub fn new(
        config: &TomlConfig,
        source: Arc<dyn RecordSource>,
        images: Arc<dyn ImageResolver>,
        store: Option<Arc<dyn BlobStore>>,
    ) -> Self {
        let defaults = config.feed.defaults();
        Self {
            source,
            images,
            genres: classifier_from_config(config),
            ratings: RatingMapper::new(config.rating_table()),
            descriptions: DescriptionSanitizer::new(config.feed.platform_name.clone()),
            builder: AssetBuilder::new(
                defaults.clone(),
                DurationPolicy::new(&config.pipeline.duration),
            ),
            defaults,
            drop_on_image_failure: config.pipeline.drop_on_image_failure,
            sink: SinkWriter::new(store),
        }
    }

    /// Everything from configuration
    pub fn from_config(
        config: &TomlConfig,
        store: Option<Arc<dyn BlobStore>>,
    ) -> Result<Self, PipelineError> {
        let source = source_from_config(config)?;
        let images = resolver_from_config(config, store.clone())
            .map_err(|e| PipelineError::Config(e.to_string()))?;
        Ok(Self::new(config, source, images, store))
    }

    /// Swap the genre classifier
    pub fn with_genre_classifier(mut self, genres: Arc<dyn GenreClassifier>) -> Self {
        self.genres = genres;
        self
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Fetch and transform; nothing is written
    pub async fn generate(&self, brand_id: &str) -> Result<GeneratedFeed, PipelineError> {
        let fetched = self.source.fetch_records(brand_id).await?;
        let records = fetched.records;

        let mut report = RunReport {
            brand_id: brand_id.to_string(),
            records_fetched: records.len() + fetched.undecodable,
            records_undecodable: fetched.undecodable,
            ..Default::default()
        };

        // join_all yields results in input order
        let outcomes = join_all(records.iter().map(|record| self.resolve_image(record))).await;

        let mut rng = StdRng::from_entropy();
        let mut assets = Vec::with_capacity(records.len());

        for (record, outcome) in records.iter().zip(outcomes) {
            let images = match outcome {
                ImageOutcome::Accepted(url) => {
                    vec![AssetImage::main(url, &self.defaults.default_language)]
                }
                ImageOutcome::Absent => Vec::new(),
                ImageOutcome::Rejected => {
                    report.images_rejected += 1;
                    if self.drop_on_image_failure {
                        report.records_dropped += 1;
                        tracing::info!(record_id = %record.id_or_empty(), "Dropping record after image failure");
                        continue;
                    }
                    Vec::new()
                }
            };

            let descriptions = self.descriptions.sanitize(
                record.title_or_empty(),
                record.short_description.as_deref().unwrap_or(""),
                record.long_description.as_deref().unwrap_or(""),
            );

            let inputs = AssetInputs {
                advisories: self.ratings.map(record.rating.as_deref()),
                genres: self.genres.classify(record),
                descriptions,
                images,
            };
            assets.push(self.builder.build(record, inputs, &mut rng));
        }

        report.assets_emitted = assets.len();

        tracing::info!(
            brand_id = %brand_id,
            fetched = report.records_fetched,
            emitted = report.assets_emitted,
            dropped = report.dropped_total(),
            images_rejected = report.images_rejected,
            "Feed assembled"
        );

        Ok(GeneratedFeed {
            feed: feed::assemble(&self.defaults, assets),
            report,
        })
    }

    /// Generate, serialize (pretty JSON) and write to `destination`
    pub async fn run(
        &self,
        brand_id: &str,
        destination: &Destination,
    ) -> Result<PublishedFeed, PipelineError> {
        let generated = self.generate(brand_id).await?;
        let document = serde_json::to_vec_pretty(&generated.feed)?;
        let location = self.sink.write(document, destination).await?;

        tracing::info!(brand_id = %brand_id, destination = %destination, location = %location, "Feed published");

        Ok(PublishedFeed {
            location,
            report: generated.report,
        })
    }

    async fn resolve_image(&self, record: &RawRecord) -> ImageOutcome {
        let Some(candidate) = record.thumbnail_url.as_deref() else {
            return ImageOutcome::Absent;
        };

        match self.images.resolve(record.id_or_empty(), candidate).await {
            Ok(url) => ImageOutcome::Accepted(url),
            Err(e) => {
                tracing::warn!(record_id = %record.id_or_empty(), error = %e, "No image for record");
                ImageOutcome::Rejected
            }
        }
    }
}
