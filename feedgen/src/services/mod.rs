//! I/O-bound collaborators: sources, blob storage, images, sink, pipeline

pub mod blob_store;
pub mod feed_pipeline;
pub mod image_normalizer;
pub mod sink;
pub mod source;

pub use blob_store::{join_paths, BlobStore, BunnyStorage, StorageError};
pub use feed_pipeline::{FeedPipeline, GeneratedFeed, PublishedFeed, RunReport};
pub use image_normalizer::{
    normalize_image, resolver_from_config, validate_image_url, ImageError, ImageRehoster,
    ImageResolver, PassthroughImages,
};
pub use sink::{checked_brand_id, feed_filename, remote_destination, Destination, SinkWriter};
pub use source::{
    source_from_config, AirtableSource, ContentApiSource, FileSource, RecordSource, SourceError,
};
